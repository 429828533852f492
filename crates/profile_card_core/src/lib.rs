//! Profile card core: pure view-state machine and view-model helpers.
mod effect;
mod msg;
mod profile;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use profile::{ProfileRecord, RepoSummary};
pub use state::{AppState, RequestId, ViewState, FETCH_FAILED_MESSAGE};
pub use update::{normalize_username, update};
pub use view_model::{
    AppViewModel, ProfileCardView, RepoRowView, StatView, SUBMIT_LABEL, SUBMIT_LABEL_LOADING,
};
