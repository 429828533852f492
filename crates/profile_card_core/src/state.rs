use crate::view_model::{AppViewModel, ProfileCardView};
use crate::ProfileRecord;

pub type RequestId = u64;

/// The only failure text ever shown to the user. Failure causes are not
/// distinguished on screen.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch user data. Please try again.";

/// What the UI should currently display. Exactly one variant is active.
///
/// `Loaded` and `Failed` are only entered from `Loading`, and only by the
/// result of the request recorded there.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Loading {
        request_id: RequestId,
        username: String,
    },
    Loaded(ProfileRecord),
    Failed(String),
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading { .. })
    }

    /// Id of the in-flight request, if any.
    pub fn active_request(&self) -> Option<RequestId> {
        match self {
            ViewState::Loading { request_id, .. } => Some(*request_id),
            _ => None,
        }
    }

    pub fn record(&self) -> Option<&ProfileRecord> {
        match self {
            ViewState::Loaded(record) => Some(record),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    view_state: ViewState,
    input: String,
    next_request_id: RequestId,
    last_failure_reason: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view_state
    }

    /// Raw contents of the username input box.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Diagnostic reason of the most recent failure, cleared by the next
    /// submit or reset.
    pub fn last_failure_reason(&self) -> Option<&str> {
        self.last_failure_reason.as_deref()
    }

    pub fn view(&self) -> AppViewModel {
        let loading = self.view_state.is_loading();
        let (loading_username, error, card) = match &self.view_state {
            ViewState::Idle => (None, None, None),
            ViewState::Loading { username, .. } => (Some(username.clone()), None, None),
            ViewState::Loaded(record) => (None, None, Some(ProfileCardView::from_record(record))),
            ViewState::Failed(message) => (None, Some(message.clone()), None),
        };
        AppViewModel {
            input: self.input.clone(),
            submit_enabled: !loading,
            submit_label: AppViewModel::submit_label_for(loading).to_string(),
            loading_username,
            error,
            card,
            dirty: self.dirty,
        }
    }

    /// Returns whether anything visible changed since the last call, and
    /// clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_input(&mut self, text: String) {
        if self.input != text {
            self.input = text;
            self.mark_dirty();
        }
    }

    /// Enters `Loading` for a fresh request and returns its id.
    pub(crate) fn begin_request(&mut self, username: String) -> RequestId {
        self.next_request_id += 1;
        let request_id = self.next_request_id;
        self.view_state = ViewState::Loading {
            request_id,
            username,
        };
        self.last_failure_reason = None;
        self.mark_dirty();
        request_id
    }

    /// Applies a successful result. Returns false when the result is stale.
    pub(crate) fn complete_success(&mut self, request_id: RequestId, record: ProfileRecord) -> bool {
        if self.view_state.active_request() != Some(request_id) {
            return false;
        }
        self.view_state = ViewState::Loaded(record);
        self.mark_dirty();
        true
    }

    /// Applies a failed result. Returns false when the result is stale.
    pub(crate) fn complete_failure(&mut self, request_id: RequestId, reason: String) -> bool {
        if self.view_state.active_request() != Some(request_id) {
            return false;
        }
        self.view_state = ViewState::Failed(FETCH_FAILED_MESSAGE.to_string());
        self.last_failure_reason = Some(reason);
        self.mark_dirty();
        true
    }

    pub(crate) fn reset(&mut self) {
        if self.view_state != ViewState::Idle || self.last_failure_reason.is_some() {
            self.view_state = ViewState::Idle;
            self.last_failure_reason = None;
            self.mark_dirty();
        }
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
