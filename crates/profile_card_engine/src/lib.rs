//! Profile card engine: profile fetching, background execution and the
//! controller that drives the core state machine.
mod controller;
mod engine;
mod fetch;
mod models;
mod types;

pub use controller::ProfileController;
pub use engine::EngineHandle;
pub use fetch::{FetchSettings, ProfileFetcher, ReqwestProfileFetcher, DEFAULT_API_BASE_URL};
pub use types::{EngineError, EngineEvent, FailureKind, FetchError};
