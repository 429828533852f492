use std::time::{Duration, Instant};

use card_logging::{card_debug, card_error, card_info, card_warn};
use profile_card_core::{update, AppState, AppViewModel, Effect, Msg, RequestId, ViewState};

use crate::{EngineError, EngineEvent, EngineHandle};

/// Owns the view state for one card and runs its fetches through an engine.
///
/// At most one request is outstanding; results for requests that are no
/// longer active are dropped.
pub struct ProfileController {
    state: AppState,
    engine: EngineHandle,
}

impl ProfileController {
    pub fn new(engine: EngineHandle) -> Self {
        Self {
            state: AppState::new(),
            engine,
        }
    }

    /// Queries `username`. Ignored while a fetch is in flight or when the
    /// username is blank.
    pub fn submit(&mut self, username: impl Into<String>) {
        self.dispatch(Msg::Submit(username.into()));
    }

    /// Returns to `Idle`. An in-flight fetch keeps running but its result
    /// will be discarded.
    pub fn reset(&mut self) {
        self.dispatch(Msg::Reset);
    }

    pub fn input_changed(&mut self, text: impl Into<String>) {
        self.dispatch(Msg::InputChanged(text.into()));
    }

    pub fn submit_input(&mut self) {
        self.dispatch(Msg::SubmitInput);
    }

    /// Profile URL to open, when a profile is loaded.
    pub fn open_profile(&mut self) -> Option<String> {
        self.dispatch(Msg::OpenProfileClicked)
            .into_iter()
            .find_map(|effect| match effect {
                Effect::OpenUrl { url } => Some(url),
                Effect::FetchProfile { .. } => None,
            })
    }

    /// Applies `msg`, runs fetch effects on the engine and hands back the
    /// effects the caller has to perform.
    pub fn dispatch(&mut self, msg: Msg) -> Vec<Effect> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;

        let mut remaining = Vec::new();
        for effect in effects {
            match effect {
                Effect::FetchProfile {
                    request_id,
                    username,
                } => {
                    card_debug!("FetchProfile request_id={} username={}", request_id, username);
                    if let Err(err) = self.engine.fetch(request_id, username) {
                        self.fail_request(request_id, &err);
                    }
                }
                other => remaining.push(other),
            }
        }
        remaining
    }

    /// Applies every engine event that has already arrived. Returns how many
    /// were applied.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.engine.try_recv() {
            self.apply_event(event);
            applied += 1;
        }
        applied
    }

    /// Blocks for at most `timeout` waiting for one engine event. If the
    /// engine has stopped, the active request fails instead.
    pub fn wait_for_event(&mut self, timeout: Duration) -> bool {
        match self.engine.recv_timeout(timeout) {
            Ok(Some(event)) => {
                self.apply_event(event);
                true
            }
            Ok(None) => false,
            Err(err) => {
                if let Some(request_id) = self.state.view_state().active_request() {
                    self.fail_request(request_id, &err);
                }
                false
            }
        }
    }

    /// Blocks until the state leaves `Loading` or `timeout` passes.
    /// Returns false on timeout. A timeout too large to express as a
    /// deadline waits without one.
    pub fn wait_until_settled(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        loop {
            self.poll();
            if !self.state.view_state().is_loading() {
                return true;
            }
            let wait = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return false;
                    }
                    deadline - now
                }
                None => Duration::MAX,
            };
            self.wait_for_event(wait);
        }
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    pub fn view_state(&self) -> &ViewState {
        self.state.view_state()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn consume_dirty(&mut self) -> bool {
        self.state.consume_dirty()
    }

    fn fail_request(&mut self, request_id: RequestId, err: &EngineError) {
        card_error!("request {} could not run: {}", request_id, err);
        self.dispatch(Msg::FetchFailed {
            request_id,
            reason: err.to_string(),
        });
    }

    fn apply_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::FetchCompleted { request_id, result } => {
                if self.state.view_state().active_request() != Some(request_id) {
                    card_debug!("discarding stale result for request {}", request_id);
                }
                let msg = match result {
                    Ok(record) => {
                        card_info!("request {} loaded profile {}", request_id, record.login);
                        Msg::FetchSucceeded { request_id, record }
                    }
                    Err(err) => {
                        card_warn!("request {} failed: {}", request_id, err);
                        Msg::FetchFailed {
                            request_id,
                            reason: err.to_string(),
                        }
                    }
                };
                self.dispatch(msg);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use profile_card_core::FETCH_FAILED_MESSAGE;

    use super::*;

    #[test]
    fn submit_to_stopped_engine_fails_the_request() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (_event_tx, event_rx) = mpsc::channel();
        drop(cmd_rx);
        let mut controller = ProfileController::new(EngineHandle::from_channels(cmd_tx, event_rx));

        controller.submit("octocat");

        assert_eq!(
            controller.view_state(),
            &ViewState::Failed(FETCH_FAILED_MESSAGE.to_string())
        );
        assert_eq!(controller.state().last_failure_reason(), Some("engine stopped"));
        assert!(controller.wait_until_settled(Duration::from_millis(10)));

        controller.submit("octocat");
        assert!(matches!(controller.view_state(), ViewState::Failed(_)));
    }

    #[test]
    fn loading_fails_when_engine_drops_its_event_channel() {
        let (cmd_tx, _cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel::<EngineEvent>();
        let mut controller = ProfileController::new(EngineHandle::from_channels(cmd_tx, event_rx));

        controller.submit("octocat");
        assert!(controller.view_state().is_loading());
        drop(event_tx);

        assert!(controller.wait_until_settled(Duration::MAX));
        assert!(matches!(controller.view_state(), ViewState::Failed(_)));
    }
}
