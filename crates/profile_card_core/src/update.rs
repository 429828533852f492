use crate::{AppState, Effect, Msg, ViewState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::Submit(raw) => submit(&mut state, &raw),
        Msg::SubmitInput => {
            let raw = state.input().to_owned();
            submit(&mut state, &raw)
        }
        Msg::FetchSucceeded { request_id, record } => {
            // A false return means the result is stale and was dropped.
            state.complete_success(request_id, record);
            Vec::new()
        }
        Msg::FetchFailed { request_id, reason } => {
            state.complete_failure(request_id, reason);
            Vec::new()
        }
        Msg::Reset => {
            state.reset();
            Vec::new()
        }
        Msg::OpenProfileClicked => match state.view_state() {
            ViewState::Loaded(record) => vec![Effect::OpenUrl {
                url: record.html_url.clone(),
            }],
            _ => Vec::new(),
        },
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Trims the raw input and drops a single leading `@`.
/// Returns `None` when nothing is left to query.
pub fn normalize_username(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('@').unwrap_or(trimmed).trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

fn submit(state: &mut AppState, raw: &str) -> Vec<Effect> {
    // First in flight wins; no second request while loading.
    if state.view_state().is_loading() {
        return Vec::new();
    }
    // Empty queries are rejected locally and leave the state untouched.
    let Some(username) = normalize_username(raw) else {
        return Vec::new();
    };
    let request_id = state.begin_request(username.clone());
    vec![Effect::FetchProfile {
        request_id,
        username,
    }]
}
