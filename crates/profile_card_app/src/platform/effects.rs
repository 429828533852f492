use card_logging::{card_info, card_warn};
use profile_card_core::Effect;

/// Performs the effects the controller leaves to the platform.
pub fn perform(effects: Vec<Effect>) {
    for effect in effects {
        match effect {
            Effect::OpenUrl { url } => open_url(&url),
            Effect::FetchProfile { request_id, .. } => {
                // The controller runs fetches itself.
                card_warn!("FetchProfile {} reached the platform layer", request_id);
            }
        }
    }
}

pub fn open_url(url: &str) {
    card_info!("Opening {}", url);
    if let Err(err) = open::that(url) {
        card_warn!("Failed to open {}: {}", url, err);
        eprintln!("Could not open a browser for {url}: {err}");
    }
}
