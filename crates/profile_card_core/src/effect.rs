#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start fetching the profile for `username`; the result must come back
    /// tagged with the same `request_id`.
    FetchProfile {
        request_id: crate::RequestId,
        username: String,
    },
    /// Open the profile page in a browser.
    OpenUrl { url: String },
}
