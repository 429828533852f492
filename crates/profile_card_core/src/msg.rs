#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the username input box.
    InputChanged(String),
    /// Submit a query for the given username.
    Submit(String),
    /// User clicked Generate: submit whatever is in the input box.
    SubmitInput,
    /// A fetch completed successfully.
    FetchSucceeded {
        request_id: crate::RequestId,
        record: crate::ProfileRecord,
    },
    /// A fetch failed. `reason` is diagnostic only and never shown as data.
    FetchFailed {
        request_id: crate::RequestId,
        reason: String,
    },
    /// User clicked New Search.
    Reset,
    /// User clicked View on GitHub.
    OpenProfileClicked,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
