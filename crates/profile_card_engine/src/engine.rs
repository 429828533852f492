use std::panic::AssertUnwindSafe;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use card_logging::{card_debug, card_error, card_info};
use futures_util::FutureExt;
use profile_card_core::RequestId;

use crate::fetch::{FetchSettings, ProfileFetcher, ReqwestProfileFetcher};
use crate::{EngineError, EngineEvent, FailureKind, FetchError};

pub(crate) enum EngineCommand {
    Fetch {
        request_id: RequestId,
        username: String,
    },
}

/// Runs fetches on a background tokio runtime and reports results over a
/// channel. Dropping the handle stops the worker and abandons any fetch
/// still in flight.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: FetchSettings) -> Result<Self, EngineError> {
        let fetcher = ReqwestProfileFetcher::new(settings)?;
        Self::with_fetcher(Arc::new(fetcher))
    }

    pub fn with_fetcher(fetcher: Arc<dyn ProfileFetcher>) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Runtime::new().map_err(EngineError::Runtime)?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::Builder::new()
            .name("profile-card-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let fetcher = fetcher.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(fetcher.as_ref(), command, event_tx).await;
                    });
                }
                card_debug!("engine command channel closed, stopping worker");
            })
            .map_err(EngineError::Thread)?;

        Ok(Self { cmd_tx, event_rx })
    }

    /// Queues a fetch. Fails with `EngineError::Stopped` once the worker
    /// thread is gone; no `FetchCompleted` will follow in that case.
    pub fn fetch(
        &self,
        request_id: RequestId,
        username: impl Into<String>,
    ) -> Result<(), EngineError> {
        self.cmd_tx
            .send(EngineCommand::Fetch {
                request_id,
                username: username.into(),
            })
            .map_err(|_| EngineError::Stopped)
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Waits up to `timeout` for the next event. `Ok(None)` means the wait
    /// timed out; `Err(Stopped)` means no event can ever arrive.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<EngineEvent>, EngineError> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(EngineError::Stopped),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_channels(
        cmd_tx: mpsc::Sender<EngineCommand>,
        event_rx: mpsc::Receiver<EngineEvent>,
    ) -> Self {
        Self { cmd_tx, event_rx }
    }
}

async fn handle_command(
    fetcher: &dyn ProfileFetcher,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Fetch {
            request_id,
            username,
        } => {
            card_info!("request {} fetching profile {:?}", request_id, username);
            // A panicking fetcher still has to complete the request.
            let result = match AssertUnwindSafe(fetcher.fetch(&username))
                .catch_unwind()
                .await
            {
                Ok(result) => result,
                Err(_) => {
                    card_error!("request {} fetcher panicked", request_id);
                    Err(FetchError::new(FailureKind::Internal, "fetcher panicked"))
                }
            };
            let _ = event_tx.send(EngineEvent::FetchCompleted { request_id, result });
        }
    }
}
