//! Race a network call against a timer.
//!
//! # Responsibilities
//! - Start the network call and a deadline timer together
//! - Settle with whichever finishes first
//! - Leave a timed-out call running in the background, unobserved

use std::time::Duration;

use crate::fetch::transport::Transport;
use crate::fetch::types::{FetchError, FetchRequest, FetchResponse, DEFAULT_DEADLINE};

/// Issues requests that always settle within a deadline.
#[derive(Debug, Clone)]
pub struct TimeoutBoundedFetcher<T> {
    transport: T,
}

impl<T: Transport> TimeoutBoundedFetcher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch with the default 6 second deadline.
    pub async fn execute(&self, request: FetchRequest) -> Result<FetchResponse, FetchError> {
        self.execute_with_deadline(request, DEFAULT_DEADLINE).await
    }

    /// Fetch, failing with [`FetchError::Timeout`] once `deadline` elapses.
    ///
    /// The network call runs as its own task. Losing the race drops only the
    /// join handle, so the call keeps going and its result is discarded.
    pub async fn execute_with_deadline(
        &self,
        request: FetchRequest,
        deadline: Duration,
    ) -> Result<FetchResponse, FetchError> {
        let url = request.url.clone();
        let mut call = tokio::spawn(self.transport.send(request));

        let settled = tokio::select! {
            biased;
            joined = &mut call => Some(joined),
            _ = tokio::time::sleep(deadline) => None,
        };

        let joined = match settled {
            Some(joined) => joined,
            None => {
                // A call due at the same instant as the timer still counts as in time.
                tokio::task::yield_now().await;
                if !call.is_finished() {
                    tracing::warn!(
                        url = %url,
                        deadline_ms = deadline.as_millis() as u64,
                        "Deadline elapsed before response; request left in flight"
                    );
                    return Err(FetchError::Timeout);
                }
                call.await
            }
        };

        match joined {
            Ok(result) => result,
            Err(e) => Err(FetchError::Network(format!("request task failed: {}", e))),
        }
    }
}
