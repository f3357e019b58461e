//! Test doubles for [`FetchClient`].
//!
//! - [`StaticFetchClient`] answers every request with the same result.
//! - [`ScriptedFetchClient`] parks every request until the test answers it,
//!   which makes it possible to resolve requests out of order.

use crate::client::{FetchClient, FetchError, FetchFuture, FetchResponse, RequestDescriptor};
use crate::environment::ReaderEnvironment;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{mpsc, oneshot};

/// Client answering every request with a fixed result
#[derive(Debug)]
pub struct StaticFetchClient {
    result: Result<FetchResponse, FetchError>,
    requests: Mutex<Vec<RequestDescriptor>>,
}

impl StaticFetchClient {
    /// Always succeed with `response`
    #[must_use]
    pub const fn ok(response: FetchResponse) -> Self {
        Self {
            result: Ok(response),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always fail with `error`
    #[must_use]
    pub const fn err(error: FetchError) -> Self {
        Self {
            result: Err(error),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, oldest first
    #[must_use]
    pub fn requests(&self) -> Vec<RequestDescriptor> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl FetchClient for StaticFetchClient {
    fn fetch(&self, request: RequestDescriptor) -> FetchFuture<'_> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        let result = self.result.clone();
        Box::pin(async move { result })
    }
}

/// A request waiting for the test to answer it
#[derive(Debug)]
pub struct PendingFetch {
    /// The request as the client received it
    pub request: RequestDescriptor,
    responder: oneshot::Sender<Result<FetchResponse, FetchError>>,
}

impl PendingFetch {
    /// Answer the request
    ///
    /// Returns `false` if nobody is waiting any more, i.e. the fetch was
    /// cancelled before it got its answer.
    pub fn respond(self, result: Result<FetchResponse, FetchError>) -> bool {
        self.responder.send(result).is_ok()
    }

    /// Whether the fetch was cancelled while waiting
    #[must_use]
    pub fn is_abandoned(&self) -> bool {
        self.responder.is_closed()
    }
}

/// Client whose requests are answered by hand through a [`FetchScript`]
#[derive(Debug, Clone)]
pub struct ScriptedFetchClient {
    calls: mpsc::UnboundedSender<PendingFetch>,
}

/// Test-side handle of a [`ScriptedFetchClient`]
#[derive(Debug)]
pub struct FetchScript {
    calls: mpsc::UnboundedReceiver<PendingFetch>,
}

impl ScriptedFetchClient {
    /// Create a client and the script that answers it
    #[must_use]
    pub fn new() -> (Self, FetchScript) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { calls: tx }, FetchScript { calls: rx })
    }
}

impl FetchClient for ScriptedFetchClient {
    fn fetch(&self, request: RequestDescriptor) -> FetchFuture<'_> {
        let (responder, answer) = oneshot::channel();
        let parked = self.calls.send(PendingFetch { request, responder });

        Box::pin(async move {
            if parked.is_err() {
                return Err(FetchError::Transport("fetch script dropped".to_string()));
            }
            answer
                .await
                .unwrap_or_else(|_| Err(FetchError::Transport("request never answered".to_string())))
        })
    }
}

impl FetchScript {
    /// Wait for the next request
    ///
    /// Returns `None` once every client clone is gone.
    pub async fn next_request(&mut self) -> Option<PendingFetch> {
        self.calls.recv().await
    }

    /// Take the next request if one is already waiting
    pub fn try_next_request(&mut self) -> Option<PendingFetch> {
        self.calls.try_recv().ok()
    }
}

/// Environment whose client answers every request with an empty list
#[must_use]
pub fn test_environment() -> ReaderEnvironment {
    let empty = FetchResponse::new(
        serde_json::Value::Array(Vec::new()),
        [("X-WP-Total", "0"), ("X-WP-TotalPages", "0")],
    );
    ReaderEnvironment::new(Arc::new(StaticFetchClient::ok(empty)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::client::PostListQuery;

    fn request(page: u32) -> RequestDescriptor {
        RequestDescriptor::post_list(PostListQuery {
            page,
            per_page: 10,
            id: None,
        })
    }

    #[tokio::test]
    async fn test_static_client_records_requests() {
        let client = StaticFetchClient::err(FetchError::Timeout);

        let result = client.fetch(request(3)).await;

        assert_eq!(result, Err(FetchError::Timeout));
        assert_eq!(client.requests(), vec![request(3)]);
    }

    #[tokio::test]
    async fn test_scripted_client_answers_out_of_order() {
        let (client, mut script) = ScriptedFetchClient::new();

        let first = tokio::spawn({
            let client = client.clone();
            async move { client.fetch(request(1)).await }
        });
        let second = tokio::spawn({
            let client = client.clone();
            async move { client.fetch(request(2)).await }
        });

        let mut pending = vec![
            script.next_request().await.unwrap(),
            script.next_request().await.unwrap(),
        ];
        pending.sort_by_key(|p| p.request.query.page);
        let [one, two]: [PendingFetch; 2] = pending.try_into().unwrap();

        assert!(two.respond(Err(FetchError::Timeout)));
        assert_eq!(second.await.unwrap(), Err(FetchError::Timeout));
        assert!(one.respond(Ok(FetchResponse::default())));
        assert_eq!(first.await.unwrap(), Ok(FetchResponse::default()));
    }

    #[tokio::test]
    async fn test_abandoned_request_reports_closed() {
        let (client, mut script) = ScriptedFetchClient::new();

        let task = tokio::spawn(async move { client.fetch(request(1)).await });
        let pending = script.next_request().await.unwrap();
        task.abort();
        let _ = task.await;

        assert!(pending.is_abandoned());
        assert!(!pending.respond(Ok(FetchResponse::default())));
    }
}
