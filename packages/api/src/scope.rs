//! Cancellation of in-flight requests when their owner goes away.
//!
//! A page or component owns one [`RequestScope`]. Every request issued through
//! an [`crate::Api`] bound to the scope is registered with it; closing the scope
//! (on unmount) aborts whatever is still in flight and makes later requests
//! fail fast with [`ApiError::Aborted`], so no response is ever applied to
//! state that no longer exists.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{AbortHandle, Abortable};

use crate::error::ApiError;

#[derive(Debug, Default)]
struct ScopeState {
    next_id: u64,
    in_flight: HashMap<u64, AbortHandle>,
    closed: bool,
}

#[derive(Clone, Debug, Default)]
pub struct RequestScope {
    state: Arc<Mutex<ScopeState>>,
}

impl PartialEq for RequestScope {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

impl RequestScope {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ScopeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drive `request` to completion unless the scope is closed first.
    pub async fn run<T, F>(&self, request: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        let (handle, registration) = AbortHandle::new_pair();
        let id = {
            let mut state = self.lock();
            if state.closed {
                return Err(ApiError::Aborted);
            }
            let id = state.next_id;
            state.next_id += 1;
            state.in_flight.insert(id, handle);
            id
        };

        let result = Abortable::new(request, registration).await;
        self.lock().in_flight.remove(&id);

        match result {
            Ok(response) => response,
            Err(_) => Err(ApiError::Aborted),
        }
    }

    /// Abort everything in flight and refuse new requests.
    pub fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        let aborted = state.in_flight.len();
        for (_, handle) in state.in_flight.drain() {
            handle.abort();
        }
        if aborted > 0 {
            tracing::debug!("Aborted {aborted} in-flight request(s)");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Number of requests currently running in this scope.
    pub fn in_flight(&self) -> usize {
        self.lock().in_flight.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn completed_request_passes_through() {
        let scope = RequestScope::new();
        let result = scope.run(async { Ok::<_, ApiError>(7) }).await;
        assert_eq!(result, Ok(7));
        assert_eq!(scope.in_flight(), 0);
    }

    #[tokio::test]
    async fn close_aborts_pending_request() {
        let scope = RequestScope::new();
        let pending = scope.run(futures::future::pending::<Result<(), ApiError>>());
        let closer = async {
            assert_eq!(scope.in_flight(), 1);
            scope.close();
        };
        let (result, ()) = futures::join!(pending, closer);
        assert_eq!(result, Err(ApiError::Aborted));
        assert_eq!(scope.in_flight(), 0);
    }

    #[tokio::test]
    async fn closed_scope_rejects_new_requests() {
        let scope = RequestScope::new();
        scope.close();
        assert!(scope.is_closed());
        let result = scope.run(async { Ok::<_, ApiError>(1) }).await;
        assert_eq!(result, Err(ApiError::Aborted));
    }

    #[test]
    fn clones_share_state() {
        let scope = RequestScope::new();
        let other = scope.clone();
        other.close();
        assert!(scope.is_closed());
        assert_eq!(scope, other);
        assert_ne!(scope, RequestScope::new());
    }
}
