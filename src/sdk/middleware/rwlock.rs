//! Mutual exclusion between requests and backend swaps.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::sdk::backends::{BackendLock, Backends};

/// Takes a shared hold for the whole call and exposes it to handlers as a
/// [`Backends`] extension. The hold is released when the response is
/// produced or the call future is dropped.
pub async fn rwlock(State(lock): State<BackendLock>, mut req: Request, next: Next) -> Response {
    let hold = Backends::acquire(&lock).await;
    req.extensions_mut().insert(hold.clone());

    let response = next.run(req).await;
    drop(hold);
    response
}
