//! JSON request extractor for RPC handlers.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::api::RpcStatus;

/// Decoded RPC request body. An empty body decodes as `{}`; malformed JSON
/// is an `InvalidArgument` status rather than axum's plain-text rejection.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rpc<T>(pub T);

impl<T, S> FromRequest<S> for Rpc<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = RpcStatus;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| RpcStatus::invalid_argument(format!("Unable to read request: {e}")))?;
        decode(&bytes).map(Rpc)
    }
}

pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, RpcStatus> {
    let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        bytes
    };
    serde_json::from_slice(body)
        .map_err(|e| RpcStatus::invalid_argument(format!("Invalid request: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::volume::SdkVolumeInspectRequest;
    use crate::api::RpcCode;

    #[test]
    fn empty_body_is_empty_object() {
        let req: SdkVolumeInspectRequest = decode(b"").unwrap();
        assert!(req.volume_id.is_empty());
        let req: SdkVolumeInspectRequest = decode(b"  \n").unwrap();
        assert!(req.volume_id.is_empty());
    }

    #[test]
    fn malformed_json_is_invalid_argument() {
        let err = decode::<SdkVolumeInspectRequest>(b"{not json").unwrap_err();
        assert_eq!(err.code, RpcCode::InvalidArgument);
        assert!(err.message.starts_with("Invalid request"));
    }
}
