//! Binary codec for [`ResultEvent`].
//!
//! One connection carries exactly one event: the sender writes the encoded
//! bytes and closes, the receiver reads to EOF and decodes. There is no
//! length prefix and no version negotiation, so both ends must be built
//! against the same event schema.

use crate::event::ResultEvent;
use thiserror::Error;

/// Upper bound on the body a receiver accepts from a single connection.
pub const MAX_EVENT_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("failed to encode event: {0}")]
    Encode(#[source] bincode::Error),

    #[error("failed to decode event: {0}")]
    Decode(#[source] bincode::Error),

    #[error("{extra} trailing bytes after event")]
    TrailingBytes { extra: usize },

    #[error("event body exceeds {limit} bytes")]
    Oversized { limit: usize },
}

pub fn encode_event(event: &ResultEvent) -> Result<Vec<u8>, WireError> {
    bincode::serialize(event).map_err(WireError::Encode)
}

pub fn decode_event(bytes: &[u8]) -> Result<ResultEvent, WireError> {
    if bytes.len() > MAX_EVENT_BYTES {
        return Err(WireError::Oversized {
            limit: MAX_EVENT_BYTES,
        });
    }
    let event: ResultEvent = bincode::deserialize(bytes).map_err(WireError::Decode)?;
    let used = bincode::serialized_size(&event).map_err(WireError::Decode)? as usize;
    if used < bytes.len() {
        return Err(WireError::TrailingBytes {
            extra: bytes.len() - used,
        });
    }
    Ok(event)
}
