//! Serialization of the board snapshot written to durable storage.
//!
//! The record is a JSON envelope holding the state and a format version:
//!
//! ```json
//! {"state": {"projects": [...], "activeProjectId": "..."}, "version": 0}
//! ```

use serde::{Deserialize, Serialize};

use crate::model::AppState;

/// Format version written by [`encode`] and accepted by [`decode`].
pub const STATE_VERSION: u32 = 0;

/// Error type for snapshot encode/decode operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// The record was written by an incompatible format version.
    #[error("unsupported snapshot version {found} (expected {})", STATE_VERSION)]
    UnsupportedVersion {
        /// Version found in the record.
        found: u32,
    },
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    state: &'a AppState,
    version: u32,
}

#[derive(Deserialize)]
struct Envelope {
    state: serde_json::Value,
    version: u32,
}

/// Encodes the full board state into its stored JSON form.
///
/// # Errors
///
/// Returns `CodecError::Serialization` if the state cannot be serialized.
pub fn encode(state: &AppState) -> Result<String, CodecError> {
    serde_json::to_string(&EnvelopeRef {
        state,
        version: STATE_VERSION,
    })
    .map_err(|e| CodecError::Serialization(e.to_string()))
}

/// Decodes a stored JSON record back into the board state.
///
/// The version is checked before the state itself is interpreted.
///
/// # Errors
///
/// Returns `CodecError::Serialization` for malformed records and
/// `CodecError::UnsupportedVersion` for records of another format version.
pub fn decode(raw: &str) -> Result<AppState, CodecError> {
    let envelope: Envelope =
        serde_json::from_str(raw).map_err(|e| CodecError::Serialization(e.to_string()))?;
    if envelope.version != STATE_VERSION {
        return Err(CodecError::UnsupportedVersion {
            found: envelope.version,
        });
    }
    serde_json::from_value(envelope.state).map_err(|e| CodecError::Serialization(e.to_string()))
}
