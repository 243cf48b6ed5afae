//! Envelope encoding boundary between the connector and its storage.

use crate::core::error::ConnectorError;
use crate::core::task::TaskEnvelope;

/// Encode/decode pair the connector uses for ledger entries.
///
/// The engine is agnostic to the wire format as long as the pair round-trips
/// losslessly.
pub trait TaskCodec: Send + Sync + 'static {
    /// Encode an envelope for storage.
    fn encode(&self, envelope: &TaskEnvelope) -> Result<String, ConnectorError>;
    /// Decode a stored envelope.
    fn decode(&self, raw: &str) -> Result<TaskEnvelope, ConnectorError>;
}

/// JSON codec; the reference format.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl TaskCodec for JsonCodec {
    fn encode(&self, envelope: &TaskEnvelope) -> Result<String, ConnectorError> {
        Ok(serde_json::to_string(envelope)?)
    }

    fn decode(&self, raw: &str) -> Result<TaskEnvelope, ConnectorError> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::task::TaskId;

    #[test]
    fn json_codec_round_trips() {
        let env = TaskEnvelope::new(
            TaskId::generate(),
            "default",
            "jobs",
            "resize_image",
            serde_json::json!({"width": 64}),
        );
        let codec = JsonCodec;
        let raw = codec.encode(&env).unwrap();
        let decoded = codec.decode(&raw).unwrap();
        assert_eq!(env, decoded);
    }

    #[test]
    fn decode_failure_maps_to_encoding_error() {
        let err = JsonCodec.decode("not json").unwrap_err();
        assert!(matches!(err, ConnectorError::Encoding(_)));
    }
}
