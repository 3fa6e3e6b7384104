use custody_core::Block;

use crate::errors::JournalError;

/// Serializes a block as the payload of a `BlockJson` frame.
pub fn encode_block(block: &Block) -> Result<Vec<u8>, JournalError> {
    Ok(serde_json::to_vec(block)?)
}

/// Parses a `BlockJson` frame payload.
///
/// Stored hashes are taken as-is; checking them is the verifier's job.
pub fn decode_block(payload: &[u8]) -> Result<Block, JournalError> {
    let text = std::str::from_utf8(payload)?;
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use custody_canonical::{BatchId, Canonicalizer, Timestamp};
    use custody_core::{EventType, UnsealedBlock};
    use serde_json::json;

    #[test]
    fn payload_is_camel_case_json() {
        let block = UnsealedBlock::after(
            None,
            Timestamp::new("2024-06-10T12:00:00.000Z".into()),
            BatchId::new("B1".into()),
            EventType::BatchCreated,
            json!({}),
        )
        .seal(1, &Canonicalizer::default_profile())
        .unwrap();
        let bytes = encode_block(&block).unwrap();
        let text = std::str::from_utf8(&bytes).unwrap();
        assert!(text.contains("\"previousHash\":\"0\""));
        assert_eq!(decode_block(&bytes).unwrap(), block);
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        assert!(matches!(
            decode_block(&[0xff, 0xfe]),
            Err(JournalError::InvalidUtf8(_))
        ));
    }

    #[test]
    fn non_block_json_is_rejected() {
        assert!(matches!(
            decode_block(br#"{"event_id": "x"}"#),
            Err(JournalError::Json(_))
        ));
    }
}
