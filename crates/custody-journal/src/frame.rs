//! On-disk layout.
//!
//! ```text
//! header  := "CSJ1" version:u16le flags:u16le reserved:[u8; 8]
//! frame   := kind:u8 reserved:[u8; 3] len:u32le payload:[u8; len]
//! journal := header frame*
//! ```

use crate::errors::JournalError;

/// Journal file magic bytes: `b"CSJ1"`.
pub const MAGIC: &[u8; 4] = b"CSJ1";

/// Current journal format version: `0x0001`.
pub const VERSION: u16 = 0x0001;

/// Header size in bytes.
pub const HEADER_SIZE: usize = 16;

/// Frame header size in bytes.
pub const FRAME_HEADER_SIZE: usize = 8;

/// Maximum payload size: 16 MiB.
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

/// Record frame kind: one block as UTF-8 JSON.
pub const FRAME_KIND_BLOCK_JSON: u8 = 0x01;

/// Journal file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalHeader {
    /// Magic bytes: `"CSJ1"`.
    pub magic: [u8; 4],
    /// Format version.
    pub version: u16,
    /// Reserved flags (must be 0).
    pub flags: u16,
    /// Reserved bytes (must be all zeros).
    pub reserved: [u8; 8],
}

impl JournalHeader {
    /// Header for the current format version.
    pub fn new() -> Self {
        Self {
            magic: *MAGIC,
            version: VERSION,
            flags: 0,
            reserved: [0; 8],
        }
    }

    /// Serializes the header to bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4..6].copy_from_slice(&self.version.to_le_bytes());
        bytes[6..8].copy_from_slice(&self.flags.to_le_bytes());
        bytes[8..16].copy_from_slice(&self.reserved);
        bytes
    }

    /// Parses and validates a header.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, JournalError> {
        if bytes.len() < HEADER_SIZE {
            return Err(JournalError::InvalidHeader(format!(
                "header too short: {} bytes",
                bytes.len()
            )));
        }

        let magic = [bytes[0], bytes[1], bytes[2], bytes[3]];
        if magic != *MAGIC {
            return Err(JournalError::InvalidHeader(format!(
                "invalid magic: {:?}, expected {:?}",
                magic, MAGIC
            )));
        }

        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != VERSION {
            return Err(JournalError::InvalidHeader(format!(
                "unsupported version: 0x{:04x}, expected 0x{:04x}",
                version, VERSION
            )));
        }

        let flags = u16::from_le_bytes([bytes[6], bytes[7]]);
        if flags != 0 {
            return Err(JournalError::InvalidHeader(format!(
                "non-zero flags: 0x{:04x}",
                flags
            )));
        }

        let mut reserved = [0u8; 8];
        reserved.copy_from_slice(&bytes[8..16]);
        if reserved != [0u8; 8] {
            return Err(JournalError::InvalidHeader(
                "non-zero reserved bytes".to_string(),
            ));
        }

        Ok(Self {
            magic,
            version,
            flags,
            reserved,
        })
    }
}

impl Default for JournalHeader {
    fn default() -> Self {
        Self::new()
    }
}

/// Record frame kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// One ledger block, serialized as a JSON object.
    BlockJson,
    /// Unknown kind; readers skip these.
    Unknown(u8),
}

impl FrameKind {
    /// Kind for a header byte.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            FRAME_KIND_BLOCK_JSON => FrameKind::BlockJson,
            _ => FrameKind::Unknown(byte),
        }
    }

    /// Header byte for this kind.
    pub fn to_byte(self) -> u8 {
        match self {
            FrameKind::BlockJson => FRAME_KIND_BLOCK_JSON,
            FrameKind::Unknown(b) => b,
        }
    }
}

/// Record frame header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFrame {
    /// Frame kind.
    pub kind: FrameKind,
    /// Payload length in bytes.
    pub len: u32,
}

impl RecordFrame {
    /// Frame header for a payload of `len` bytes.
    pub fn new(kind: FrameKind, len: usize) -> Result<Self, JournalError> {
        if len > MAX_PAYLOAD_SIZE as usize {
            return Err(JournalError::PayloadTooLarge {
                size: len as u64,
                max: MAX_PAYLOAD_SIZE,
            });
        }
        Ok(Self {
            kind,
            len: len as u32,
        })
    }

    /// Serializes the frame header.
    pub fn to_bytes(&self) -> [u8; FRAME_HEADER_SIZE] {
        let mut bytes = [0u8; FRAME_HEADER_SIZE];
        bytes[0] = self.kind.to_byte();
        bytes[4..8].copy_from_slice(&self.len.to_le_bytes());
        bytes
    }

    /// Parses a frame header found at `offset`.
    pub fn from_bytes(bytes: &[u8], offset: u64) -> Result<Self, JournalError> {
        if bytes.len() < FRAME_HEADER_SIZE {
            return Err(JournalError::InvalidFrame {
                offset,
                reason: format!("frame header too short: {} bytes", bytes.len()),
            });
        }

        if bytes[1..4] != [0u8; 3] {
            return Err(JournalError::InvalidFrame {
                offset,
                reason: "non-zero reserved bytes".to_string(),
            });
        }

        let len = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        if len > MAX_PAYLOAD_SIZE {
            return Err(JournalError::InvalidFrame {
                offset,
                reason: format!("payload size {} exceeds maximum {}", len, MAX_PAYLOAD_SIZE),
            });
        }

        Ok(Self {
            kind: FrameKind::from_byte(bytes[0]),
            len,
        })
    }

    /// Header and payload as one contiguous buffer.
    pub fn encode(kind: FrameKind, payload: &[u8]) -> Result<Vec<u8>, JournalError> {
        let frame = Self::new(kind, payload.len())?;
        let mut buf = Vec::with_capacity(FRAME_HEADER_SIZE + payload.len());
        buf.extend_from_slice(&frame.to_bytes());
        buf.extend_from_slice(payload);
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_layout() {
        let bytes = JournalHeader::new().to_bytes();
        assert_eq!(&bytes[0..4], b"CSJ1");
        assert_eq!(&bytes[4..6], &[0x01, 0x00]);
        assert_eq!(JournalHeader::from_bytes(&bytes).unwrap(), JournalHeader::new());
    }

    #[test]
    fn header_rejects_invalid_magic() {
        let mut bytes = JournalHeader::new().to_bytes();
        bytes[0] = b'N';
        assert!(JournalHeader::from_bytes(&bytes).is_err());
    }

    #[test]
    fn header_rejects_invalid_version() {
        let mut bytes = JournalHeader::new().to_bytes();
        bytes[4] = 0x02;
        let err = JournalHeader::from_bytes(&bytes).unwrap_err();
        assert!(err.to_string().contains("version"));
    }

    #[test]
    fn header_rejects_non_zero_flags() {
        let mut bytes = JournalHeader::new().to_bytes();
        bytes[6] = 0x01;
        assert!(JournalHeader::from_bytes(&bytes).is_err());
    }

    #[test]
    fn frame_layout() {
        let buf = RecordFrame::encode(FrameKind::BlockJson, b"{}").unwrap();
        assert_eq!(buf, vec![0x01, 0, 0, 0, 2, 0, 0, 0, b'{', b'}']);
        let frame = RecordFrame::from_bytes(&buf[..FRAME_HEADER_SIZE], 16).unwrap();
        assert_eq!(frame.kind, FrameKind::BlockJson);
        assert_eq!(frame.len, 2);
    }

    #[test]
    fn frame_rejects_oversized_payload() {
        assert!(RecordFrame::new(FrameKind::BlockJson, MAX_PAYLOAD_SIZE as usize + 1).is_err());
    }

    #[test]
    fn frame_error_carries_offset() {
        let mut bytes = RecordFrame::new(FrameKind::BlockJson, 100).unwrap().to_bytes();
        bytes[2] = 0x01;
        match RecordFrame::from_bytes(&bytes, 40).unwrap_err() {
            JournalError::InvalidFrame { offset, .. } => assert_eq!(offset, 40),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn frame_kind_unknown() {
        assert_eq!(FrameKind::from_byte(0xFF), FrameKind::Unknown(0xFF));
        assert_eq!(FrameKind::Unknown(0xFF).to_byte(), 0xFF);
    }
}
