//! Frame encoding and incremental parsing
//!
//! Frame layout:
//! - SYNC (1 byte): 0x7E synchronization byte
//! - LENGTH (1 byte): payload length (0-200)
//! - TYPE (1 byte): message type identifier
//! - PAYLOAD (0-200 bytes): type-specific data
//! - CHECKSUM (1 byte): XOR of LENGTH, TYPE, and all PAYLOAD bytes

use heapless::Vec;

/// Frame synchronization byte
pub const FRAME_SYNC: u8 = 0x7E;

/// Maximum payload length in bytes
pub const MAX_PAYLOAD_LEN: usize = 200;

/// Maximum encoded frame size (SYNC + LENGTH + TYPE + payload + CHECKSUM)
pub const MAX_FRAME_LEN: usize = 4 + MAX_PAYLOAD_LEN;

/// Errors from frame encoding or parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds the maximum length
    PayloadTooLarge,
    /// Declared length exceeds the maximum
    LengthOutOfRange,
    /// Checksum over the received frame did not match
    ChecksumMismatch,
    /// Destination buffer too small for the encoded frame
    BufferTooSmall,
}

/// One protocol frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Message type identifier
    pub kind: u8,
    /// Type-specific payload
    pub payload: Vec<u8, MAX_PAYLOAD_LEN>,
}

impl Frame {
    pub fn new(kind: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let payload = Vec::from_slice(payload).map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self { kind, payload })
    }

    /// A frame with no payload
    pub fn empty(kind: u8) -> Self {
        Self {
            kind,
            payload: Vec::new(),
        }
    }

    fn checksum(length: u8, kind: u8, payload: &[u8]) -> u8 {
        payload.iter().fold(length ^ kind, |acc, b| acc ^ b)
    }

    /// Encode into `buf`, returning the number of bytes written
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize, FrameError> {
        let total = 4 + self.payload.len();
        if buf.len() < total {
            return Err(FrameError::BufferTooSmall);
        }

        let length = self.payload.len() as u8;
        buf[0] = FRAME_SYNC;
        buf[1] = length;
        buf[2] = self.kind;
        buf[3..3 + self.payload.len()].copy_from_slice(&self.payload);
        buf[3 + self.payload.len()] = Self::checksum(length, self.kind, &self.payload);

        Ok(total)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Sync,
    Length,
    Kind,
    Payload,
    Checksum,
}

/// Incremental parser fed one byte at a time
///
/// Bytes before a sync byte are discarded; a checksum failure reports an
/// error and resynchronizes on the next sync byte.
#[derive(Debug)]
pub struct FrameParser {
    state: ParseState,
    expected_len: usize,
    kind: u8,
    payload: Vec<u8, MAX_PAYLOAD_LEN>,
}

impl FrameParser {
    pub const fn new() -> Self {
        Self {
            state: ParseState::Sync,
            expected_len: 0,
            kind: 0,
            payload: Vec::new(),
        }
    }

    /// Discard any partially-parsed frame and wait for the next sync byte
    pub fn reset(&mut self) {
        self.state = ParseState::Sync;
        self.payload.clear();
    }

    /// Feed one byte; returns a complete frame when one finishes
    pub fn push(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        match self.state {
            ParseState::Sync => {
                if byte == FRAME_SYNC {
                    self.state = ParseState::Length;
                }
                Ok(None)
            }
            ParseState::Length => {
                if byte as usize > MAX_PAYLOAD_LEN {
                    self.state = ParseState::Sync;
                    return Err(FrameError::LengthOutOfRange);
                }
                self.expected_len = byte as usize;
                self.state = ParseState::Kind;
                Ok(None)
            }
            ParseState::Kind => {
                self.kind = byte;
                self.payload.clear();
                self.state = if self.expected_len == 0 {
                    ParseState::Checksum
                } else {
                    ParseState::Payload
                };
                Ok(None)
            }
            ParseState::Payload => {
                // Capacity covers MAX_PAYLOAD_LEN, checked at Length
                let _ = self.payload.push(byte);
                if self.payload.len() == self.expected_len {
                    self.state = ParseState::Checksum;
                }
                Ok(None)
            }
            ParseState::Checksum => {
                self.state = ParseState::Sync;
                let expected =
                    Frame::checksum(self.expected_len as u8, self.kind, &self.payload);
                if byte != expected {
                    return Err(FrameError::ChecksumMismatch);
                }
                Ok(Some(Frame {
                    kind: self.kind,
                    payload: self.payload.clone(),
                }))
            }
        }
    }
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}
