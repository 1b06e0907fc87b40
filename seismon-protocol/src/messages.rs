//! Message types carried in protocol frames
//!
//! Two directions:
//! - Host → modem: link/session requests and publish commands
//! - Modem → host: acknowledgements and status reports

use heapless::{String, Vec};

use crate::frame::{Frame, FrameError, MAX_PAYLOAD_LEN};

// Message type IDs: host → modem
pub const MSG_LINK_CONNECT: u8 = 0x01;
pub const MSG_LINK_STATUS: u8 = 0x02;
pub const MSG_SESSION_CONNECT: u8 = 0x03;
pub const MSG_SESSION_STATUS: u8 = 0x04;
pub const MSG_PUBLISH: u8 = 0x05;

// Message type IDs: modem → host
pub const MSG_ACK: u8 = 0x40;
pub const MSG_NAK: u8 = 0x41;
pub const MSG_LINK_REPORT: u8 = 0x42;
pub const MSG_SESSION_REPORT: u8 = 0x43;

/// Maximum device-id length (secure element serial, hex)
pub const DEVICE_ID_LEN: usize = 24;

/// Errors from message decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageError {
    /// Frame type is not a known modem message
    UnknownType,
    /// Payload does not match the message layout
    Malformed,
}

/// Requests from the MCU to the co-processor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostMessage<'a> {
    /// Join the network (WiFi association, DHCP, time sync)
    LinkConnect,
    /// Query link state and signal strength
    LinkStatus,
    /// Establish the authenticated application session
    SessionConnect,
    /// Query session state
    SessionStatus,
    /// Publish a payload to a topic over the established session
    Publish { topic: &'a str, payload: &'a [u8] },
}

impl HostMessage<'_> {
    /// Encode this message into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            HostMessage::LinkConnect => Ok(Frame::empty(MSG_LINK_CONNECT)),
            HostMessage::LinkStatus => Ok(Frame::empty(MSG_LINK_STATUS)),
            HostMessage::SessionConnect => Ok(Frame::empty(MSG_SESSION_CONNECT)),
            HostMessage::SessionStatus => Ok(Frame::empty(MSG_SESSION_STATUS)),
            HostMessage::Publish { topic, payload } => {
                // Payload layout: [topic_len][topic bytes][payload bytes]
                let topic_bytes = topic.as_bytes();
                if topic_bytes.len() > u8::MAX as usize {
                    return Err(FrameError::PayloadTooLarge);
                }

                let mut body = Vec::<u8, MAX_PAYLOAD_LEN>::new();
                body.push(topic_bytes.len() as u8)
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                body.extend_from_slice(topic_bytes)
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                body.extend_from_slice(payload)
                    .map_err(|_| FrameError::PayloadTooLarge)?;

                Frame::new(MSG_PUBLISH, &body)
            }
        }
    }
}

/// Responses from the co-processor to the MCU
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModemMessage {
    /// Request completed
    Ack,
    /// Request failed, with a modem-specific reason code
    Nak(u8),
    /// Link state and signal strength
    LinkReport { up: bool, rssi_dbm: i16 },
    /// Session state, wall clock, and the device identity held by the
    /// co-processor's secure element
    SessionReport {
        up: bool,
        epoch_seconds: u64,
        device_id: String<DEVICE_ID_LEN>,
    },
}

impl ModemMessage {
    /// Decode a received frame
    pub fn from_frame(frame: &Frame) -> Result<Self, MessageError> {
        let payload = frame.payload.as_slice();

        match frame.kind {
            MSG_ACK => Ok(ModemMessage::Ack),
            MSG_NAK => {
                let code = payload.first().copied().unwrap_or(0);
                Ok(ModemMessage::Nak(code))
            }
            MSG_LINK_REPORT => {
                // Layout: [up][rssi i16 LE]
                if payload.len() != 3 {
                    return Err(MessageError::Malformed);
                }
                Ok(ModemMessage::LinkReport {
                    up: payload[0] != 0,
                    rssi_dbm: i16::from_le_bytes([payload[1], payload[2]]),
                })
            }
            MSG_SESSION_REPORT => {
                // Layout: [up][epoch u64 LE][id_len][id bytes]
                if payload.len() < 10 {
                    return Err(MessageError::Malformed);
                }
                let up = payload[0] != 0;
                let mut epoch = [0u8; 8];
                epoch.copy_from_slice(&payload[1..9]);
                let id_len = payload[9] as usize;
                if id_len > DEVICE_ID_LEN || payload.len() != 10 + id_len {
                    return Err(MessageError::Malformed);
                }
                let id_str = core::str::from_utf8(&payload[10..10 + id_len])
                    .map_err(|_| MessageError::Malformed)?;
                let mut device_id = String::new();
                device_id
                    .push_str(id_str)
                    .map_err(|_| MessageError::Malformed)?;

                Ok(ModemMessage::SessionReport {
                    up,
                    epoch_seconds: u64::from_le_bytes(epoch),
                    device_id,
                })
            }
            _ => Err(MessageError::UnknownType),
        }
    }

    /// Encode this message into a frame (used by the host-side emulator
    /// in tests and by co-processor firmware)
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            ModemMessage::Ack => Ok(Frame::empty(MSG_ACK)),
            ModemMessage::Nak(code) => Frame::new(MSG_NAK, &[*code]),
            ModemMessage::LinkReport { up, rssi_dbm } => {
                let rssi = rssi_dbm.to_le_bytes();
                Frame::new(MSG_LINK_REPORT, &[u8::from(*up), rssi[0], rssi[1]])
            }
            ModemMessage::SessionReport {
                up,
                epoch_seconds,
                device_id,
            } => {
                let mut body = Vec::<u8, MAX_PAYLOAD_LEN>::new();
                body.push(u8::from(*up))
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                body.extend_from_slice(&epoch_seconds.to_le_bytes())
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                body.push(device_id.len() as u8)
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                body.extend_from_slice(device_id.as_bytes())
                    .map_err(|_| FrameError::PayloadTooLarge)?;

                Frame::new(MSG_SESSION_REPORT, &body)
            }
        }
    }
}
