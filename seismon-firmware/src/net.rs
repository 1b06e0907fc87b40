//! Network co-processor client
//!
//! The node talks to a UART-attached co-processor that owns the radio,
//! TLS, and the broker session. Every operation is a framed request
//! followed by a framed reply; the client caches signal strength,
//! device identity, and wall-clock time from the reports it receives.

#[cfg(feature = "defmt")]
use defmt::*;
use embassy_rp::uart::BufferedUart;
use embassy_time::{with_timeout, Duration, Instant};
use embedded_io_async::{Read, Write};
use heapless::String;

use seismon_core::config::{LINK_CONNECT_TIMEOUT_MS, SESSION_CONNECT_TIMEOUT_MS};
use seismon_core::traits::{NetworkControl, Publish, PublishError};
use seismon_protocol::{FrameParser, HostMessage, ModemMessage, DEVICE_ID_LEN, MAX_FRAME_LEN};

/// Reply timeout for quick status queries
const STATUS_REPLY_TIMEOUT_MS: u64 = 1000;

/// Reply timeout for publish commands (broker round trip)
const PUBLISH_REPLY_TIMEOUT_MS: u64 = 3000;

/// Client for the UART-attached network co-processor
pub struct ModemClient {
    uart: BufferedUart<'static>,
    parser: FrameParser,
    rssi_dbm: i16,
    device_id: String<DEVICE_ID_LEN>,
    epoch_seconds: u64,
    epoch_synced_at: Option<Instant>,
}

impl ModemClient {
    pub fn new(uart: BufferedUart<'static>) -> Self {
        Self {
            uart,
            parser: FrameParser::new(),
            rssi_dbm: 0,
            device_id: String::new(),
            epoch_seconds: 0,
            epoch_synced_at: None,
        }
    }

    /// Signal strength from the most recent link report
    pub fn rssi_dbm(&self) -> i16 {
        self.rssi_dbm
    }

    /// Device identity reported by the co-processor's secure element,
    /// empty until the first session report arrives
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Current Unix time in seconds, extrapolated from the last
    /// session report. Zero until time has been synced.
    pub fn epoch_seconds(&self) -> u64 {
        match self.epoch_synced_at {
            Some(synced_at) => self.epoch_seconds + synced_at.elapsed().as_secs(),
            None => 0,
        }
    }

    /// Send one request and wait for the matching reply
    async fn request(
        &mut self,
        msg: &HostMessage<'_>,
        timeout_ms: u64,
    ) -> Option<ModemMessage> {
        let frame = match msg.to_frame() {
            Ok(frame) => frame,
            Err(_e) => {
                #[cfg(feature = "defmt")]
                warn!("Request too large for frame: {:?}", _e);
                return None;
            }
        };

        let mut buf = [0u8; MAX_FRAME_LEN];
        let len = match frame.encode(&mut buf) {
            Ok(len) => len,
            Err(_) => return None,
        };

        if self.uart.write_all(&buf[..len]).await.is_err() {
            #[cfg(feature = "defmt")]
            warn!("Modem UART write failed");
            return None;
        }

        // Stale bytes from an earlier timed-out exchange must not be
        // taken for this reply
        self.parser.reset();

        match with_timeout(Duration::from_millis(timeout_ms), self.read_reply()).await {
            Ok(reply) => reply,
            Err(_) => {
                #[cfg(feature = "defmt")]
                debug!("Modem reply timed out");
                None
            }
        }
    }

    /// Read bytes until a complete, decodable reply arrives
    async fn read_reply(&mut self) -> Option<ModemMessage> {
        let mut buf = [0u8; 64];

        loop {
            let n = match self.uart.read(&mut buf).await {
                Ok(n) if n > 0 => n,
                Ok(_) => continue,
                Err(_) => {
                    #[cfg(feature = "defmt")]
                    warn!("Modem UART read failed");
                    return None;
                }
            };

            for &byte in &buf[..n] {
                match self.parser.push(byte) {
                    Ok(Some(frame)) => match ModemMessage::from_frame(&frame) {
                        Ok(msg) => return Some(msg),
                        Err(_e) => {
                            #[cfg(feature = "defmt")]
                            warn!("Unexpected modem frame: {:?}", _e);
                        }
                    },
                    Ok(None) => {}
                    Err(_e) => {
                        #[cfg(feature = "defmt")]
                        warn!("Modem frame error: {:?}", _e);
                    }
                }
            }
        }
    }

    fn apply_session_report(&mut self, device_id: String<DEVICE_ID_LEN>, epoch_seconds: u64) {
        if !device_id.is_empty() {
            self.device_id = device_id;
        }
        if epoch_seconds > 0 {
            self.epoch_seconds = epoch_seconds;
            self.epoch_synced_at = Some(Instant::now());
        }
    }
}

impl NetworkControl for ModemClient {
    async fn connect_link(&mut self) -> bool {
        match self
            .request(&HostMessage::LinkConnect, LINK_CONNECT_TIMEOUT_MS)
            .await
        {
            Some(ModemMessage::Ack) => true,
            Some(ModemMessage::LinkReport { up, rssi_dbm }) => {
                self.rssi_dbm = rssi_dbm;
                up
            }
            _ => false,
        }
    }

    async fn link_up(&mut self) -> bool {
        match self
            .request(&HostMessage::LinkStatus, STATUS_REPLY_TIMEOUT_MS)
            .await
        {
            Some(ModemMessage::LinkReport { up, rssi_dbm }) => {
                self.rssi_dbm = rssi_dbm;
                up
            }
            _ => false,
        }
    }

    async fn connect_session(&mut self) -> bool {
        match self
            .request(&HostMessage::SessionConnect, SESSION_CONNECT_TIMEOUT_MS)
            .await
        {
            Some(ModemMessage::SessionReport {
                up,
                epoch_seconds,
                device_id,
            }) => {
                self.apply_session_report(device_id, epoch_seconds);
                up
            }
            Some(ModemMessage::Ack) => true,
            _ => false,
        }
    }

    async fn session_up(&mut self) -> bool {
        match self
            .request(&HostMessage::SessionStatus, STATUS_REPLY_TIMEOUT_MS)
            .await
        {
            Some(ModemMessage::SessionReport {
                up,
                epoch_seconds,
                device_id,
            }) => {
                self.apply_session_report(device_id, epoch_seconds);
                up
            }
            _ => false,
        }
    }
}

impl Publish for ModemClient {
    async fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), PublishError> {
        let msg = HostMessage::Publish { topic, payload };

        match self.request(&msg, PUBLISH_REPLY_TIMEOUT_MS).await {
            Some(ModemMessage::Ack) => Ok(()),
            Some(ModemMessage::Nak(_code)) => {
                #[cfg(feature = "defmt")]
                warn!("Publish rejected by modem: code {}", _code);
                Err(PublishError::Transport)
            }
            _ => Err(PublishError::Transport),
        }
    }
}
