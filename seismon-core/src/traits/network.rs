//! Network link, session, and publish traits
//!
//! The transport mechanics (radio association, TLS, MQTT) live behind these
//! seams; every method is expected to be bounded in time by its
//! implementation, so callers never block indefinitely.

/// Link- and session-level connectivity capability
///
/// The link is the lower-level network connection; the session is the
/// authenticated application connection built on top of it.
pub trait NetworkControl {
    /// Attempt a link-level connect; true when the link came up
    async fn connect_link(&mut self) -> bool;

    /// Whether the link is currently up
    async fn link_up(&mut self) -> bool;

    /// Attempt one session handshake; true when the session is established
    async fn connect_session(&mut self) -> bool;

    /// Whether the session is currently up
    async fn session_up(&mut self) -> bool;
}

/// Errors from a publish attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PublishError {
    /// Session is not established
    NotConnected,
    /// Payload or topic could not be encoded
    Encoding,
    /// Transport rejected the message or timed out
    Transport,
}

/// Outbound publish capability
pub trait Publish {
    /// Publish one payload to a topic
    async fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), PublishError>;
}
