//! Connection state machine definition
//!
//! All connectivity behavior is a function of the current state and an
//! event. Session state is always discarded when the link drops; a session
//! handshake is never attempted while the link is down.

/// Connectivity states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    /// No link; retried at a fixed backoff interval
    LinkDown,
    /// Link established, no session yet
    LinkUp,
    /// Session handshake in progress
    SessionConnecting,
    /// Session established; ready to publish
    SessionReady,
    /// Session dropped while the link stayed up
    SessionLost,
}

/// Events that can trigger connection state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Link-level connect succeeded
    LinkConnected,
    /// Link-level loss detected
    LinkLost,
    /// Session handshake initiated
    HandshakeStarted,
    /// Session handshake succeeded
    HandshakeSucceeded,
    /// Session handshake failed
    HandshakeFailed,
    /// Established session dropped
    SessionDropped,
    /// Re-handshake after a lost session
    RetrySession,
}

impl ConnectionState {
    /// True exactly when telemetry may be published
    pub fn is_ready(&self) -> bool {
        matches!(self, ConnectionState::SessionReady)
    }

    /// True in every state with an established link
    pub fn link_established(&self) -> bool {
        !matches!(self, ConnectionState::LinkDown)
    }

    /// Process an event and return the next state
    ///
    /// This is the core transition logic. There is no terminal state; the
    /// machine runs for the process lifetime.
    pub fn transition(self, event: Event) -> Self {
        use ConnectionState::*;
        use Event::*;

        match (self, event) {
            // Link comes up only from LinkDown
            (LinkDown, LinkConnected) => LinkUp,

            // Session lifecycle on an established link
            (LinkUp, HandshakeStarted) => SessionConnecting,
            (SessionConnecting, HandshakeSucceeded) => SessionReady,
            (SessionConnecting, HandshakeFailed) => LinkUp,
            (SessionReady, SessionDropped) => SessionLost,
            (SessionLost, RetrySession) => SessionConnecting,

            // Link loss discards all session state, from any state
            (LinkUp, LinkLost)
            | (SessionConnecting, LinkLost)
            | (SessionReady, LinkLost)
            | (SessionLost, LinkLost) => LinkDown,

            // Default: stay in current state
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_down_to_link_up() {
        let next = ConnectionState::LinkDown.transition(Event::LinkConnected);
        assert_eq!(next, ConnectionState::LinkUp);
    }

    #[test]
    fn session_ready_only_from_session_connecting() {
        let states = [
            ConnectionState::LinkDown,
            ConnectionState::LinkUp,
            ConnectionState::SessionReady,
            ConnectionState::SessionLost,
        ];

        for state in states {
            assert_ne!(
                state.transition(Event::HandshakeSucceeded),
                ConnectionState::SessionReady,
                "{state:?} must not reach SessionReady directly"
            );
        }

        assert_eq!(
            ConnectionState::SessionConnecting.transition(Event::HandshakeSucceeded),
            ConnectionState::SessionReady
        );
    }

    #[test]
    fn handshake_never_starts_while_link_down() {
        let next = ConnectionState::LinkDown.transition(Event::HandshakeStarted);
        assert_eq!(next, ConnectionState::LinkDown);
    }

    #[test]
    fn handshake_failure_returns_to_link_up() {
        let connecting = ConnectionState::LinkUp.transition(Event::HandshakeStarted);
        assert_eq!(connecting, ConnectionState::SessionConnecting);

        let next = connecting.transition(Event::HandshakeFailed);
        assert_eq!(next, ConnectionState::LinkUp);
    }

    #[test]
    fn link_loss_from_any_state() {
        let states = [
            ConnectionState::LinkUp,
            ConnectionState::SessionConnecting,
            ConnectionState::SessionReady,
            ConnectionState::SessionLost,
        ];

        for state in states {
            assert_eq!(state.transition(Event::LinkLost), ConnectionState::LinkDown);
        }
    }

    #[test]
    fn session_drop_and_recovery_flow() {
        let lost = ConnectionState::SessionReady.transition(Event::SessionDropped);
        assert_eq!(lost, ConnectionState::SessionLost);

        let reconnecting = lost.transition(Event::RetrySession);
        assert_eq!(reconnecting, ConnectionState::SessionConnecting);
    }

    #[test]
    fn ready_predicate() {
        assert!(ConnectionState::SessionReady.is_ready());
        assert!(!ConnectionState::LinkDown.is_ready());
        assert!(!ConnectionState::LinkUp.is_ready());
        assert!(!ConnectionState::SessionConnecting.is_ready());
        assert!(!ConnectionState::SessionLost.is_ready());
    }
}
