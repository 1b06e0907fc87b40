//! Connectivity supervisor
//!
//! Owns the [`ConnectionState`] and the link-retry backoff timer, and
//! drives the network capability one step per poll. The supervisor lives
//! in the low-rate loop only, so its state needs no lock.

use crate::config;
use crate::traits::NetworkControl;

use super::state::{ConnectionState, Event};

/// Polls the link/session capability and keeps connectivity self-healing
///
/// At most one handshake step happens per poll, so a second handshake is
/// never initiated while one is outstanding.
pub struct ConnectivitySupervisor {
    state: ConnectionState,
    /// Millisecond timestamp of the last link-level connect attempt
    last_link_attempt_ms: Option<u64>,
    link_retry_delay_ms: u64,
}

impl ConnectivitySupervisor {
    pub const fn new() -> Self {
        Self {
            state: ConnectionState::LinkDown,
            last_link_attempt_ms: None,
            link_retry_delay_ms: config::LINK_RETRY_DELAY_MS,
        }
    }

    /// Override the link retry delay (used by tests)
    pub const fn with_link_retry_delay(mut self, delay_ms: u64) -> Self {
        self.link_retry_delay_ms = delay_ms;
        self
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// True exactly when telemetry may be published
    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    /// Advance the state machine by one step
    ///
    /// `now_ms` is a monotonic millisecond clock owned by the caller.
    /// Returns the state after this poll.
    pub async fn poll<C: NetworkControl>(&mut self, net: &mut C, now_ms: u64) -> ConnectionState {
        // Link loss preempts all session handling
        if self.state.link_established() && !net.link_up().await {
            self.apply(Event::LinkLost);
            // Allow an immediate reconnect attempt on the next poll
            self.last_link_attempt_ms = None;
            return self.state;
        }

        match self.state {
            ConnectionState::LinkDown => {
                if self.link_attempt_due(now_ms) {
                    self.last_link_attempt_ms = Some(now_ms);
                    if net.connect_link().await {
                        self.apply(Event::LinkConnected);
                    }
                }
            }
            ConnectionState::LinkUp => {
                self.apply(Event::HandshakeStarted);
            }
            ConnectionState::SessionConnecting => {
                if net.connect_session().await {
                    self.apply(Event::HandshakeSucceeded);
                } else {
                    self.apply(Event::HandshakeFailed);
                }
            }
            ConnectionState::SessionReady => {
                if !net.session_up().await {
                    self.apply(Event::SessionDropped);
                }
            }
            ConnectionState::SessionLost => {
                self.apply(Event::RetrySession);
            }
        }

        self.state
    }

    fn link_attempt_due(&self, now_ms: u64) -> bool {
        match self.last_link_attempt_ms {
            None => true,
            Some(at) => now_ms.saturating_sub(at) >= self.link_retry_delay_ms,
        }
    }

    fn apply(&mut self, event: Event) {
        self.state = self.state.transition(event);
    }
}

impl Default for ConnectivitySupervisor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;

    /// Scripted network capability for driving the supervisor in tests
    struct FakeNet {
        link_connect_ok: bool,
        link_is_up: bool,
        session_connect_ok: bool,
        session_is_up: bool,
        link_connect_calls: u32,
        session_connect_calls: u32,
    }

    impl FakeNet {
        fn new() -> Self {
            Self {
                link_connect_ok: false,
                link_is_up: false,
                session_connect_ok: false,
                session_is_up: false,
                link_connect_calls: 0,
                session_connect_calls: 0,
            }
        }
    }

    impl NetworkControl for FakeNet {
        async fn connect_link(&mut self) -> bool {
            self.link_connect_calls += 1;
            if self.link_connect_ok {
                self.link_is_up = true;
            }
            self.link_connect_ok
        }

        async fn link_up(&mut self) -> bool {
            self.link_is_up
        }

        async fn connect_session(&mut self) -> bool {
            self.session_connect_calls += 1;
            if self.session_connect_ok {
                self.session_is_up = true;
            }
            self.session_connect_ok
        }

        async fn session_up(&mut self) -> bool {
            self.session_is_up
        }
    }

    #[test]
    fn connects_link_then_session_one_step_per_poll() {
        let mut supervisor = ConnectivitySupervisor::new();
        let mut net = FakeNet::new();
        net.link_connect_ok = true;
        net.session_connect_ok = true;

        assert_eq!(
            block_on(supervisor.poll(&mut net, 0)),
            ConnectionState::LinkUp
        );
        assert_eq!(
            block_on(supervisor.poll(&mut net, 100)),
            ConnectionState::SessionConnecting
        );
        assert_eq!(
            block_on(supervisor.poll(&mut net, 200)),
            ConnectionState::SessionReady
        );
        assert!(supervisor.is_ready());
    }

    #[test]
    fn failed_handshake_returns_to_link_up_and_retries() {
        let mut supervisor = ConnectivitySupervisor::new();
        let mut net = FakeNet::new();
        net.link_connect_ok = true;

        block_on(supervisor.poll(&mut net, 0)); // LinkUp
        block_on(supervisor.poll(&mut net, 100)); // SessionConnecting
        assert_eq!(
            block_on(supervisor.poll(&mut net, 200)),
            ConnectionState::LinkUp
        );
        assert!(!supervisor.is_ready());

        // Remains eligible: the next polls walk back through SessionConnecting
        block_on(supervisor.poll(&mut net, 300));
        assert_eq!(supervisor.state(), ConnectionState::SessionConnecting);
        assert_eq!(net.session_connect_calls, 1);
    }

    #[test]
    fn link_retry_respects_backoff() {
        let mut supervisor = ConnectivitySupervisor::new().with_link_retry_delay(5000);
        let mut net = FakeNet::new();

        block_on(supervisor.poll(&mut net, 0));
        assert_eq!(net.link_connect_calls, 1);

        // Within the backoff window: no new attempt
        block_on(supervisor.poll(&mut net, 100));
        block_on(supervisor.poll(&mut net, 4900));
        assert_eq!(net.link_connect_calls, 1);

        // Backoff elapsed: attempt again
        block_on(supervisor.poll(&mut net, 5000));
        assert_eq!(net.link_connect_calls, 2);
        assert_eq!(supervisor.state(), ConnectionState::LinkDown);
    }

    #[test]
    fn link_loss_discards_session_state() {
        let mut supervisor = ConnectivitySupervisor::new();
        let mut net = FakeNet::new();
        net.link_connect_ok = true;
        net.session_connect_ok = true;

        block_on(supervisor.poll(&mut net, 0));
        block_on(supervisor.poll(&mut net, 100));
        block_on(supervisor.poll(&mut net, 200));
        assert!(supervisor.is_ready());

        net.link_is_up = false;
        assert_eq!(
            block_on(supervisor.poll(&mut net, 300)),
            ConnectionState::LinkDown
        );

        // Link loss resets the backoff so reconnect is attempted immediately
        net.link_connect_ok = true;
        net.link_is_up = false;
        assert_eq!(
            block_on(supervisor.poll(&mut net, 400)),
            ConnectionState::LinkUp
        );
    }

    #[test]
    fn dropped_session_rehandshakes_while_link_stays_up() {
        let mut supervisor = ConnectivitySupervisor::new();
        let mut net = FakeNet::new();
        net.link_connect_ok = true;
        net.session_connect_ok = true;

        block_on(supervisor.poll(&mut net, 0));
        block_on(supervisor.poll(&mut net, 100));
        block_on(supervisor.poll(&mut net, 200));

        net.session_is_up = false;
        assert_eq!(
            block_on(supervisor.poll(&mut net, 300)),
            ConnectionState::SessionLost
        );
        assert_eq!(
            block_on(supervisor.poll(&mut net, 400)),
            ConnectionState::SessionConnecting
        );
        assert_eq!(
            block_on(supervisor.poll(&mut net, 500)),
            ConnectionState::SessionReady
        );
    }

    #[test]
    fn never_handshakes_while_link_down() {
        let mut supervisor = ConnectivitySupervisor::new().with_link_retry_delay(0);
        let mut net = FakeNet::new();

        for tick in 0..10u64 {
            block_on(supervisor.poll(&mut net, tick * 100));
            assert_ne!(supervisor.state(), ConnectionState::SessionConnecting);
        }
        assert_eq!(net.session_connect_calls, 0);
    }
}
