//! Connectivity state machine and supervisor
//!
//! Link and session lifecycle is expressed as a pure state machine
//! ([`state`]) driven by a supervisor ([`supervisor`]) that polls the
//! network capability once per control tick and self-heals indefinitely.

pub mod state;
pub mod supervisor;

pub use state::{ConnectionState, Event};
pub use supervisor::ConnectivitySupervisor;
