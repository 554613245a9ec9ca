//! Test-only infrastructure fakes.
//!
//! These helpers implement outbound ports for unit tests (services and the session
//! loop), allowing tests to run without real network or websocket connections.
//! Mockall mocks cover the request/response ports; the push channel needs a fake
//! because tests drive its events by hand.

pub mod fake_push_transport;
pub mod fixtures;

pub use fake_push_transport::FakePushTransport;
