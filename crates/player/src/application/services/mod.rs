//! Application services

pub mod action_gateway;
pub mod connection_supervisor;
pub mod fallback_poller;
pub mod lobby_service;
pub mod session_service;
pub mod signaling_relay;
pub mod state_reconciler;

pub use action_gateway::ActionGateway;
pub use connection_supervisor::{ChannelOutcome, ChannelPhase, ConnectionSupervisor, OutboundSink};
pub use fallback_poller::{FallbackPoller, PollDecision};
pub use lobby_service::LobbyService;
pub use session_service::{Session, SessionDeps};
pub use signaling_relay::{RelayJob, SignalingRelay};
pub use state_reconciler::{FetchStamp, StateReconciler};
