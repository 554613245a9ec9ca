//! Outbound ports - boundaries implemented by infrastructure adapters

pub mod peer_connection_port;
pub mod push_transport_port;
pub mod room_api_port;

pub use peer_connection_port::{PeerConnectionPort, PeerError};
pub use push_transport_port::{
    ChannelEvent, ChannelEventKind, ChannelEventSender, ChannelWriter, ConnectionId, PushTransport,
};
pub use room_api_port::{ApiError, RoomApiPort};

#[cfg(any(test, feature = "testing"))]
pub use peer_connection_port::MockPeerConnectionPort;
#[cfg(any(test, feature = "testing"))]
pub use room_api_port::MockRoomApiPort;
