//! Data carried between the session loop and its observers

pub mod game_view;
pub mod session_identity;

pub use game_view::GameView;
pub use session_identity::SessionIdentity;
