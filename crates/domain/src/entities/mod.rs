//! Domain entities - Core business objects with identity

mod game_session;

pub use game_session::{GameSession, SessionStatus};
