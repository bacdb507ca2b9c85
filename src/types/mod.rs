mod difficulty;
mod models;
mod session;

pub use difficulty::Difficulty;
pub use models::*;
pub use session::{Identity, Session};
