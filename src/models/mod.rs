pub mod goal;
pub mod session;

pub use goal::{Goal, NewGoal};
pub use session::{SessionRecord, Sport, SportStats, ValidationError};
