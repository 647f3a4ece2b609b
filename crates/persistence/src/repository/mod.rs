//! Repository implementations for database operations

pub mod analysis;
pub mod notes;

pub use analysis::*;
pub use notes::*;
