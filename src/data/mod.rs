//! Candidate and settled-bet file loading

pub mod candidates;

// Re-export commonly used types
pub use candidates::{load_candidates, load_settled, read_candidates, read_settled, SettledRow};
