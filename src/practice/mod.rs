//! Practice mode
//!
//! Review a session's entries one card at a time, rate each one, and save the
//! ratings back when the run completes.

pub mod engine;

pub use engine::{CardView, PracticeError, PracticeRun, PracticeState, RatingSink, Tally};
