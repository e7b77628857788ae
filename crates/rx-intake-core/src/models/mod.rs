//! Domain models for the rx-intake system.

mod catalog;
mod patient;
mod recommendation;

pub use catalog::*;
pub use patient::*;
pub use recommendation::*;
