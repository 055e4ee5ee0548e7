//! State management module
//!
//! This module contains the countdown lifecycle state and the controller
//! that owns it.

pub mod controller;
pub mod countdown;

// Re-export main types
pub use controller::CountdownController;
pub use countdown::{CountdownState, Phase};
