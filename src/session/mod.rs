//! Recording session management
//!
//! This module provides the `SessionController` abstraction that manages:
//! - Microphone stream acquisition and release
//! - Chunk buffering while recording
//! - Upload and history append on stop
//! - The Idle → Recording → Processing → Idle state machine

mod config;
mod controller;
mod stats;

pub use config::SessionConfig;
pub use controller::SessionController;
pub use stats::{SessionState, SessionStats};
