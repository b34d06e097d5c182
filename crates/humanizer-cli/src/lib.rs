//! Humanizer CLI library.
//!
//! Command implementations plus the WAV and JSON file plumbing used to
//! run the humanizer engine offline.

pub mod commands;
pub mod config;
pub mod wav;
