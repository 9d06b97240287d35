//! # sportmetry
//!
//! The application layer around `sportmetry-core`: command implementations,
//! configuration loading and presentation labels. The binary in `main.rs`
//! only parses arguments, sets up logging and dispatches here.

pub mod cli;
pub mod config;
pub mod labels;
