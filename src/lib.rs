//! ScribeBooth - record audio sessions and upload them for transcription
//!
//! Built with hexagonal architecture:
//! - `domain`: Core entities and value objects
//! - `application`: Use cases and port interfaces
//! - `infrastructure`: Adapter implementations
//! - `cli`: Command-line interface

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
