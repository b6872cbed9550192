//! Recording presence adapters

pub mod noop;
pub mod notify_rust;
pub mod terminal;

pub use noop::NoopPresence;
pub use notify_rust::NotifyRustPresence;
pub use terminal::TerminalPresence;
