//! Audio input device adapters

pub mod cpal_directory;

pub use cpal_directory::CpalDeviceDirectory;
