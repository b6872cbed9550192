//! Capture engine adapters

pub mod cpal_engine;
pub mod flac;
pub mod surface;

pub use cpal_engine::{CpalEngine, CpalEngineFactory};
pub use surface::SurfaceHandle;
