#![doc = include_str!("../README.md")]

mod config;
mod error;
mod event;
mod layer;

pub use config::RecorderConfig;
pub use error::{RecorderError, Result};
pub use event::RecordedEvent;
pub use layer::RecorderLayer;
