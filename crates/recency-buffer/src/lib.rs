#![doc = include_str!("../README.md")]

mod registry;
mod ring_buffer;

pub use registry::BufferRegistry;
pub use ring_buffer::{Overview, RingBuffer, Visit, Walk};
