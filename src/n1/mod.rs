//! Helpers for agent loops built on the n1 chat completions API.

pub mod payload;

pub use payload::{estimate_messages_size_bytes, trim_images_to_fit, TrimOutcome};
