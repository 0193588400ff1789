//! Assistant service and its external service boundaries
//!
//! - `Transcriber`, `Generator`, `Synthesizer`: adapter traits
//! - `Assistant`: sequences the adapters and owns conversation history

mod adapters;
mod engine;

pub use adapters::{Generator, Synthesizer, Transcriber};
pub use engine::Assistant;
