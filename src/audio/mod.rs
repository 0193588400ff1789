pub mod format;

pub use format::{AudioEncoding, AudioFormat};
