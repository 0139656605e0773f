//! Named-entity recognizers: rule-based patterns, and ONNX Runtime token classification.

pub mod bio;
mod pattern;
pub use pattern::PatternRecognizer;

#[cfg(feature = "onnx")]
mod onnx;
#[cfg(feature = "onnx")]
pub use onnx::OnnxRecognizer;
