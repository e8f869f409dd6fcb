//! Adaptive face-region detection engine.
//!
//! A per-stream detection session chooses between an external neural face
//! detector and a built-in pixel-heuristic fallback, frame by frame, and
//! publishes results to consumers at a bounded rate. The heuristic path is
//! intentionally cheap: its job is graceful degradation while (or in case)
//! the neural model never becomes available, not accuracy.
//!
//! The embedding application supplies the two collaborators: a
//! [`session::frame_source::FrameSource`] yielding pixel frames and a
//! [`detection::domain::neural_detector::NeuralDetector`] wrapping whatever
//! inference backend it has. The session state machine and the fallback
//! scanner live here.

pub mod detection;
pub mod session;
pub mod shared;
