use crate::detection::domain::detection::Detection;
use crate::shared::frame::Frame;

/// Domain interface for per-frame face detection.
///
/// Implementations may be stateful, hence `&mut self`.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>>;
}
