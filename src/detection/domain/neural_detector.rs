use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::detection::domain::detection::{Detection, Emotion};
use crate::shared::frame::Frame;
use crate::shared::rect::Rect;

/// Errors raised by a neural detector adapter.
///
/// Both variants are recovered inside the detection loop: a load failure
/// routes the session to the fallback path permanently, a frame failure
/// falls back for that frame only.
#[derive(Debug, Error)]
pub enum NeuralError {
    #[error("model assets failed to load: {0}")]
    ModelLoad(String),
    #[error("detection failed on frame: {0}")]
    FrameDetection(String),
}

/// Inference options passed to the adapter on every frame.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct DetectOptions {
    /// Detections scoring below this are discarded by the adapter.
    pub min_confidence: f64,
    /// Frames larger than this are downscaled by the adapter before
    /// inference.
    pub max_input_size: u32,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            min_confidence: 0.5,
            max_input_size: 512,
        }
    }
}

/// One face as reported by the neural backend, before mapping to the
/// common [`Detection`] representation.
#[derive(Clone, Debug)]
pub struct NeuralFace {
    pub rect: Rect,
    pub score: f64,
    pub landmarks: Option<Vec<(f64, f64)>>,
    pub expressions: HashMap<Emotion, f64>,
}

impl NeuralFace {
    /// Maps the backend's native result into the common representation.
    ///
    /// The dominant expression (highest score, ties broken by the fixed
    /// label order) becomes `emotion`/`emotion_confidence`; an empty map
    /// yields `Neutral` at 0. Scores are clamped to [0, 1].
    pub fn into_detection(self) -> Detection {
        let mut emotion = Emotion::Neutral;
        let mut emotion_confidence = 0.0;
        for label in Emotion::ALL {
            if let Some(&score) = self.expressions.get(&label) {
                if score > emotion_confidence {
                    emotion = label;
                    emotion_confidence = score;
                }
            }
        }
        Detection {
            rect: self.rect,
            confidence: self.score.clamp(0.0, 1.0),
            emotion,
            emotion_confidence: emotion_confidence.clamp(0.0, 1.0),
            landmarks: self.landmarks,
            expressions: Some(self.expressions),
        }
    }
}

/// External collaborator: an opaque neural face/emotion detector.
///
/// The orchestrator requests `load_models` once per session, concurrently
/// with the frame loop, and calls `detect` only after the load completes.
/// Any `detect` error is a per-frame fallback trigger, never fatal.
pub trait NeuralDetector: Send {
    fn load_models(&mut self) -> Result<(), NeuralError>;

    fn detect(
        &mut self,
        frame: &Frame,
        options: &DetectOptions,
    ) -> Result<Vec<NeuralFace>, NeuralError>;
}
