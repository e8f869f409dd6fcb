use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::shared::rect::Rect;

/// Coarse emotion labels shared by the neural and heuristic paths.
///
/// The heuristic path only ever emits `Neutral`, `Happy`, `Focused`, or
/// `Surprised`; the remaining labels exist for neural expression maps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Neutral,
    Happy,
    Sad,
    Focused,
    Surprised,
    Angry,
}

impl Emotion {
    /// All labels in a fixed order, used for deterministic iteration over
    /// expression maps.
    pub const ALL: [Emotion; 6] = [
        Emotion::Neutral,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Focused,
        Emotion::Surprised,
        Emotion::Angry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Neutral => "neutral",
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Focused => "focused",
            Emotion::Surprised => "surprised",
            Emotion::Angry => "angry",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One located face-like region in one frame.
///
/// `landmarks` and `expressions` are populated only by the neural path;
/// heuristic detections carry `None`. Consumers must treat absence as
/// "unknown", never as zero.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub rect: Rect,
    pub confidence: f64,
    pub emotion: Emotion,
    pub emotion_confidence: f64,
    pub landmarks: Option<Vec<(f64, f64)>>,
    pub expressions: Option<HashMap<Emotion, f64>>,
}

impl Detection {
    /// A heuristic-path detection: no landmarks, no expression map.
    pub fn heuristic(
        rect: Rect,
        confidence: f64,
        emotion: Emotion,
        emotion_confidence: f64,
    ) -> Self {
        Self {
            rect,
            confidence,
            emotion,
            emotion_confidence,
            landmarks: None,
            expressions: None,
        }
    }
}
