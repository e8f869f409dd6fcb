use crate::detection::domain::detection::Emotion;
use crate::shared::frame::Frame;

/// Pixel-sampling stride inside a window, both axes.
pub const SAMPLE_STRIDE: i32 = 2;

/// Absolute red-channel difference against the diagonally-previous sample
/// that counts as an edge.
const EDGE_DIFF_THRESHOLD: i32 = 30;

/// Minimum raw skin-classified samples for a window to qualify.
const MIN_SKIN_SAMPLES: u32 = 80;

/// Confidence ceiling for the heuristic path.
const MAX_CONFIDENCE: f64 = 0.95;

/// Face-likeness verdict for one candidate window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegionScore {
    pub is_candidate: bool,
    pub confidence: f64,
    pub emotion: Emotion,
    pub emotion_confidence: f64,
}

impl RegionScore {
    fn rejected() -> Self {
        Self {
            is_candidate: false,
            confidence: 0.0,
            emotion: Emotion::Neutral,
            emotion_confidence: 0.0,
        }
    }
}

/// Scores a `size × size` window at `(x, y)` for face-likeness.
///
/// Samples every second pixel row and column that falls inside the frame,
/// classifies each sample as skin-toned when at least two of three
/// independent color rules agree, and derives a coarse edge signal from
/// red-channel jumps against the diagonally-previous sample. Pure function:
/// identical pixels yield identical scores.
pub fn analyze(frame: &Frame, x: i32, y: i32, size: u32) -> RegionScore {
    let fw = frame.width() as i32;
    let fh = frame.height() as i32;
    let size = size as i32;

    let mut total: u32 = 0;
    let mut skin: u32 = 0;
    let mut edges: u32 = 0;
    let mut sum_r: f64 = 0.0;
    let mut sum_g: f64 = 0.0;
    let mut sum_b: f64 = 0.0;

    let mut sy = y;
    while sy < y + size {
        if sy >= 0 && sy < fh {
            let mut sx = x;
            while sx < x + size {
                if sx >= 0 && sx < fw {
                    let (r, g, b) = frame.pixel(sx as u32, sy as u32);
                    let (r, g, b) = (r as i32, g as i32, b as i32);
                    total += 1;
                    sum_r += r as f64;
                    sum_g += g as f64;
                    sum_b += b as f64;
                    if is_skin(r, g, b) {
                        skin += 1;
                    }
                    // Edge signal: red jump against the diagonally-previous
                    // sample, defined only for interior samples.
                    let px = sx - SAMPLE_STRIDE;
                    let py = sy - SAMPLE_STRIDE;
                    if px >= x.max(0) && py >= y.max(0) {
                        let (pr, _, _) = frame.pixel(px as u32, py as u32);
                        if (r - pr as i32).abs() > EDGE_DIFF_THRESHOLD {
                            edges += 1;
                        }
                    }
                }
                sx += SAMPLE_STRIDE;
            }
        }
        sy += SAMPLE_STRIDE;
    }

    if total == 0 {
        return RegionScore::rejected();
    }

    let mean_r = sum_r / total as f64;
    let mean_g = sum_g / total as f64;
    let mean_b = sum_b / total as f64;
    let brightness = (mean_r + mean_g + mean_b) / 3.0;
    let skin_ratio = skin as f64 / total as f64;
    let edge_ratio = edges as f64 / total as f64;

    let is_candidate = skin_ratio > 0.3
        && skin_ratio < 0.8
        && brightness > 60.0
        && brightness < 200.0
        && edge_ratio > 0.1
        && skin > MIN_SKIN_SAMPLES;

    let confidence = (0.4 * skin_ratio + 0.3 * (brightness / 120.0).min(1.0) + 0.3 * edge_ratio)
        .min(MAX_CONFIDENCE);

    let (emotion, emotion_confidence) =
        estimate_emotion(mean_r, mean_g, mean_b, brightness, edge_ratio);

    RegionScore {
        is_candidate,
        confidence,
        emotion,
        emotion_confidence,
    }
}

/// Two-of-three vote across independent skin-tone rules.
fn is_skin(r: i32, g: i32, b: i32) -> bool {
    let rgb_rule = r > 95 && g > 40 && b > 20 && r > g && r > b && (r - g).abs() > 15;
    let ycbcr_rule = r > 80 && g > 50 && b > 30 && r >= g && g >= b;
    let hsv_rule = r > 60 && g > 40 && b > 25 && (r - g.min(b)) > 15;
    (rgb_rule as u8 + ycbcr_rule as u8 + hsv_rule as u8) >= 2
}

/// Coarse emotion estimate from window-level color statistics.
///
/// Arms are evaluated in priority order; the first match wins.
fn estimate_emotion(
    mean_r: f64,
    mean_g: f64,
    mean_b: f64,
    brightness: f64,
    edge_ratio: f64,
) -> (Emotion, f64) {
    let warmth = (mean_r - mean_b) / 255.0;
    let saturation = (mean_r.max(mean_g).max(mean_b) - mean_r.min(mean_g).min(mean_b)) / 255.0;

    if brightness > 130.0 && warmth > 0.1 {
        (Emotion::Happy, 0.7 + warmth.min(0.2))
    } else if brightness < 90.0 && edge_ratio > 0.15 {
        (Emotion::Focused, 0.6 + edge_ratio.min(0.3))
    } else if saturation > 0.3 && brightness > 100.0 {
        (Emotion::Surprised, 0.6 + saturation.min(0.2))
    } else {
        (Emotion::Neutral, 0.5 + 0.3 * (brightness / 200.0).min(1.0))
    }
}
