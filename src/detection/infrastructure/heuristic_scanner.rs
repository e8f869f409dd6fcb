use serde::{Deserialize, Serialize};

use crate::detection::domain::detection::Detection;
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::region_analyzer::analyze;
use crate::shared::frame::Frame;
use crate::shared::rect::Rect;

/// Margin added to every side of an accepted window.
const SIDE_PADDING: i32 = 20;

/// Extra margin below the window, so the crop includes the chin.
const CHIN_PADDING: i32 = 10;

/// Scan stride is the window size divided by this.
const STRIDE_DIVISOR: i32 = 3;

/// Fallback scan parameters.
///
/// The defaults trade recall for latency: one detection, three scales, and
/// a coarse stride keep a full scan a small fraction of a frame budget.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Side length of the unscaled candidate window, in pixels.
    pub base_window: u32,
    /// Scale factors applied to `base_window`, tried in order.
    pub scales: Vec<f64>,
    /// Candidates at or below this confidence are discarded.
    pub min_confidence: f64,
    /// Scanning stops once this many detections are accepted.
    pub max_detections: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            base_window: 80,
            scales: vec![1.0, 0.8, 1.2],
            min_confidence: 0.6,
            max_detections: 1,
        }
    }
}

/// Multi-scale sliding-window search over one frame.
///
/// Pure function over the pixel input: identical frames yield identical
/// detections, in discovery order (scales as configured, then row-major
/// position within each scale).
#[derive(Clone, Debug, Default)]
pub struct HeuristicScanner {
    config: ScanConfig,
}

impl HeuristicScanner {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    pub fn scan(&self, frame: &Frame) -> Vec<Detection> {
        if frame.is_degenerate() {
            return Vec::new();
        }

        let fw = frame.width() as i32;
        let fh = frame.height() as i32;

        let mut accepted: Vec<Detection> = Vec::new();
        // Unpadded window centers of accepted detections, for overlap
        // suppression across all scales.
        let mut centers: Vec<(f64, f64)> = Vec::new();

        for &scale in &self.config.scales {
            let window = (self.config.base_window as f64 * scale).round() as i32;
            if window < 1 {
                continue;
            }
            let stride = (window / STRIDE_DIVISOR).max(1);

            let mut y = 0;
            while y + window <= fh {
                let mut x = 0;
                while x + window <= fw {
                    let score = analyze(frame, x, y, window as u32);
                    if score.is_candidate && score.confidence > self.config.min_confidence {
                        let center = (
                            x as f64 + window as f64 / 2.0,
                            y as f64 + window as f64 / 2.0,
                        );
                        let overlaps = centers.iter().any(|&(cx, cy)| {
                            let dx = cx - center.0;
                            let dy = cy - center.1;
                            (dx * dx + dy * dy).sqrt() < window as f64
                        });
                        if !overlaps {
                            let rect = Rect::new(x, y, window, window)
                                .pad(SIDE_PADDING, SIDE_PADDING, SIDE_PADDING, SIDE_PADDING + CHIN_PADDING)
                                .clamp_to(frame.width(), frame.height());
                            accepted.push(Detection::heuristic(
                                rect,
                                score.confidence,
                                score.emotion,
                                score.emotion_confidence,
                            ));
                            centers.push(center);
                            if accepted.len() >= self.config.max_detections {
                                return accepted;
                            }
                        }
                    }
                    x += stride;
                }
                y += stride;
            }
        }

        accepted
    }
}

impl FaceDetector for HeuristicScanner {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
        Ok(self.scan(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_from_fn(w: u32, h: u32, f: impl Fn(u32, u32) -> (u8, u8, u8)) -> Frame {
        let mut data = Vec::with_capacity((w * h * 3) as usize);
        for y in 0..h {
            for x in 0..w {
                let (r, g, b) = f(x, y);
                data.extend_from_slice(&[r, g, b]);
            }
        }
        Frame::new(data, w, h, 3, 0)
    }

    /// Every stride-2 sample alternates between skin and dark gray, so any
    /// sufficiently large window is a strong candidate.
    fn face_like_frame(w: u32, h: u32) -> Frame {
        frame_from_fn(w, h, |x, _| {
            if (x / 2) % 2 == 0 {
                (200, 140, 100)
            } else {
                (90, 90, 90)
            }
        })
    }

    fn single_scale_config(max_detections: usize) -> ScanConfig {
        ScanConfig {
            base_window: 80,
            scales: vec![1.0],
            min_confidence: 0.6,
            max_detections,
        }
    }

    #[test]
    fn test_blank_frame_yields_nothing() {
        let scanner = HeuristicScanner::default();
        let frame = frame_from_fn(200, 200, |_, _| (0, 0, 0));
        assert!(scanner.scan(&frame).is_empty());
    }

    #[test]
    fn test_degenerate_frame_yields_nothing() {
        let scanner = HeuristicScanner::default();
        let frame = Frame::new(vec![], 0, 0, 3, 0);
        assert!(scanner.scan(&frame).is_empty());
    }

    #[test]
    fn test_frame_smaller_than_every_window_yields_nothing() {
        let scanner = HeuristicScanner::default();
        let frame = face_like_frame(50, 50); // smallest window is 64
        assert!(scanner.scan(&frame).is_empty());
    }

    #[test]
    fn test_default_config_stops_at_one_detection() {
        let scanner = HeuristicScanner::default();
        let detections = scanner.scan(&face_like_frame(200, 200));
        assert_eq!(detections.len(), 1);
    }

    #[test]
    fn test_first_detection_is_earliest_in_scan_order() {
        let scanner = HeuristicScanner::new(single_scale_config(1));
        let detections = scanner.scan(&face_like_frame(200, 200));
        // The window at (0, 0) is found first; padding is clipped at the
        // frame origin.
        assert_eq!(detections[0].rect, Rect::new(0, 0, 100, 110));
    }

    #[test]
    fn test_padding_applied_away_from_edges() {
        // Face-like pixels only in a centered band, so the accepted window
        // sits away from the frame border and keeps its full padding.
        let frame = frame_from_fn(300, 300, |x, y| {
            let in_band = (78..158).contains(&x) && (78..158).contains(&y);
            if in_band && (x / 2) % 2 == 0 {
                (200, 140, 100)
            } else if in_band {
                (90, 90, 90)
            } else {
                (0, 0, 0)
            }
        });
        let scanner = HeuristicScanner::new(single_scale_config(1));
        let detections = scanner.scan(&frame);
        assert_eq!(detections.len(), 1);
        let r = detections[0].rect;
        assert_eq!((r.width, r.height), (120, 130)); // 80 + 2*20, 80 + 2*20 + 10
    }

    #[test]
    fn test_overlap_suppression_spaces_detections_by_window_size() {
        let scanner = HeuristicScanner::new(single_scale_config(8));
        let detections = scanner.scan(&face_like_frame(200, 200));
        // Full-frame pattern: every position is a candidate, so the accepted
        // windows are exactly those whose centers clear the one-window radius
        // of every earlier accept, in row-major order: (0,0), (104,0),
        // (26,78), (104,104), padded and clamped.
        let rects: Vec<Rect> = detections.iter().map(|d| d.rect).collect();
        assert_eq!(
            rects,
            vec![
                Rect::new(0, 0, 100, 110),
                Rect::new(84, 0, 116, 110),
                Rect::new(6, 58, 120, 130),
                Rect::new(84, 84, 116, 116),
            ]
        );
    }

    #[test]
    fn test_early_stop_honors_max_detections() {
        let scanner = HeuristicScanner::new(single_scale_config(2));
        let detections = scanner.scan(&face_like_frame(200, 200));
        assert_eq!(detections.len(), 2);
    }

    #[test]
    fn test_larger_first_scale_suppresses_smaller_scales() {
        let config = ScanConfig {
            base_window: 80,
            scales: vec![1.0, 0.8],
            min_confidence: 0.6,
            max_detections: 2,
        };
        let scanner = HeuristicScanner::new(config);
        let detections = scanner.scan(&face_like_frame(120, 120));
        // The 1.0-scale window at the origin wins; nearby 0.8-scale windows
        // fall inside its suppression radius.
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].rect, Rect::new(0, 0, 100, 110));
    }

    #[test]
    fn test_scan_is_deterministic() {
        let scanner = HeuristicScanner::new(single_scale_config(8));
        let frame = face_like_frame(200, 200);
        assert_eq!(scanner.scan(&frame), scanner.scan(&frame));
    }

    #[test]
    fn test_detections_carry_no_neural_fields() {
        let scanner = HeuristicScanner::default();
        let detections = scanner.scan(&face_like_frame(200, 200));
        assert!(detections[0].landmarks.is_none());
        assert!(detections[0].expressions.is_none());
    }

    #[test]
    fn test_face_detector_trait_delegates_to_scan() {
        let mut scanner = HeuristicScanner::default();
        let frame = face_like_frame(200, 200);
        let via_trait = scanner.detect(&frame).unwrap();
        assert_eq!(via_trait, scanner.scan(&frame));
    }
}
