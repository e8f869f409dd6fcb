use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::detection::domain::detection::Detection;
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::neural_detector::{DetectOptions, NeuralDetector, NeuralFace};
use crate::detection::infrastructure::heuristic_scanner::{HeuristicScanner, ScanConfig};
use crate::session::frame_source::FrameSource;
use crate::session::state::ModelState;
use crate::session::throttle::{PublishThrottle, DEFAULT_PUBLISH_INTERVAL};
use crate::shared::frame::Frame;

/// Builds a fresh neural adapter for each session. The session owns the
/// adapter for its lifetime; a new `start` gets a new one.
pub type NeuralDetectorFactory = Box<dyn Fn() -> Box<dyn NeuralDetector> + Send>;

/// Hard call-time failures. Everything detector-related is recovered
/// inside the loop and never surfaces here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("a detection session is already running")]
    AlreadyRunning,
    #[error("no detection session has been started")]
    NeverStarted,
}

/// Per-session tuning knobs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    pub scan: ScanConfig,
    pub detect: DetectOptions,
    /// Minimum spacing between externally visible detection updates.
    pub min_publish_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            scan: ScanConfig::default(),
            detect: DetectOptions::default(),
            min_publish_interval: DEFAULT_PUBLISH_INTERVAL,
        }
    }
}

/// State shared between the loop thread, the loader thread, and consumers.
///
/// The published list is single-writer (the loop) / multi-reader; the
/// model-state cell and cancellation token are atomics so no reader ever
/// blocks on the loop.
struct SessionShared {
    detections: RwLock<Vec<Detection>>,
    cancelled: AtomicBool,
    detecting: AtomicBool,
    model_state: AtomicU8,
    last_error: Mutex<Option<String>>,
}

impl SessionShared {
    fn new() -> Self {
        Self {
            detections: RwLock::new(Vec::new()),
            cancelled: AtomicBool::new(false),
            detecting: AtomicBool::new(true),
            model_state: AtomicU8::new(ModelState::Loading.as_u8()),
            last_error: Mutex::new(None),
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn model_state(&self) -> ModelState {
        ModelState::from_u8(self.model_state.load(Ordering::SeqCst))
    }

    fn set_model_state(&self, state: ModelState) {
        self.model_state.store(state.as_u8(), Ordering::SeqCst);
    }

    fn set_last_error(&self, message: &str) {
        let mut slot = self.last_error.lock().expect("last_error lock poisoned");
        *slot = Some(message.to_owned());
    }

    /// Overwrites the visible list unless the session was stopped. The
    /// cancellation re-check happens under the write lock, so once
    /// [`SessionShared::cancel`] returns, no publish can land.
    fn publish(&self, detections: Vec<Detection>) {
        let mut slot = self.detections.write().expect("detections lock poisoned");
        if !self.is_cancelled() {
            *slot = detections;
        }
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.detecting.store(false, Ordering::SeqCst);
        let mut slot = self.detections.write().expect("detections lock poisoned");
        slot.clear();
    }
}

/// Owns the per-stream detection state machine.
///
/// One session at a time: `start` spawns the frame loop and, concurrently,
/// the neural model load. Frames are processed from the first one on; the
/// fallback scanner covers the gap until (and in case) the model never
/// becomes ready. Results are published through a throttle; consumers read
/// them via the side-effect-free getters.
pub struct DetectionOrchestrator {
    neural_factory: NeuralDetectorFactory,
    config: SessionConfig,
    shared: Option<Arc<SessionShared>>,
    running: bool,
}

impl DetectionOrchestrator {
    pub fn new(neural_factory: NeuralDetectorFactory, config: SessionConfig) -> Self {
        Self {
            neural_factory,
            config,
            shared: None,
            running: false,
        }
    }

    pub fn with_defaults(neural_factory: NeuralDetectorFactory) -> Self {
        Self::new(neural_factory, SessionConfig::default())
    }

    /// Begins a new session over `source`.
    ///
    /// Fails with [`SessionError::AlreadyRunning`] if called again without
    /// an intervening [`DetectionOrchestrator::stop`]. The model load is
    /// fire-and-forget relative to the loop; the first frames always go
    /// through the fallback path.
    pub fn start(&mut self, source: Box<dyn FrameSource>) -> Result<(), SessionError> {
        if self.running {
            return Err(SessionError::AlreadyRunning);
        }

        let shared = Arc::new(SessionShared::new());

        let (load_tx, load_rx) =
            crossbeam_channel::bounded::<Result<Box<dyn NeuralDetector>, String>>(1);
        let mut neural = (self.neural_factory)();
        thread::spawn(move || {
            let outcome = match neural.load_models() {
                Ok(()) => Ok(neural),
                Err(e) => Err(e.to_string()),
            };
            // The receiver is gone if the session already stopped; a late
            // completion is then a no-op.
            let _ = load_tx.send(outcome);
        });

        let loop_shared = Arc::clone(&shared);
        let scanner = HeuristicScanner::new(self.config.scan.clone());
        let options = self.config.detect;
        let throttle = PublishThrottle::new(self.config.min_publish_interval);
        thread::spawn(move || run_loop(loop_shared, source, load_rx, scanner, options, throttle));

        log::info!("detection session started, model loading in background");
        self.shared = Some(shared);
        self.running = true;
        Ok(())
    }

    /// Ends the session: no frame after the in-flight one is processed and
    /// no publish lands after this returns. Idempotent once a session has
    /// existed; an error only before the first `start`.
    pub fn stop(&mut self) -> Result<(), SessionError> {
        let Some(shared) = &self.shared else {
            return Err(SessionError::NeverStarted);
        };
        shared.cancel();
        if self.running {
            log::info!("detection session stopped");
        }
        self.running = false;
        Ok(())
    }

    /// The most recently published detection list. Empty before the first
    /// publish and after `stop`.
    pub fn detections(&self) -> Vec<Detection> {
        match &self.shared {
            Some(shared) => shared
                .detections
                .read()
                .expect("detections lock poisoned")
                .clone(),
            None => Vec::new(),
        }
    }

    pub fn is_detecting(&self) -> bool {
        self.shared
            .as_ref()
            .is_some_and(|s| s.detecting.load(Ordering::SeqCst))
    }

    pub fn is_model_loading(&self) -> bool {
        self.running
            && self
                .shared
                .as_ref()
                .is_some_and(|s| s.model_state() == ModelState::Loading)
    }

    pub fn models_loaded(&self) -> bool {
        self.shared
            .as_ref()
            .is_some_and(|s| s.model_state() == ModelState::Ready)
    }

    /// The one-time model-load failure advisory, if any. Per-frame neural
    /// failures are deliberately not reported here.
    pub fn last_error(&self) -> Option<String> {
        self.shared.as_ref().and_then(|s| {
            s.last_error
                .lock()
                .expect("last_error lock poisoned")
                .clone()
        })
    }
}

/// One iteration per frame: consume a pending load completion, pick the
/// neural or fallback path, publish through the throttle. All per-frame
/// errors are recovered here; nothing terminates the loop except
/// cancellation or the source ending.
fn run_loop(
    shared: Arc<SessionShared>,
    mut source: Box<dyn FrameSource>,
    load_rx: crossbeam_channel::Receiver<Result<Box<dyn NeuralDetector>, String>>,
    scanner: HeuristicScanner,
    options: DetectOptions,
    mut throttle: PublishThrottle,
) {
    let mut fallback: Box<dyn FaceDetector> = Box::new(scanner);
    let mut neural: Option<Box<dyn NeuralDetector>> = None;

    loop {
        if shared.is_cancelled() {
            break;
        }

        if neural.is_none() {
            match load_rx.try_recv() {
                Ok(Ok(detector)) => {
                    neural = Some(detector);
                    shared.set_model_state(ModelState::Ready);
                    log::info!("neural model ready, leaving fallback path");
                }
                Ok(Err(message)) => {
                    shared.set_model_state(ModelState::Unavailable);
                    shared.set_last_error(&message);
                    log::warn!("neural model unavailable, fallback path is permanent: {message}");
                }
                Err(crossbeam_channel::TryRecvError::Empty)
                | Err(crossbeam_channel::TryRecvError::Disconnected) => {}
            }
        }

        // Yield point: suspends until the source has a new frame.
        let Some(frame) = source.next_frame() else {
            break;
        };
        if shared.is_cancelled() {
            break;
        }
        if frame.is_degenerate() {
            continue;
        }

        let detections = match neural.as_mut() {
            Some(detector) => match detector.detect(&frame, &options) {
                Ok(faces) => faces.into_iter().map(NeuralFace::into_detection).collect(),
                Err(e) => {
                    // Transient: this frame only, the neural path stays.
                    log::debug!(
                        "neural detection failed on frame {}, falling back: {e}",
                        frame.index()
                    );
                    fallback_detect(fallback.as_mut(), &frame)
                }
            },
            None => fallback_detect(fallback.as_mut(), &frame),
        };

        if throttle.should_publish(Instant::now()) {
            shared.publish(detections);
        }
    }

    shared.detecting.store(false, Ordering::SeqCst);
    log::debug!("detection loop exited");
}

fn fallback_detect(fallback: &mut dyn FaceDetector, frame: &Frame) -> Vec<Detection> {
    fallback.detect(frame).unwrap_or_else(|e| {
        log::debug!("fallback detection failed on frame {}: {e}", frame.index());
        Vec::new()
    })
}
