pub mod frame_source;
pub mod orchestrator;
pub mod state;
pub mod throttle;
