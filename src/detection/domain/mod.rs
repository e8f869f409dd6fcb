pub mod detection;
pub mod face_detector;
pub mod neural_detector;
pub mod region_analyzer;
