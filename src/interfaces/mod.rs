pub mod detector;

pub use detector::BlockDetector;
