//! Face-landmark detector adapters

mod replay;

pub use replay::ReplayDetector;
