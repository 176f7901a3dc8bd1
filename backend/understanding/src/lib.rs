pub mod vision;

pub use vision::{SimulatedVision, default_analysis};
