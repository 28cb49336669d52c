pub mod body;
pub mod config;
pub mod frame;
pub mod vecmath;

// Re-export key types for easier use by dependent crates
pub use body::{Body, State};
pub use config::{SimulationConfig, TimingConfig, PhysicsConfig, IoConfig, OutputConfig};
pub use frame::Frame;
pub use vecmath::Vec2;
