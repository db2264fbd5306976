//! Configuration module for EstimateCLI
//!
//! - Platform path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::EstimatePaths;
pub use settings::Settings;
