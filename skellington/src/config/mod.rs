//! Configuration: caller-facing [`SkellingtonConfig`] and the normalized [`Settings`] built from it.

mod plugins;
mod settings;
mod skellington_config;


pub use plugins::Plugins;
pub use settings::{Mode, Settings};
pub use skellington_config::SkellingtonConfig;
