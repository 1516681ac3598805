pub mod backend;
pub mod data;
pub mod defaults;
pub mod io;

#[cfg(test)]
pub mod tests;

pub use backend::{BackendConfig, MEMORY_TOGGLE_FEATURE};
pub use data::Config;
pub use io::ConfigError;
