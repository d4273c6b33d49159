pub mod env;
mod loader;

pub use env::{AppConfig, ClassifierConfig, DirectoryConfig, ReportConfig};
pub use loader::load_config;
