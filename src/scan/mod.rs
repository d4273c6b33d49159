pub mod desk;
pub mod orchestrator;

pub use desk::{CompletedScan, ScanDesk};
pub use orchestrator::{ScanError, CONNECTIVITY_ERROR};
