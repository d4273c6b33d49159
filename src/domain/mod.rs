pub mod chat;
pub mod scan;
pub mod verdict;

pub use chat::{ChatMessage, Sender};
pub use scan::{ScanHistoryEntry, ScanMode, SelectedFile};
pub use verdict::{Safety, VerdictRecord};
