//! Keyword-driven help assistant. There is no language understanding here:
//! replies come from a fixed, ordered rule table.

pub mod matcher;
pub mod rules;
pub mod session;

pub use session::ChatSession;
