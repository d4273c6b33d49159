pub mod cache;
pub mod store;

pub use cache::{HistoryCache, HistoryError};
pub use store::FileSlotStore;
