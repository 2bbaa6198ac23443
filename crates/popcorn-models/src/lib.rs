pub mod lenient;
pub mod movie;
pub mod summary;
pub mod watchlist;

pub use movie::{MovieDetail, SearchResultSummary};
pub use summary::{summarize, WatchSummary};
pub use watchlist::WatchlistEntry;
