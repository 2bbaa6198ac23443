pub mod details;
pub mod keys;
pub mod persistent_list;
pub mod rating;
pub mod request;
pub mod search;
pub mod session;
pub mod store;
pub mod watchlist;

#[cfg(test)]
pub(crate) mod test_support;

pub use details::{DetailsFetcher, DetailsState, DEFAULT_TITLE};
pub use keys::{BindingId, Key, KeyBindings};
pub use persistent_list::PersistentList;
pub use rating::StarRating;
pub use search::{SearchQueryFetcher, SearchState, FETCH_FAILED_MESSAGE, NOT_FOUND_MESSAGE};
pub use session::{Focus, Intent, KeyOutcome, Session, SessionOptions};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use watchlist::Watchlist;
