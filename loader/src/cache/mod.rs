//! Persistence of the Base16 catalog between runs.

pub mod clock;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use store::{CACHE_EXPIRY, CacheState, SnapshotStore};
