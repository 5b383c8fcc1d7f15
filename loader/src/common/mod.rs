pub mod errors;
pub mod rate_limiter;

pub use errors::{CacheError, CatalogError, LoadError, ParseError, ThemeError, ThemeResult};
pub use rate_limiter::{RateLimiter, RateLimiterConfig};
