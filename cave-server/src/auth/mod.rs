//! Authentication: JWT issuance/validation, request extractors, rate limiting

pub mod extractor;
pub mod jwt;
pub mod rate_limit;

pub use extractor::AdminUser;
pub use jwt::{CurrentUser, JwtError, JwtService};
pub use rate_limit::RateLimiter;
