pub mod gateway;
pub mod metrics;
pub mod rate_limiter;
pub mod router;

pub use gateway::Gateway;
pub use rate_limiter::FixedWindowLimiter;
pub use router::RouteTable;
