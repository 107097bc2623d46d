pub mod dispatcher;
pub mod limiter;

pub use dispatcher::{DispatchReport, Dispatcher};
pub use limiter::RateLimiter;
