// HTTP routes
pub mod admin;
pub mod analyze;
pub mod health;
pub mod metrics;

pub use admin::*;
pub use analyze::*;
pub use health::*;
pub use metrics::*;
