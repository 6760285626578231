//! Stock behaviors, one module per entity kind that acts.
//!
//! Static terrain has no behavior; everything else gets exactly one. The
//! modules also own the tuning constants for their kind (drain amounts,
//! patrol geometry, yields) so numbers live next to the logic that uses
//! them.

pub mod bolt;
pub mod cache;
pub mod exit;
pub mod forager;
pub mod sentry;

pub use bolt::BoltBehavior;
pub use cache::CacheBehavior;
pub use exit::ExitBehavior;
pub use forager::ForagerBehavior;
pub use sentry::SentryBehavior;
