pub mod config;
pub mod tracing;

/// Re-exports used by macros. Not public API.
#[doc(hidden)]
pub mod __private {
    pub use anyhow;
    #[cfg(debug_assertions)]
    pub use dotenvy;
    pub use tracing_journald;
    pub use tracing_subscriber;
}
