//! Production-friendly observability hooks for chat turns.
//!
//! ```rust
//! use pobserve::{MetricsChatHooks, TracingChatHooks};
//!
//! let _tracing = TracingChatHooks;
//! let _metrics = MetricsChatHooks;
//! ```

mod metrics_hooks;
mod tracing_hooks;

pub use metrics_hooks::MetricsChatHooks;
pub use tracing_hooks::TracingChatHooks;

pub mod prelude {
    pub use crate::{MetricsChatHooks, TracingChatHooks};
}

#[cfg(test)]
mod tests;
