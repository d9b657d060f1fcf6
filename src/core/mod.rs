// ============================================================================
// spark-mvvm - Core Module
// Values, the subscriber interface, and the tracking context
// ============================================================================

pub mod context;
pub mod types;
pub mod value;

// Re-export commonly used items
pub use context::{is_tracking, is_untracking, with_context, ReactiveContext, TrackingScope};
pub use types::{AnyWatcher, WatchCallback};
pub use value::Value;
