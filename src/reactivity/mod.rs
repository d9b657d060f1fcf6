// ============================================================================
// spark-mvvm - Reactivity Module
// Dependency registries, read tracking, change detection and data paths
// ============================================================================

pub mod dep;
pub mod equality;
pub mod observer;
pub mod path;
pub mod tracking;

pub use dep::Dep;
pub use equality::{strict_equals, strict_not_equal};
pub use observer::{observe, observe_object};
pub use path::{get_val, set_val, Path};
pub use tracking::{track_read, tracked, untrack};
