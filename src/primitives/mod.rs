// ============================================================================
// spark-mvvm - Primitives Module
// The watcher that links one binding to the reactive graph
// ============================================================================

pub mod watcher;

pub use watcher::Watcher;
