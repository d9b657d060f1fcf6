// ============================================================================
// spark-mvvm - Reactive Collections
// The reactive object that backs every bound data tree
// ============================================================================
//
// A ReactiveObject gives each property its own reactive cell, so a write to
// one key only reaches the watchers that actually read that key.
// ============================================================================

mod object;

pub use object::ReactiveObject;
