// ---------------------------------------------------------------------------
// Snapshot records and schema versions (split into submodules)
// ---------------------------------------------------------------------------

mod entity_types;
mod envelope_types;
mod level_record;
mod version;

// Re-export everything so callers see one flat namespace.
pub use entity_types::*;
pub use envelope_types::*;
pub use level_record::*;
pub use version::*;
