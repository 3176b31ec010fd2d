//! File discovery and fix application around a lint run.

pub mod discovery;
pub mod patch_applier;

pub use discovery::{DiscoveredFiles, FileDiscovery};
pub use patch_applier::{PatchApplier, PatchStats};
