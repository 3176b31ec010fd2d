pub mod context;
pub mod finding;
pub mod patch;

pub use patch::{FilePatch, PatchHunk, PatchRange, apply_file_patch, make_unified_diff};
