// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

mod report;
mod sync;

pub use report::SyncReport;
pub use sync::MirrorSync;
