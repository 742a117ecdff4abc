// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod http;
pub mod mirror;
pub mod models;
pub mod pipeline;
pub mod scheduler;
pub mod source;
pub mod utils;

pub use crate::config::{Config, MirrorConfig, ScheduleConfig, SourceConfig};
pub use error::{Result, SetupStage, SyncError};
pub use mirror::GiteaClient;
pub use models::{AccountIdentity, CloneAuth, MirrorRequest, Outcome, RepositoryDescriptor};
pub use pipeline::{MirrorSync, SyncReport};
pub use scheduler::{Scheduler, WeeklyTrigger};
pub use source::GitHubClient;
