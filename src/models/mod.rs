// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod mirror_request;
pub mod outcome;
pub mod repository;

pub use mirror_request::{AccountIdentity, CloneAuth, MIRROR_INTERVAL, MirrorRequest};
pub use outcome::{Outcome, OutcomeMessage};
pub use repository::{RepositoryDescriptor, mirror_name};
