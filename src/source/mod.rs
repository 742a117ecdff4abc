// file: src/source/mod.rs
// description: source hosting service module exports
// reference: internal module structure

pub mod github;

pub use github::{GitHubClient, next_link};
