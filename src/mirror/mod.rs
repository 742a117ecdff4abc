// file: src/mirror/mod.rs
// description: mirror hosting service module exports
// reference: internal module structure

pub mod gitea;

pub use gitea::GiteaClient;
