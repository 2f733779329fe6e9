pub mod error;
pub mod github;
pub mod handler;
pub mod models;
pub mod render;
pub mod trigger;
pub mod types;
