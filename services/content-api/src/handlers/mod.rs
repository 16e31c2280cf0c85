//! REST API handlers

pub mod content;
pub mod health;
pub mod profile;
pub mod shared;
pub mod subscription;
pub mod webhook;

pub use health::{health, ready};
