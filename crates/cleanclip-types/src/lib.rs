//! Cleanclip Types - Shared domain types
//!
//! This crate contains domain types used across cleanclip services:
//! - User identity and profile preferences
//! - Service types and the content template catalog
//! - Subscription status and billing plans
//! - Time sources used by the rotation and refund rules

pub mod billing;
pub mod clock;
pub mod content;
pub mod error;
pub mod profile;
pub mod service_type;
pub mod subscription;
pub mod user;

pub use billing::*;
pub use clock::*;
pub use content::*;
pub use error::*;
pub use profile::*;
pub use service_type::*;
pub use subscription::*;
pub use user::*;
