//! Cleanclip Content Core - Daily content rotation
//!
//! Serves each subscriber one content template per calendar day in their own
//! timezone, never repeating a template until the service type's catalog is
//! exhausted, then recycling it.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cleanclip_content_core::ContentService;
//! use cleanclip_types::SystemClock;
//!
//! let content = ContentService::new(
//!     Arc::new(repos.profiles.clone()),
//!     Arc::new(repos.templates.clone()),
//!     Arc::new(repos.deliveries.clone()),
//!     Arc::new(SystemClock),
//! );
//!
//! let today = content.get_daily_content(&user_id).await?;
//! ```

pub mod error;
pub mod profile;
pub mod rotation;

pub use error::{ContentError, ProfileError};
pub use profile::{OnboardRequest, ProfileService};
pub use rotation::{today_for, ContentService};
