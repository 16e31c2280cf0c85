//! Content catalog and delivery types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{ServiceType, TemplateError};

/// Maximum caption length in characters
pub const CAPTION_MAX_CHARS: usize = 180;

/// Call-to-action used when a template does not carry its own
pub const DEFAULT_CTA: &str = "DM 'CLEAN' for pricing & availability.";

/// Content template identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(pub i32);

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A pre-generated content template from the rotation pool.
///
/// Construct with [`ContentTemplate::new`]; the constructor enforces the
/// caption limit and non-empty text fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentTemplate {
    id: TemplateId,
    service_type: ServiceType,
    script: String,
    caption: String,
    cta: String,
    category: Option<String>,
    is_active: bool,
}

impl ContentTemplate {
    /// Validate and build a template
    pub fn new(
        id: TemplateId,
        service_type: ServiceType,
        script: impl Into<String>,
        caption: impl Into<String>,
        cta: Option<String>,
        category: Option<String>,
        is_active: bool,
    ) -> Result<Self, TemplateError> {
        let script = script.into();
        let caption = caption.into();

        if script.trim().is_empty() {
            return Err(TemplateError::EmptyField("script"));
        }
        if caption.trim().is_empty() {
            return Err(TemplateError::EmptyField("caption"));
        }

        let len = caption.chars().count();
        if len > CAPTION_MAX_CHARS {
            return Err(TemplateError::CaptionTooLong {
                len,
                max: CAPTION_MAX_CHARS,
            });
        }

        let cta = match cta {
            Some(c) if !c.trim().is_empty() => c,
            _ => DEFAULT_CTA.to_string(),
        };

        Ok(Self {
            id,
            service_type,
            script,
            caption,
            cta,
            category,
            is_active,
        })
    }

    pub fn id(&self) -> TemplateId {
        self.id
    }

    pub fn service_type(&self) -> ServiceType {
        self.service_type
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn cta(&self) -> &str {
        &self.cta
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }
}

/// The content served to a user for one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyContent {
    /// Video script
    pub script: String,
    /// Post caption
    pub caption: String,
    /// Call to action
    pub cta: String,
    /// Calendar date in the user's timezone (YYYY-MM-DD)
    pub delivery_date: String,
    /// Manual re-rolls are never allowed
    pub can_regenerate: bool,
}

impl DailyContent {
    /// Build the response for a template delivered on `date`
    pub fn from_template(template: &ContentTemplate, date: NaiveDate) -> Self {
        Self {
            script: template.script().to_string(),
            caption: template.caption().to_string(),
            cta: template.cta().to_string(),
            delivery_date: date.format("%Y-%m-%d").to_string(),
            can_regenerate: false,
        }
    }
}

/// Content consumption stats for a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryStats {
    /// Current service type
    pub service_type: ServiceType,
    /// Active templates for the service type
    pub total_templates: u64,
    /// Deliveries recorded for the user
    pub delivered: u64,
    /// Deliveries left before the pool recycles
    pub remaining: u64,
}

impl DeliveryStats {
    pub fn new(service_type: ServiceType, total_templates: u64, delivered: u64) -> Self {
        Self {
            service_type,
            total_templates,
            delivered,
            remaining: total_templates.saturating_sub(delivered),
        }
    }
}
