//! Daily content rotation engine

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use metrics::counter;
use tracing::{debug, info, instrument, warn};

use cleanclip_db::{
    CreateDelivery, DbError, DeliveryRepository, ProfileRepository, TemplateRepository,
};
use cleanclip_types::{
    Clock, ContentTemplate, DailyContent, DeliveryStats, ServiceType, Timezone, UserId,
};

use crate::ContentError;

/// Calendar date of `now` in the given timezone
pub fn today_for(timezone: &Timezone, now: DateTime<Utc>) -> NaiveDate {
    timezone.local_date(now)
}

/// Content rotation service
///
/// Each call resolves the user's service type and timezone, then either
/// replays the delivery already recorded for today or records a new one.
/// The (user, date) uniqueness constraint in storage settles concurrent
/// first requests for the same day.
pub struct ContentService<P: ProfileRepository, T: TemplateRepository, D: DeliveryRepository> {
    profiles: Arc<P>,
    templates: Arc<T>,
    deliveries: Arc<D>,
    clock: Arc<dyn Clock>,
}

impl<P: ProfileRepository, T: TemplateRepository, D: DeliveryRepository> ContentService<P, T, D> {
    /// Create a new content service
    pub fn new(profiles: Arc<P>, templates: Arc<T>, deliveries: Arc<D>, clock: Arc<dyn Clock>) -> Self {
        Self {
            profiles,
            templates,
            deliveries,
            clock,
        }
    }

    /// Today's content for the user, assigning a template if none is recorded yet
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_daily_content(&self, user_id: &UserId) -> Result<DailyContent, ContentError> {
        let (service_type, timezone) = self.preferences(user_id).await?;
        let today = today_for(&timezone, self.clock.now());

        if let Some(delivery) = self.deliveries.find_by_user_and_date(user_id.0, today).await? {
            let template = self.load_template(delivery.template_id).await?;
            counter!("content_deliveries_total", "outcome" => "existing").increment(1);
            return Ok(DailyContent::from_template(&template, today));
        }

        let template = self.select_unseen(user_id, service_type).await?;

        let delivery = CreateDelivery {
            user_id: user_id.0,
            template_id: template.id().0,
            delivery_date: today,
        };

        match self.deliveries.create(delivery).await {
            Ok(_) => {
                debug!(template_id = %template.id(), %today, "Recorded delivery");
                counter!("content_deliveries_total", "outcome" => "new").increment(1);
                Ok(DailyContent::from_template(&template, today))
            }
            Err(DbError::Conflict(_)) => {
                debug!(%today, "Delivery already recorded by a concurrent request");
                let winner = self
                    .deliveries
                    .find_by_user_and_date(user_id.0, today)
                    .await?
                    .ok_or(DbError::NotFound)?;
                let template = self.load_template(winner.template_id).await?;
                counter!("content_deliveries_total", "outcome" => "race_resolved").increment(1);
                Ok(DailyContent::from_template(&template, today))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Catalog size versus the user's delivery history
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_delivery_stats(&self, user_id: &UserId) -> Result<DeliveryStats, ContentError> {
        let (service_type, _) = self.preferences(user_id).await?;

        let total = self.templates.count_active(service_type).await?;
        let delivered = self.deliveries.count_for_user(user_id.0).await?;

        Ok(DeliveryStats::new(service_type, total, delivered))
    }

    /// Pick an unseen template, resetting the user's rotation for this
    /// service type once every template has been delivered
    async fn select_unseen(
        &self,
        user_id: &UserId,
        service_type: ServiceType,
    ) -> Result<ContentTemplate, ContentError> {
        if let Some(row) = self.templates.find_unseen(user_id.0, service_type).await? {
            return Ok(ContentTemplate::try_from(row)?);
        }

        let deleted = self
            .deliveries
            .delete_for_service_type(user_id.0, service_type)
            .await?;
        counter!("content_pool_resets_total").increment(1);
        info!(%service_type, deleted, "Rotation pool exhausted, history reset");

        match self.templates.find_unseen(user_id.0, service_type).await? {
            Some(row) => Ok(ContentTemplate::try_from(row)?),
            None => {
                warn!(%service_type, "No active templates for service type");
                counter!("content_deliveries_total", "outcome" => "unavailable").increment(1);
                Err(ContentError::ContentUnavailable { service_type })
            }
        }
    }

    async fn load_template(&self, id: i32) -> Result<ContentTemplate, ContentError> {
        let row = self
            .templates
            .find_by_id(id)
            .await?
            .ok_or(DbError::NotFound)?;
        Ok(ContentTemplate::try_from(row)?)
    }

    /// Service type and timezone, falling back to defaults when the user has
    /// no profile or the stored timezone is not a known zone
    async fn preferences(&self, user_id: &UserId) -> Result<(ServiceType, Timezone), ContentError> {
        let Some(row) = self.profiles.find_by_user_id(user_id.0).await? else {
            return Ok((ServiceType::default(), Timezone::default()));
        };

        let (profile, rejected) = row.into_profile()?;
        if let Some(name) = rejected {
            warn!(timezone = %name, "Stored timezone is invalid, using default");
        }

        Ok((profile.service_type, profile.timezone))
    }
}
