//! In-memory repositories for testing

use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use cleanclip_db::{
    CreateDelivery, DbError, DbResult, DeliveryRepository, DeliveryRow, ProfileRepository,
    ProfileRow, TemplateRepository, TemplateRow, UpsertProfile, UserRepository, UserRow,
};
use cleanclip_types::ServiceType;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

/// In-memory store backing every repository trait the content crate uses
#[derive(Default)]
pub struct InMemoryStore {
    users: DashMap<Uuid, UserRow>,
    subscriptions: DashMap<String, Uuid>,
    profiles: DashMap<Uuid, ProfileRow>,
    templates: DashMap<i32, TemplateRow>,
    deliveries: DashMap<(Uuid, NaiveDate), DeliveryRow>,
    next_template_id: AtomicI32,
    next_delivery_id: AtomicI32,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Add an active template and return its id
    pub fn add_template(&self, service_type: ServiceType, caption: &str) -> i32 {
        let id = self.next_template_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.templates.insert(
            id,
            TemplateRow {
                id,
                service_type: service_type.as_str().to_string(),
                script: format!("Script for {caption}"),
                caption: caption.to_string(),
                cta: None,
                category: Some("tips".to_string()),
                is_active: true,
                created_at: Utc::now(),
            },
        );
        id
    }

    /// Add `count` templates for a service type
    pub fn seed(&self, service_type: ServiceType, count: usize) -> Vec<i32> {
        (0..count)
            .map(|i| self.add_template(service_type, &format!("{service_type} caption {i}")))
            .collect()
    }

    #[allow(dead_code)]
    pub fn deactivate(&self, id: i32) {
        if let Some(mut row) = self.templates.get_mut(&id) {
            row.is_active = false;
        }
    }

    /// Store a raw profile row
    pub fn set_profile(&self, user_id: Uuid, service_type: ServiceType, timezone: &str) {
        self.profiles.insert(
            user_id,
            ProfileRow {
                user_id,
                service_type: service_type.as_str().to_string(),
                timezone: timezone.to_string(),
                onboarding_completed: true,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        );
    }

    /// Delivery rows of a user, oldest date first
    pub fn deliveries_for(&self, user_id: Uuid) -> Vec<DeliveryRow> {
        let mut rows: Vec<DeliveryRow> = self
            .deliveries
            .iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.value().clone())
            .collect();
        rows.sort_by_key(|r| r.delivery_date);
        rows
    }

    #[allow(dead_code)]
    pub fn has_user(&self, id: Uuid) -> bool {
        self.users.contains_key(&id)
    }

    fn template_service_type(&self, id: i32) -> Option<String> {
        self.templates.get(&id).map(|t| t.service_type.clone())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<UserRow>> {
        Ok(self.users.get(&id).map(|r| r.value().clone()))
    }

    async fn find_by_stripe_customer_id(&self, customer_id: &str) -> DbResult<Option<UserRow>> {
        Ok(self
            .users
            .iter()
            .find(|r| r.stripe_customer_id.as_deref() == Some(customer_id))
            .map(|r| r.value().clone()))
    }

    async fn ensure(&self, id: Uuid, email: &str) -> DbResult<UserRow> {
        let row = self
            .users
            .entry(id)
            .or_insert_with(|| UserRow {
                id,
                email: email.to_string(),
                subscription_status: "trialing".to_string(),
                stripe_customer_id: None,
                stripe_subscription_id: None,
                subscription_started_at: None,
                subscription_ends_at: None,
                refund_used: false,
                created_at: Utc::now(),
            })
            .value()
            .clone();
        Ok(row)
    }

    async fn update_stripe_customer_id(&self, id: Uuid, customer_id: &str) -> DbResult<()> {
        let mut user = self.users.get_mut(&id).ok_or(DbError::NotFound)?;
        user.stripe_customer_id = Some(customer_id.to_string());
        Ok(())
    }

    async fn start_subscription(
        &self,
        id: Uuid,
        subscription_id: &str,
        status: &str,
        started_at: chrono::DateTime<Utc>,
    ) -> DbResult<()> {
        if let Some(mut user) = self.users.get_mut(&id) {
            user.subscription_status = status.to_string();
            user.stripe_subscription_id = Some(subscription_id.to_string());
            user.subscription_started_at = Some(started_at);
            user.subscription_ends_at = None;
        }
        Ok(())
    }

    async fn sync_subscription(
        &self,
        id: Uuid,
        subscription_id: &str,
        status: &str,
        ends_at: Option<chrono::DateTime<Utc>>,
    ) -> DbResult<()> {
        if let Some(mut user) = self.users.get_mut(&id) {
            user.subscription_status = status.to_string();
            user.stripe_subscription_id = Some(subscription_id.to_string());
            if ends_at.is_some() {
                user.subscription_ends_at = ends_at;
            }
        }
        Ok(())
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: &str,
        ends_at: Option<chrono::DateTime<Utc>>,
    ) -> DbResult<()> {
        if let Some(mut user) = self.users.get_mut(&id) {
            user.subscription_status = status.to_string();
            if ends_at.is_some() {
                user.subscription_ends_at = ends_at;
            }
        }
        Ok(())
    }

    async fn remember_subscription(&self, id: Uuid, subscription_id: &str) -> DbResult<bool> {
        match self.subscriptions.entry(subscription_id.to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(id);
                Ok(true)
            }
        }
    }

    async fn mark_refund_used(&self, id: Uuid) -> DbResult<()> {
        if let Some(mut user) = self.users.get_mut(&id) {
            user.refund_used = true;
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for InMemoryStore {
    async fn find_by_user_id(&self, user_id: Uuid) -> DbResult<Option<ProfileRow>> {
        Ok(self.profiles.get(&user_id).map(|r| r.value().clone()))
    }

    async fn upsert(&self, profile: UpsertProfile) -> DbResult<ProfileRow> {
        if !self.users.contains_key(&profile.user_id) {
            return Err(DbError::InvalidRow("profile without user".to_string()));
        }
        let created_at = self
            .profiles
            .get(&profile.user_id)
            .map(|r| r.created_at)
            .unwrap_or_else(Utc::now);
        let row = ProfileRow {
            user_id: profile.user_id,
            service_type: profile.service_type,
            timezone: profile.timezone,
            onboarding_completed: profile.onboarding_completed,
            created_at,
            updated_at: Utc::now(),
        };
        self.profiles.insert(row.user_id, row.clone());
        Ok(row)
    }

    async fn update_service_type(&self, user_id: Uuid, service_type: &str) -> DbResult<()> {
        let mut row = self.profiles.get_mut(&user_id).ok_or(DbError::NotFound)?;
        row.service_type = service_type.to_string();
        Ok(())
    }

    async fn update_timezone(&self, user_id: Uuid, timezone: &str) -> DbResult<()> {
        let mut row = self.profiles.get_mut(&user_id).ok_or(DbError::NotFound)?;
        row.timezone = timezone.to_string();
        Ok(())
    }
}

#[async_trait]
impl TemplateRepository for InMemoryStore {
    async fn find_by_id(&self, id: i32) -> DbResult<Option<TemplateRow>> {
        Ok(self.templates.get(&id).map(|r| r.value().clone()))
    }

    /// Lowest eligible id, so tests are deterministic
    async fn find_unseen(
        &self,
        user_id: Uuid,
        service_type: ServiceType,
    ) -> DbResult<Option<TemplateRow>> {
        let seen: Vec<i32> = self
            .deliveries
            .iter()
            .filter(|d| d.user_id == user_id)
            .map(|d| d.template_id)
            .collect();

        Ok(self
            .templates
            .iter()
            .filter(|t| t.service_type == service_type.as_str() && t.is_active)
            .filter(|t| !seen.contains(&t.id))
            .min_by_key(|t| t.id)
            .map(|t| t.value().clone()))
    }

    async fn count_active(&self, service_type: ServiceType) -> DbResult<u64> {
        Ok(self
            .templates
            .iter()
            .filter(|t| t.service_type == service_type.as_str() && t.is_active)
            .count() as u64)
    }
}

#[async_trait]
impl DeliveryRepository for InMemoryStore {
    async fn find_by_user_and_date(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> DbResult<Option<DeliveryRow>> {
        Ok(self.deliveries.get(&(user_id, date)).map(|r| r.value().clone()))
    }

    async fn create(&self, delivery: CreateDelivery) -> DbResult<DeliveryRow> {
        match self.deliveries.entry((delivery.user_id, delivery.delivery_date)) {
            Entry::Occupied(_) => Err(DbError::Conflict(
                "daily_deliveries_user_date_key".to_string(),
            )),
            Entry::Vacant(slot) => {
                let row = DeliveryRow {
                    id: self.next_delivery_id.fetch_add(1, Ordering::SeqCst) + 1,
                    user_id: delivery.user_id,
                    template_id: delivery.template_id,
                    delivery_date: delivery.delivery_date,
                    delivered_at: Utc::now(),
                };
                slot.insert(row.clone());
                Ok(row)
            }
        }
    }

    async fn delete_for_service_type(
        &self,
        user_id: Uuid,
        service_type: ServiceType,
    ) -> DbResult<u64> {
        let doomed: Vec<(Uuid, NaiveDate)> = self
            .deliveries
            .iter()
            .filter(|d| d.user_id == user_id)
            .filter(|d| {
                self.template_service_type(d.template_id).as_deref() == Some(service_type.as_str())
            })
            .map(|d| *d.key())
            .collect();

        for key in &doomed {
            self.deliveries.remove(key);
        }
        Ok(doomed.len() as u64)
    }

    async fn count_for_user(&self, user_id: Uuid) -> DbResult<u64> {
        Ok(self.deliveries.iter().filter(|d| d.user_id == user_id).count() as u64)
    }
}

/// Delivery repository whose first `stale_reads` lookups miss, simulating
/// two requests that both read before either writes
pub struct StaleReadDeliveries {
    inner: Arc<InMemoryStore>,
    stale_reads: AtomicUsize,
}

impl StaleReadDeliveries {
    #[allow(dead_code)]
    pub fn new(inner: Arc<InMemoryStore>, stale_reads: usize) -> Arc<Self> {
        Arc::new(Self {
            inner,
            stale_reads: AtomicUsize::new(stale_reads),
        })
    }
}

#[async_trait]
impl DeliveryRepository for StaleReadDeliveries {
    async fn find_by_user_and_date(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> DbResult<Option<DeliveryRow>> {
        let stale = self
            .stale_reads
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if stale {
            return Ok(None);
        }
        self.inner.find_by_user_and_date(user_id, date).await
    }

    async fn create(&self, delivery: CreateDelivery) -> DbResult<DeliveryRow> {
        self.inner.create(delivery).await
    }

    async fn delete_for_service_type(
        &self,
        user_id: Uuid,
        service_type: ServiceType,
    ) -> DbResult<u64> {
        self.inner.delete_for_service_type(user_id, service_type).await
    }

    async fn count_for_user(&self, user_id: Uuid) -> DbResult<u64> {
        self.inner.count_for_user(user_id).await
    }
}
