//! In-memory repositories for testing

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cleanclip_db::{
    CreateRefundLog, DbError, DbResult, RefundLogRepository, RefundLogRow, UserRepository, UserRow,
};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

/// In-memory user + refund log store
#[derive(Default)]
pub struct InMemoryBillingStore {
    users: DashMap<Uuid, UserRow>,
    subscriptions: DashMap<String, Uuid>,
    refunds: DashMap<i32, RefundLogRow>,
    next_refund_id: AtomicI32,
}

impl InMemoryBillingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Insert a user in the given state and return its id
    pub fn insert_user(&self, status: &str, customer_id: Option<&str>) -> Uuid {
        let id = Uuid::new_v4();
        self.users.insert(
            id,
            UserRow {
                id,
                email: format!("test-{id}@example.com"),
                subscription_status: status.to_string(),
                stripe_customer_id: customer_id.map(str::to_string),
                stripe_subscription_id: None,
                subscription_started_at: None,
                subscription_ends_at: None,
                refund_used: false,
                created_at: Utc::now(),
            },
        );
        id
    }

    /// Mutate a stored user in place
    pub fn update_user(&self, id: Uuid, f: impl FnOnce(&mut UserRow)) {
        if let Some(mut user) = self.users.get_mut(&id) {
            f(&mut user);
        }
    }

    pub fn user(&self, id: Uuid) -> UserRow {
        self.users
            .get(&id)
            .map(|r| r.value().clone())
            .expect("user exists")
    }

    /// Whether a webhook has ever mentioned the subscription id
    #[allow(dead_code)]
    pub fn knows_subscription(&self, subscription_id: &str) -> bool {
        self.subscriptions.contains_key(subscription_id)
    }

    #[allow(dead_code)]
    pub fn refund_count(&self) -> usize {
        self.refunds.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryBillingStore {
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
        Ok(self
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
            .clone())
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
        started_at: DateTime<Utc>,
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
        ends_at: Option<DateTime<Utc>>,
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
        ends_at: Option<DateTime<Utc>>,
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
impl RefundLogRepository for InMemoryBillingStore {
    async fn create(&self, entry: CreateRefundLog) -> DbResult<RefundLogRow> {
        let id = self.next_refund_id.fetch_add(1, Ordering::SeqCst) + 1;
        let row = RefundLogRow {
            id,
            user_id: Some(entry.user_id),
            stripe_refund_id: Some(entry.stripe_refund_id),
            amount_cents: Some(entry.amount_cents),
            reason: entry.reason,
            created_at: Utc::now(),
        };
        self.refunds.insert(id, row.clone());
        Ok(row)
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> DbResult<Vec<RefundLogRow>> {
        let mut rows: Vec<RefundLogRow> = self
            .refunds
            .iter()
            .filter(|r| r.user_id == Some(user_id))
            .map(|r| r.value().clone())
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}
