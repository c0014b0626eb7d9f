use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::value_objects::enums::{
    subscription_plans::SubscriptionPlan, subscription_statuses::SubscriptionStatus,
};
use crate::infra::db::postgres::schema::subscriptions;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = subscriptions)]
pub struct SubscriptionEntity {
    pub id: Uuid,
    pub seq: i64,
    pub user_id: Uuid,
    pub plan: String,
    pub status: String,
    pub order_id: String,
    pub price: i64,
    pub payment_token: Option<String>,
    pub payment_redirect_url: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SubscriptionEntity {
    pub fn plan(&self) -> SubscriptionPlan {
        SubscriptionPlan::from_str(&self.plan)
    }

    pub fn status(&self) -> SubscriptionStatus {
        SubscriptionStatus::from_str(&self.status)
    }

    /// Both the order id and the gateway token exist, so the checkout can be handed out again.
    pub fn has_checkout_credentials(&self) -> bool {
        !self.order_id.is_empty()
            && self
                .payment_token
                .as_deref()
                .is_some_and(|token| !token.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = subscriptions)]
pub struct InsertSubscriptionEntity {
    pub user_id: Uuid,
    pub plan: String,
    pub status: String,
    pub order_id: String,
    pub price: i64,
}

impl InsertSubscriptionEntity {
    pub fn pending_premium(user_id: Uuid, order_id: String, price: i64) -> Self {
        Self {
            user_id,
            plan: SubscriptionPlan::Premium.to_string(),
            status: SubscriptionStatus::Pending.to_string(),
            order_id,
            price,
        }
    }
}

/// Columns written by a status transition. `None` fields are left untouched.
#[derive(Debug, Clone, PartialEq, AsChangeset)]
#[diesel(table_name = subscriptions)]
pub struct SubscriptionTransitionEntity {
    pub status: String,
    pub plan: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl SubscriptionTransitionEntity {
    pub fn activate(starts_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            status: SubscriptionStatus::Active.to_string(),
            plan: Some(SubscriptionPlan::Premium.to_string()),
            starts_at: Some(starts_at),
            expires_at: Some(expires_at),
            updated_at: starts_at,
        }
    }

    pub fn status_only(status: SubscriptionStatus, now: DateTime<Utc>) -> Self {
        Self {
            status: status.to_string(),
            plan: None,
            starts_at: None,
            expires_at: None,
            updated_at: now,
        }
    }
}
