use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::subscriptions::SubscriptionEntity,
    value_objects::{
        enums::{subscription_plans::SubscriptionPlan, subscription_statuses::SubscriptionStatus},
        plans::{FREE_CHAT_LIMIT_PER_DAY, chat_limit_for_plan, price_for_plan},
    },
};

/// A user's subscription as shown to clients. `plan` is the effective plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionStatusDto {
    pub plan: SubscriptionPlan,
    pub status: SubscriptionStatus,
    pub price: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_redirect_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_limit_per_day: Option<i32>,
}

impl SubscriptionStatusDto {
    /// View for a user that never subscribed.
    pub fn free_default() -> Self {
        Self {
            plan: SubscriptionPlan::Free,
            status: SubscriptionStatus::Active,
            price: 0,
            order_id: None,
            payment_token: None,
            payment_redirect_url: None,
            starts_at: None,
            expires_at: None,
            chat_limit_per_day: Some(FREE_CHAT_LIMIT_PER_DAY),
        }
    }

    pub fn from_entity(entity: &SubscriptionEntity) -> Self {
        let status = entity.status();
        let plan = effective_plan(entity.plan(), status);

        Self {
            plan,
            status,
            price: price_for_plan(plan, entity.price),
            order_id: Some(entity.order_id.clone()).filter(|value| !value.is_empty()),
            payment_token: entity.payment_token.clone().filter(|value| !value.is_empty()),
            payment_redirect_url: entity
                .payment_redirect_url
                .clone()
                .filter(|value| !value.is_empty()),
            starts_at: entity.starts_at,
            expires_at: entity.expires_at,
            chat_limit_per_day: chat_limit_for_plan(plan),
        }
    }

    pub fn is_premium_active(&self) -> bool {
        self.plan == SubscriptionPlan::Premium && self.status == SubscriptionStatus::Active
    }
}

/// A lapsed premium subscription behaves like the free plan.
pub fn effective_plan(plan: SubscriptionPlan, status: SubscriptionStatus) -> SubscriptionPlan {
    match (plan, status) {
        (SubscriptionPlan::Premium, SubscriptionStatus::Active) => SubscriptionPlan::Premium,
        _ => SubscriptionPlan::Free,
    }
}

/// Order ids look like `sub-<unix millis>-<user uuid hex>` and stay within the
/// gateway's 50 character limit.
pub fn generate_order_id(user_id: Uuid, now: DateTime<Utc>) -> String {
    format!("sub-{}-{}", now.timestamp_millis(), user_id.simple())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckoutResponse {
    pub order_id: String,
    pub subscription_id: Uuid,
    pub token: String,
    pub redirect_url: String,
}

impl CheckoutResponse {
    pub fn from_entity(entity: &SubscriptionEntity) -> Self {
        Self {
            order_id: entity.order_id.clone(),
            subscription_id: entity.id,
            token: entity.payment_token.clone().unwrap_or_default(),
            redirect_url: entity.payment_redirect_url.clone().unwrap_or_default(),
        }
    }
}

/// Gateway notification body. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentNotificationModel {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub transaction_status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn sample_entity(plan: SubscriptionPlan, status: SubscriptionStatus) -> SubscriptionEntity {
        let now = Utc::now();
        SubscriptionEntity {
            id: Uuid::new_v4(),
            seq: 1,
            user_id: Uuid::new_v4(),
            plan: plan.to_string(),
            status: status.to_string(),
            order_id: "sub-1-abc".to_string(),
            price: 20_000,
            payment_token: Some("tok".to_string()),
            payment_redirect_url: Some("https://pay/1".to_string()),
            starts_at: Some(now),
            expires_at: Some(now + Duration::days(30)),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn free_default_has_chat_quota() {
        let view = SubscriptionStatusDto::free_default();
        assert_eq!(view.plan, SubscriptionPlan::Free);
        assert_eq!(view.status, SubscriptionStatus::Active);
        assert_eq!(view.price, 0);
        assert_eq!(view.chat_limit_per_day, Some(30));

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "plan": "free",
                "status": "active",
                "price": 0,
                "chat_limit_per_day": 30
            })
        );
    }

    #[test]
    fn active_premium_keeps_price_and_drops_quota() {
        let entity = sample_entity(SubscriptionPlan::Premium, SubscriptionStatus::Active);
        let view = SubscriptionStatusDto::from_entity(&entity);

        assert_eq!(view.plan, SubscriptionPlan::Premium);
        assert_eq!(view.price, 20_000);
        assert_eq!(view.chat_limit_per_day, None);
        assert!(view.is_premium_active());
    }

    #[test]
    fn lapsed_premium_is_shown_as_free() {
        for status in [
            SubscriptionStatus::Pending,
            SubscriptionStatus::Expired,
            SubscriptionStatus::Canceled,
        ] {
            let entity = sample_entity(SubscriptionPlan::Premium, status);
            let view = SubscriptionStatusDto::from_entity(&entity);

            assert_eq!(view.plan, SubscriptionPlan::Free);
            assert_eq!(view.status, status);
            assert_eq!(view.price, 0);
            assert_eq!(view.chat_limit_per_day, Some(30));
            assert_eq!(view.order_id.as_deref(), Some("sub-1-abc"));
            assert_eq!(view.expires_at, entity.expires_at);
            assert!(!view.is_premium_active());
        }
    }

    #[test]
    fn order_id_embeds_time_and_user() {
        let user_id = Uuid::parse_str("123e4567-e89b-12d3-a456-426614174000").unwrap();
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();

        let order_id = generate_order_id(user_id, now);

        assert_eq!(
            order_id,
            "sub-1714521600000-123e4567e89b12d3a456426614174000"
        );
        assert!(order_id.len() <= 50);
    }

    #[test]
    fn notification_ignores_extra_fields() {
        let model: PaymentNotificationModel = serde_json::from_value(serde_json::json!({
            "order_id": "sub-1",
            "transaction_status": "settlement",
            "gross_amount": "20000.00",
            "fraud_status": "accept"
        }))
        .unwrap();

        assert_eq!(model.order_id.as_deref(), Some("sub-1"));
        assert_eq!(model.transaction_status.as_deref(), Some("settlement"));
    }
}
