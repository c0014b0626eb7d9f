use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::subscriptions::{
    InsertSubscriptionEntity, SubscriptionEntity, SubscriptionTransitionEntity,
};
use crate::domain::value_objects::enums::subscription_statuses::SubscriptionStatus;

#[automock]
#[async_trait]
pub trait SubscriptionRepository {
    /// Moves every active row of the user whose `expires_at <= now` to expired in a
    /// single conditional update. Returns the number of rows changed.
    async fn expire_lapsed_subscriptions(&self, user_id: Uuid, now: DateTime<Utc>)
    -> Result<usize>;

    /// Most recently created row, ties broken by insertion sequence.
    async fn find_latest_subscription(&self, user_id: Uuid) -> Result<Option<SubscriptionEntity>>;

    /// Active row with `expires_at > now` that expires last.
    async fn find_active_subscription(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<SubscriptionEntity>>;

    async fn find_latest_subscription_by_status(
        &self,
        user_id: Uuid,
        status: SubscriptionStatus,
    ) -> Result<Option<SubscriptionEntity>>;

    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<SubscriptionEntity>>;

    async fn create_subscription(
        &self,
        insert_subscription_entity: InsertSubscriptionEntity,
    ) -> Result<SubscriptionEntity>;

    async fn attach_payment_credentials(
        &self,
        subscription_id: Uuid,
        payment_token: &str,
        payment_redirect_url: &str,
    ) -> Result<()>;

    /// Applies the transition only while the row still has `expected_status`.
    /// Returns the number of rows changed (0 or 1).
    async fn apply_transition(
        &self,
        subscription_id: Uuid,
        expected_status: SubscriptionStatus,
        transition: SubscriptionTransitionEntity,
    ) -> Result<usize>;
}
