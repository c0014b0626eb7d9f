use std::sync::Arc;

use chrono::{Months, Utc};
use crates::domain::{
    entities::subscriptions::SubscriptionTransitionEntity,
    repositories::subscriptions::SubscriptionRepository,
    value_objects::enums::{
        subscription_statuses::SubscriptionStatus, transaction_statuses::TransactionStatus,
    },
};
use tracing::{error, info, warn};

use crate::usecases::subscriptions::{SubscriptionError, UseCaseResult};

const PREMIUM_PERIOD: Months = Months::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// The row moved to `status`.
    Applied { status: SubscriptionStatus },
    /// The row was already in `status`; replayed notifications land here.
    Unchanged { status: SubscriptionStatus },
}

pub struct PaymentNotificationUseCase<S>
where
    S: SubscriptionRepository + Send + Sync + 'static,
{
    subscription_repo: Arc<S>,
}

impl<S> PaymentNotificationUseCase<S>
where
    S: SubscriptionRepository + Send + Sync + 'static,
{
    pub fn new(subscription_repo: Arc<S>) -> Self {
        Self { subscription_repo }
    }

    pub async fn handle_notification(
        &self,
        order_id: &str,
        transaction_status: &str,
    ) -> UseCaseResult<NotificationOutcome> {
        info!(
            order_id,
            transaction_status, "payment_notifications: notification received"
        );

        let subscription = self
            .subscription_repo
            .find_by_order_id(order_id)
            .await
            .map_err(|err| {
                error!(
                    order_id,
                    db_error = ?err,
                    "payment_notifications: failed to load subscription by order"
                );
                SubscriptionError::Internal(err)
            })?
            .ok_or_else(|| {
                let err = SubscriptionError::NotFound(order_id.to_string());
                warn!(
                    order_id,
                    status = err.status_code().as_u16(),
                    "payment_notifications: unknown order"
                );
                err
            })?;

        let target = TransactionStatus::parse(transaction_status)
            .ok_or_else(|| {
                let err = SubscriptionError::UnsupportedStatus(transaction_status.to_string());
                warn!(
                    order_id,
                    transaction_status,
                    status = err.status_code().as_u16(),
                    "payment_notifications: unsupported transaction status"
                );
                err
            })?
            .target_status();

        let current = subscription.status();
        if current == target {
            info!(
                order_id,
                subscription_id = %subscription.id,
                status = %current,
                "payment_notifications: subscription already in target status"
            );
            return Ok(NotificationOutcome::Unchanged { status: current });
        }

        // A pending report never moves a row backwards; gateways redeliver on non-2xx.
        if target == SubscriptionStatus::Pending {
            info!(
                order_id,
                subscription_id = %subscription.id,
                status = %current,
                "payment_notifications: stale pending notification acknowledged"
            );
            return Ok(NotificationOutcome::Unchanged { status: current });
        }

        if !current.can_transition_to(target) {
            let err = SubscriptionError::InvalidTransition {
                order_id: order_id.to_string(),
                current,
                target,
            };
            warn!(
                order_id,
                subscription_id = %subscription.id,
                current = %current,
                target = %target,
                status = err.status_code().as_u16(),
                "payment_notifications: transition not allowed"
            );
            return Err(err);
        }

        let now = Utc::now();
        let transition = match target {
            SubscriptionStatus::Active => {
                let expires_at = now.checked_add_months(PREMIUM_PERIOD).ok_or_else(|| {
                    SubscriptionError::Internal(anyhow::anyhow!(
                        "failed to compute subscription expiry"
                    ))
                })?;
                SubscriptionTransitionEntity::activate(now, expires_at)
            }
            other => SubscriptionTransitionEntity::status_only(other, now),
        };

        let updated = self
            .subscription_repo
            .apply_transition(subscription.id, current, transition.clone())
            .await
            .map_err(|err| {
                error!(
                    order_id,
                    subscription_id = %subscription.id,
                    db_error = ?err,
                    "payment_notifications: failed to persist transition"
                );
                SubscriptionError::Internal(err)
            })?;

        if updated == 0 {
            let err = SubscriptionError::InvalidTransition {
                order_id: order_id.to_string(),
                current,
                target,
            };
            warn!(
                order_id,
                subscription_id = %subscription.id,
                status = err.status_code().as_u16(),
                "payment_notifications: subscription changed concurrently"
            );
            return Err(err);
        }

        info!(
            order_id,
            subscription_id = %subscription.id,
            from = %current,
            to = %target,
            expires_at = ?transition.expires_at,
            "payment_notifications: subscription status updated"
        );

        Ok(NotificationOutcome::Applied { status: target })
    }
}
