use std::sync::Arc;

use anyhow::Result as AnyResult;
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use crates::{
    domain::{
        entities::subscriptions::InsertSubscriptionEntity,
        repositories::subscriptions::SubscriptionRepository,
        value_objects::{
            enums::{
                subscription_plans::SubscriptionPlan, subscription_statuses::SubscriptionStatus,
            },
            plans::{PREMIUM_MONTHLY_PRICE, PlanDto, plan_catalog},
            subscriptions::{CheckoutResponse, SubscriptionStatusDto, generate_order_id},
        },
    },
    payments::midtrans_client::{MidtransClient, SnapTransaction},
};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_transaction(
        &self,
        order_id: &str,
        gross_amount: i64,
        finish_url: &str,
    ) -> AnyResult<SnapTransaction>;
}

#[async_trait]
impl PaymentGateway for MidtransClient {
    async fn create_transaction(
        &self,
        order_id: &str,
        gross_amount: i64,
        finish_url: &str,
    ) -> AnyResult<SnapTransaction> {
        self.create_transaction(order_id, gross_amount, finish_url)
            .await
    }
}

#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("subscription not found for order: {0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("unsupported transaction status: {0}")]
    UnsupportedStatus(String),
    #[error("subscription for order {order_id} is {current}, cannot move to {target}")]
    InvalidTransition {
        order_id: String,
        current: SubscriptionStatus,
        target: SubscriptionStatus,
    },
    #[error("payment gateway error: {0}")]
    Upstream(anyhow::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl SubscriptionError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            SubscriptionError::InvalidInput(_)
            | SubscriptionError::Conflict(_)
            | SubscriptionError::UnsupportedStatus(_) => StatusCode::BAD_REQUEST,
            SubscriptionError::NotFound(_) => StatusCode::NOT_FOUND,
            SubscriptionError::InvalidTransition { .. } => StatusCode::CONFLICT,
            SubscriptionError::Upstream(_) | SubscriptionError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, SubscriptionError>;

pub(crate) fn parse_user_id(raw: &str) -> UseCaseResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| {
        let err = SubscriptionError::InvalidInput("invalid user id".to_string());
        warn!(
            user_id = raw,
            status = err.status_code().as_u16(),
            "subscriptions: malformed user id"
        );
        err
    })
}

pub struct SubscriptionUseCase<S, G>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    subscription_repo: Arc<S>,
    payment_gateway: Arc<G>,
    finish_url: String,
}

impl<S, G> SubscriptionUseCase<S, G>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    pub fn new(subscription_repo: Arc<S>, payment_gateway: Arc<G>, finish_url: String) -> Self {
        Self {
            subscription_repo,
            payment_gateway,
            finish_url,
        }
    }

    pub fn list_plans(&self) -> Vec<PlanDto> {
        plan_catalog()
    }

    pub async fn get_status(&self, user_id: &str) -> UseCaseResult<SubscriptionStatusDto> {
        let user_id = parse_user_id(user_id)?;
        info!(%user_id, "subscriptions: loading subscription status");

        let now = Utc::now();
        let expired = self
            .subscription_repo
            .expire_lapsed_subscriptions(user_id, now)
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    db_error = ?err,
                    "subscriptions: failed to expire lapsed subscriptions"
                );
                SubscriptionError::Internal(err)
            })?;
        if expired > 0 {
            info!(%user_id, expired, "subscriptions: lapsed subscriptions expired");
        }

        let latest = self
            .subscription_repo
            .find_latest_subscription(user_id)
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    db_error = ?err,
                    "subscriptions: failed to load latest subscription"
                );
                SubscriptionError::Internal(err)
            })?;

        let view = match latest {
            Some(subscription) => SubscriptionStatusDto::from_entity(&subscription),
            None => {
                info!(%user_id, "subscriptions: no subscription, using free plan");
                SubscriptionStatusDto::free_default()
            }
        };

        Ok(view)
    }

    pub async fn create_premium_checkout(&self, user_id: &str) -> UseCaseResult<CheckoutResponse> {
        let user_id = parse_user_id(user_id)?;
        info!(%user_id, "subscriptions: premium checkout requested");

        let now = Utc::now();
        let active = self
            .subscription_repo
            .find_active_subscription(user_id, now)
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    db_error = ?err,
                    "subscriptions: failed to load active subscription before checkout"
                );
                SubscriptionError::Internal(err)
            })?;

        if let Some(active) = active.filter(|sub| sub.plan() == SubscriptionPlan::Premium) {
            let expires_at = active
                .expires_at
                .map(|value| value.to_rfc3339_opts(SecondsFormat::Secs, true))
                .unwrap_or_default();
            let err = SubscriptionError::Conflict(format!(
                "premium plan already active until {}",
                expires_at
            ));
            warn!(
                %user_id,
                subscription_id = %active.id,
                status = err.status_code().as_u16(),
                "subscriptions: premium already active"
            );
            return Err(err);
        }

        let pending = self
            .subscription_repo
            .find_latest_subscription_by_status(user_id, SubscriptionStatus::Pending)
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    db_error = ?err,
                    "subscriptions: failed to load pending subscription before checkout"
                );
                SubscriptionError::Internal(err)
            })?;

        if let Some(pending) = pending.filter(|sub| sub.has_checkout_credentials()) {
            info!(
                %user_id,
                subscription_id = %pending.id,
                order_id = %pending.order_id,
                "subscriptions: reusing pending checkout"
            );
            return Ok(CheckoutResponse::from_entity(&pending));
        }

        let order_id = generate_order_id(user_id, now);
        let subscription = self
            .subscription_repo
            .create_subscription(InsertSubscriptionEntity::pending_premium(
                user_id,
                order_id.clone(),
                PREMIUM_MONTHLY_PRICE,
            ))
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    %order_id,
                    db_error = ?err,
                    "subscriptions: failed to create pending subscription"
                );
                SubscriptionError::Internal(err)
            })?;

        info!(
            %user_id,
            subscription_id = %subscription.id,
            %order_id,
            price = PREMIUM_MONTHLY_PRICE,
            "subscriptions: creating payment transaction"
        );

        let transaction = self
            .payment_gateway
            .create_transaction(&order_id, PREMIUM_MONTHLY_PRICE, &self.finish_url)
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    %order_id,
                    error = ?err,
                    "subscriptions: payment transaction creation failed"
                );
                SubscriptionError::Upstream(err)
            })?;

        self.subscription_repo
            .attach_payment_credentials(
                subscription.id,
                &transaction.token,
                &transaction.redirect_url,
            )
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    %order_id,
                    db_error = ?err,
                    "subscriptions: failed to store payment credentials"
                );
                SubscriptionError::Internal(err)
            })?;

        info!(
            %user_id,
            subscription_id = %subscription.id,
            %order_id,
            "subscriptions: checkout created successfully"
        );

        Ok(CheckoutResponse {
            order_id,
            subscription_id: subscription.id,
            token: transaction.token,
            redirect_url: transaction.redirect_url,
        })
    }
}
