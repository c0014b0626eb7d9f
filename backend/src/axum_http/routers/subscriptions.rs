use crate::{
    auth::AuthUser,
    axum_http::error_responses::AppError,
    config::config_model::DotEnvyConfig,
    usecases::{
        payment_notifications::PaymentNotificationUseCase,
        subscriptions::{PaymentGateway, SubscriptionUseCase},
    },
};
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use crates::{
    domain::{
        repositories::subscriptions::SubscriptionRepository,
        value_objects::{
            plans::PlanDto,
            subscriptions::{PaymentNotificationModel, SubscriptionStatusDto},
        },
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::subscriptions::SubscriptionPostgres,
    },
    payments::midtrans_client::MidtransClient,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, Serialize)]
pub struct PlansResponse {
    pub plans: Vec<PlanDto>,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    pub subscription: SubscriptionStatusDto,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let subscription_repository = Arc::new(SubscriptionPostgres::new(Arc::clone(&db_pool)));
    let midtrans_client = MidtransClient::new(
        config.midtrans.server_key.clone(),
        config.midtrans.is_production,
    );

    let subscriptions_usecase = SubscriptionUseCase::new(
        Arc::clone(&subscription_repository),
        Arc::new(midtrans_client),
        config.midtrans.subscription_finish_url.clone(),
    );
    let notifications_usecase = PaymentNotificationUseCase::new(subscription_repository);

    router(
        Arc::new(subscriptions_usecase),
        Arc::new(notifications_usecase),
    )
}

/// Subscription routes over any repository/gateway pair.
pub fn router<S, G>(
    subscriptions_usecase: Arc<SubscriptionUseCase<S, G>>,
    notifications_usecase: Arc<PaymentNotificationUseCase<S>>,
) -> Router
where
    S: SubscriptionRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    let subscription_routes = Router::new()
        .route("/plans", get(list_plans::<S, G>))
        .route("/me", get(get_my_subscription::<S, G>))
        .route("/checkout", post(create_premium_checkout::<S, G>))
        .with_state(subscriptions_usecase);

    let notification_routes = Router::new()
        .route(
            "/payment-notification",
            post(handle_payment_notification::<S>),
        )
        .with_state(notifications_usecase);

    subscription_routes.merge(notification_routes)
}

pub async fn list_plans<S, G>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<S, G>>>,
) -> impl IntoResponse
where
    S: SubscriptionRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    let plans = subscriptions_usecase.list_plans();
    (StatusCode::OK, Json(PlansResponse { plans }))
}

pub async fn get_my_subscription<S, G>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<S, G>>>,
    auth: AuthUser,
) -> Response
where
    S: SubscriptionRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    match subscriptions_usecase.get_status(&auth.user_id).await {
        Ok(subscription) => {
            (StatusCode::OK, Json(SubscriptionResponse { subscription })).into_response()
        }
        Err(err) => {
            error!(
                user_id = %auth.user_id,
                status = err.status_code().as_u16(),
                error = %err,
                "subscriptions: failed to load subscription status"
            );
            err.into_response()
        }
    }
}

pub async fn create_premium_checkout<S, G>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<S, G>>>,
    auth: AuthUser,
) -> Response
where
    S: SubscriptionRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    match subscriptions_usecase
        .create_premium_checkout(&auth.user_id)
        .await
    {
        Ok(checkout) => (StatusCode::OK, Json(checkout)).into_response(),
        Err(err) => {
            warn!(
                user_id = %auth.user_id,
                status = err.status_code().as_u16(),
                error = %err,
                "subscriptions: checkout failed"
            );
            err.into_response()
        }
    }
}

pub async fn handle_payment_notification<S>(
    State(notifications_usecase): State<Arc<PaymentNotificationUseCase<S>>>,
    payload: Result<Json<PaymentNotificationModel>, JsonRejection>,
) -> Response
where
    S: SubscriptionRepository + Send + Sync + 'static,
{
    let Json(notification) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(
                rejection = %rejection,
                "payment_notifications: invalid notification payload"
            );
            return AppError::BadRequest("Invalid notification payload".to_string())
                .into_response();
        }
    };

    let Some(order_id) = non_empty(notification.order_id) else {
        return AppError::BadRequest("order_id missing".to_string()).into_response();
    };
    let Some(transaction_status) = non_empty(notification.transaction_status) else {
        return AppError::BadRequest("transaction_status missing".to_string()).into_response();
    };

    match notifications_usecase
        .handle_notification(&order_id, &transaction_status)
        .await
    {
        Ok(outcome) => {
            info!(%order_id, ?outcome, "payment_notifications: notification handled");
            (
                StatusCode::OK,
                Json(MessageResponse {
                    message: "Subscription payment status updated".to_string(),
                }),
            )
                .into_response()
        }
        Err(err) => err.into_response(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
