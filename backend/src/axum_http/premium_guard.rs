use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use crates::domain::repositories::subscriptions::SubscriptionRepository;
use tracing::{debug, warn};

use crate::{
    auth::AuthUser,
    axum_http::error_responses::AppError,
    usecases::subscriptions::{PaymentGateway, SubscriptionError, SubscriptionUseCase},
};

/// Lets the request through only for callers whose effective plan is an active premium.
///
/// Mount with `axum::middleware::from_fn_with_state(usecase, premium_only::<S, G>)`.
pub async fn premium_only<S, G>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<S, G>>>,
    auth: AuthUser,
    request: Request,
    next: Next,
) -> Response
where
    S: SubscriptionRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    match subscriptions_usecase.get_status(&auth.user_id).await {
        Ok(view) if view.is_premium_active() => {
            debug!(user_id = %auth.user_id, "premium_guard: access granted");
            next.run(request).await
        }
        Ok(view) => {
            debug!(
                user_id = %auth.user_id,
                plan = %view.plan,
                status = %view.status,
                "premium_guard: access denied"
            );
            AppError::Forbidden.into_response()
        }
        Err(err @ SubscriptionError::Internal(_)) => err.into_response(),
        Err(err) => {
            warn!(user_id = %auth.user_id, error = %err, "premium_guard: access denied");
            AppError::Forbidden.into_response()
        }
    }
}
