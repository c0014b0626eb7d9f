pub mod subscription_plans;
pub mod subscription_statuses;
pub mod transaction_statuses;
