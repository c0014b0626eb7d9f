use serde::Serialize;

use crate::domain::value_objects::enums::subscription_plans::SubscriptionPlan;

/// Monthly premium price in minor currency units.
pub const PREMIUM_MONTHLY_PRICE: i64 = 20_000;

/// Daily chat quota applied to the free plan.
pub const FREE_CHAT_LIMIT_PER_DAY: i32 = 30;

pub const PLAN_CURRENCY: &str = "IDR";
pub const PLAN_BILLING_INTERVAL: &str = "monthly";

const FREE_FEATURES: [&str; 5] = [
    "Dashboard",
    "Journal",
    "Health Plan",
    "Mood Tracker",
    "Real Time Chat (limited)",
];

const PREMIUM_FEATURES: [&str; 7] = [
    "Dashboard",
    "Journal",
    "Health Plan",
    "Mood Tracker",
    "Real Time Chat (unlimited)",
    "Emergency",
    "Medical Report",
];

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PlanDto {
    pub name: String,
    pub plan: SubscriptionPlan,
    pub price: i64,
    pub currency: String,
    pub billing_interval: String,
    pub features: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_limit_per_day: Option<i32>,
}

impl PlanDto {
    fn new(name: &str, plan: SubscriptionPlan, price: i64, features: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            plan,
            price,
            currency: PLAN_CURRENCY.to_string(),
            billing_interval: PLAN_BILLING_INTERVAL.to_string(),
            features: features.iter().map(|feature| feature.to_string()).collect(),
            chat_limit_per_day: chat_limit_for_plan(plan),
        }
    }
}

/// The fixed plan catalog: free first, then premium.
pub fn plan_catalog() -> Vec<PlanDto> {
    vec![
        PlanDto::new("Free", SubscriptionPlan::Free, 0, &FREE_FEATURES),
        PlanDto::new(
            "Premium",
            SubscriptionPlan::Premium,
            PREMIUM_MONTHLY_PRICE,
            &PREMIUM_FEATURES,
        ),
    ]
}

pub fn chat_limit_for_plan(plan: SubscriptionPlan) -> Option<i32> {
    match plan {
        SubscriptionPlan::Free => Some(FREE_CHAT_LIMIT_PER_DAY),
        SubscriptionPlan::Premium => None,
    }
}

/// Premium reports the snapshotted price, or the list price when the snapshot is unset.
pub fn price_for_plan(plan: SubscriptionPlan, stored_price: i64) -> i64 {
    match plan {
        SubscriptionPlan::Premium if stored_price > 0 => stored_price,
        SubscriptionPlan::Premium => PREMIUM_MONTHLY_PRICE,
        SubscriptionPlan::Free => 0,
    }
}
