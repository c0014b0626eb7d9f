use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::error;

const SANDBOX_BASE_URL: &str = "https://app.sandbox.midtrans.com";
const PRODUCTION_BASE_URL: &str = "https://app.midtrans.com";

/// Minutes before an unpaid Snap transaction lapses at the gateway.
const SNAP_EXPIRY_MINUTES: u32 = 5;

/// Minimal Midtrans Snap client built on reqwest.
pub struct MidtransClient {
    http: reqwest::Client,
    server_key: String,
    base_url: String,
}

/// Credentials handed back by Snap for a created transaction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SnapTransaction {
    pub token: String,
    pub redirect_url: String,
}

#[derive(Debug, Serialize)]
struct SnapRequest<'a> {
    transaction_details: TransactionDetails<'a>,
    expiry: SnapExpiry,
    callbacks: SnapCallbacks<'a>,
}

#[derive(Debug, Serialize)]
struct TransactionDetails<'a> {
    order_id: &'a str,
    gross_amount: i64,
}

#[derive(Debug, Serialize)]
struct SnapExpiry {
    unit: &'static str,
    duration: u32,
}

#[derive(Debug, Serialize)]
struct SnapCallbacks<'a> {
    finish: &'a str,
}

#[derive(Debug, Deserialize)]
struct SnapErrorEnvelope {
    #[serde(default)]
    error_messages: Vec<String>,
}

impl MidtransClient {
    pub fn new(server_key: String, is_production: bool) -> Self {
        let base_url = if is_production {
            PRODUCTION_BASE_URL
        } else {
            SANDBOX_BASE_URL
        };
        Self::with_base_url(server_key, base_url.to_string())
    }

    pub fn with_base_url(server_key: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            server_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn ensure_success(
        resp: reqwest::Response,
        context: &str,
    ) -> Result<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let body = match resp.text().await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "<empty response body>".to_string(),
            Err(err) => format!("<failed to read response body: {err}>"),
        };

        let error_messages = serde_json::from_str::<SnapErrorEnvelope>(&body)
            .map(|envelope| envelope.error_messages)
            .unwrap_or_default();

        error!(
            status = %status,
            midtrans_error_messages = ?error_messages,
            response_body = %body,
            context = %context,
            "midtrans api request failed"
        );

        anyhow::bail!(
            "Midtrans API request failed: {} (status {}, errors={:?})",
            context,
            status,
            error_messages
        );
    }

    /// Creates a Snap transaction for the order and returns its token and payment page URL.
    pub async fn create_transaction(
        &self,
        order_id: &str,
        gross_amount: i64,
        finish_url: &str,
    ) -> Result<SnapTransaction> {
        // https://docs.midtrans.com/reference/backend-integration
        let body = SnapRequest {
            transaction_details: TransactionDetails {
                order_id,
                gross_amount,
            },
            expiry: SnapExpiry {
                unit: "minute",
                duration: SNAP_EXPIRY_MINUTES,
            },
            callbacks: SnapCallbacks { finish: finish_url },
        };

        let resp = self
            .http
            .post(format!("{}/snap/v1/transactions", self.base_url))
            .basic_auth(&self.server_key, Some(""))
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "create snap transaction").await?;

        let transaction: SnapTransaction = resp.json().await?;
        Ok(transaction)
    }
}
