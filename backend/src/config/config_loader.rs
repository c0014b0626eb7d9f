use anyhow::{Context, Result};

use super::{
    config_model::{Auth, BackendServer, Database, DotEnvyConfig, Midtrans},
    stage::Stage,
};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let backend_server = BackendServer {
        port: required("SERVER_PORT")?
            .parse()
            .context("SERVER_PORT is invalid")?,
        body_limit: required("SERVER_BODY_LIMIT")?
            .parse()
            .context("SERVER_BODY_LIMIT is invalid")?,
        timeout: required("SERVER_TIMEOUT")?
            .parse()
            .context("SERVER_TIMEOUT is invalid")?,
    };

    let database = Database {
        url: required("DATABASE_URL")?,
    };

    let auth = Auth {
        jwt_secret: required("JWT_SECRET")?,
    };

    let midtrans = Midtrans {
        server_key: required("MIDTRANS_SERVER_KEY")?,
        is_production: std::env::var("MIDTRANS_IS_PRODUCTION")
            .ok()
            .map(|raw| parse_bool(&raw))
            .unwrap_or(false),
        subscription_finish_url: required("MIDTRANS_SUBSCRIPTION_FINISH_URL")?,
    };

    Ok(DotEnvyConfig {
        backend_server,
        database,
        auth,
        midtrans,
    })
}

pub fn get_stage() -> Stage {
    dotenvy::dotenv().ok();

    let stage_str = std::env::var("STAGE").unwrap_or("".to_string());
    Stage::try_from(&stage_str).unwrap_or_default()
}

fn required(key: &str) -> Result<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .with_context(|| format!("{key} is invalid"))
}

fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "t" | "yes" | "y" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_values_enable_flags() {
        for raw in ["1", "true", "TRUE", " yes ", "on"] {
            assert!(parse_bool(raw), "{raw} should be true");
        }
        for raw in ["0", "false", "off", "", "maybe"] {
            assert!(!parse_bool(raw), "{raw} should be false");
        }
    }

    #[test]
    fn stage_parsing_is_case_insensitive() {
        assert_eq!(
            Stage::try_from(&"Production".to_string()).unwrap(),
            Stage::Production
        );
        assert!(Stage::try_from(&"staging".to_string()).is_err());
        assert_eq!(Stage::default(), Stage::Local);
    }
}
