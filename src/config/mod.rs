use serde::{Deserialize, Serialize};

pub const DEFAULT_CODE_LENGTH: usize = 4;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Short-URL host override. Empty means "use the request's Host header".
    pub domain: String,
    /// Base path under which codes are served, always `/`-wrapped.
    pub base_path: String,
    pub port: u16,
    pub db_path: String,
    pub code_length: usize,
    /// Empty disables the API key check.
    pub api_key: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let domain = std::env::var("DOMAIN").unwrap_or_default();

        let base_path = normalize_base_path(&std::env::var("BASE_PATH").unwrap_or_default());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let db_path =
            std::env::var("DB_PATH").unwrap_or_else(|_| "./data/shortlinks.db".to_string());

        let code_length = parse_code_length(std::env::var("CODE_LENGTH").ok().as_deref());

        let api_key = std::env::var("API_KEY").unwrap_or_default();

        Ok(Config {
            domain,
            base_path,
            port,
            db_path,
            code_length,
            api_key,
        })
    }
}

/// Ensures the base path starts and ends with `/`; empty means the root.
fn normalize_base_path(raw: &str) -> String {
    if raw.is_empty() {
        return "/".to_string();
    }

    let mut path = raw.to_string();
    if !path.starts_with('/') {
        path.insert(0, '/');
    }
    if !path.ends_with('/') {
        path.push('/');
    }
    path
}

/// Non-numeric or non-positive values fall back to the default.
fn parse_code_length(raw: Option<&str>) -> usize {
    raw.and_then(|v| v.parse::<i64>().ok())
        .filter(|len| *len > 0)
        .map(|len| len as usize)
        .unwrap_or(DEFAULT_CODE_LENGTH)
}
