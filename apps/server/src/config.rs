use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::Context;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    /// Root of the document bucket; `None` puts it next to the database.
    pub documents_dir: Option<PathBuf>,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// Default for new sessions that do not say otherwise.
    pub require_documents: bool,
    /// Sessions idle this long are discarded.
    pub session_ttl: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("SB_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid SB_LISTEN_ADDR")?;
        let db_path = std::env::var("SB_DB_PATH").unwrap_or_else(|_| "./db/app.db".into());
        let documents_dir = std::env::var("SB_DOCUMENTS_DIR").ok().map(PathBuf::from);
        let cors_allow = std::env::var("SB_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("SB_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        let require_documents = std::env::var("SB_REQUIRE_DOCUMENTS")
            .map(|v| parse_flag(&v))
            .unwrap_or(true);
        let session_ttl_secs: u64 = std::env::var("SB_SESSION_TTL_SECS")
            .unwrap_or_else(|_| "1800".into())
            .parse()
            .unwrap_or(1800);
        Ok(Self {
            listen_addr,
            db_path,
            documents_dir,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            require_documents,
            session_ttl: Duration::from_secs(session_ttl_secs),
        })
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}
