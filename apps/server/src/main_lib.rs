use std::path::Path;
use std::sync::Arc;

use crate::{config::Config, sessions::SessionRegistry};
use studentbank_core::applications::ApplicationGateway;
use studentbank_core::wizard::WizardConfig;
use studentbank_storage_sqlite::{db, ApplicationRepository, FsDocumentStore};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub sessions: SessionRegistry,
}

pub fn init_tracing() {
    let log_format = std::env::var("SB_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());
    let repository = Arc::new(ApplicationRepository::new(pool.clone(), writer));

    let documents_dir = config.documents_dir.clone().unwrap_or_else(|| {
        Path::new(&db_path)
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("documents")
    });
    let document_store = Arc::new(FsDocumentStore::new(&documents_dir));
    tracing::info!(
        "Documents stored under {}",
        document_store.bucket_dir().display()
    );

    let gateway = Arc::new(ApplicationGateway::new(repository, document_store));
    let sessions = SessionRegistry::new(
        gateway,
        WizardConfig {
            requires_document_verification: config.require_documents,
        },
    );

    Ok(Arc::new(AppState { sessions }))
}
