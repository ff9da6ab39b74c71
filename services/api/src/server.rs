use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryCollaborationRepository, InMemoryProfileRepository, LocalFileStore,
};
use crate::routes::with_talent_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use talent_directory::config::AppConfig;
use talent_directory::error::AppError;
use talent_directory::talents::{AdminGate, TalentDirectoryService};
use talent_directory::telemetry;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(root) = args.media_root.take() {
        config.media.root = root;
    }

    telemetry::init(&config.telemetry)?;

    tokio::fs::create_dir_all(&config.media.root).await?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        media_root: Arc::new(config.media.root.clone()),
    };

    let files = Arc::new(LocalFileStore::new(
        config.media.root.clone(),
        config.media.url_prefix.clone(),
    ));
    let talent_service = Arc::new(TalentDirectoryService::new(
        Arc::new(InMemoryProfileRepository::default()),
        Arc::new(InMemoryCollaborationRepository::default()),
        files,
        config.media.proof_max_bytes,
    ));

    if config.admin.token.is_none() {
        warn!("APP_ADMIN_TOKEN is not set; moderation routes are disabled");
    }
    let admin = AdminGate::new(config.admin.token.clone());

    let app = with_talent_routes(talent_service, admin, &config.media.url_prefix)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        media_root = %config.media.root.display(),
        "talent directory ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
