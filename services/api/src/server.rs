use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_operational_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use touchpoint::config::AppConfig;
use touchpoint::error::AppError;
use touchpoint::routing::{
    apply_seed, build_state, read_seed, routing_router, InMemoryDocumentClient, PostcodesIoClient,
    TracingScope,
};
use touchpoint::telemetry;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let postcodes = Arc::new(PostcodesIoClient::new(
        config.postcodes.base_url.clone(),
        config.postcodes.timeout,
    )?);
    let documents = Arc::new(InMemoryDocumentClient::new());
    let routing_state = build_state(documents, postcodes, config.postcodes.autocomplete_limit);

    if let Some(path) = config.seed_file.as_deref() {
        let data = read_seed(path)?;
        let scope = TracingScope::new("startup-seed");
        let summary = apply_seed(&routing_state, data, &scope).await?;
        info!(
            seed = %path.display(),
            routing_details = summary.routing_details,
            local_authorities = summary.local_authorities,
            "seed data loaded"
        );
    }

    let app = with_operational_routes(routing_router(routing_state))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        postcode_api = %config.postcodes.base_url,
        "touchpoint routing service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
