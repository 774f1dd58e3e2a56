use crate::cli::ServeArgs;
use crate::infra::{shutdown_signal, AppState};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use home_finder::config::AppConfig;
use home_finder::error::AppError;
use home_finder::listings::{fetch_router, PropertyFetcher, PropertyStore, RentcastSource};
use home_finder::telemetry::{self, LogOutput};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) const FETCHER_SERVICE_NAME: &str = "Property Data Fetcher";

pub(crate) async fn run(args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    args.apply(&mut config.fetcher);

    telemetry::init(&config.telemetry, LogOutput::Stdout)?;

    if config.upstream.api_key.is_none() {
        warn!("RENTCAST_API_KEY is not set; every fetch will fail until it is configured");
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        service: FETCHER_SERVICE_NAME,
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let source = RentcastSource::new(&config.upstream)?;
    let store = PropertyStore::new(config.storage.data_dir.clone());
    let fetcher = Arc::new(PropertyFetcher::new(source, store));

    let app = with_service_routes(fetch_router(fetcher))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.fetcher.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        data_dir = %config.storage.data_dir.display(),
        "property data fetcher ready"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
