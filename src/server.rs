use std::sync::Arc;

use anyhow::Context;
use axum::{http::HeaderValue, Router};
use tokio::signal;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use crate::{
    config::{init_tracing, load_config, AppConfig, ServiceKind},
    db::{establish_connection_from_app_config, run_migrations, DbPool},
    handlers::{products_router, transactions_router, ProductsState, TransactionsState},
    health::health_routes,
    middleware_helpers::request_id_middleware,
    openapi,
    services::{
        product_store::{HttpProductStore, ProductStore},
        products::ProductService,
        transaction_history::TransactionHistoryClient,
        transactions::TransactionService,
    },
};

/// CORS restricted to the single configured origin
pub fn cors_layer(origin: &str) -> CorsLayer {
    match HeaderValue::from_str(origin.trim_end_matches('/')) {
        Ok(origin) => CorsLayer::new()
            .allow_origin(AllowOrigin::list([origin]))
            .allow_methods(Any)
            .allow_headers(Any),
        Err(e) => {
            warn!("Ignoring unusable CORS origin {:?}: {}", origin, e);
            CorsLayer::new()
        }
    }
}

fn with_common_layers(router: Router, cfg: &AppConfig) -> Router {
    router
        .layer(crate::tracing::configure_http_tracing())
        .layer(cors_layer(&cfg.cors_allowed_origin))
        // Outermost so the trace span and error bodies see the id
        .layer(axum::middleware::from_fn(request_id_middleware))
}

/// Full Product Store application: API, health, Swagger UI
pub fn products_app(db_pool: Arc<DbPool>, cfg: &AppConfig) -> Router {
    let endpoints = cfg.endpoints();
    let service = ProductService::new(
        db_pool.clone(),
        TransactionHistoryClient::new(endpoints.transactions_url),
    );
    let state = ProductsState {
        service: Arc::new(service),
        default_page_size: cfg.api_default_page_size,
    };

    let router = products_router()
        .with_state(state)
        .merge(health_routes(db_pool, ServiceKind::Products))
        .merge(openapi::products_swagger_ui());

    with_common_layers(router, cfg)
}

/// Full Transaction Service application, talking to the configured Product Store
pub fn transactions_app(db_pool: Arc<DbPool>, cfg: &AppConfig) -> Router {
    let store = HttpProductStore::new(cfg.endpoints().products_url);
    transactions_app_with_store(db_pool, cfg, Arc::new(store))
}

/// Transaction Service application with an explicit Product Store
pub fn transactions_app_with_store(
    db_pool: Arc<DbPool>,
    cfg: &AppConfig,
    store: Arc<dyn ProductStore>,
) -> Router {
    let state = TransactionsState {
        service: Arc::new(TransactionService::new(db_pool.clone(), store)),
        default_page_size: cfg.api_default_page_size,
    };

    let router = transactions_router()
        .with_state(state)
        .merge(health_routes(db_pool, ServiceKind::Transactions))
        .merge(openapi::transactions_swagger_ui());

    with_common_layers(router, cfg)
}

/// Process entry point shared by both binaries: config, logging, database, serve.
pub async fn run(service: ServiceKind) -> anyhow::Result<()> {
    let cfg = load_config(service)
        .with_context(|| format!("failed to load {} configuration", service))?;
    init_tracing(cfg.log_level(), cfg.log_json);
    info!(
        environment = %cfg.environment,
        peers = ?cfg.endpoints(),
        "starting {} service",
        service
    );

    let db_pool = establish_connection_from_app_config(&cfg)
        .await
        .context("failed to connect to database")?;
    if cfg.auto_migrate {
        run_migrations(&db_pool, service)
            .await
            .context("failed running migrations")?;
    }
    let db_pool = Arc::new(db_pool);

    let app = match service {
        ServiceKind::Products => products_app(db_pool, &cfg),
        ServiceKind::Transactions => transactions_app(db_pool, &cfg),
    };

    serve(app, &cfg)
        .await
        .with_context(|| format!("{} server failed on {}", service, cfg.bind_address()))
}

/// Binds the configured address and serves until Ctrl-C or SIGTERM
pub async fn serve(app: Router, cfg: &AppConfig) -> std::io::Result<()> {
    let addr = cfg.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
