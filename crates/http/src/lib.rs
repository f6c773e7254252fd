//! HTTP server facade for libris with Axum, error handling, and OpenAPI support.

use anyhow::Context;
use axum::{routing::get, Json, Router};
use serde_json::json;

use libris_kernel::{settings::Settings, ModuleRegistry};

pub mod error;
pub mod router;

use router::RouterBuilder;

/// Build the main HTTP router with all module routes mounted.
///
/// `extra` is merged before the global middleware is applied, so its routes
/// get tracing, CORS, request ids and the timeout like everything else.
pub fn build_router(registry: &ModuleRegistry, settings: &Settings, extra: Router) -> Router {
    let mut router_builder = RouterBuilder::new();

    let welcome = format!("Welcome to {} API", settings.app_name);
    router_builder = router_builder
        .route(
            "/",
            get(move || async move { Json(json!({ "message": welcome })) }),
        )
        .route("/healthz", get(liveness))
        .merge(extra);

    for module in registry.modules() {
        let module_name = module.name();
        tracing::info!(
            module = module_name,
            "mounting module routes under {}/{}",
            settings.server.api_prefix,
            module_name
        );
        router_builder =
            router_builder.mount_module(&settings.server.api_prefix, module_name, module.routes());
    }

    router_builder
        .with_openapi(registry, &settings.server.api_prefix, &settings.app_name)
        .with_timeout(settings.server.request_timeout_ms)
        .with_cors()
        .with_request_id()
        .with_tracing()
        .build()
}

/// Serve `app` until ctrl-c or SIGTERM, then drain in-flight requests
pub async fn serve(app: Router, settings: &Settings) -> anyhow::Result<()> {
    let address = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind to {address}"))?;

    tracing::info!("HTTP server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Liveness endpoint
async fn liveness() -> &'static str {
    "ok"
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "failed to listen for SIGTERM");
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

    tracing::info!("shutdown signal received");
}
