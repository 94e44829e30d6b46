use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use hoopoe_infrastructure::UpstreamMetrics;
use std::net::SocketAddr;
use tracing::info;

pub async fn start_telemetry_server(
    bind_addr: SocketAddr,
    metrics: UpstreamMetrics,
) -> anyhow::Result<()> {
    info!(
        bind_address = %bind_addr,
        metrics_url = format!("http://{}/metrics", bind_addr),
        "Starting telemetry server"
    );

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, create_app(metrics)).await?;

    Ok(())
}

fn create_app(metrics: UpstreamMetrics) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
}

async fn index_handler() -> &'static str {
    concat!("hoopoe ", env!("CARGO_PKG_VERSION"), "\n")
}

async fn metrics_handler(State(metrics): State<UpstreamMetrics>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics.render_prometheus(),
    )
}
