use std::sync::Arc;

use axum::{Router, extract::State, http::header, response::IntoResponse, routing::get};
use engine::metrics::IndexerMetrics;
use eyre::Result;

fn router(metrics: Arc<IndexerMetrics>) -> Router {
    Router::new()
        .route("/metrics", get(render_metrics))
        .route("/health", get(|| async { "ok" }))
        .with_state(metrics)
}

async fn render_metrics(State(metrics): State<Arc<IndexerMetrics>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        metrics.encode(),
    )
}

/// Serves `GET /metrics` until the task is aborted.
pub async fn serve(port: u16, metrics: Arc<IndexerMetrics>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("Starting metrics server on port {port}");
    axum::serve(listener, router(metrics)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_metrics_response_exposes_registry() {
        let metrics = Arc::new(IndexerMetrics::new());
        metrics.observe_head(1000, 500);

        let response = render_metrics(State(metrics)).await.into_response();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4; charset=utf-8"
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("indexer_chain_head 1000"));
        assert!(text.contains("indexer_lag_blocks 500"));
        assert!(text.contains("indexer_events_indexed_total 0"));
    }
}
