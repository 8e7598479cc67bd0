// src/server.rs

//! HTTP trigger for the crawler.
//!
//! Every path accepts `POST` to run the pipeline once. Runs are not
//! serialized; overlapping requests race on the snapshot.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use tracing::{error, info, instrument};

use crate::error::Result;
use crate::pipeline::Pipeline;

/// Build the router serving the trigger endpoint.
pub fn router(pipeline: Arc<Pipeline>) -> Router {
    Router::new()
        .route("/", any(trigger))
        .fallback(trigger)
        .with_state(pipeline)
}

/// Bind to `0.0.0.0:{port}` and serve until the process exits.
pub async fn serve(pipeline: Arc<Pipeline>, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, router(pipeline)).await?;
    Ok(())
}

#[instrument(skip(pipeline))]
async fn trigger(State(pipeline): State<Arc<Pipeline>>, method: Method) -> Response {
    if method != Method::POST {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    match pipeline.execute().await {
        Ok(outcome) => {
            info!("Run finished: {:?}", outcome);
            (StatusCode::OK, "ok").into_response()
        }
        Err(e) => {
            error!("Run failed: {}", e);
            let reported = pipeline.report(e).await;
            (StatusCode::INTERNAL_SERVER_ERROR, reported.to_string()).into_response()
        }
    }
}
