use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::TraceLayer;

use lamport_common::{ClockResponse, Event, ServiceKind};

use crate::context::ProcessContext;
use crate::{inbox, work};

/// Routes for one process: the inbox, the work service named by its spec,
/// and read-only introspection.
pub fn build_router(ctx: Arc<ProcessContext>) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .route("/clock", get(clock))
        .route("/events", get(events))
        .route("/message", post(inbox::send_message));

    let router = match ctx.spec.service {
        ServiceKind::Math => router.route("/math/{op}", post(work::math)),
        ServiceKind::Average => router.route("/average", post(work::average_numbers)),
        ServiceKind::Matrix => router.route("/matrix/multiply", post(work::multiply_matrices)),
        ServiceKind::Sort => router.route("/sort/quicksort", post(work::sort_numbers)),
        ServiceKind::Search => router.route("/search/linear", post(work::linear_search)),
    };

    let process = ctx.id.clone();
    router.with_state(ctx).layer(
        TraceLayer::new_for_http().make_span_with(move |request: &axum::http::Request<_>| {
            tracing::debug_span!(
                "rpc",
                process = %process,
                method = %request.method(),
                path = %request.uri().path(),
            )
        }),
    )
}

async fn health() -> &'static str {
    "ok"
}

async fn clock(State(ctx): State<Arc<ProcessContext>>) -> Json<ClockResponse> {
    Json(ClockResponse {
        process: ctx.id.clone(),
        clock: ctx.clock.current(),
    })
}

async fn events(State(ctx): State<Arc<ProcessContext>>) -> Json<Vec<Event>> {
    Json(ctx.events())
}
