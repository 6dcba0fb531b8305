//! Inbox service: the receiving half of the peer messaging protocol.

use std::sync::Arc;

use axum::{extract::State, Json};
use tracing::{debug, warn};

use lamport_common::{MessageRequest, MessageResponse};

use crate::context::ProcessContext;

pub async fn send_message(
    State(ctx): State<Arc<ProcessContext>>,
    Json(request): Json<MessageRequest>,
) -> Json<MessageResponse> {
    Json(handle_message(&ctx, &request))
}

/// Merge, record, release a waiting task if this is the awaited sender, ack.
pub fn handle_message(ctx: &ProcessContext, request: &MessageRequest) -> MessageResponse {
    if request.receiver_id != ctx.id {
        warn!(
            process = %ctx.id,
            addressed_to = %request.receiver_id,
            sender = %request.sender_id,
            "Accepting message addressed to another process"
        );
    }

    ctx.receive(
        request.timestamp,
        format!(
            "{} <- {} message='{}'",
            ctx.id, request.sender_id, request.message
        ),
    );

    if let Some(gate) = &ctx.gate {
        if gate.signal_from(&request.sender_id) {
            debug!(process = %ctx.id, sender = %request.sender_id, "Wait gate released");
        }
    }

    MessageResponse::ack(ctx.clock.current())
}
