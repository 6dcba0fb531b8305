//! Work service handlers.
//!
//! Each handler follows the same clock contract: merge the caller's
//! timestamp and record the RECEIVE, run the work function, then tick once
//! and record the INTERNAL result. A precondition failure skips the tick and
//! answers with the post-merge clock and an error status.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::warn;

use lamport_common::{
    AverageRequest, AverageResponse, MathRequest, MathResponse, MatrixRequest, MatrixResponse,
    SearchRequest, SearchResponse, SortRequest, SortResponse, STATUS_OK,
};
use lamport_work::{average, quicksort, sample, search_all, MathOp, WorkError};

use crate::context::ProcessContext;

pub const DEFAULT_AVERAGE_SAMPLES: usize = 50;
pub const DEFAULT_SORT_SAMPLES: usize = 100;
pub const DEFAULT_SEARCH_SAMPLES: usize = 200;
pub const DEFAULT_SEARCH_TARGETS: [i64; 3] = [3, 22, 50];

fn rejected(ctx: &ProcessContext, operation: &str, err: &WorkError) -> String {
    warn!(process = %ctx.id, operation, error = %err, "Work precondition failed");
    err.status()
}

// ---------------------------------------------------------------------------
// Math
// ---------------------------------------------------------------------------

pub async fn math(
    State(ctx): State<Arc<ProcessContext>>,
    Path(op): Path<MathOp>,
    Json(request): Json<MathRequest>,
) -> Json<MathResponse> {
    Json(run_math(&ctx, op, &request))
}

pub fn run_math(ctx: &ProcessContext, op: MathOp, request: &MathRequest) -> MathResponse {
    let received = ctx.receive(
        request.timestamp,
        format!(
            "{} <- {} op={op}({}, {})",
            ctx.id, request.sender_id, request.num1, request.num2
        ),
    );

    match op.apply(request.num1, request.num2) {
        Ok(result) => {
            ctx.internal(format!("{} computed {op} result={result}", ctx.id));
            MathResponse {
                result,
                timestamp: ctx.clock.current(),
                status: STATUS_OK.to_string(),
            }
        }
        Err(err) => MathResponse {
            result: 0.0,
            timestamp: received,
            status: rejected(ctx, "math", &err),
        },
    }
}

// ---------------------------------------------------------------------------
// Average
// ---------------------------------------------------------------------------

pub async fn average_numbers(
    State(ctx): State<Arc<ProcessContext>>,
    Json(request): Json<AverageRequest>,
) -> Json<AverageResponse> {
    Json(run_average(&ctx, request))
}

pub fn run_average(ctx: &ProcessContext, request: AverageRequest) -> AverageResponse {
    let received = ctx.receive(
        request.timestamp,
        format!("{} <- {} op=AVERAGE", ctx.id, request.sender_id),
    );

    let numbers = request.numbers.unwrap_or_else(|| {
        sample::uniform(&mut rand::rng(), DEFAULT_AVERAGE_SAMPLES, 0.0, 10.0)
    });

    match average(&numbers) {
        Ok(value) => {
            ctx.internal(format!(
                "{} computed AVERAGE of {} numbers result={value:.4}",
                ctx.id,
                numbers.len()
            ));
            AverageResponse {
                numbers,
                average: value,
                timestamp: ctx.clock.current(),
                status: STATUS_OK.to_string(),
            }
        }
        Err(err) => AverageResponse {
            numbers,
            average: 0.0,
            timestamp: received,
            status: rejected(ctx, "average", &err),
        },
    }
}

// ---------------------------------------------------------------------------
// Matrix
// ---------------------------------------------------------------------------

pub async fn multiply_matrices(
    State(ctx): State<Arc<ProcessContext>>,
    Json(request): Json<MatrixRequest>,
) -> Json<MatrixResponse> {
    Json(run_matrix(&ctx, request))
}

pub fn run_matrix(ctx: &ProcessContext, request: MatrixRequest) -> MatrixResponse {
    ctx.receive(
        request.timestamp,
        format!("{} <- {} op=MULTIPLY_MATRICES(2x2)", ctx.id, request.sender_id),
    );

    let (matrix_a, matrix_b) = {
        let mut rng = rand::rng();
        (
            request
                .matrix_a
                .unwrap_or_else(|| sample::matrix(&mut rng, 0.0, 10.0)),
            request
                .matrix_b
                .unwrap_or_else(|| sample::matrix(&mut rng, 0.0, 10.0)),
        )
    };
    let result = matrix_a.multiply(&matrix_b);

    ctx.internal(format!("{} computed A * B result={result}", ctx.id));
    MatrixResponse {
        matrix_a,
        matrix_b,
        result,
        timestamp: ctx.clock.current(),
        status: STATUS_OK.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Sort
// ---------------------------------------------------------------------------

pub async fn sort_numbers(
    State(ctx): State<Arc<ProcessContext>>,
    Json(request): Json<SortRequest>,
) -> Json<SortResponse> {
    Json(run_sort(&ctx, request))
}

pub fn run_sort(ctx: &ProcessContext, request: SortRequest) -> SortResponse {
    ctx.receive(
        request.timestamp,
        format!("{} <- {} op=QUICKSORT", ctx.id, request.sender_id),
    );

    let original_numbers = request
        .numbers
        .unwrap_or_else(|| sample::integers(&mut rand::rng(), DEFAULT_SORT_SAMPLES, 0, 100));
    let sorted_numbers = quicksort(&original_numbers);

    ctx.internal(format!(
        "{} sorted {} numbers with QUICKSORT",
        ctx.id,
        sorted_numbers.len()
    ));
    SortResponse {
        original_numbers,
        sorted_numbers,
        timestamp: ctx.clock.current(),
        status: STATUS_OK.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

pub async fn linear_search(
    State(ctx): State<Arc<ProcessContext>>,
    Json(request): Json<SearchRequest>,
) -> Json<SearchResponse> {
    Json(run_search(&ctx, request))
}

pub fn run_search(ctx: &ProcessContext, request: SearchRequest) -> SearchResponse {
    let targets = request
        .targets
        .unwrap_or_else(|| DEFAULT_SEARCH_TARGETS.to_vec());
    ctx.receive(
        request.timestamp,
        format!(
            "{} <- {} op=LINEAR_SEARCH({targets:?})",
            ctx.id, request.sender_id
        ),
    );

    let numbers = request
        .numbers
        .unwrap_or_else(|| sample::integers(&mut rand::rng(), DEFAULT_SEARCH_SAMPLES, 0, 100));
    let results = search_all(&numbers, &targets);

    let found = results.iter().filter(|hit| hit.found).count();
    ctx.internal(format!(
        "{} searched {} numbers, found {found} of {} targets",
        ctx.id,
        numbers.len(),
        targets.len()
    ));
    SearchResponse {
        numbers,
        results,
        timestamp: ctx.clock.current(),
        status: STATUS_OK.to_string(),
    }
}
