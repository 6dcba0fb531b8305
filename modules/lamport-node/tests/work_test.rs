//! Work service clock contract and results, through the HTTP router.

mod harness;

use axum::http::StatusCode;
use serde_json::json;

use lamport_common::{
    AverageResponse, EventKind, MathResponse, MatrixResponse, ProcessId, SearchResponse,
    SortRequest, SortResponse,
};
use lamport_node::{build_router, work};
use lamport_work::SearchHit;

use harness::{context, post_json};

// ---------------------------------------------------------------------------
// Math
// ---------------------------------------------------------------------------

#[tokio::test]
async fn successful_math_call_merges_then_ticks() {
    let ctx = context("P1");
    let app = build_router(ctx.clone());

    let (status, body) = post_json(
        &app,
        "/math/add",
        json!({ "sender_id": "CLIENT", "num1": 15.0, "num2": 7.0, "timestamp": 4 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let resp: MathResponse = serde_json::from_value(body).unwrap();
    assert_eq!(resp.status, "OK");
    assert_eq!(resp.result, 22.0);
    // merge(4) -> 5, tick -> 6
    assert_eq!(resp.timestamp, 6);

    let kinds: Vec<EventKind> = ctx.events().iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![EventKind::Receive, EventKind::Internal]);
}

#[tokio::test]
async fn division_by_zero_reports_error_with_post_merge_clock() {
    let ctx = context("P1");
    let app = build_router(ctx.clone());

    let (status, body) = post_json(
        &app,
        "/math/divide",
        json!({ "sender_id": "CLIENT", "num1": 1.0, "num2": 0.0, "timestamp": 4 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let resp: MathResponse = serde_json::from_value(body).unwrap();
    assert_eq!(resp.status, "ERROR: division by zero");
    assert_eq!(resp.timestamp, 5);
    assert_eq!(ctx.clock.current(), 5);
    assert!(ctx.log.of_kind(EventKind::Internal).is_empty());

    // The same shape with a valid divisor costs exactly one more tick.
    let (_, body) = post_json(
        &app,
        "/math/divide",
        json!({ "sender_id": "CLIENT", "num1": 1.0, "num2": 4.0, "timestamp": 4 }),
    )
    .await;
    let ok: MathResponse = serde_json::from_value(body).unwrap();
    assert_eq!(ok.status, "OK");
    assert_eq!(ok.result, 0.25);
    assert_eq!(ok.timestamp, 7);
}

#[tokio::test]
async fn unknown_math_op_is_rejected_before_the_clock() {
    let ctx = context("P1");
    let app = build_router(ctx.clone());

    let (status, _) = post_json(
        &app,
        "/math/modulo",
        json!({ "sender_id": "CLIENT", "num1": 1.0, "num2": 2.0, "timestamp": 9 }),
    )
    .await;

    assert!(status.is_client_error());
    assert_eq!(ctx.clock.current(), 0);
}

#[tokio::test]
async fn process_only_serves_its_own_service() {
    let app = build_router(context("P1"));
    let (status, _) = post_json(&app, "/average", json!({ "sender_id": "CLIENT", "timestamp": 0 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let app = build_router(context("P2"));
    let (status, _) = post_json(
        &app,
        "/math/add",
        json!({ "sender_id": "CLIENT", "num1": 1.0, "num2": 2.0, "timestamp": 0 }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Average
// ---------------------------------------------------------------------------

#[tokio::test]
async fn average_of_provided_numbers() {
    let ctx = context("P2");
    let app = build_router(ctx.clone());

    let (_, body) = post_json(
        &app,
        "/average",
        json!({ "sender_id": "CLIENT", "timestamp": 2, "numbers": [1.0, 2.0, 3.0, 6.0] }),
    )
    .await;
    let resp: AverageResponse = serde_json::from_value(body).unwrap();
    assert_eq!(resp.status, "OK");
    assert_eq!(resp.average, 3.0);
    assert_eq!(resp.timestamp, 4);
}

#[tokio::test]
async fn average_defaults_to_fifty_samples_in_range() {
    let app = build_router(context("P2"));

    let (_, body) = post_json(&app, "/average", json!({ "sender_id": "CLIENT", "timestamp": 0 })).await;
    let resp: AverageResponse = serde_json::from_value(body).unwrap();
    assert_eq!(resp.numbers.len(), 50);
    assert!(resp.numbers.iter().all(|n| (0.0..10.0).contains(n)));
    assert!((0.0..10.0).contains(&resp.average));
}

#[tokio::test]
async fn empty_average_is_a_precondition_failure() {
    let ctx = context("P2");
    let app = build_router(ctx.clone());

    let (_, body) = post_json(
        &app,
        "/average",
        json!({ "sender_id": "CLIENT", "timestamp": 10, "numbers": [] }),
    )
    .await;
    let resp: AverageResponse = serde_json::from_value(body).unwrap();
    assert_eq!(resp.status, "ERROR: empty input");
    assert_eq!(resp.timestamp, 11);
    assert_eq!(ctx.clock.current(), 11);
}

// ---------------------------------------------------------------------------
// Matrix, sort, search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn multiplies_provided_matrices() {
    let app = build_router(context("P3"));

    let (_, body) = post_json(
        &app,
        "/matrix/multiply",
        json!({
            "sender_id": "CLIENT",
            "timestamp": 0,
            "matrix_a": [1.0, 2.0, 3.0, 4.0],
            "matrix_b": [5.0, 6.0, 7.0, 8.0]
        }),
    )
    .await;
    let resp: MatrixResponse = serde_json::from_value(body).unwrap();
    assert_eq!(resp.result.values(), [19.0, 22.0, 43.0, 50.0]);
    assert_eq!(resp.timestamp, 2);
}

#[tokio::test]
async fn quicksort_returns_original_and_sorted() {
    let app = build_router(context("P4"));

    let (_, body) = post_json(
        &app,
        "/sort/quicksort",
        json!({ "sender_id": "CLIENT", "timestamp": 3, "numbers": [5, 3, 9, 3, 0] }),
    )
    .await;
    let resp: SortResponse = serde_json::from_value(body).unwrap();
    assert_eq!(resp.original_numbers, vec![5, 3, 9, 3, 0]);
    assert_eq!(resp.sorted_numbers, vec![0, 3, 3, 5, 9]);
    assert_eq!(resp.timestamp, 5);

    let (_, body) = post_json(&app, "/sort/quicksort", json!({ "sender_id": "CLIENT", "timestamp": 0 })).await;
    let resp: SortResponse = serde_json::from_value(body).unwrap();
    assert_eq!(resp.sorted_numbers.len(), 100);
    assert!(resp.sorted_numbers.windows(2).all(|w| w[0] <= w[1]));
    assert!(resp.sorted_numbers.iter().all(|n| (0..=100).contains(n)));
}

#[test]
fn adversarial_sort_input_does_not_exhaust_the_stack() {
    // Each insertion puts the new maximum where a middle pivot will pick it.
    let mut numbers: Vec<i64> = Vec::new();
    for value in 0..20_000 {
        let mid = (numbers.len() + 1) / 2;
        numbers.insert(mid, value);
    }

    let ctx = context("P4");
    let handler_ctx = ctx.clone();
    let resp = std::thread::Builder::new()
        .stack_size(256 * 1024)
        .spawn(move || {
            work::run_sort(
                &handler_ctx,
                SortRequest {
                    sender_id: ProcessId::from("CLIENT"),
                    timestamp: 1,
                    numbers: Some(numbers),
                },
            )
        })
        .unwrap()
        .join()
        .unwrap();

    assert_eq!(resp.status, "OK");
    assert_eq!(resp.sorted_numbers, (0..20_000).collect::<Vec<i64>>());
    assert_eq!(resp.timestamp, 3);
    assert_eq!(ctx.clock.current(), 3);
}

#[tokio::test]
async fn linear_search_reports_first_positions() {
    let app = build_router(context("P5"));

    let (_, body) = post_json(
        &app,
        "/search/linear",
        json!({
            "sender_id": "CLIENT",
            "timestamp": 0,
            "numbers": [7, 3, 50, 3],
            "targets": [3, 22, 50]
        }),
    )
    .await;
    let resp: SearchResponse = serde_json::from_value(body).unwrap();
    assert_eq!(
        resp.results,
        vec![
            SearchHit { value: 3, position: 1, found: true },
            SearchHit { value: 22, position: -1, found: false },
            SearchHit { value: 50, position: 2, found: true },
        ]
    );
}

#[tokio::test]
async fn linear_search_defaults() {
    let app = build_router(context("P5"));

    let (_, body) = post_json(&app, "/search/linear", json!({ "sender_id": "CLIENT", "timestamp": 0 })).await;
    let resp: SearchResponse = serde_json::from_value(body).unwrap();
    assert_eq!(resp.numbers.len(), 200);
    let targets: Vec<i64> = resp.results.iter().map(|hit| hit.value).collect();
    assert_eq!(targets, vec![3, 22, 50]);
    for hit in &resp.results {
        if hit.found {
            assert_eq!(resp.numbers[hit.position as usize], hit.value);
        }
    }
}
