//! Request/response bodies exchanged between processes.
//!
//! Every request carries the caller's logical clock in `timestamp`; every
//! response carries the callee's clock after handling the request.

use lamport_work::{Matrix2x2, SearchHit};
use serde::{Deserialize, Serialize};

use crate::topology::ProcessId;

pub const STATUS_OK: &str = "OK";
pub const STATUS_ACK: &str = "ACK";

// ---------------------------------------------------------------------------
// Inbox
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRequest {
    pub sender_id: ProcessId,
    pub receiver_id: ProcessId,
    pub message: String,
    pub timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub status: String,
    pub timestamp: u64,
}

impl MessageResponse {
    pub fn ack(timestamp: u64) -> Self {
        Self {
            status: STATUS_ACK.to_string(),
            timestamp,
        }
    }

    pub fn is_ack(&self) -> bool {
        self.status == STATUS_ACK
    }
}

// ---------------------------------------------------------------------------
// Work services
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MathRequest {
    pub sender_id: ProcessId,
    pub num1: f64,
    pub num2: f64,
    pub timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MathResponse {
    pub result: f64,
    pub timestamp: u64,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AverageRequest {
    pub sender_id: ProcessId,
    pub timestamp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numbers: Option<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AverageResponse {
    pub numbers: Vec<f64>,
    pub average: f64,
    pub timestamp: u64,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixRequest {
    pub sender_id: ProcessId,
    pub timestamp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix_a: Option<Matrix2x2>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix_b: Option<Matrix2x2>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixResponse {
    pub matrix_a: Matrix2x2,
    pub matrix_b: Matrix2x2,
    pub result: Matrix2x2,
    pub timestamp: u64,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortRequest {
    pub sender_id: ProcessId,
    pub timestamp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numbers: Option<Vec<i64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortResponse {
    pub original_numbers: Vec<i64>,
    pub sorted_numbers: Vec<i64>,
    pub timestamp: u64,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub sender_id: ProcessId,
    pub timestamp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numbers: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<Vec<i64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub numbers: Vec<i64>,
    pub results: Vec<SearchHit>,
    pub timestamp: u64,
    pub status: String,
}

// ---------------------------------------------------------------------------
// Introspection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockResponse {
    pub process: ProcessId,
    pub clock: u64,
}
