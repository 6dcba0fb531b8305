use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WorkError};

/// The four arithmetic operations served by the math process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MathOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl MathOp {
    pub const ALL: [MathOp; 4] = [
        MathOp::Add,
        MathOp::Subtract,
        MathOp::Multiply,
        MathOp::Divide,
    ];

    pub fn apply(self, a: f64, b: f64) -> Result<f64> {
        match self {
            MathOp::Add => Ok(a + b),
            MathOp::Subtract => Ok(a - b),
            MathOp::Multiply => Ok(a * b),
            MathOp::Divide => {
                if b == 0.0 {
                    return Err(WorkError::DivisionByZero);
                }
                Ok(a / b)
            }
        }
    }

    pub fn symbol(self) -> char {
        match self {
            MathOp::Add => '+',
            MathOp::Subtract => '-',
            MathOp::Multiply => '*',
            MathOp::Divide => '/',
        }
    }
}

impl fmt::Display for MathOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MathOp::Add => "ADD",
            MathOp::Subtract => "SUBTRACT",
            MathOp::Multiply => "MULTIPLY",
            MathOp::Divide => "DIVIDE",
        };
        f.write_str(name)
    }
}

/// Runs all four operations on the same operands, e.g. for a local summary.
/// Division by zero is reported per entry rather than failing the whole suite.
pub fn suite(a: f64, b: f64) -> Vec<(MathOp, Result<f64>)> {
    MathOp::ALL.iter().map(|op| (*op, op.apply(a, b))).collect()
}
