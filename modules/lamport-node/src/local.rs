//! The local computation a causal task performs in its COMPUTING step.

use rand::Rng;

use lamport_common::LocalTask;
use lamport_work::{average, factorial, math, quicksort, sample};

/// Run `task` and describe the result in one line.
pub fn perform<R: Rng>(task: &LocalTask, rng: &mut R) -> String {
    match task {
        LocalTask::MathSuite { a, b } => {
            let parts: Vec<String> = math::suite(*a, *b)
                .into_iter()
                .map(|(op, result)| match result {
                    Ok(value) => format!("{a}{}{b}={value:.2}", op.symbol()),
                    Err(err) => format!("{a}{}{b}={}", op.symbol(), err.status()),
                })
                .collect();
            format!("operations: {}", parts.join(", "))
        }
        LocalTask::Factorial { n } => match factorial(*n) {
            Ok(value) => format!("computed factorial({n}) = {value}"),
            Err(err) => format!("factorial({n}) failed: {}", err.status()),
        },
        LocalTask::MatrixProduct => {
            let a = sample::matrix(rng, 0.0, 10.0);
            let b = sample::matrix(rng, 0.0, 10.0);
            format!("multiplied 2x2 matrices (values 0-10), result={}", a.multiply(&b))
        }
        LocalTask::Quicksort { count, max } => {
            let numbers = sample::integers(rng, *count, 0, *max);
            let sorted = quicksort(&numbers);
            let head: Vec<i64> = sorted.iter().take(5).copied().collect();
            let tail: Vec<i64> = sorted[sorted.len().saturating_sub(5)..].to_vec();
            format!(
                "sorted {count} numbers (0-{max}) with quicksort, first 5: {head:?}, last 5: {tail:?}"
            )
        }
        LocalTask::Average { count, max } => {
            let numbers = sample::uniform(rng, *count, 0.0, *max);
            match average(&numbers) {
                Ok(value) => format!("computed average of {count} numbers = {value:.4}"),
                Err(err) => format!("average of {count} numbers failed: {}", err.status()),
            }
        }
    }
}
