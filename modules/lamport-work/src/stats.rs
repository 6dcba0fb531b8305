use crate::error::{Result, WorkError};

pub fn average(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(WorkError::EmptyInput);
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn factorial(n: u32) -> Result<u64> {
    (1..=u64::from(n)).try_fold(1u64, |acc, k| {
        acc.checked_mul(k).ok_or(WorkError::FactorialOverflow(n))
    })
}
