use thiserror::Error;

pub type Result<T> = std::result::Result<T, WorkError>;

/// Precondition failures. These are reported to callers as a response
/// status, never as a transport fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("empty input")]
    EmptyInput,

    #[error("factorial({0}) overflows")]
    FactorialOverflow(u32),
}

impl WorkError {
    /// The `status` string carried in work responses.
    pub fn status(&self) -> String {
        format!("ERROR: {self}")
    }
}
