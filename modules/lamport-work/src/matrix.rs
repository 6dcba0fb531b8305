use std::fmt;

use serde::{Deserialize, Serialize};

/// Row-major 2×2 matrix: `[a00, a01, a10, a11]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Matrix2x2(pub [f64; 4]);

impl Matrix2x2 {
    pub fn new(values: [f64; 4]) -> Self {
        Self(values)
    }

    pub fn values(&self) -> [f64; 4] {
        self.0
    }

    pub fn multiply(&self, other: &Matrix2x2) -> Matrix2x2 {
        let [a00, a01, a10, a11] = self.0;
        let [b00, b01, b10, b11] = other.0;
        Matrix2x2([
            a00 * b00 + a01 * b10,
            a00 * b01 + a01 * b11,
            a10 * b00 + a11 * b10,
            a10 * b01 + a11 * b11,
        ])
    }
}

impl fmt::Display for Matrix2x2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "[{a:.2}, {b:.2}, {c:.2}, {d:.2}]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplies_row_by_column() {
        let a = Matrix2x2::new([1.0, 2.0, 3.0, 4.0]);
        let b = Matrix2x2::new([5.0, 6.0, 7.0, 8.0]);
        assert_eq!(a.multiply(&b), Matrix2x2::new([19.0, 22.0, 43.0, 50.0]));
    }

    #[test]
    fn identity_is_neutral() {
        let identity = Matrix2x2::new([1.0, 0.0, 0.0, 1.0]);
        let m = Matrix2x2::new([2.5, -1.0, 0.5, 9.0]);
        assert_eq!(m.multiply(&identity), m);
        assert_eq!(identity.multiply(&m), m);
    }

    #[test]
    fn displays_with_two_decimals() {
        let m = Matrix2x2::new([1.0, 2.0, 3.0, 4.0]);
        assert_eq!(m.to_string(), "[1.00, 2.00, 3.00, 4.00]");
    }
}
