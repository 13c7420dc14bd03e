//! Matrix operations exposed as endpoints.
//!
//! Each operation owns one route and renders its result as plain text.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::Matrix;
use crate::error::OperationError;

/// Warning header value sent when a product comes out as exactly zero.
pub const OVERFLOW_WARNING: &str = "Possible integer overflow detected";

/// All available matrix operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Return the matrix unchanged
    Echo,

    /// Swap rows and columns
    Invert,

    /// All elements on one line, row-major
    Flatten,

    /// Sum of all elements
    Sum,

    /// Product of all elements
    Multiply,
}

/// Rendered result of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutput {
    pub body: String,

    /// Set when the product is zero. Zero is also a legitimate product,
    /// so this is a hint and never an error.
    pub overflow_suspected: bool,
}

impl OperationOutput {
    fn text(body: String) -> Self {
        Self {
            body,
            overflow_suspected: false,
        }
    }
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::Echo,
        Operation::Invert,
        Operation::Flatten,
        Operation::Sum,
        Operation::Multiply,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::Echo => "echo",
            Operation::Invert => "invert",
            Operation::Flatten => "flatten",
            Operation::Sum => "sum",
            Operation::Multiply => "multiply",
        }
    }

    /// HTTP route serving this operation.
    pub fn route(self) -> &'static str {
        match self {
            Operation::Echo => "/echo",
            Operation::Invert => "/invert",
            Operation::Flatten => "/flatten",
            Operation::Sum => "/sum",
            Operation::Multiply => "/multiply",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Operation::Echo => "Return the matrix as CSV",
            Operation::Invert => "Return the transposed matrix as CSV",
            Operation::Flatten => "Return all elements on one comma-separated line",
            Operation::Sum => "Return the sum of all elements",
            Operation::Multiply => "Return the product of all elements",
        }
    }

    pub fn apply(self, matrix: &Matrix) -> OperationOutput {
        match self {
            Operation::Echo => OperationOutput::text(matrix.echo()),
            Operation::Invert => OperationOutput::text(matrix.invert()),
            Operation::Flatten => OperationOutput::text(matrix.flatten()),
            Operation::Sum => OperationOutput::text(matrix.sum().to_string()),
            Operation::Multiply => {
                let product = matrix.product();
                OperationOutput {
                    body: product.to_string(),
                    overflow_suspected: product == 0,
                }
            }
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = OperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| OperationError::Unknown(s.to_string()))
    }
}

/// Get a table of all available operations
pub fn operations_description() -> String {
    let mut out = String::from(
        "Available matrix operations:\n\n| Operation | Route | Description |\n|-----------|-------|-------------|\n",
    );
    for op in Operation::ALL {
        out.push_str(&format!(
            "| {} | POST {} | {} |\n",
            op.name(),
            op.route(),
            op.description()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Matrix {
        Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap()
    }

    #[test]
    fn test_apply_each_operation() {
        let matrix = sample();
        assert_eq!(Operation::Echo.apply(&matrix).body, "1,2\n3,4");
        assert_eq!(Operation::Invert.apply(&matrix).body, "1,3\n2,4");
        assert_eq!(Operation::Flatten.apply(&matrix).body, "1,2,3,4");
        assert_eq!(Operation::Sum.apply(&matrix).body, "10");

        let product = Operation::Multiply.apply(&matrix);
        assert_eq!(product.body, "24");
        assert!(!product.overflow_suspected);
    }

    #[test]
    fn test_zero_product_is_flagged_not_failed() {
        let matrix = Matrix::from_rows(vec![vec![0, 2], vec![3, 4]]).unwrap();
        let out = Operation::Multiply.apply(&matrix);
        assert_eq!(out.body, "0");
        assert!(out.overflow_suspected);

        // Only multiply raises the flag
        assert!(!Operation::Sum.apply(&matrix).overflow_suspected);
    }

    #[test]
    fn test_parse_names() {
        for op in Operation::ALL {
            assert_eq!(op.name().parse::<Operation>(), Ok(op));
            assert_eq!(op.route(), format!("/{}", op));
        }
        assert_eq!(
            "transpose".parse::<Operation>(),
            Err(OperationError::Unknown("transpose".into()))
        );
        assert!("ECHO".parse::<Operation>().is_err());
    }

    #[test]
    fn test_description_lists_routes() {
        let desc = operations_description();
        for op in Operation::ALL {
            assert!(desc.contains(op.route()));
        }
    }
}
