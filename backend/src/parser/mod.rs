//! CSV to square matrix parser.
//!
//! Rows may have any number of fields when read, so that ragged input
//! surfaces as a [`MatrixError`] naming the offending row instead of a
//! reader failure. Blank lines are skipped by the reader.
//!
//! The `csv` reader is lenient about quotes: a stray `"` inside an unquoted
//! field is kept as data. Any quote left in a field after reading is
//! rejected as a syntax error, like any other malformed CSV.

use std::path::Path;

use crate::error::{MatrixError, MatrixResult};
use crate::matrix::Matrix;

/// Parse CSV bytes into a validated square matrix.
///
/// Checks run in this order and the first failure wins:
/// 1. at least one row
/// 2. row count equals the first row's field count
/// 3. per row: same field count as the first row, then every field
///    parses as a base-10 `i64` after trimming
///
/// # Example
/// ```ignore
/// use matrixops::parse_matrix;
///
/// let matrix = parse_matrix(b"1,2\n3,4").unwrap();
/// assert_eq!(matrix.echo(), "1,2\n3,4");
/// ```
pub fn parse_matrix(bytes: &[u8]) -> MatrixResult<Matrix> {
    let records = read_records(bytes)?;

    let cols = records.first().map(csv::StringRecord::len).ok_or(MatrixError::Empty)?;
    if records.len() != cols {
        return Err(MatrixError::NotSquare {
            rows: records.len(),
            cols,
        });
    }

    let mut rows = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        if record.len() != cols {
            return Err(MatrixError::InconsistentRow { row: i });
        }
        let row = record
            .iter()
            .enumerate()
            .map(|(j, raw)| parse_cell(i, j, raw))
            .collect::<MatrixResult<Vec<i64>>>()?;
        rows.push(row);
    }

    Ok(Matrix::from_validated(rows))
}

/// Parse CSV text into a validated square matrix.
pub fn parse_matrix_str(content: &str) -> MatrixResult<Matrix> {
    parse_matrix(content.as_bytes())
}

/// Read and parse a CSV file from disk.
pub fn parse_matrix_file<P: AsRef<Path>>(path: P) -> MatrixResult<Matrix> {
    let bytes = std::fs::read(path.as_ref()).map_err(|e| {
        MatrixError::Csv(format!("Cannot read file '{}': {}", path.as_ref().display(), e))
    })?;
    parse_matrix(&bytes)
}

fn read_records(bytes: &[u8]) -> MatrixResult<Vec<csv::StringRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let records = reader
        .records()
        .collect::<Result<Vec<_>, csv::Error>>()
        .map_err(MatrixError::from)?;

    for (i, record) in records.iter().enumerate() {
        if let Some(j) = record.iter().position(|field| field.contains('"')) {
            return Err(MatrixError::Csv(format!(
                "record {} field {}: bare \" in field",
                i + 1,
                j + 1
            )));
        }
    }

    Ok(records)
}

fn parse_cell(row: usize, col: usize, raw: &str) -> MatrixResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| MatrixError::InvalidInteger {
            row,
            col,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_simple_matrix() {
        let matrix = parse_matrix_str("1,2\n3,4").unwrap();
        assert_eq!(matrix.rows(), &[vec![1, 2], vec![3, 4]]);
    }

    #[test]
    fn test_whitespace_and_signs() {
        let matrix = parse_matrix_str(" 1 , -2\n+3,\t4 \n").unwrap();
        assert_eq!(matrix.rows(), &[vec![1, -2], vec![3, 4]]);
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let matrix = parse_matrix_str("1,2\r\n\r\n3,4\r\n").unwrap();
        assert_eq!(matrix.size(), 2);
    }

    #[test]
    fn test_quoted_fields() {
        let matrix = parse_matrix_str("\"1\",2\n3,\"4\"").unwrap();
        assert_eq!(matrix.flatten(), "1,2,3,4");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_matrix(b""), Err(MatrixError::Empty));
        assert_eq!(parse_matrix_str("\n\n"), Err(MatrixError::Empty));
    }

    #[test]
    fn test_not_square() {
        assert_eq!(
            parse_matrix_str("1,2,3\n4,5,6"),
            Err(MatrixError::NotSquare { rows: 2, cols: 3 })
        );
    }

    #[test]
    fn test_ragged_row() {
        assert_eq!(
            parse_matrix_str("1,2\n3,4,5"),
            Err(MatrixError::InconsistentRow { row: 1 })
        );
    }

    #[test]
    fn test_ragged_row_reported_before_later_bad_integer() {
        assert_eq!(
            parse_matrix_str("1,2,3\n4,5\n7,x,9"),
            Err(MatrixError::InconsistentRow { row: 1 })
        );
    }

    #[test]
    fn test_invalid_integer_keeps_raw_value() {
        assert_eq!(
            parse_matrix_str("1, a\n3,4"),
            Err(MatrixError::InvalidInteger {
                row: 0,
                col: 1,
                value: " a".into()
            })
        );
        assert!(parse_matrix_str("1.5").is_err());
        assert!(parse_matrix_str("99999999999999999999").is_err());
    }

    #[test]
    fn test_stray_quote_is_csv_error() {
        let err = parse_matrix_str("1,2\"\n3,4").unwrap_err();
        assert!(err.is_csv_syntax());
        assert_eq!(err.to_string(), "record 1 field 2: bare \" in field");

        // Reported before shape checks, like any reader failure.
        assert!(parse_matrix_str("1,2,3\n4,5\"").unwrap_err().is_csv_syntax());
    }

    #[test]
    fn test_invalid_utf8_is_csv_error() {
        let err = parse_matrix(&[0xff, 0xfe, b',', b'1']).unwrap_err();
        assert!(err.is_csv_syntax());
    }

    #[test]
    fn test_echo_round_trip() {
        let original = parse_matrix_str("5,-1,0\n2,2,2\n-9,8,7").unwrap();
        let reparsed = parse_matrix_str(&original.echo()).unwrap();
        assert_eq!(original, reparsed);
    }

    #[test]
    fn test_parse_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "1,2\n3,4").unwrap();
        let matrix = parse_matrix_file(file.path()).unwrap();
        assert_eq!(matrix.sum(), 10);

        assert!(parse_matrix_file("/nonexistent/matrix.csv").is_err());
    }
}
