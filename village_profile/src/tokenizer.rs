// Permissive reader for the CSV exports of the spreadsheets.

use log::debug;

use crate::config::{Grid, Row};

/// Splits CSV text into rows of raw fields.
///
/// This function never fails. Quoting errors are read literally: an
/// unterminated quoted field runs until the end of the text.
///
/// Every line break outside of quotes ends a row, including on blank lines:
/// an empty line becomes a row with a single empty field. The layout relies
/// on absolute row numbers, so no line is ever skipped.
///
/// ```
/// use village_profile::tokenize;
///
/// let grid = tokenize("name,\"Jl. Trans, Sulawesi\"\r\n\nSD 1,x");
/// assert_eq!(grid.rows(), &[
///     vec!["name".to_string(), "Jl. Trans, Sulawesi".to_string()],
///     vec!["".to_string()],
///     vec!["SD 1".to_string(), "x".to_string()],
/// ]);
/// ```
pub fn tokenize(text: &str) -> Grid {
    let mut rows: Vec<Row> = Vec::new();
    let mut row: Row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(ch);
            }
            continue;
        }

        match ch {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            c => field.push(c),
        }
    }

    if in_quotes {
        debug!("tokenize: unterminated quoted field at the end of the input");
    }
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    debug!("tokenize: {} rows", rows.len());
    Grid::new(rows)
}
