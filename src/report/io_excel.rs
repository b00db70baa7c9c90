use calamine::{open_workbook, DataType, Range, Reader, Xlsx};
use chrono::Timelike;

use crate::report::*;

pub fn read_excel_grid(path: &str, worksheet_name: Option<&str>) -> ReportResult<Grid> {
    let wrange = get_range(path, worksheet_name)?;
    debug!(
        "read_excel_grid: path: {:?} start: {:?} end: {:?}",
        path,
        wrange.start(),
        wrange.end()
    );
    Ok(range_to_grid(&wrange))
}

/// Converts a worksheet range to a grid, keeping the cells at their absolute position.
///
/// Calamine starts the range at the first used cell. The missing rows and
/// columns before it are added back as empty cells.
pub fn range_to_grid(wrange: &Range<DataType>) -> Grid {
    let (first_row, first_col) = match wrange.start() {
        Some((r, c)) => (r as usize, c as usize),
        None => return Grid::default(),
    };
    let mut rows: Vec<Row> = (0..first_row).map(|_| vec![String::new()]).collect();
    for row in wrange.rows() {
        let mut cells: Row = vec![String::new(); first_col];
        cells.extend(row.iter().map(cell_to_string));
        rows.push(cells);
    }
    Grid::new(rows)
}

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Empty => String::new(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => (*f as i64).to_string(),
        DataType::Float(f) => f.to_string(),
        DataType::Bool(true) => "TRUE".to_string(),
        DataType::Bool(false) => "FALSE".to_string(),
        // Dates are written the way the CSV export of the sheet writes them.
        DataType::DateTime(f) => match cell.as_datetime() {
            Some(dt) if dt.num_seconds_from_midnight() == 0 => dt.format("%Y-%m-%d").to_string(),
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => {
                warn!("cell_to_string: date out of range {}", f);
                f.to_string()
            }
        },
        other => {
            warn!("cell_to_string: unexpected cell {:?}", other);
            String::new()
        }
    }
}

fn get_range(path: &str, worksheet_name: Option<&str>) -> ReportResult<Range<DataType>> {
    info!(
        "Attempting to read Excel file {:?} worksheet: {:?}",
        path, worksheet_name
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(name) = worksheet_name {
        workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { path, name })?
            .context(OpeningExcelSnafu { path })
    } else {
        workbook
            .worksheet_range_at(0)
            .context(MissingWorksheetSnafu {
                path,
                name: "<first>",
            })?
            .context(OpeningExcelSnafu { path })
    }
}
