// Reading CSV exports from disk.

use crate::report::*;

pub fn read_csv_text(path: &str) -> ReportResult<String> {
    info!("Attempting to read CSV file {:?}", path);
    let text = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    debug!("read_csv_text: {:?}: {} bytes", path, text.len());
    Ok(text)
}

pub fn read_csv_grid(path: &str) -> ReportResult<Grid> {
    let text = read_csv_text(path)?;
    Ok(tokenize(&text))
}
