use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;

/// Identifier column.
pub const URL_COLUMN: &str = "url";
pub const TRAFFIC_COLUMN: &str = "traffic";
pub const REVENUE_COLUMN: &str = "revenue";

/// Columns every upload must carry, in reporting order.
pub const REQUIRED_COLUMNS: [&str; 3] = [URL_COLUMN, TRAFFIC_COLUMN, REVENUE_COLUMN];

/// Numeric columns.
pub const METRIC_COLUMNS: [&str; 2] = [TRAFFIC_COLUMN, REVENUE_COLUMN];

/// Parse CSV content into a DataFrame.
///
/// Every column is read as a string so numeric validity can be checked per
/// cell afterwards instead of failing the whole read on a bad value. Empty
/// cells become nulls.
pub fn read_csv_bytes(bytes: &[u8]) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
        .finish()
}

/// Read and parse a CSV file.
pub fn read_csv_file(path: &Path) -> anyhow::Result<DataFrame> {
    use anyhow::Context;

    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read CSV file {}", path.display()))?;
    read_csv_bytes(&bytes).context("Failed to parse CSV into DataFrame")
}

/// Column names in file order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Cells of `name` as strings, `None` for nulls.
pub fn string_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    Ok(series
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}

/// True for a null cell or one holding only whitespace, quoted `""` included.
pub fn is_blank(cell: Option<&str>) -> bool {
    cell.map_or(true, |value| value.trim().is_empty())
}

/// Cells of `name` read as `f64`, ignoring surrounding whitespace. Blank
/// cells and cells that do not parse as a number both come back as `None`;
/// compare with [`missing_rows`] to tell them apart.
pub fn numeric_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    Ok(string_values(df, name)?
        .iter()
        .map(|cell| cell.as_deref().and_then(|value| value.trim().parse().ok()))
        .collect())
}

/// Row indices where `name` is null or blank.
pub fn missing_rows(df: &DataFrame, name: &str) -> PolarsResult<Vec<usize>> {
    Ok(string_values(df, name)?
        .iter()
        .enumerate()
        .filter(|(_, cell)| is_blank(cell.as_deref()))
        .map(|(row, _)| row)
        .collect())
}

/// Serialize a DataFrame to CSV text with a header row.
pub fn write_csv_string(df: &mut DataFrame) -> PolarsResult<String> {
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .finish(df)?;
    String::from_utf8(buffer)
        .map_err(|e| PolarsError::ComputeError(format!("CSV output is not UTF-8: {}", e).into()))
}
