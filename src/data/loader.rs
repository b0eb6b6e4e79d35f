//! Dataset Loader Module
//! Reads screening spreadsheets into a Polars DataFrame. Excel/ODS workbooks go
//! through calamine, CSV files through the Polars lazy reader.

use calamine::{open_workbook_auto, Data, Reader};
use polars::prelude::*;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Input file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Unsupported input format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("Failed to read spreadsheet: {0}")]
    SpreadsheetError(#[from] calamine::Error),
    #[error("Failed to load table: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Spreadsheet has no sheet with a header row")]
    EmptySheet,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No data loaded")]
    NoData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceFormat {
    Spreadsheet,
    Csv,
}

fn detect_format(path: &Path) -> Result<SourceFormat, LoaderError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => Ok(SourceFormat::Spreadsheet),
        Some("csv") => Ok(SourceFormat::Csv),
        _ => Err(LoaderError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Read a table from disk, choosing the reader by file extension.
pub fn load_table(path: &Path) -> Result<DataFrame, LoaderError> {
    if !path.exists() {
        return Err(LoaderError::NotFound(path.to_path_buf()));
    }

    match detect_format(path)? {
        SourceFormat::Spreadsheet => read_spreadsheet(path),
        SourceFormat::Csv => read_csv(path),
    }
}

/// Read the first worksheet. The first row is the header and every other
/// cell becomes an optional string; typing happens during normalization.
pub fn read_spreadsheet(path: &Path) -> Result<DataFrame, LoaderError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook.worksheet_range_at(0).ok_or(LoaderError::EmptySheet)??;

    let mut rows = range.rows();
    let header = rows.next().ok_or(LoaderError::EmptySheet)?;

    let names = unique_column_names(header.iter().enumerate().map(|(idx, cell)| {
        match cell_to_string(cell) {
            Some(name) if !name.is_empty() => name,
            _ => format!("Unnamed: {}", idx),
        }
    }));

    let mut cells: Vec<Vec<Option<String>>> =
        vec![Vec::with_capacity(range.height().saturating_sub(1)); names.len()];

    for row in rows {
        for (idx, column) in cells.iter_mut().enumerate() {
            column.push(row.get(idx).and_then(cell_to_string));
        }
    }

    let columns: Vec<Column> = names
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column::new(name.into(), values))
        .collect();

    Ok(DataFrame::new(columns)?)
}

/// Make header names unique: repeats get `.1`, `.2`, ... appended in order of
/// appearance, skipping any suffix that is already taken.
pub fn unique_column_names<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let names: Vec<String> = names.into_iter().collect();
    let mut taken: HashSet<String> = names.iter().cloned().collect();
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut unique = Vec::with_capacity(names.len());

    for name in names {
        let count = seen.entry(name.clone()).or_insert(0);
        if *count == 0 {
            *count = 1;
            unique.push(name);
            continue;
        }

        let mut candidate = format!("{}.{}", name, count);
        while taken.contains(&candidate) {
            *count += 1;
            candidate = format!("{}.{}", name, count);
        }
        *count += 1;
        debug!(column = %name, renamed = %candidate, "duplicate header renamed");
        taken.insert(candidate.clone());
        unique.push(candidate);
    }

    unique
}

fn cell_to_string(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => Some(s.clone()),
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Read a CSV file with Polars schema inference.
pub fn read_csv(path: &Path) -> Result<DataFrame, LoaderError> {
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .finish()?
        .collect()?;
    Ok(df)
}

/// Loads the screening dataset and keeps it for repeated use.
///
/// A second `load` of the same, unmodified file returns the cached table.
pub struct DataLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
    cache_key: Option<PathBuf>,
    modified: Option<SystemTime>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
            cache_key: None,
            modified: None,
        }
    }

    /// Load a dataset, reusing the cached table when the file is unchanged.
    pub fn load(&mut self, path: &Path) -> Result<&DataFrame, LoaderError> {
        if !path.exists() {
            return Err(LoaderError::NotFound(path.to_path_buf()));
        }
        let key = std::fs::canonicalize(path)?;
        let modified = std::fs::metadata(&key)?.modified().ok();

        if self.is_cached(&key, modified) {
            debug!(path = %path.display(), "reusing cached dataset");
            return self.df.as_ref().ok_or(LoaderError::NoData);
        }

        let df = load_table(path)?;
        info!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            "dataset loaded"
        );

        self.df = Some(df);
        self.file_path = Some(path.to_path_buf());
        self.cache_key = Some(key);
        self.modified = modified;
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// `key` is the canonical path, so different spellings of one file share the cache.
    fn is_cached(&self, key: &Path, modified: Option<SystemTime>) -> bool {
        self.df.is_some()
            && modified.is_some()
            && self.modified == modified
            && self.cache_key.as_deref() == Some(key)
    }

    /// Get the number of rows in the loaded table.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get a reference to the loaded DataFrame.
    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    /// Get file path.
    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let err = load_table(&dir.path().join("absent.xlsx")).unwrap_err();
        assert!(matches!(err, LoaderError::NotFound(_)));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.txt");
        fs::write(&path, "a,b\n1,2\n").unwrap();
        let err = load_table(&path).unwrap_err();
        assert!(matches!(err, LoaderError::UnsupportedFormat(_)));
    }

    #[test]
    fn reads_csv_with_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "health_facility,q2,q7,q46\nhealth_facility1,Yes,35,4\n").unwrap();

        let df = load_table(&path).unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(df.width(), 4);
    }

    #[test]
    fn reads_first_worksheet_as_strings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, " q7 ").unwrap();
        sheet.write_string(0, 1, "q2").unwrap();
        sheet.write_number(1, 0, 35.0).unwrap();
        sheet.write_string(1, 1, "yes").unwrap();
        sheet.write_string(2, 0, "abc").unwrap();
        workbook.save(&path).unwrap();

        let df = load_table(&path).unwrap();
        assert_eq!(df.height(), 2);

        let names: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
        assert_eq!(names, vec![" q7 ".to_string(), "q2".to_string()]);

        let ages = df.column(" q7 ").unwrap().str().unwrap().clone();
        assert_eq!(ages.get(0), Some("35"));
        assert_eq!(ages.get(1), Some("abc"));

        let consent = df.column("q2").unwrap().str().unwrap().clone();
        assert_eq!(consent.get(1), None);
    }

    #[test]
    fn loader_reuses_unchanged_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "q7\n1\n2\n").unwrap();

        let mut loader = DataLoader::new();
        assert_eq!(loader.load(&path).unwrap().height(), 2);
        let key = fs::canonicalize(&path).unwrap();
        assert!(loader.is_cached(&key, fs::metadata(&path).unwrap().modified().ok()));
        assert_eq!(loader.load(&path).unwrap().height(), 2);
        assert_eq!(loader.get_row_count(), 2);
        assert_eq!(loader.get_file_path(), Some(&path));
    }

    #[test]
    fn cache_is_keyed_on_canonical_path() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "q7\n1\n2\n").unwrap();
        let other_spelling = dir.path().join("sub").join("..").join(".").join("data.csv");

        let mut loader = DataLoader::new();
        loader.load(&path).unwrap();

        let key = fs::canonicalize(&other_spelling).unwrap();
        let modified = fs::metadata(&other_spelling).unwrap().modified().ok();
        assert!(loader.is_cached(&key, modified));
        assert_eq!(loader.load(&other_spelling).unwrap().height(), 2);
        assert_eq!(loader.get_file_path(), Some(&path));
    }

    #[test]
    fn repeated_headers_are_made_unique() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, name) in ["health_facility", "q2", "q7", "q46", "notes", "notes", "notes"]
            .iter()
            .enumerate()
        {
            sheet.write_string(0, col as u16, *name).unwrap();
        }
        sheet.write_string(1, 0, "health_facility1").unwrap();
        sheet.write_string(1, 1, "YES").unwrap();
        sheet.write_number(1, 2, 40.0).unwrap();
        sheet.write_number(1, 3, 5.0).unwrap();
        sheet.write_string(1, 5, "second").unwrap();
        workbook.save(&path).unwrap();

        let df = load_table(&path).unwrap();
        let names: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
        assert_eq!(
            names,
            vec!["health_facility", "q2", "q7", "q46", "notes", "notes.1", "notes.2"]
        );
        let notes = df.column("notes.1").unwrap().str().unwrap().clone();
        assert_eq!(notes.get(0), Some("second"));
    }

    #[test]
    fn unique_names_skip_taken_suffixes() {
        let names = ["a", "a", "a.1", "b", "a"].map(String::from);
        assert_eq!(
            unique_column_names(names),
            vec!["a", "a.2", "a.1", "b", "a.3"]
        );
    }

    #[test]
    fn corrupt_workbook_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.xlsx");
        fs::write(&path, b"this is not a zip archive").unwrap();

        let err = load_table(&path).unwrap_err();
        assert!(matches!(err, LoaderError::SpreadsheetError(_)), "{err:?}");
    }

    #[test]
    fn empty_first_sheet_has_no_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");

        let mut workbook = Workbook::new();
        workbook.add_worksheet();
        workbook.save(&path).unwrap();

        let err = load_table(&path).unwrap_err();
        assert!(matches!(err, LoaderError::EmptySheet), "{err:?}");
    }
}
