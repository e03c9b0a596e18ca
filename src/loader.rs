use crate::error::{Error, Result};
use crate::types::{AccidentRecord, Column, RawRow};
use csv::{ByteRecord, ReaderBuilder, StringRecord};
use std::borrow::Cow;
use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub parse_errors: usize,
    pub null_dates: usize,
    /// Rows with cells that were not valid UTF-8 and were decoded lossily.
    pub lossy_rows: usize,
    pub headers: Vec<String>,
}

/// The immutable record set plus the known columns its file provided.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<AccidentRecord>,
    columns: BTreeSet<Column>,
}

impl Dataset {
    pub fn new(records: Vec<AccidentRecord>, columns: impl IntoIterator<Item = Column>) -> Self {
        Self {
            records,
            columns: columns.into_iter().collect(),
        }
    }

    /// Dataset whose file carried every known column.
    pub fn with_all_columns(records: Vec<AccidentRecord>) -> Self {
        Self::new(records, Column::ALL)
    }

    pub fn records(&self) -> &[AccidentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    pub fn missing_columns(&self) -> Vec<Column> {
        Column::ALL
            .into_iter()
            .filter(|c| !self.columns.contains(c))
            .collect()
    }

    /// Distinct non-null years, ascending.
    pub fn observed_years(&self) -> BTreeSet<i32> {
        self.records.iter().filter_map(|r| r.year).collect()
    }

    /// Distinct non-null severities, or `None` when the column is absent.
    pub fn observed_severities(&self) -> Option<BTreeSet<String>> {
        if !self.has_column(Column::AccidentSeverity) {
            return None;
        }
        Some(
            self.records
                .iter()
                .filter_map(|r| r.severity.clone())
                .collect(),
        )
    }
}

pub fn load_dataset(path: impl AsRef<Path>) -> Result<(Dataset, LoadReport)> {
    let path = path.as_ref();
    let file = path.display().to_string();
    if !path.is_file() {
        return Err(Error::file_not_found(file));
    }

    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_path(path)
        .map_err(|e| Error::csv_parsing(&file, "failed to open file", Some(e)))?;

    // Legacy spreadsheet exports are often cp1252, so cells are decoded
    // lossily instead of rejecting the whole row.
    let (header_record, _) = decode_lossy(
        rdr.byte_headers()
            .map_err(|e| Error::csv_parsing(&file, "failed to read header row", Some(e)))?,
    );
    let headers: Vec<String> = header_record.iter().map(str::to_string).collect();
    let columns: HashSet<Column> = headers.iter().filter_map(|h| Column::from_header(h)).collect();
    for missing in Column::ALL.iter().filter(|c| !columns.contains(c)) {
        warn!(column = missing.header(), "Column not found in the dataset");
    }

    let mut total_rows = 0usize;
    let mut parse_errors = 0usize;
    let mut null_dates = 0usize;
    let mut lossy_rows = 0usize;
    let mut records: Vec<AccidentRecord> = Vec::new();

    for result in rdr.byte_records() {
        total_rows += 1;
        let decoded = result.and_then(|raw| {
            let (record, lossy) = decode_lossy(&raw);
            if lossy {
                lossy_rows += 1;
                debug!(row = total_rows, "Replaced invalid UTF-8 in row");
            }
            record.deserialize::<RawRow>(Some(&header_record))
        });
        let row = match decoded {
            Ok(r) => r,
            Err(e) => {
                parse_errors += 1;
                debug!(row = total_rows, error = %e, "Skipping malformed row");
                continue;
            }
        };
        let record = AccidentRecord::from_raw(row);
        if record.date.is_none() {
            null_dates += 1;
        }
        records.push(record);
    }

    if parse_errors > 0 {
        warn!(parse_errors, file = %file, "Skipped malformed rows");
    }
    if lossy_rows > 0 {
        warn!(lossy_rows, file = %file, "Rows contained invalid UTF-8; replaced with U+FFFD");
    }
    info!(
        rows = records.len(),
        null_dates,
        columns = headers.len(),
        file = %file,
        "Loaded accident records"
    );

    let report = LoadReport {
        total_rows,
        loaded_rows: records.len(),
        parse_errors,
        null_dates,
        lossy_rows,
        headers,
    };
    Ok((Dataset::new(records, columns), report))
}

/// Decode every cell as UTF-8, replacing invalid sequences.
///
/// The flag is set when at least one cell needed replacement.
fn decode_lossy(raw: &ByteRecord) -> (StringRecord, bool) {
    let mut lossy = false;
    let record = raw
        .iter()
        .map(|cell| {
            let text = String::from_utf8_lossy(cell);
            lossy |= matches!(text, Cow::Owned(_));
            text
        })
        .collect();
    (record, lossy)
}
