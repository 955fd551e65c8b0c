//! In-memory reference tables parsed from CSV text.
//!
//! A reference table is a small grid of known scaling points: one integer
//! column carries the group sizes, columns whose header ends in
//! [`ADJUST_SUFFIX`] carry the adjustment channels, and any non-numeric
//! column is kept as qualitative labels (the canonical table names its size
//! tiers this way). The engine never touches the filesystem; callers hand in
//! CSV text or build series programmatically.

use std::collections::BTreeMap;

use thiserror::Error;

/// Column-name suffix marking an adjustment channel.
pub const ADJUST_SUFFIX: &str = "_adjust";

/// Header of the group-size column in the canonical table.
pub const SIZE_COLUMN: &str = "num_units";

/// Header of the qualitative size-tier column in the canonical table.
pub const SIZE_NAME_COLUMN: &str = "size_name";

const DEFAULT_TABLE_CSV: &str = include_str!("../data/mass_combat_table.csv");

/// Errors raised when table text cannot be parsed or a column cannot anchor
/// a fit.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("table text has no header row")]
    Empty,
    #[error("table text is not valid CSV: {message}")]
    Malformed { message: String },
    #[error("row {row} has {got} cells, header has {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },
    #[error("column {name:?} appears more than once")]
    DuplicateColumn { name: String },
    #[error("column {name:?} must hold integers (row {row}: {value:?})")]
    NonIntegerCell {
        name: String,
        row: usize,
        value: String,
    },
    #[error("no integer column named {name:?}")]
    MissingColumn { name: String },
    #[error("column {name:?} has {got} rows, need at least {min}")]
    TooFewRows { name: String, min: usize, got: usize },
    #[error("column {name:?} must be strictly increasing (row {row}: {prev} then {next})")]
    NotIncreasing {
        name: String,
        row: usize,
        prev: i64,
        next: i64,
    },
    #[error("column {name:?} must stay positive (row {row}: {value})")]
    NonPositiveSize { name: String, row: usize, value: i64 },
    #[error("column {name:?} has {got} values, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    #[error("column {name:?} cannot anchor a spline fit")]
    Unfittable { name: String },
    #[error("table defines no adjustment channels")]
    NoChannels,
}

impl From<csv::Error> for TableError {
    fn from(source: csv::Error) -> Self {
        Self::Malformed {
            message: source.to_string(),
        }
    }
}

/// A parsed reference table: named integer series plus label columns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReferenceTable {
    headers: Vec<String>,
    numbers: BTreeMap<String, Vec<i64>>,
    labels: BTreeMap<String, Vec<String>>,
    rows: usize,
}

fn decode_channel(name: &str, cells: &[String]) -> Result<Vec<i64>, TableError> {
    cells
        .iter()
        .enumerate()
        .map(|(row, cell)| {
            cell.parse::<i64>().map_err(|_| TableError::NonIntegerCell {
                name: name.to_string(),
                row: row + 1,
                value: cell.clone(),
            })
        })
        .collect()
}

impl ReferenceTable {
    /// Parse CSV text (header row plus data rows).
    ///
    /// Fields follow standard CSV quoting, so labels may carry embedded
    /// commas. Blank lines are skipped; cells are trimmed. A column whose
    /// header ends in [`ADJUST_SUFFIX`] must decode as `i64`; any other
    /// column is an integer series when every cell parses, otherwise a
    /// label column.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Empty`] for header-less input,
    /// [`TableError::RaggedRow`] when a row's cell count differs from the
    /// header, [`TableError::DuplicateColumn`] for repeated headers, and
    /// [`TableError::NonIntegerCell`] when an adjustment column holds a
    /// cell that is not an integer.
    pub fn from_csv(text: &str) -> Result<Self, TableError> {
        let content = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let mut records = reader.records();
        let Some(header_record) = records.next() else {
            return Err(TableError::Empty);
        };
        let headers: Vec<String> = header_record?.iter().map(String::from).collect();
        for (index, name) in headers.iter().enumerate() {
            if headers[..index].contains(name) {
                return Err(TableError::DuplicateColumn { name: name.clone() });
            }
        }

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        let mut rows = 0usize;
        for (row, record) in records.enumerate() {
            let record = record?;
            if record.len() != headers.len() {
                return Err(TableError::RaggedRow {
                    row: row + 1,
                    expected: headers.len(),
                    got: record.len(),
                });
            }
            for (column, cell) in record.iter().enumerate() {
                cells[column].push(cell.to_string());
            }
            rows += 1;
        }

        let mut numbers = BTreeMap::new();
        let mut labels = BTreeMap::new();
        for (name, column) in headers.iter().zip(cells) {
            if rows > 0 && name.ends_with(ADJUST_SUFFIX) {
                numbers.insert(name.clone(), decode_channel(name, &column)?);
                continue;
            }
            let parsed: Result<Vec<i64>, _> =
                column.iter().map(|cell| cell.parse::<i64>()).collect();
            match parsed {
                Ok(series) if rows > 0 => {
                    numbers.insert(name.clone(), series);
                }
                _ => {
                    labels.insert(name.clone(), column);
                }
            }
        }

        Ok(Self {
            headers,
            numbers,
            labels,
            rows,
        })
    }

    /// Build a table from named integer series sharing one length.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Empty`] when no series is given,
    /// [`TableError::DuplicateColumn`] for repeated names, and
    /// [`TableError::LengthMismatch`] when series lengths differ.
    pub fn from_series(series: Vec<(&str, Vec<i64>)>) -> Result<Self, TableError> {
        let Some((_, first)) = series.first() else {
            return Err(TableError::Empty);
        };
        let rows = first.len();
        let mut headers = Vec::with_capacity(series.len());
        let mut numbers = BTreeMap::new();
        for (name, values) in series {
            if values.len() != rows {
                return Err(TableError::LengthMismatch {
                    name: name.to_string(),
                    expected: rows,
                    got: values.len(),
                });
            }
            if numbers.insert(name.to_string(), values).is_some() {
                return Err(TableError::DuplicateColumn {
                    name: name.to_string(),
                });
            }
            headers.push(name.to_string());
        }
        Ok(Self {
            headers,
            numbers,
            labels: BTreeMap::new(),
            rows,
        })
    }

    /// The canonical mass-combat table shipped with the engine.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_csv(DEFAULT_TABLE_CSV).unwrap_or_default()
    }

    /// Column headers in their original order.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// An integer series by column name, if that column parsed as integers.
    #[must_use]
    pub fn series(&self, name: &str) -> Option<&[i64]> {
        self.numbers.get(name).map(Vec::as_slice)
    }

    /// A label column by name, if that column held non-numeric cells.
    #[must_use]
    pub fn labels(&self, name: &str) -> Option<&[String]> {
        self.labels.get(name).map(Vec::as_slice)
    }

    /// Names of the adjustment channels, sorted.
    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.numbers
            .keys()
            .map(String::as_str)
            .filter(|name| name.ends_with(ADJUST_SUFFIX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
size_name,num_units,hp_adjust
Band,10,0
Company,50,20
Battalion,100,45
";

    #[test]
    fn parses_mixed_columns() {
        let table = ReferenceTable::from_csv(SAMPLE).unwrap();
        assert_eq!(table.rows(), 3);
        assert_eq!(table.headers().len(), 3);
        assert_eq!(table.series("num_units"), Some(&[10, 50, 100][..]));
        assert_eq!(table.series("hp_adjust"), Some(&[0, 20, 45][..]));
        let tiers = table.labels("size_name").unwrap();
        assert_eq!(tiers[0], "Band");
        assert_eq!(tiers[2], "Battalion");
        assert_eq!(table.channel_names().collect::<Vec<_>>(), vec!["hp_adjust"]);
    }

    #[test]
    fn quoted_labels_keep_embedded_commas() {
        let text = "size_name,num_units,hp_adjust\n\"Band, Royal\",10,0\n\"Company, Free\",50,20\n";
        let table = ReferenceTable::from_csv(text).unwrap();
        assert_eq!(table.rows(), 2);
        let tiers = table.labels("size_name").unwrap();
        assert_eq!(tiers[0], "Band, Royal");
        assert_eq!(tiers[1], "Company, Free");
        assert_eq!(table.series("num_units"), Some(&[10, 50][..]));
        assert_eq!(table.series("hp_adjust"), Some(&[0, 20][..]));
    }

    #[test]
    fn channel_columns_must_hold_integers() {
        let text = "num_units,hp_adjust\n10,0\n50,many\n100,45\n";
        assert_eq!(
            ReferenceTable::from_csv(text).unwrap_err(),
            TableError::NonIntegerCell {
                name: "hp_adjust".to_string(),
                row: 2,
                value: "many".to_string()
            }
        );
    }

    #[test]
    fn empty_text_is_an_error() {
        assert_eq!(ReferenceTable::from_csv("").unwrap_err(), TableError::Empty);
        assert_eq!(
            ReferenceTable::from_csv("\n  \n").unwrap_err(),
            TableError::Empty
        );
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let text = "a,b\n1,2\n3\n";
        assert_eq!(
            ReferenceTable::from_csv(text).unwrap_err(),
            TableError::RaggedRow {
                row: 2,
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    fn duplicate_headers_are_rejected() {
        let text = "a,a\n1,2\n";
        assert_eq!(
            ReferenceTable::from_csv(text).unwrap_err(),
            TableError::DuplicateColumn {
                name: "a".to_string()
            }
        );
    }

    #[test]
    fn header_only_input_keeps_columns_as_labels() {
        let table = ReferenceTable::from_csv("a,b\n").unwrap();
        assert_eq!(table.rows(), 0);
        assert!(table.series("a").is_none());
        assert_eq!(table.labels("a"), Some(&[][..]));
    }

    #[test]
    fn from_series_validates_shape() {
        let table =
            ReferenceTable::from_series(vec![("num_units", vec![1, 2]), ("x_adjust", vec![3, 4])])
                .unwrap();
        assert_eq!(table.rows(), 2);
        assert_eq!(table.channel_names().collect::<Vec<_>>(), vec!["x_adjust"]);

        let err =
            ReferenceTable::from_series(vec![("a", vec![1, 2]), ("b", vec![1])]).unwrap_err();
        assert_eq!(
            err,
            TableError::LengthMismatch {
                name: "b".to_string(),
                expected: 2,
                got: 1
            }
        );
        assert_eq!(
            ReferenceTable::from_series(Vec::new()).unwrap_err(),
            TableError::Empty
        );
    }

    #[test]
    fn builtin_table_is_well_formed() {
        let table = ReferenceTable::builtin();
        assert!(table.rows() >= 4, "canonical table must anchor a fit");
        assert!(table.series(SIZE_COLUMN).is_some());
        assert!(table.labels(SIZE_NAME_COLUMN).is_some());
        assert!(table.channel_names().count() >= 4);
    }
}
