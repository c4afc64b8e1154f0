// src/dataset/mod.rs
use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use std::{fs::File, io::Read, path::Path};
use tracing::info;

pub mod parse;

pub use parse::{parse_or_default, ParsePolicy};

/// Positional column names of the source file, in order.
pub const COLUMNS: [&str; 9] = [
    "year",
    "month",
    "supplier",
    "item_code",
    "item_description",
    "item_type",
    "retail_sales",
    "retail_transfers",
    "warehouse_sales",
];

/// One row of the sales file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub year: i32,
    pub month: i32,
    pub supplier: String,
    pub item_code: String,
    pub item_description: String,
    /// Item category label, e.g. `WINE` or `BEER`.
    pub item_type: String,
    pub retail_sales: f64,
    pub retail_transfers: f64,
    pub warehouse_sales: f64,
}

impl Record {
    fn from_row(row: &StringRecord, row_no: usize, policy: ParsePolicy) -> Result<Self> {
        if row.len() != COLUMNS.len() {
            bail!(
                "row {}: expected {} fields, found {}",
                row_no,
                COLUMNS.len(),
                row.len()
            );
        }
        // length checked above, so every index is present
        let cell = |i: usize| row.get(i).unwrap_or_default();
        let num_i32 = |i: usize| parse_or_default::<i32>(cell(i), COLUMNS[i], row_no, policy);
        let num_f64 = |i: usize| parse_or_default::<f64>(cell(i), COLUMNS[i], row_no, policy);

        Ok(Self {
            year: num_i32(0)?,
            month: num_i32(1)?,
            supplier: cell(2).to_string(),
            item_code: cell(3).to_string(),
            item_description: cell(4).to_string(),
            item_type: cell(5).to_string(),
            retail_sales: num_f64(6)?,
            retail_transfers: num_f64(7)?,
            warehouse_sales: num_f64(8)?,
        })
    }
}

/// The full record set, in file order. Never mutated after construction.
#[derive(Debug, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Build a dataset directly, mostly for tests and synthetic data.
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Read the CSV at `path`. The header row is skipped; every other row must
    /// carry exactly the nine positional columns.
    #[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
    pub fn load<P: AsRef<Path>>(path: P, policy: ParsePolicy) -> Result<Self> {
        let file = File::open(&path)
            .with_context(|| format!("Failed to open data file: {:?}", path.as_ref()))?;
        let dataset = Self::from_reader(file, policy)
            .with_context(|| format!("Failed to load data file: {:?}", path.as_ref()))?;
        info!(records = dataset.len(), ?policy, "dataset loaded");
        Ok(dataset)
    }

    /// Same as [`Dataset::load`] over any reader.
    pub fn from_reader<R: Read>(reader: R, policy: ParsePolicy) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let mut records = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let row_no = idx + 1;
            let row = result.with_context(|| format!("CSV parse error at data row {}", row_no))?;
            records.push(Record::from_row(&row, row_no, policy)?);
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "YEAR,MONTH,SUPPLIER,ITEM CODE,ITEM DESCRIPTION,ITEM TYPE,RETAIL SALES,RETAIL TRANSFERS,WAREHOUSE SALES\n";

    fn write_csv(body: &str) -> NamedTempFile {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(HEADER.as_bytes()).unwrap();
        tmp.write_all(body.as_bytes()).unwrap();
        tmp.flush().unwrap();
        tmp
    }

    #[test]
    fn test_load_keeps_file_order() -> Result<()> {
        let tmp = write_csv(
            "2020,1,REPUBLIC NATIONAL DISTRIBUTING CO,100009,BOOTLEG RED - 750ML,WINE,0,0,2\n\
             2020,1,PWSWN INC,100024,MOMENT DE PLAISIR - 750ML,WINE,0,1,4\n\
             2020,1,RELIABLE CHURCHILL LLLP,1001,S SMITH ORGANIC PEAR CIDER - 18.7OZ,BEER,0,0,1\n",
        );
        let ds = Dataset::load(tmp.path(), ParsePolicy::Lenient)?;

        assert_eq!(ds.len(), 3);
        let codes: Vec<&str> = ds.records().iter().map(|r| r.item_code.as_str()).collect();
        assert_eq!(codes, vec!["100009", "100024", "1001"]);
        assert_eq!(ds.records()[1].supplier, "PWSWN INC");
        assert_eq!(ds.records()[1].retail_transfers, 1.0);
        assert_eq!(ds.records()[2].item_type, "BEER");
        Ok(())
    }

    #[test]
    fn test_malformed_sales_becomes_zero() -> Result<()> {
        let tmp = write_csv(
            "2020,1,PWSWN INC,100024,MOMENT DE PLAISIR - 750ML,WINE,3.5,1,4\n\
             2020,1,PWSWN INC,100025,SOMETHING - 750ML,WINE,oops,1,4\n",
        );
        let ds = Dataset::load(tmp.path(), ParsePolicy::Lenient)?;

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0].retail_sales, 3.5);
        assert_eq!(ds.records()[1].retail_sales, 0.0);
        assert_eq!(ds.records()[1].warehouse_sales, 4.0);
        Ok(())
    }

    #[test]
    fn test_strings_are_verbatim() -> Result<()> {
        let tmp = write_csv("2020,1, PADDED SUPPLIER ,A1,\"QUOTED, WITH COMMA\",wine,1,2,3\n");
        let ds = Dataset::load(tmp.path(), ParsePolicy::Lenient)?;
        let r = &ds.records()[0];
        assert_eq!(r.supplier, " PADDED SUPPLIER ");
        assert_eq!(r.item_description, "QUOTED, WITH COMMA");
        assert_eq!(r.item_type, "wine");
        Ok(())
    }

    #[test]
    fn test_strict_policy_rejects_malformed_row() {
        let tmp = write_csv(
            "2020,1,PWSWN INC,100024,MOMENT DE PLAISIR - 750ML,WINE,3.5,1,4\n\
             2020,x,PWSWN INC,100025,SOMETHING - 750ML,WINE,1,1,4\n",
        );
        let err = Dataset::load(tmp.path(), ParsePolicy::Strict).unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("row 2"), "{msg}");
        assert!(msg.contains("month"), "{msg}");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.csv");
        assert!(Dataset::load(&missing, ParsePolicy::Lenient).is_err());
    }

    #[test]
    fn test_ragged_rows_are_structural_errors() {
        let tmp = write_csv("2020,1,PWSWN INC,100024,MOMENT,WINE,3.5,1\n");
        assert!(Dataset::load(tmp.path(), ParsePolicy::Lenient).is_err());
    }

    #[test]
    fn test_wrong_column_count_with_matching_header_is_rejected() {
        let data = "A,B,C\n1,2,3\n";
        let err = Dataset::from_reader(data.as_bytes(), ParsePolicy::Lenient).unwrap_err();
        assert!(err.to_string().contains("expected 9 fields"), "{err}");
    }

    #[test]
    fn test_header_only_and_empty_files_load_empty() -> Result<()> {
        let tmp = write_csv("");
        assert!(Dataset::load(tmp.path(), ParsePolicy::Lenient)?.is_empty());
        assert!(Dataset::from_reader("".as_bytes(), ParsePolicy::Lenient)?.is_empty());
        Ok(())
    }
}
