//! CSV interchange for ledgers.
//!
//! Exports carry a leading `Ref` column with each row's reference number
//! followed by the record schema. Imports accept the schema with or without
//! `Ref`; imported rows are issued fresh reference numbers.

use crate::ledger::{check_exact_fields, Ledger, Record};
use crate::Result;
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;

/// Column holding the reference number in exported files
pub const REF_COLUMN: &str = "Ref";

/// Write every entry of `ledger` as CSV, returning the number of rows written
pub fn write_csv<R: Record, W: Write>(ledger: &Ledger<R>, writer: W) -> Result<usize> {
    let mut writer = csv::Writer::from_writer(writer);

    let mut header = vec![REF_COLUMN];
    header.extend_from_slice(R::FIELDS);
    writer.write_record(&header)?;

    for entry in ledger.entries() {
        let mut record = vec![entry.reference.to_string()];
        record.extend(entry.row.to_fields());
        writer.write_record(&record)?;
    }

    writer.flush()?;
    tracing::debug!("Exported {} rows from '{}'", ledger.len(), ledger.name());
    Ok(ledger.len())
}

/// Append every CSV row from `reader` to `ledger`
///
/// The header must name exactly the record schema (plus an optional `Ref`
/// column, which is ignored). Every row is parsed and validated before any is
/// stored, so a bad row leaves the ledger unchanged.
pub fn read_csv<R: Record, Rd: Read>(ledger: &mut Ledger<R>, reader: Rd) -> Result<usize> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let columns: Vec<&str> = headers
        .iter()
        .map(String::as_str)
        .filter(|h| *h != REF_COLUMN)
        .collect();
    check_exact_fields(ledger.name(), R::FIELDS, columns.iter().copied())?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let fields: BTreeMap<String, String> = headers
            .iter()
            .zip(record.iter())
            .filter(|(h, _)| h.as_str() != REF_COLUMN)
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect();
        let row = R::from_fields(&fields)?;
        row.validate()?;
        rows.push(row);
    }

    let count = rows.len();
    for row in rows {
        ledger.append(row)?;
    }
    tracing::info!("Imported {} rows into '{}'", count, ledger.name());
    Ok(count)
}

/// Export a ledger to a CSV file, creating parent directories as needed
pub fn write_csv_file<R: Record>(ledger: &Ledger<R>, path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_csv(ledger, file)
}

/// Import a CSV file into a ledger
pub fn read_csv_file<R: Record>(ledger: &mut Ledger<R>, path: &Path) -> Result<usize> {
    let file = std::fs::File::open(path)?;
    read_csv(ledger, file)
}
