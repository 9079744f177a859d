//! Append-only, schema-validated record store.
//!
//! A `Ledger<R>` owns a name and an ordered collection of rows of one record
//! type `R`. Every appended row is stamped with the next number from the
//! injected [`RefCounter`], so reference numbers are unique and strictly
//! increasing across all ledgers that share a counter.
//!
//! Rows are never edited in place. The only removal path is the time-range
//! removal on daily schedules (see `schedule.rs`).

use crate::{Error, RefCounter, RefNumber, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Delimiter line printed above and below every rendered ledger
pub const RULE: &str =
    "----------------------------------------------------------------------------------------------";

/// A row type that can be stored in a [`Ledger`]
pub trait Record: Clone + fmt::Debug {
    /// Ordered field names making up the row schema
    const FIELDS: &'static [&'static str];

    /// Word printed after the uppercased ledger name ("LOG", "SCHEDULE")
    const HEADING: &'static str;

    /// Line printed instead of a body when the ledger is empty
    const EMPTY_MESSAGE: &'static str;

    /// Check field values that the type system does not already guarantee
    fn validate(&self) -> Result<()>;

    /// Build a row from untyped input whose keys already match `FIELDS`
    fn from_fields(fields: &BTreeMap<String, String>) -> Result<Self>;

    /// Field values in `FIELDS` order
    fn to_fields(&self) -> Vec<String>;

    /// Render the non-empty body. Entries arrive in insertion order.
    fn render_body(entries: &[Entry<Self>]) -> String;
}

/// A stored row together with the reference number it was issued
#[derive(Clone, Debug, PartialEq)]
pub struct Entry<R> {
    pub reference: RefNumber,
    pub row: R,
}

/// Named, append-only collection of rows sharing one schema
#[derive(Clone, Debug)]
pub struct Ledger<R> {
    name: String,
    counter: RefCounter,
    entries: Vec<Entry<R>>,
}

impl<R: Record> Ledger<R> {
    /// Create an empty ledger drawing reference numbers from `counter`
    pub fn new(name: impl Into<String>, counter: &RefCounter) -> Self {
        Self {
            name: name.into(),
            counter: counter.clone(),
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn counter(&self) -> &RefCounter {
        &self.counter
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stored entries in insertion order
    pub fn entries(&self) -> &[Entry<R>] {
        &self.entries
    }

    pub fn rows(&self) -> impl Iterator<Item = &R> {
        self.entries.iter().map(|e| &e.row)
    }

    pub fn get(&self, reference: RefNumber) -> Option<&Entry<R>> {
        self.entries.iter().find(|e| e.reference == reference)
    }

    /// Validate and store a row, returning its newly issued reference number
    ///
    /// A rejected row leaves the ledger unchanged and consumes no number.
    pub fn append(&mut self, row: R) -> Result<RefNumber> {
        row.validate()?;
        let reference = self.counter.issue();
        self.entries.push(Entry { reference, row });
        tracing::debug!("Appended row {} to '{}'", reference, self.name);
        Ok(reference)
    }

    /// Append a row supplied as untyped field/value pairs
    ///
    /// The key set must equal the schema exactly (`SchemaMismatch`), and each
    /// value must parse as its declared type (`InvalidField`).
    pub fn append_fields(&mut self, fields: &BTreeMap<String, String>) -> Result<RefNumber> {
        check_exact_fields(&self.name, R::FIELDS, fields.keys().map(String::as_str))?;
        let row = R::from_fields(fields)?;
        self.append(row)
    }

    /// Copy every entry of `other` into this ledger, keeping its reference numbers
    pub fn extend_from(&mut self, other: &Ledger<R>) {
        self.entries.extend(other.entries.iter().cloned());
    }

    /// Convert into a ledger with a wider schema, preserving rows and references
    ///
    /// Fails with `SchemaMismatch` unless every current field also exists in
    /// the target schema.
    pub fn widen<W>(&self, name: impl Into<String>) -> Result<Ledger<W>>
    where
        W: Record + From<R>,
    {
        let name = name.into();
        check_superset(&name, R::FIELDS, W::FIELDS)?;
        Ok(Ledger {
            name,
            counter: self.counter.clone(),
            entries: self
                .entries
                .iter()
                .map(|e| Entry {
                    reference: e.reference,
                    row: W::from(e.row.clone()),
                })
                .collect(),
        })
    }

    /// Keep only the entries matching `keep`, returning how many were dropped
    pub(crate) fn retain(&mut self, keep: impl FnMut(&Entry<R>) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(keep);
        before - self.entries.len()
    }

    /// Render the banner, body (or empty placeholder) and footer
    pub fn render(&self) -> String {
        let mut output = format!("{}\n{} {}:", RULE, self.name.to_uppercase(), R::HEADING);
        if self.entries.is_empty() {
            output.push('\n');
            output.push_str(R::EMPTY_MESSAGE);
        } else {
            output.push_str(&R::render_body(&self.entries));
        }
        output.push('\n');
        output.push_str(RULE);
        output.push('\n');
        output
    }
}

impl<R: Record> fmt::Display for Ledger<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Require that `found` names exactly the `expected` fields (order ignored)
pub fn check_exact_fields<'a>(
    ledger: &str,
    expected: &[&str],
    found: impl IntoIterator<Item = &'a str>,
) -> Result<()> {
    let expected_set: BTreeSet<&str> = expected.iter().copied().collect();
    let found: Vec<&str> = found.into_iter().collect();
    let found_set: BTreeSet<&str> = found.iter().copied().collect();

    if expected_set != found_set || found.len() != found_set.len() {
        return Err(schema_mismatch(ledger, expected, &found));
    }
    Ok(())
}

/// Require that `wider` contains every field of `current`
pub fn check_superset(ledger: &str, current: &[&str], wider: &[&str]) -> Result<()> {
    if current.iter().all(|f| wider.contains(f)) {
        Ok(())
    } else {
        Err(schema_mismatch(ledger, current, wider))
    }
}

fn schema_mismatch(ledger: &str, expected: &[&str], found: &[&str]) -> Error {
    Error::SchemaMismatch {
        ledger: ledger.to_string(),
        expected: expected.iter().map(|s| s.to_string()).collect(),
        found: found.iter().map(|s| s.to_string()).collect(),
    }
}

/// Look up a field that the schema check has already guaranteed
pub(crate) fn field<'a>(fields: &'a BTreeMap<String, String>, name: &str) -> Result<&'a str> {
    fields
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| Error::invalid_field(name, "missing"))
}

pub(crate) fn require_non_empty(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid_field(name, "must not be empty"));
    }
    Ok(())
}
