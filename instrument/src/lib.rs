//! Capture `tracing` events from the farm dashboard into DataFrames.
//!
//! Each event target (`plan_row`, `stress`, `climate`, `render`, ...) becomes
//! one table; each event field becomes a column. A field an event did not
//! carry is recorded as null, so tables stay rectangular without inventing
//! zeros.
//!
//! # Usage
//!
//! ```ignore
//! // In dashboard code:
//! tracing::info!(target: "stress", crop = name, original_profit, stressed_profit);
//!
//! // In a test:
//! let (view, log) = instrument::capture(|| risk_view(data, &inputs));
//! let frames = log.to_dataframes();
//! let stress = &frames["stress"];
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::Path;

use polars::prelude::*;
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Record};
use tracing::{Event, Id, Metadata, Subscriber};

/// One recorded field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    UInt(u64),
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

/// Events of one target, kept row-wise until conversion.
#[derive(Debug, Clone, Default)]
pub struct EventTable {
    pub rows: Vec<BTreeMap<String, Cell>>,
}

impl EventTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in sorted order, across all rows.
    pub fn column_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .rows
            .iter()
            .flat_map(|row| row.keys().map(String::as_str))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    fn cells<'a>(&'a self, name: &'a str) -> impl Iterator<Item = Option<&'a Cell>> + 'a {
        self.rows.iter().map(move |row| row.get(name))
    }

    /// Convert to a DataFrame. A column mixing integer and float cells is
    /// widened to f64; any other mix is rendered as text.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let columns = self
            .column_names()
            .into_iter()
            .map(|name| self.column(name))
            .collect();
        DataFrame::new(columns)
    }

    fn column(&self, name: &str) -> Column {
        match column_kind(self.cells(name)) {
            ColumnKind::UInt => Column::new(
                name.into(),
                self.cells(name)
                    .map(|c| match c {
                        Some(Cell::UInt(v)) => Some(*v),
                        _ => None,
                    })
                    .collect::<Vec<Option<u64>>>(),
            ),
            ColumnKind::Int => Column::new(
                name.into(),
                self.cells(name)
                    .map(|c| match c {
                        Some(Cell::Int(v)) => Some(*v),
                        Some(Cell::UInt(v)) => i64::try_from(*v).ok(),
                        _ => None,
                    })
                    .collect::<Vec<Option<i64>>>(),
            ),
            ColumnKind::Float => Column::new(
                name.into(),
                self.cells(name)
                    .map(|c| match c {
                        Some(Cell::Float(v)) => Some(*v),
                        Some(Cell::Int(v)) => Some(*v as f64),
                        Some(Cell::UInt(v)) => Some(*v as f64),
                        _ => None,
                    })
                    .collect::<Vec<Option<f64>>>(),
            ),
            ColumnKind::Bool => Column::new(
                name.into(),
                self.cells(name)
                    .map(|c| match c {
                        Some(Cell::Bool(v)) => Some(*v),
                        _ => None,
                    })
                    .collect::<Vec<Option<bool>>>(),
            ),
            ColumnKind::Text => Column::new(
                name.into(),
                self.cells(name)
                    .map(|c| c.map(cell_text))
                    .collect::<Vec<Option<String>>>(),
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    UInt,
    Int,
    Float,
    Bool,
    Text,
}

fn column_kind<'a>(cells: impl Iterator<Item = Option<&'a Cell>>) -> ColumnKind {
    let mut kind: Option<ColumnKind> = None;
    for cell in cells.flatten() {
        let this = match cell {
            Cell::UInt(_) => ColumnKind::UInt,
            Cell::Int(_) => ColumnKind::Int,
            Cell::Float(_) => ColumnKind::Float,
            Cell::Bool(_) => ColumnKind::Bool,
            Cell::Text(_) => ColumnKind::Text,
        };
        kind = Some(match (kind, this) {
            (None, k) => k,
            (Some(a), b) if a == b => a,
            (Some(ColumnKind::UInt), ColumnKind::Int)
            | (Some(ColumnKind::Int), ColumnKind::UInt) => ColumnKind::Int,
            (
                Some(ColumnKind::UInt | ColumnKind::Int | ColumnKind::Float),
                ColumnKind::UInt | ColumnKind::Int | ColumnKind::Float,
            ) => ColumnKind::Float,
            _ => ColumnKind::Text,
        });
    }
    kind.unwrap_or(ColumnKind::Text)
}

fn cell_text(cell: &Cell) -> String {
    match cell {
        Cell::UInt(v) => v.to_string(),
        Cell::Int(v) => v.to_string(),
        Cell::Float(v) => v.to_string(),
        Cell::Bool(v) => v.to_string(),
        Cell::Text(v) => v.clone(),
    }
}

/// Every table recorded so far, keyed by event target.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    pub tables: BTreeMap<String, EventTable>,
}

impl EventLog {
    pub fn table(&self, target: &str) -> Option<&EventTable> {
        self.tables.get(target)
    }

    /// Tables that fail to convert are skipped.
    pub fn to_dataframes(&self) -> BTreeMap<String, DataFrame> {
        self.tables
            .iter()
            .filter_map(|(name, table)| table.to_dataframe().ok().map(|df| (name.clone(), df)))
            .collect()
    }
}

thread_local! {
    static LOG: RefCell<EventLog> = RefCell::default();
}

/// Collects field values of one event into a row.
struct RowVisitor<'a> {
    row: &'a mut BTreeMap<String, Cell>,
}

impl RowVisitor<'_> {
    fn put(&mut self, field: &Field, cell: Cell) {
        self.row.insert(field.name().to_string(), cell);
    }
}

impl Visit for RowVisitor<'_> {
    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, Cell::UInt(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, Cell::Int(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.put(field, Cell::Float(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, Cell::Bool(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, Cell::Text(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        // `message` carries free text, not a column.
        if field.name() != "message" {
            self.put(field, Cell::Text(format!("{value:?}")));
        }
    }
}

/// Subscriber that appends INFO-and-above events to the thread-local log.
/// Spans are accepted and ignored.
pub struct TableSubscriber;

impl Subscriber for TableSubscriber {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.is_event() && *metadata.level() <= tracing::Level::INFO
    }

    fn new_span(&self, _span: &Attributes<'_>) -> Id {
        Id::from_u64(1)
    }

    fn record(&self, _span: &Id, _values: &Record<'_>) {}

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

    fn event(&self, event: &Event<'_>) {
        let mut row = BTreeMap::new();
        event.record(&mut RowVisitor { row: &mut row });
        let target = event.metadata().target().to_string();
        LOG.with(|log| {
            log.borrow_mut()
                .tables
                .entry(target)
                .or_default()
                .rows
                .push(row);
        });
    }

    fn enter(&self, _span: &Id) {}

    fn exit(&self, _span: &Id) {}
}

/// Take everything recorded on this thread, leaving the log empty.
pub fn drain() -> EventLog {
    LOG.with(|log| std::mem::take(&mut *log.borrow_mut()))
}

pub fn clear() {
    LOG.with(|log| *log.borrow_mut() = EventLog::default());
}

/// Run `f` under a scoped [`TableSubscriber`] and return what it recorded.
///
/// Anything recorded on this thread before the call is discarded.
pub fn capture<R>(f: impl FnOnce() -> R) -> (R, EventLog) {
    clear();
    let out = tracing::subscriber::with_default(TableSubscriber, f);
    (out, drain())
}

/// Write each DataFrame to `{dir}/{target}.parquet`.
pub fn save_parquet(frames: &mut BTreeMap<String, DataFrame>, dir: &Path) -> PolarsResult<()> {
    std::fs::create_dir_all(dir)?;
    for (target, df) in frames.iter_mut() {
        let file = std::fs::File::create(dir.join(format!("{target}.parquet")))?;
        ParquetWriter::new(file).finish(df)?;
    }
    Ok(())
}
