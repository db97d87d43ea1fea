//! Append-only trade journal
//!
//! Every completed trade becomes exactly one row with the fields
//! `timestamp,entry_price,signal_type,direction,stake,result,profit`.
//! Rows are flushed as they are written so a crash loses at most the trade
//! in flight.

use chrono::{DateTime, Utc};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::core::types::TradeRecord;
use crate::error::TradingResult;

pub const JOURNAL_HEADER: [&str; 7] = [
    "timestamp",
    "entry_price",
    "signal_type",
    "direction",
    "stake",
    "result",
    "profit",
];

/// Destination for completed trades
pub trait TradeSink {
    fn append(&mut self, record: &TradeRecord) -> TradingResult<()>;
}

/// Keeps records in memory; used by backtests and tests.
#[derive(Debug, Default)]
pub struct MemoryJournal {
    records: Vec<TradeRecord>,
}

impl MemoryJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[TradeRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<TradeRecord> {
        self.records
    }
}

impl TradeSink for MemoryJournal {
    fn append(&mut self, record: &TradeRecord) -> TradingResult<()> {
        self.records.push(record.clone());
        Ok(())
    }
}

pub struct CsvJournal {
    writer: csv::Writer<File>,
    path: PathBuf,
}

impl CsvJournal {
    /// Create (or truncate) `path` and write the header row.
    pub fn create<P: AsRef<Path>>(path: P) -> TradingResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)?;
        writer.write_record(JOURNAL_HEADER)?;
        writer.flush()?;

        info!("📝 Trade journal: {}", path.display());
        Ok(Self { writer, path })
    }

    /// New journal named after the session start, e.g.
    /// `logs/gann_bot_trades_20240102_093000.csv`.
    pub fn in_dir<P: AsRef<Path>>(dir: P, started_at: DateTime<Utc>) -> TradingResult<Self> {
        let filename = format!("gann_bot_trades_{}.csv", started_at.format("%Y%m%d_%H%M%S"));
        Self::create(dir.as_ref().join(filename))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TradeSink for CsvJournal {
    fn append(&mut self, record: &TradeRecord) -> TradingResult<()> {
        self.writer.serialize(record)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Read a journal back, e.g. to summarise a finished session.
pub fn read_journal<P: AsRef<Path>>(path: P) -> TradingResult<Vec<TradeRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}
