//! Parquet export of momentum results

use crate::momentum::MomentumSeries;
use crate::ranker::{BatchReport, RecordStatus};
use arrow::array::{ArrayRef, Date32Array, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Days from 0001-01-01 to 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

fn to_date32(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

fn from_date32(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
}

/// Momentum series schema
pub fn momentum_series_schema() -> Schema {
    Schema::new(vec![
        Field::new("symbol", DataType::Utf8, false),
        Field::new("date", DataType::Date32, false),
        Field::new("momentum_price", DataType::Float64, false),
    ])
}

/// Batch comparison schema; figures are null on failed rows
pub fn comparison_schema() -> Schema {
    Schema::new(vec![
        Field::new("run_id", DataType::Utf8, false),
        Field::new("symbol", DataType::Utf8, false),
        Field::new("momentum_price", DataType::Float64, true),
        Field::new("current_price", DataType::Float64, true),
        Field::new("momentum_pct", DataType::Float64, true),
        Field::new("one_year_change_pct", DataType::Float64, true),
        Field::new("error_kind", DataType::Utf8, true),
        Field::new("error", DataType::Utf8, true),
    ])
}

/// Parquet file writer
pub struct ParquetWriter {
    output_dir: PathBuf,
}

impl ParquetWriter {
    /// Create a new Parquet writer
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Ensure output directory exists
    pub fn ensure_dir(&self) -> anyhow::Result<()> {
        fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    /// Generate file path for a given timestamp and prefix
    pub fn file_path(&self, prefix: &str, timestamp: DateTime<Utc>) -> PathBuf {
        let filename = format!("{}_{}.parquet", prefix, timestamp.format("%Y%m%d_%H%M%S"));
        self.output_dir.join(filename)
    }

    fn write_batch(&self, path: &Path, batch: RecordBatch) -> anyhow::Result<()> {
        self.ensure_dir()?;

        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();

        let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
        writer.write(&batch)?;
        writer.close()?;
        Ok(())
    }

    /// Write a momentum series, seed row first
    pub fn write_momentum_series(
        &self,
        path: &Path,
        symbol: &str,
        series: &MomentumSeries,
    ) -> anyhow::Result<()> {
        let points: Vec<_> = series.iter_with_seed().collect();
        if points.is_empty() {
            return Ok(());
        }

        let symbols: Vec<&str> = vec![symbol; points.len()];
        let dates: Vec<i32> = points.iter().map(|p| to_date32(p.date)).collect();
        let prices: Vec<f64> = points.iter().map(|p| p.momentum_price).collect();

        let batch = RecordBatch::try_new(
            Arc::new(momentum_series_schema()),
            vec![
                Arc::new(StringArray::from(symbols)) as ArrayRef,
                Arc::new(Date32Array::from(dates)) as ArrayRef,
                Arc::new(Float64Array::from(prices)) as ArrayRef,
            ],
        )?;

        self.write_batch(path, batch)?;
        tracing::debug!(path = ?path, %symbol, count = points.len(), "Wrote momentum series to Parquet");

        Ok(())
    }

    /// Write every record of a batch report, in report order
    pub fn write_comparisons(&self, path: &Path, report: &BatchReport) -> anyhow::Result<()> {
        if report.records.is_empty() {
            return Ok(());
        }

        let n = report.records.len();
        let run_id = report.run_id.to_string();
        let run_ids: Vec<&str> = vec![run_id.as_str(); n];
        let symbols: Vec<&str> = report.records.iter().map(|r| r.symbol.as_str()).collect();

        let mut momentum_prices = Vec::with_capacity(n);
        let mut current_prices = Vec::with_capacity(n);
        let mut momentum_pcts = Vec::with_capacity(n);
        let mut one_year = Vec::with_capacity(n);
        let mut error_kinds: Vec<Option<&str>> = Vec::with_capacity(n);
        let mut errors: Vec<Option<&str>> = Vec::with_capacity(n);

        for record in &report.records {
            match &record.status {
                RecordStatus::Ranked(c) => {
                    momentum_prices.push(Some(c.momentum_price));
                    current_prices.push(Some(c.current_price));
                    momentum_pcts.push(Some(c.momentum_pct));
                    one_year.push(c.one_year_change_pct);
                    error_kinds.push(None);
                    errors.push(None);
                }
                RecordStatus::Failed(f) => {
                    momentum_prices.push(None);
                    current_prices.push(None);
                    momentum_pcts.push(None);
                    one_year.push(None);
                    error_kinds.push(Some(f.kind.as_str()));
                    errors.push(Some(f.message.as_str()));
                }
            }
        }

        let batch = RecordBatch::try_new(
            Arc::new(comparison_schema()),
            vec![
                Arc::new(StringArray::from(run_ids)) as ArrayRef,
                Arc::new(StringArray::from(symbols)) as ArrayRef,
                Arc::new(Float64Array::from(momentum_prices)) as ArrayRef,
                Arc::new(Float64Array::from(current_prices)) as ArrayRef,
                Arc::new(Float64Array::from(momentum_pcts)) as ArrayRef,
                Arc::new(Float64Array::from(one_year)) as ArrayRef,
                Arc::new(StringArray::from(error_kinds)) as ArrayRef,
                Arc::new(StringArray::from(errors)) as ArrayRef,
            ],
        )?;

        self.write_batch(path, batch)?;
        tracing::debug!(path = ?path, run_id = %report.run_id, count = n, "Wrote comparisons to Parquet");

        Ok(())
    }
}

/// One row of an exported momentum series
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRow {
    pub symbol: String,
    pub date: NaiveDate,
    pub momentum_price: f64,
}

/// Reader for exported Parquet files
pub struct ParquetReader {
    path: PathBuf,
}

impl ParquetReader {
    /// Create a new reader for a Parquet file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read a momentum series export
    pub fn read_momentum_series(&self) -> anyhow::Result<Vec<SeriesRow>> {
        use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

        let file = File::open(&self.path)?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

        let mut rows = Vec::new();

        for batch_result in reader {
            let batch = batch_result?;

            let symbols = batch
                .column(0)
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| anyhow::anyhow!("Invalid symbol column"))?;

            let dates = batch
                .column(1)
                .as_any()
                .downcast_ref::<Date32Array>()
                .ok_or_else(|| anyhow::anyhow!("Invalid date column"))?;

            let prices = batch
                .column(2)
                .as_any()
                .downcast_ref::<Float64Array>()
                .ok_or_else(|| anyhow::anyhow!("Invalid momentum_price column"))?;

            for i in 0..batch.num_rows() {
                rows.push(SeriesRow {
                    symbol: symbols.value(i).to_string(),
                    date: from_date32(dates.value(i))
                        .ok_or_else(|| anyhow::anyhow!("Invalid date"))?,
                    momentum_price: prices.value(i),
                });
            }
        }

        Ok(rows)
    }

    /// Number of rows in any Parquet file
    pub fn row_count(&self) -> anyhow::Result<i64> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let reader = SerializedFileReader::new(File::open(&self.path)?)?;
        Ok(reader.metadata().file_metadata().num_rows())
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}
