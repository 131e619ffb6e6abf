use crate::error::{PipelineError, Result};
use arrow::compute::concat_batches;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

/// Read a whole Parquet file into a single record batch
pub fn load_parquet(path: impl AsRef<Path>) -> Result<RecordBatch> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| PipelineError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    let reader = builder.build()?;

    let mut batches = Vec::new();
    for batch_result in reader {
        batches.push(batch_result?);
    }
    debug!("Read {} batches from {}", batches.len(), path.display());

    // An empty file still yields a batch carrying the file schema
    let batch = concat_batches(&schema, &batches)?;
    info!("Loaded {} rows from {}", batch.num_rows(), path.display());
    Ok(batch)
}

/// Write a record batch to a Parquet file, replacing any existing file
pub fn write_parquet(path: impl AsRef<Path>, batch: &RecordBatch) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(batch)?;
    writer.close()?;

    info!("Wrote {} rows to {}", batch.num_rows(), path.display());
    Ok(())
}
