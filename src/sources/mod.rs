pub mod parquet_file;
pub mod synthetic;

pub use parquet_file::{load_parquet, write_parquet};
pub use synthetic::SyntheticTradeFlow;
