//! Data module - dataset loading and normalization

mod loader;
mod processor;
mod record;

pub use loader::{load_table, unique_column_names, DataLoader, LoaderError};
pub use processor::{DataProcessor, ProcessorError};
pub use record::ScreeningRecord;
