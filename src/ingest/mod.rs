//! File ingestion pipeline: column mapping, row parsing, per-file import
//! tasks and the coordinator that fans them out and merges their blocks.

mod column_mapping;
mod coordinator;
mod file_task;
mod sample_parser;
mod source;
mod template;

pub use column_mapping::{ColumnMapping, map_columns};
pub use coordinator::{ImportCoordinator, ImportedEntities, merge_blocks, normalize_timestamps};
pub use file_task::{FileImportTask, ImportBlock, compute_speeds};
pub use sample_parser::{ParseStep, SampleParser};
pub use source::{FsSourceReader, MemorySourceReader, SourceReader};
pub use template::{EntityTemplate, RawSample, ResolvedSource};
