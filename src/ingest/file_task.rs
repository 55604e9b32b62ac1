use std::path::{Path, PathBuf};

use csv::{ByteRecord, ReaderBuilder, StringRecord, Trim};
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::core::{AdaptiveTimestampParser, Sample, TICKS_PER_SECOND};
use crate::error::{StudyError, StudyResult};

use super::{EntityTemplate, ResolvedSource, SampleParser, SourceReader, map_columns};

/// Samples one task produced for one (entity, session, condition) cell.
///
/// Consumed exactly once by the merge step.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportBlock {
    pub entity_id: i32,
    pub session: usize,
    pub condition: usize,
    pub samples: Vec<Sample>,
    pub max_speed: f64,
}

/// Parses one data file end-to-end for every entity reading it.
///
/// A task only reads its inputs and writes task-local blocks, so any number of
/// tasks may run at once.
#[derive(Debug, Clone)]
pub struct FileImportTask<'a> {
    path: PathBuf,
    delimiter: u8,
    readers: Vec<(&'a EntityTemplate, &'a ResolvedSource)>,
}

impl<'a> FileImportTask<'a> {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, delimiter: u8) -> Self {
        Self {
            path: path.into(),
            delimiter,
            readers: Vec::new(),
        }
    }

    /// Registers an entity source backed by this task's file.
    pub fn add_reader(&mut self, template: &'a EntityTemplate, source: &'a ResolvedSource) {
        self.readers.push((template, source));
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn reader_count(&self) -> usize {
        self.readers.len()
    }

    pub fn run<S>(&self, source_reader: &S) -> StudyResult<Vec<ImportBlock>>
    where
        S: SourceReader + ?Sized,
    {
        let input = source_reader.open(&self.path)?;
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(input);

        let header = reader.byte_headers().map_err(|e| self.csv_error(e))?.clone();
        let header = self.decode(header, 1);
        if header.is_empty() {
            return Err(StudyError::MissingHeader(self.path.clone()));
        }

        let templates: Vec<&EntityTemplate> =
            self.readers.iter().map(|(template, _)| *template).collect();
        let mappings = map_columns(header.iter(), &templates);
        let parsers: Vec<SampleParser<'_>> = self
            .readers
            .iter()
            .zip(&mappings)
            .map(|((template, source), mapping)| SampleParser::new(template, mapping, source))
            .collect();
        let mut cells: Vec<Vec<Sample>> = vec![Vec::new(); parsers.len()];
        let mut clocks: IndexMap<usize, AdaptiveTimestampParser> = IndexMap::new();

        let mut row_count = 0_u64;
        for (index, record) in reader.byte_records().enumerate() {
            let record = record.map_err(|e| self.csv_error(e))?;
            let row_number = record
                .position()
                .map_or(index as u64 + 2, |position| position.line());
            let record = self.decode(record, row_number);
            for (parser, cell) in parsers.iter().zip(cells.iter_mut()) {
                if let Some(sample) = parser.parse_row(&record, row_number, &mut clocks) {
                    cell.push(sample);
                }
            }
            row_count += 1;
        }

        let blocks: Vec<ImportBlock> = self
            .readers
            .iter()
            .zip(cells)
            .map(|((template, source), mut samples)| {
                samples.sort_by_key(|sample| sample.timestamp);
                let max_speed = compute_speeds(&mut samples);
                ImportBlock {
                    entity_id: template.info.id,
                    session: source.session,
                    condition: source.condition,
                    samples,
                    max_speed,
                }
            })
            .collect();

        debug!(
            file = %self.path.display(),
            rows = row_count,
            blocks = blocks.len(),
            samples = blocks.iter().map(|block| block.samples.len()).sum::<usize>(),
            "file import task finished"
        );
        Ok(blocks)
    }

    /// Decodes a raw row, replacing invalid UTF-8 instead of failing the file.
    fn decode(&self, record: ByteRecord, row_number: u64) -> StringRecord {
        StringRecord::from_byte_record(record).unwrap_or_else(|err| {
            warn!(
                file = %self.path.display(),
                row = row_number,
                field = err.utf8_error().field(),
                "invalid UTF-8; undecodable bytes replaced"
            );
            StringRecord::from_byte_record_lossy(err.into_byte_record())
        })
    }

    fn csv_error(&self, err: csv::Error) -> StudyError {
        if let csv::ErrorKind::Io(io) = err.kind() {
            return StudyError::Io {
                path: self.path.clone(),
                message: io.to_string(),
            };
        }
        StudyError::Csv {
            path: self.path.clone(),
            message: err.to_string(),
        }
    }
}

/// Writes instantaneous speed (m/s) into every sample and returns the maximum.
///
/// The first sample keeps speed `0`. A non-finite speed (zero time delta)
/// repeats the previous sample's speed and does not count toward the maximum.
pub fn compute_speeds(samples: &mut [Sample]) -> f64 {
    let mut max_speed = 0.0_f64;
    for index in 1..samples.len() {
        let previous = &samples[index - 1];
        let current = &samples[index];
        let delta = i128::from(current.timestamp) - i128::from(previous.timestamp);
        let elapsed = delta as f64 / TICKS_PER_SECOND as f64;
        let distance = (current.position - previous.position).norm();
        let speed = distance / elapsed;

        if speed.is_finite() {
            samples[index].speed = speed;
            max_speed = max_speed.max(speed);
        } else {
            samples[index].speed = samples[index - 1].speed;
        }
    }
    max_speed
}
