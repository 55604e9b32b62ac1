use csv::StringRecord;
use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::{error, warn};

use crate::core::{AdaptiveTimestampParser, Sample};

use super::{ColumnMapping, EntityTemplate, RawSample, ResolvedSource};

/// One field parser, selected once per (file, entity) from the column mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStep {
    Timestamp { column: usize },
    Position { axis: usize, column: usize },
    Rotation { component: usize, column: usize },
    Scale { axis: usize, column: usize },
    State { column: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RowFilter {
    column: usize,
    expected: String,
}

/// Turns rows of one file into normalized samples for one entity and cell.
#[derive(Debug, Clone)]
pub struct SampleParser<'t> {
    template: &'t EntityTemplate,
    steps: SmallVec<[ParseStep; 16]>,
    filters: SmallVec<[RowFilter; 2]>,
}

impl<'t> SampleParser<'t> {
    #[must_use]
    pub fn new(template: &'t EntityTemplate, mapping: &ColumnMapping, source: &ResolvedSource) -> Self {
        let mut steps: SmallVec<[ParseStep; 16]> = SmallVec::new();
        if let Some(column) = mapping.timestamp {
            steps.push(ParseStep::Timestamp { column });
        }
        for (axis, column) in mapping.position.iter().enumerate() {
            if let Some(column) = *column {
                steps.push(ParseStep::Position { axis, column });
            }
        }
        for (component, column) in mapping.rotation.iter().enumerate() {
            if let Some(column) = *column {
                steps.push(ParseStep::Rotation { component, column });
            }
        }
        for (axis, column) in mapping.scale.iter().enumerate() {
            if let Some(column) = *column {
                steps.push(ParseStep::Scale { axis, column });
            }
        }
        if let Some(column) = mapping.state {
            steps.push(ParseStep::State { column });
        }

        let mut filters: SmallVec<[RowFilter; 2]> = SmallVec::new();
        let declared = [
            (
                &template.condition_filter_column,
                mapping.condition_filter,
                &source.condition_filter,
            ),
            (
                &template.session_filter_column,
                mapping.session_filter,
                &source.session_filter,
            ),
        ];
        for (name, column, expected) in declared {
            match (name, column) {
                (Some(_), Some(column)) => filters.push(RowFilter {
                    column,
                    expected: expected.clone(),
                }),
                (Some(name), None) => warn!(
                    entity_id = template.info.id,
                    file = %source.path.display(),
                    column = %name,
                    "filter column not present in header; rows are not filtered"
                ),
                (None, _) => {}
            }
        }

        Self {
            template,
            steps,
            filters,
        }
    }

    #[must_use]
    pub fn steps(&self) -> &[ParseStep] {
        &self.steps
    }

    #[must_use]
    pub fn template(&self) -> &EntityTemplate {
        self.template
    }

    /// Whether the row passes every configured condition/session filter.
    #[must_use]
    pub fn accepts(&self, row: &StringRecord) -> bool {
        self.filters
            .iter()
            .all(|filter| row.get(filter.column).map(str::trim) == Some(filter.expected.as_str()))
    }

    /// Parses one data row; `None` when the row is filtered out.
    ///
    /// `clocks` holds one adaptive timestamp parser per timestamp column of
    /// the file, shared by every entity reading it. A column's parser starts
    /// from the format of the first entity that reaches it.
    ///
    /// Unparsable numbers become `0` and unparsable timestamps become tick
    /// `0`; both are logged and parsing continues.
    pub fn parse_row(
        &self,
        row: &StringRecord,
        row_number: u64,
        clocks: &mut IndexMap<usize, AdaptiveTimestampParser>,
    ) -> Option<Sample> {
        if !self.accepts(row) {
            return None;
        }

        let entity_id = self.template.info.id;
        let mut raw: RawSample = self.template.raw_defaults();
        for step in &self.steps {
            match *step {
                ParseStep::Timestamp { column } => {
                    let value = row.get(column).unwrap_or_default();
                    let clock = clocks
                        .entry(column)
                        .or_insert_with(|| AdaptiveTimestampParser::new(self.template.info.time_format));
                    raw.timestamp = clock.parse(value).unwrap_or_else(|| {
                        error!(
                            entity_id,
                            row = row_number,
                            column,
                            value,
                            "no timestamp format matches; using 0"
                        );
                        0
                    });
                }
                ParseStep::Position { axis, column } => {
                    raw.position[axis] = parse_number(row, column, entity_id, row_number);
                }
                ParseStep::Rotation { component, column } => {
                    raw.rotation[component] = parse_number(row, column, entity_id, row_number);
                }
                ParseStep::Scale { axis, column } => {
                    raw.scale[axis] = parse_number(row, column, entity_id, row_number);
                }
                ParseStep::State { column } => {
                    raw.state = row.get(column).map(|value| value.trim().to_owned());
                }
            }
        }

        Some(raw.normalize(&self.template.normalizer))
    }
}

fn parse_number(row: &StringRecord, column: usize, entity_id: i32, row_number: u64) -> f64 {
    let value = row.get(column).map(str::trim).unwrap_or_default();
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => number,
        _ => {
            warn!(entity_id, row = row_number, column, value, "unparsable number; using 0");
            0.0
        }
    }
}
