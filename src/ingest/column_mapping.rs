use crate::core::FieldSource;

use super::EntityTemplate;

/// Header positions of every semantic role of one entity in one file.
///
/// `None` means the role is not sourced from this file and keeps its literal
/// default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnMapping {
    pub timestamp: Option<usize>,
    pub position: [Option<usize>; 3],
    pub rotation: [Option<usize>; 4],
    pub scale: [Option<usize>; 3],
    pub state: Option<usize>,
    pub condition_filter: Option<usize>,
    pub session_filter: Option<usize>,
}

impl ColumnMapping {
    fn assign(&mut self, column_index: usize, column_name: &str, template: &EntityTemplate) {
        let matches = |source: &FieldSource| source.column() == Some(column_name);
        let matches_name = |name: &Option<String>| name.as_deref() == Some(column_name);

        if matches(&template.timestamp) {
            self.timestamp = Some(column_index);
        }
        for (axis, source) in template.position.iter().enumerate() {
            if matches(source) {
                self.position[axis] = Some(column_index);
            }
        }
        for (component, source) in template.rotation.iter().enumerate() {
            if matches(source) {
                self.rotation[component] = Some(column_index);
            }
        }
        for (axis, source) in template.scale.iter().enumerate() {
            if matches(source) {
                self.scale[axis] = Some(column_index);
            }
        }
        if matches_name(&template.state) {
            self.state = Some(column_index);
        }
        if matches_name(&template.condition_filter_column) {
            self.condition_filter = Some(column_index);
        }
        if matches_name(&template.session_filter_column) {
            self.session_filter = Some(column_index);
        }
    }

    /// Number of roles resolved to a column.
    #[must_use]
    pub fn resolved_count(&self) -> usize {
        let optional = [
            self.timestamp,
            self.state,
            self.condition_filter,
            self.session_filter,
        ];
        optional
            .iter()
            .chain(self.position.iter())
            .chain(self.rotation.iter())
            .chain(self.scale.iter())
            .filter(|slot| slot.is_some())
            .count()
    }
}

/// Resolves column indices for every entity reading a file.
///
/// Each header column is tested against every entity's configured source
/// names; when a name appears more than once, the last column wins.
pub fn map_columns<'h>(
    header: impl IntoIterator<Item = &'h str>,
    templates: &[&EntityTemplate],
) -> Vec<ColumnMapping> {
    let mut mappings = vec![ColumnMapping::default(); templates.len()];
    for (column_index, column_name) in header.into_iter().enumerate() {
        let column_name = column_name.trim();
        for (mapping, template) in mappings.iter_mut().zip(templates) {
            mapping.assign(column_index, column_name, template);
        }
    }
    mappings
}
