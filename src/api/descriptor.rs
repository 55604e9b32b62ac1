use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::EntityKind;
use crate::error::{StudyError, StudyResult};

/// Axis tokens describing the frame a study was recorded in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisDescriptor {
    pub x: String,
    pub y: String,
    pub z: String,
}

impl Default for AxisDescriptor {
    fn default() -> Self {
        Self {
            x: "right".to_owned(),
            y: "up".to_owned(),
            z: "forward".to_owned(),
        }
    }
}

/// Declarative description of a recorded study.
///
/// This type is serializable so hosts can keep study setups as JSON next to
/// the recorded data files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyDescriptor {
    pub name: String,
    #[serde(default)]
    pub axes: AxisDescriptor,
    pub sessions: Vec<String>,
    pub conditions: Vec<String>,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default)]
    pub data_root: Option<PathBuf>,
    #[serde(default)]
    pub entities: Vec<EntityDescriptor>,
}

/// One file contributing samples to an entity for a (session, condition) cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub file: PathBuf,
    pub session: usize,
    pub condition: String,
    /// Value the entity's condition filter column must hold; defaults to the
    /// condition name.
    #[serde(default)]
    pub condition_filter: Option<String>,
    /// Value the entity's session filter column must hold; defaults to the
    /// session name.
    #[serde(default)]
    pub session_filter: Option<String>,
}

/// Per-entity configuration.
///
/// Field entries are either column names or `{value}` literals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    pub id: i32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub kind: EntityKind,
    #[serde(default = "default_parent_id")]
    pub parent_id: i32,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default = "default_rotation_format")]
    pub rotation_format: String,
    #[serde(default = "default_time_format")]
    pub time_format: String,
    #[serde(default = "default_color")]
    pub color: [f32; 4],
    #[serde(default)]
    pub mesh: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default = "default_position")]
    pub position: [String; 3],
    #[serde(default = "default_rotation")]
    pub rotation: Vec<String>,
    #[serde(default = "default_scale")]
    pub scale: [String; 3],
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub condition_filter_column: Option<String>,
    #[serde(default)]
    pub session_filter_column: Option<String>,
    #[serde(default)]
    pub sources: Vec<SourceDescriptor>,
}

impl EntityDescriptor {
    /// Minimal dynamic entity with default conventions and literal transform.
    #[must_use]
    pub fn new(id: i32, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            kind: EntityKind::default(),
            parent_id: default_parent_id(),
            is_static: false,
            unit: default_unit(),
            rotation_format: default_rotation_format(),
            time_format: default_time_format(),
            color: default_color(),
            mesh: None,
            timestamp: None,
            position: default_position(),
            rotation: default_rotation(),
            scale: default_scale(),
            state: None,
            condition_filter_column: None,
            session_filter_column: None,
            sources: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    #[must_use]
    pub fn with_time_format(mut self, time_format: impl Into<String>) -> Self {
        self.time_format = time_format.into();
        self
    }

    /// Sets the rotation convention together with its field entries.
    #[must_use]
    pub fn with_rotation(mut self, rotation_format: impl Into<String>, fields: &[&str]) -> Self {
        self.rotation_format = rotation_format.into();
        self.rotation = fields.iter().map(|field| (*field).to_owned()).collect();
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, column: impl Into<String>) -> Self {
        self.timestamp = Some(column.into());
        self
    }

    #[must_use]
    pub fn with_position(mut self, x: &str, y: &str, z: &str) -> Self {
        self.position = [x.to_owned(), y.to_owned(), z.to_owned()];
        self
    }

    #[must_use]
    pub fn with_scale(mut self, x: &str, y: &str, z: &str) -> Self {
        self.scale = [x.to_owned(), y.to_owned(), z.to_owned()];
        self
    }

    #[must_use]
    pub fn with_state(mut self, column: impl Into<String>) -> Self {
        self.state = Some(column.into());
        self
    }

    #[must_use]
    pub fn with_parent(mut self, parent_id: i32) -> Self {
        self.parent_id = parent_id;
        self
    }

    #[must_use]
    pub fn with_condition_filter_column(mut self, column: impl Into<String>) -> Self {
        self.condition_filter_column = Some(column.into());
        self
    }

    #[must_use]
    pub fn with_session_filter_column(mut self, column: impl Into<String>) -> Self {
        self.session_filter_column = Some(column.into());
        self
    }

    #[must_use]
    pub fn with_source(
        mut self,
        file: impl Into<PathBuf>,
        session: usize,
        condition: impl Into<String>,
    ) -> Self {
        self.sources.push(SourceDescriptor {
            file: file.into(),
            session,
            condition: condition.into(),
            condition_filter: None,
            session_filter: None,
        });
        self
    }
}

impl StudyDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>, sessions: Vec<String>, conditions: Vec<String>) -> Self {
        Self {
            name: name.into(),
            axes: AxisDescriptor::default(),
            sessions,
            conditions,
            delimiter: default_delimiter(),
            data_root: None,
            entities: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_axes(mut self, x: &str, y: &str, z: &str) -> Self {
        self.axes = AxisDescriptor {
            x: x.to_owned(),
            y: y.to_owned(),
            z: z.to_owned(),
        };
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_entity(mut self, entity: EntityDescriptor) -> Self {
        self.entities.push(entity);
        self
    }

    /// Resolves a declared source path against `data_root`.
    #[must_use]
    pub fn resolve_path(&self, file: &Path) -> PathBuf {
        match &self.data_root {
            Some(root) if file.is_relative() => root.join(file),
            _ => file.to_path_buf(),
        }
    }

    /// Reads a descriptor document from disk.
    ///
    /// Relative data paths resolve against the descriptor's directory unless
    /// the document sets `data_root` itself.
    pub fn from_json_file(path: impl AsRef<Path>) -> StudyResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| StudyError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut descriptor = Self::from_json_compat_str(&raw)?;
        if descriptor.data_root.is_none() {
            descriptor.data_root = path.parent().map(Path::to_path_buf);
        }
        Ok(descriptor)
    }
}

fn default_delimiter() -> char {
    ','
}

fn default_parent_id() -> i32 {
    -1
}

fn default_unit() -> String {
    "m".to_owned()
}

fn default_rotation_format() -> String {
    "quaternion".to_owned()
}

fn default_time_format() -> String {
    "seconds".to_owned()
}

fn default_color() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

fn default_position() -> [String; 3] {
    ["{0}".to_owned(), "{0}".to_owned(), "{0}".to_owned()]
}

fn default_rotation() -> Vec<String> {
    vec![
        "{1}".to_owned(),
        "{0}".to_owned(),
        "{0}".to_owned(),
        "{0}".to_owned(),
    ]
}

fn default_scale() -> [String; 3] {
    ["{1}".to_owned(), "{1}".to_owned(), "{1}".to_owned()]
}
