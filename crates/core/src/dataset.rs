//! Dataset identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::metadata::Metadata;

/// Reference to a dataset: the namespace scope that owns artifacts.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetId {
    pub project: String,
    pub domain: String,
    pub name: String,
    pub version: String,
}

impl DatasetId {
    /// Create a dataset id from its four components.
    pub fn new(
        project: impl Into<String>,
        domain: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            domain: domain.into(),
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Debug for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DatasetId({self})")
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.project, self.domain, self.name, self.version
        )
    }
}

/// A registered dataset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: DatasetId,
    #[serde(default)]
    pub metadata: Metadata,
}
