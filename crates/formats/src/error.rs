use std::fmt;

use thiserror::Error;

/// The three payloads the map needs before it can initialize.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    Boundaries,
    Connections,
    Stats,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 3] = [
        DatasetKind::Boundaries,
        DatasetKind::Connections,
        DatasetKind::Stats,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DatasetKind::Boundaries => "boundaries",
            DatasetKind::Connections => "connections",
            DatasetKind::Stats => "stats",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("invalid topology json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("topology has no object named `{0}`")]
    MissingObject(String),
    #[error("topology object `{0}` is not a geometry collection")]
    NotACollection(String),
    #[error("arc index {index} out of range ({arcs} arcs)")]
    ArcOutOfRange { index: i64, arcs: usize },
}

/// Why the dataset load failed. Any one failure fails the whole load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to fetch {dataset}: {message}")]
    Fetch {
        dataset: DatasetKind,
        message: String,
    },
    #[error("failed to parse {dataset}: {error}")]
    Parse {
        dataset: DatasetKind,
        #[source]
        error: serde_json::Error,
    },
    #[error("failed to decode boundaries: {0}")]
    Topology(#[from] TopologyError),
}

impl LoadError {
    pub fn dataset(&self) -> DatasetKind {
        match self {
            LoadError::Fetch { dataset, .. } | LoadError::Parse { dataset, .. } => *dataset,
            LoadError::Topology(_) => DatasetKind::Boundaries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DatasetKind, LoadError, TopologyError};

    #[test]
    fn messages_name_the_dataset() {
        let err = LoadError::Fetch {
            dataset: DatasetKind::Stats,
            message: "404".to_string(),
        };
        assert_eq!(err.to_string(), "failed to fetch stats: 404");
        assert_eq!(err.dataset(), DatasetKind::Stats);

        let err = LoadError::from(TopologyError::MissingObject("countries".to_string()));
        assert_eq!(err.dataset(), DatasetKind::Boundaries);
        assert!(err.to_string().contains("countries"));
    }
}
