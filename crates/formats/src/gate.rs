//! All-or-nothing loading of the three map datasets.
//!
//! Fetches complete in any order; each payload is handed to [`LoadGate`] as it
//! arrives. The gate yields a [`Dataset`] only once all three parsed, and a
//! single error as soon as any one fails. Either outcome is yielded once.

use crate::dataset::{Connection, StatsTable, parse_connections, parse_stats};
use crate::error::{DatasetKind, LoadError};
use crate::topology::{CountryFeature, decode_countries};

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub boundaries: Vec<CountryFeature>,
    pub connections: Vec<Connection>,
    pub stats: StatsTable,
}

#[derive(Debug, Default)]
enum GateState {
    #[default]
    Pending,
    Failed(LoadError),
    Done,
}

#[derive(Debug, Default)]
pub struct LoadGate {
    boundaries: Option<Vec<CountryFeature>>,
    connections: Option<Vec<Connection>>,
    stats: Option<StatsTable>,
    state: GateState,
}

impl LoadGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one fetch outcome. `Err` carries the transport failure text.
    /// Ignored after the gate failed or finished.
    pub fn accept(&mut self, kind: DatasetKind, fetched: Result<String, String>) {
        if !matches!(self.state, GateState::Pending) {
            tracing::debug!(dataset = %kind, "load gate closed; ignoring payload");
            return;
        }
        let result = match fetched {
            Ok(payload) => self.parse(kind, &payload),
            Err(message) => Err(LoadError::Fetch {
                dataset: kind,
                message,
            }),
        };
        if let Err(err) = result {
            tracing::warn!(dataset = %kind, error = %err, "dataset load failed");
            self.boundaries = None;
            self.connections = None;
            self.stats = None;
            self.state = GateState::Failed(err);
        }
    }

    fn parse(&mut self, kind: DatasetKind, payload: &str) -> Result<(), LoadError> {
        match kind {
            DatasetKind::Boundaries => {
                let features = decode_countries(payload)?;
                tracing::debug!(features = features.len(), "boundaries decoded");
                self.boundaries = Some(features);
            }
            DatasetKind::Connections => {
                let connections = parse_connections(payload)
                    .map_err(|error| LoadError::Parse { dataset: kind, error })?;
                tracing::debug!(connections = connections.len(), "connections parsed");
                self.connections = Some(connections);
            }
            DatasetKind::Stats => {
                let stats = parse_stats(payload)
                    .map_err(|error| LoadError::Parse { dataset: kind, error })?;
                tracing::debug!(countries = stats.len(), "stats parsed");
                self.stats = Some(stats);
            }
        }
        Ok(())
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, GateState::Pending)
    }

    pub fn missing(&self) -> Vec<DatasetKind> {
        DatasetKind::ALL
            .into_iter()
            .filter(|kind| match kind {
                DatasetKind::Boundaries => self.boundaries.is_none(),
                DatasetKind::Connections => self.connections.is_none(),
                DatasetKind::Stats => self.stats.is_none(),
            })
            .collect()
    }

    /// The load outcome, once it is known. Returns `Some` exactly once.
    pub fn take_ready(&mut self) -> Option<Result<Dataset, LoadError>> {
        match std::mem::take(&mut self.state) {
            GateState::Pending => {
                if self.boundaries.is_none() || self.connections.is_none() || self.stats.is_none() {
                    return None;
                }
                let (Some(boundaries), Some(connections), Some(stats)) = (
                    self.boundaries.take(),
                    self.connections.take(),
                    self.stats.take(),
                ) else {
                    return None;
                };
                self.state = GateState::Done;
                tracing::info!(
                    countries = boundaries.len(),
                    connections = connections.len(),
                    stats = stats.len(),
                    "datasets loaded"
                );
                Some(Ok(Dataset {
                    boundaries,
                    connections,
                    stats,
                }))
            }
            GateState::Failed(err) => {
                self.state = GateState::Done;
                Some(Err(err))
            }
            GateState::Done => {
                self.state = GateState::Done;
                None
            }
        }
    }
}
