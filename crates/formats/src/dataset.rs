use std::collections::HashMap;

use foundation::math::GeoPoint;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub iata: String,
    pub name: String,
    #[serde(default)]
    pub destinations: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopDestination {
    pub country: String,
    #[serde(default)]
    pub routes: u32,
}

/// Per-country route statistics. Read-only once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryStat {
    pub name: String,
    pub coords: GeoPoint,
    pub num_countries_connected: u32,
    pub total_routes: u64,
    pub num_airports: u32,
    pub top_airports: Vec<Airport>,
    pub top_destinations: Vec<TopDestination>,
}

/// On-disk record; the country name is the enclosing object key.
#[derive(Debug, Deserialize)]
struct StatRecord {
    #[serde(default)]
    coords: Option<GeoPoint>,
    #[serde(default)]
    num_countries_connected: u32,
    #[serde(default)]
    total_routes: u64,
    #[serde(default)]
    num_airports: u32,
    #[serde(default)]
    top_airports: Vec<Airport>,
    #[serde(default)]
    top_destinations: Vec<TopDestination>,
}

/// Country stats in file order, with name lookup.
///
/// File order is kept because it breaks ties in centroid matching.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsTable {
    entries: Vec<CountryStat>,
    index: HashMap<String, usize>,
}

impl StatsTable {
    pub fn from_entries(entries: Vec<CountryStat>) -> Self {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, stat) in entries.iter().enumerate() {
            // First occurrence wins, matching the ordered lookup below.
            index.entry(stat.name.clone()).or_insert(i);
        }
        Self { entries, index }
    }

    pub fn get(&self, name: &str) -> Option<&CountryStat> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Entries in file order.
    pub fn iter(&self) -> impl Iterator<Item = &CountryStat> + '_ {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Country names sorted alphabetically, for the country picker.
    pub fn sorted_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.iter().map(|s| s.name.clone()).collect();
        names.sort();
        names.dedup();
        names
    }
}

impl<'de> Deserialize<'de> for StatsTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: IndexMap<String, StatRecord> = IndexMap::deserialize(deserializer)?;
        let entries = raw
            .into_iter()
            .map(|(name, r)| CountryStat {
                name,
                coords: r.coords.unwrap_or_default(),
                num_countries_connected: r.num_countries_connected,
                total_routes: r.total_routes,
                num_airports: r.num_airports,
                top_airports: r.top_airports,
                top_destinations: r.top_destinations,
            })
            .collect();
        Ok(Self::from_entries(entries))
    }
}

/// One directed country-to-country link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub source: String,
    pub dest: String,
    pub source_coords: GeoPoint,
    pub dest_coords: GeoPoint,
    #[serde(default)]
    pub num_routes: u32,
}

impl Connection {
    /// Same directed pair, ignoring route counts and coordinates.
    pub fn same_route(&self, other: &Connection) -> bool {
        self.source == other.source && self.dest == other.dest
    }
}

pub fn parse_connections(payload: &str) -> Result<Vec<Connection>, serde_json::Error> {
    serde_json::from_str(payload)
}

pub fn parse_stats(payload: &str) -> Result<StatsTable, serde_json::Error> {
    serde_json::from_str(payload)
}

#[cfg(test)]
mod tests {
    use super::{parse_connections, parse_stats};
    use foundation::math::GeoPoint;
    use pretty_assertions::assert_eq;

    const STATS: &str = r#"{
        "United States": {
            "coords": [-98.5, 39.8],
            "num_countries_connected": 120,
            "total_routes": 14500,
            "num_airports": 540,
            "top_airports": [{"iata": "ATL", "name": "Hartsfield-Jackson", "destinations": 220}],
            "top_destinations": [{"country": "Mexico", "routes": 610}]
        },
        "Atlantis": { "coords": [0, 0], "total_routes": 3 },
        "Canada": { "coords": [-106.3, 56.1], "num_countries_connected": 60, "total_routes": 2100, "num_airports": 90 }
    }"#;

    #[test]
    fn stats_keep_file_order_and_default_optional_fields() {
        let table = parse_stats(STATS).expect("parse stats");
        let names: Vec<&str> = table.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["United States", "Atlantis", "Canada"]);

        let atlantis = table.get("Atlantis").expect("present");
        assert_eq!(atlantis.coords, GeoPoint::new(0.0, 0.0));
        assert!(atlantis.top_airports.is_empty());
        assert_eq!(atlantis.num_airports, 0);

        let us = table.get("United States").expect("present");
        assert_eq!(us.top_airports[0].iata, "ATL");
        assert_eq!(us.top_destinations[0].routes, 610);
        assert!(table.get("Narnia").is_none());
    }

    #[test]
    fn sorted_names_are_alphabetical() {
        let table = parse_stats(STATS).expect("parse stats");
        assert_eq!(
            table.sorted_names(),
            vec!["Atlantis", "Canada", "United States"]
        );
    }

    #[test]
    fn connections_parse_in_order() {
        let conns = parse_connections(
            r#"[
                {"source": "Japan", "dest": "Korea", "source_coords": [138.2, 36.2], "dest_coords": [127.8, 35.9], "num_routes": 42},
                {"source": "Japan", "dest": "China", "source_coords": [138.2, 36.2], "dest_coords": [104.2, 35.9], "num_routes": 77}
            ]"#,
        )
        .expect("parse connections");
        assert_eq!(conns.len(), 2);
        assert_eq!(conns[1].dest, "China");
        assert_eq!(conns[0].dest_coords, GeoPoint::new(127.8, 35.9));
        assert!(!conns[0].same_route(&conns[1]));
    }

    #[test]
    fn malformed_connections_are_rejected() {
        assert!(parse_connections(r#"[{"source": "Japan"}]"#).is_err());
        assert!(parse_stats("[1, 2]").is_err());
    }
}
