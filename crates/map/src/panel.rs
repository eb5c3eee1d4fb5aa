//! Content models for the info panel and tooltips. Markup is the page's job.

use formats::{Connection, CountryStat, StatsTable};
use foundation::text::{group_thousands, truncate_chars};

pub const FALLBACK_FLAG: &str = "🌍";

const FLAGS: &[(&str, &str)] = &[
    ("United States", "🇺🇸"),
    ("United Kingdom", "🇬🇧"),
    ("Germany", "🇩🇪"),
    ("France", "🇫🇷"),
    ("Spain", "🇪🇸"),
    ("Italy", "🇮🇹"),
    ("China", "🇨🇳"),
    ("Japan", "🇯🇵"),
    ("Canada", "🇨🇦"),
    ("Australia", "🇦🇺"),
    ("Brazil", "🇧🇷"),
    ("India", "🇮🇳"),
    ("Mexico", "🇲🇽"),
    ("Netherlands", "🇳🇱"),
    ("Switzerland", "🇨🇭"),
    ("Singapore", "🇸🇬"),
    ("South Korea", "🇰🇷"),
    ("Turkey", "🇹🇷"),
    ("United Arab Emirates", "🇦🇪"),
    ("Thailand", "🇹🇭"),
    ("Russia", "🇷🇺"),
    ("Indonesia", "🇮🇩"),
    ("Malaysia", "🇲🇾"),
    ("Philippines", "🇵🇭"),
    ("Vietnam", "🇻🇳"),
    ("South Africa", "🇿🇦"),
    ("Egypt", "🇪🇬"),
    ("Saudi Arabia", "🇸🇦"),
    ("Qatar", "🇶🇦"),
    ("Israel", "🇮🇱"),
    ("Greece", "🇬🇷"),
    ("Portugal", "🇵🇹"),
    ("Ireland", "🇮🇪"),
    ("Poland", "🇵🇱"),
    ("Sweden", "🇸🇪"),
    ("Norway", "🇳🇴"),
    ("Denmark", "🇩🇰"),
    ("Finland", "🇫🇮"),
    ("Austria", "🇦🇹"),
    ("Belgium", "🇧🇪"),
    ("Argentina", "🇦🇷"),
    ("Chile", "🇨🇱"),
    ("Colombia", "🇨🇴"),
    ("Peru", "🇵🇪"),
    ("New Zealand", "🇳🇿"),
    ("Morocco", "🇲🇦"),
    ("Kenya", "🇰🇪"),
    ("Nigeria", "🇳🇬"),
];

pub fn flag_for(country: &str) -> &'static str {
    FLAGS
        .iter()
        .find(|(name, _)| *name == country)
        .map(|(_, flag)| *flag)
        .unwrap_or(FALLBACK_FLAG)
}

const PANEL_AIRPORTS: usize = 3;
const EDGE_AIRPORTS: usize = 2;
const TOOLTIP_DESTINATIONS: usize = 3;
const AIRPORT_NAME_CHARS: usize = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct AirportLine {
    pub name: String,
    pub iata: String,
    pub destinations: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountryPanel {
    pub flag: &'static str,
    pub name: String,
    pub connected_countries: u32,
    /// Thousands-grouped.
    pub total_routes: String,
    pub airports: u32,
    /// Empty when the country has no airport list; the section is omitted.
    pub major_airports: Vec<AirportLine>,
}

impl CountryPanel {
    pub fn new(stat: &CountryStat) -> Self {
        Self {
            flag: flag_for(&stat.name),
            name: stat.name.clone(),
            connected_countries: stat.num_countries_connected,
            total_routes: group_thousands(stat.total_routes),
            airports: stat.num_airports,
            major_airports: stat
                .top_airports
                .iter()
                .take(PANEL_AIRPORTS)
                .map(|a| AirportLine {
                    name: truncate_chars(&a.name, AIRPORT_NAME_CHARS),
                    iata: a.iata.clone(),
                    destinations: a.destinations,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeEndpoint {
    pub flag: &'static str,
    pub name: String,
    /// `None` when unknown or zero; shown as "N/A".
    pub connected_countries: Option<u32>,
    pub main_airports: Vec<String>,
}

impl EdgeEndpoint {
    fn new(name: &str, stat: Option<&CountryStat>) -> Self {
        Self {
            flag: flag_for(name),
            name: name.to_string(),
            connected_countries: stat
                .map(|s| s.num_countries_connected)
                .filter(|&n| n > 0),
            main_airports: stat
                .map(|s| {
                    s.top_airports
                        .iter()
                        .take(EDGE_AIRPORTS)
                        .map(|a| a.iata.clone())
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    pub fn connected_label(&self) -> String {
        match self.connected_countries {
            Some(n) => n.to_string(),
            None => "N/A".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgePanel {
    pub routes: u32,
    pub from: EdgeEndpoint,
    pub to: EdgeEndpoint,
    pub back_label: String,
}

impl EdgePanel {
    pub fn new(edge: &Connection, stats: &StatsTable) -> Self {
        Self {
            routes: edge.num_routes,
            from: EdgeEndpoint::new(&edge.source, stats.get(&edge.source)),
            to: EdgeEndpoint::new(&edge.dest, stats.get(&edge.dest)),
            back_label: format!("← Back to {}", edge.source),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InfoPanel {
    Country(CountryPanel),
    Edge(EdgePanel),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DestinationLine {
    pub country: String,
    pub routes: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Tooltip {
    Country {
        flag: &'static str,
        name: String,
        connected_countries: u32,
        total_routes: String,
        top_destinations: Vec<DestinationLine>,
    },
    Connection {
        from: String,
        to: String,
        routes: u32,
    },
}

impl Tooltip {
    pub fn country(stat: &CountryStat) -> Self {
        Tooltip::Country {
            flag: flag_for(&stat.name),
            name: stat.name.clone(),
            connected_countries: stat.num_countries_connected,
            total_routes: group_thousands(stat.total_routes),
            top_destinations: stat
                .top_destinations
                .iter()
                .take(TOOLTIP_DESTINATIONS)
                .map(|d| DestinationLine {
                    country: d.country.clone(),
                    routes: d.routes,
                })
                .collect(),
        }
    }

    pub fn connection(conn: &Connection) -> Self {
        Tooltip::Connection {
            from: conn.source.clone(),
            to: conn.dest.clone(),
            routes: conn.num_routes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CountryPanel, EdgePanel, Tooltip, flag_for};
    use formats::{parse_connections, parse_stats};
    use pretty_assertions::assert_eq;

    const STATS: &str = r#"{
        "Germany": {
            "coords": [10.4, 51.1], "num_countries_connected": 110, "total_routes": 4821, "num_airports": 38,
            "top_airports": [
                {"iata": "FRA", "name": "Frankfurt am Main International Airport", "destinations": 290},
                {"iata": "MUC", "name": "Munich Airport", "destinations": 210},
                {"iata": "DUS", "name": "Dusseldorf International Airport", "destinations": 180},
                {"iata": "TXL", "name": "Berlin-Tegel Airport", "destinations": 120}
            ],
            "top_destinations": [
                {"country": "Spain", "routes": 600}, {"country": "Italy", "routes": 400},
                {"country": "Turkey", "routes": 300}, {"country": "France", "routes": 200}
            ]
        },
        "Tuvalu": { "coords": [179.2, -7.1], "total_routes": 2 }
    }"#;

    #[test]
    fn country_panel_truncates_and_groups() {
        let stats = parse_stats(STATS).expect("stats");
        let panel = CountryPanel::new(stats.get("Germany").expect("germany"));
        assert_eq!(panel.flag, "🇩🇪");
        assert_eq!(panel.total_routes, "4,821");
        assert_eq!(panel.major_airports.len(), 3);
        assert_eq!(panel.major_airports[0].name, "Frankfurt am Main Internationa...");
        assert_eq!(panel.major_airports[1].name, "Munich Airport");

        let bare = CountryPanel::new(stats.get("Tuvalu").expect("tuvalu"));
        assert_eq!(bare.flag, "🌍");
        assert!(bare.major_airports.is_empty());
    }

    #[test]
    fn edge_panel_marks_missing_counts_as_na() {
        let stats = parse_stats(STATS).expect("stats");
        let edge = &parse_connections(
            r#"[{"source": "Germany", "dest": "Tuvalu", "source_coords": [10.4, 51.1], "dest_coords": [179.2, -7.1], "num_routes": 1}]"#,
        )
        .expect("connections")[0];
        let panel = EdgePanel::new(edge, &stats);
        assert_eq!(panel.from.connected_label(), "110");
        assert_eq!(panel.from.main_airports, vec!["FRA", "MUC"]);
        assert_eq!(panel.to.connected_label(), "N/A");
        assert!(panel.to.main_airports.is_empty());
        assert_eq!(panel.back_label, "← Back to Germany");
    }

    #[test]
    fn country_tooltip_keeps_three_destinations() {
        let stats = parse_stats(STATS).expect("stats");
        match Tooltip::country(stats.get("Germany").expect("germany")) {
            Tooltip::Country { top_destinations, total_routes, .. } => {
                assert_eq!(total_routes, "4,821");
                let names: Vec<&str> = top_destinations.iter().map(|d| d.country.as_str()).collect();
                assert_eq!(names, vec!["Spain", "Italy", "Turkey"]);
            }
            other => panic!("unexpected tooltip {other:?}"),
        }
        assert_eq!(flag_for("Atlantis"), "🌍");
    }
}
