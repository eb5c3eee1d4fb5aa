use formats::DatasetKind;
use serde::Deserialize;

/// Where the page's data lives and which elements the viewer drives.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub boundaries_url: String,
    pub connections_url: String,
    pub stats_url: String,
    pub ids: DomIds,
    /// Wait between scrolling to the map and selecting a linked country.
    pub link_select_delay_ms: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            boundaries_url: "https://cdn.jsdelivr.net/npm/world-atlas@2/countries-110m.json".to_string(),
            connections_url: "processed_data/country_connections_geo.json".to_string(),
            stats_url: "processed_data/country_stats.json".to_string(),
            ids: DomIds::default(),
            link_select_delay_ms: 800,
        }
    }
}

impl ViewerConfig {
    pub fn url(&self, kind: DatasetKind) -> &str {
        match kind {
            DatasetKind::Boundaries => &self.boundaries_url,
            DatasetKind::Connections => &self.connections_url,
            DatasetKind::Stats => &self.stats_url,
        }
    }
}

/// Element ids and selectors; a missing element just disables its control.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DomIds {
    pub panel: String,
    pub tooltip: String,
    pub country_select: String,
    pub zoom_in: String,
    pub zoom_out: String,
    pub zoom_reset: String,
    pub reset: String,
    pub max_routes: String,
    pub routes_value: String,
    /// Scrolled into view before a linked country is selected.
    pub map_section: String,
    /// Page elements whose `data-country` selects that country on click.
    pub country_links: Vec<String>,
}

impl Default for DomIds {
    fn default() -> Self {
        Self {
            panel: "info-panel".to_string(),
            tooltip: "map-tooltip".to_string(),
            country_select: "country-select".to_string(),
            zoom_in: "zoom-in".to_string(),
            zoom_out: "zoom-out".to_string(),
            zoom_reset: "zoom-reset".to_string(),
            reset: "reset-btn".to_string(),
            max_routes: "max-routes".to_string(),
            routes_value: "routes-value".to_string(),
            map_section: "global-map-section".to_string(),
            country_links: vec![
                ".ranking-item[data-country]".to_string(),
                ".gem-card[data-country]".to_string(),
                ".remote-item[data-country]".to_string(),
            ],
        }
    }
}

/// `init_map`'s optional JSON: viewer settings next to the map config.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InitOptions {
    pub viewer: ViewerConfig,
    pub map: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::{InitOptions, ViewerConfig};
    use formats::DatasetKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn urls_follow_dataset_kind() {
        let config = ViewerConfig::default();
        assert_eq!(config.url(DatasetKind::Stats), "processed_data/country_stats.json");
        assert!(config.url(DatasetKind::Boundaries).ends_with("countries-110m.json"));
    }

    #[test]
    fn partial_options_keep_defaults() {
        let options: InitOptions = serde_json::from_str(
            r#"{"viewer": {"stats_url": "data/stats.json", "ids": {"panel": "side"}},
                "map": {"default_max_routes": 5}}"#,
        )
        .unwrap();
        assert_eq!(options.viewer.stats_url, "data/stats.json");
        assert_eq!(options.viewer.ids.panel, "side");
        assert_eq!(options.viewer.ids.tooltip, "map-tooltip");
        assert!(options.map.is_some());
    }

    #[test]
    fn country_links_scroll_to_the_map_section_first() {
        let config = ViewerConfig::default();
        assert_eq!(config.ids.map_section, "global-map-section");
        assert_eq!(
            config.ids.country_links,
            vec![
                ".ranking-item[data-country]",
                ".gem-card[data-country]",
                ".remote-item[data-country]",
            ]
        );
        assert_eq!(config.link_select_delay_ms, 800);

        let options: InitOptions = serde_json::from_str(
            r#"{"viewer": {"link_select_delay_ms": 0, "ids": {"country_links": [".route-row[data-country]"]}}}"#,
        )
        .unwrap();
        assert_eq!(options.viewer.link_select_delay_ms, 0);
        assert_eq!(options.viewer.ids.country_links, vec![".route-row[data-country]"]);
        assert_eq!(options.viewer.ids.map_section, "global-map-section");
    }
}
