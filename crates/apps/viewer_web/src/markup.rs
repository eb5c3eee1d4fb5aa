//! HTML for the info panel and tooltip.

use std::fmt::Write;

use map::{CountryPanel, EdgeEndpoint, EdgePanel, InfoPanel, Tooltip};

/// Class of the back button inside the edge panel.
pub const BACK_BUTTON_CLASS: &str = "back-to-country";

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn panel_html(panel: &InfoPanel) -> String {
    match panel {
        InfoPanel::Country(panel) => country_panel_html(panel),
        InfoPanel::Edge(panel) => edge_panel_html(panel),
    }
}

fn info_stat(out: &mut String, label: &str, value: &str) {
    let _ = write!(
        out,
        r#"<div class="info-stat"><div class="info-stat-label">{label}</div><div class="info-stat-value">{value}</div></div>"#
    );
}

fn country_panel_html(panel: &CountryPanel) -> String {
    let mut out = format!(
        r#"<h3><span class="flag">{}</span> {}</h3>"#,
        panel.flag,
        escape(&panel.name)
    );
    info_stat(&mut out, "Connected Countries", &panel.connected_countries.to_string());
    info_stat(&mut out, "Total Routes", &panel.total_routes);
    info_stat(&mut out, "International Airports", &panel.airports.to_string());
    if !panel.major_airports.is_empty() {
        out.push_str(r#"<div class="info-section"><h4>Major Airports</h4>"#);
        for airport in &panel.major_airports {
            let _ = write!(
                out,
                r#"<div class="airport"><div class="airport-name">{}</div><div class="airport-meta"><span class="iata">{}</span> · {} destinations</div></div>"#,
                escape(&airport.name),
                escape(&airport.iata),
                airport.destinations
            );
        }
        out.push_str("</div>");
    }
    out
}

fn endpoint_html(out: &mut String, direction: &str, endpoint: &EdgeEndpoint) {
    let _ = write!(
        out,
        r#"<div class="info-section"><h4>{} {direction} {}</h4><div class="endpoint-connections">Total connections: <span>{}</span> countries</div>"#,
        endpoint.flag,
        escape(&endpoint.name),
        endpoint.connected_label()
    );
    if !endpoint.main_airports.is_empty() {
        let _ = write!(
            out,
            r#"<div class="endpoint-airports">Main airports: <span>{}</span></div>"#,
            escape(&endpoint.main_airports.join(", "))
        );
    }
    out.push_str("</div>");
}

fn edge_panel_html(panel: &EdgePanel) -> String {
    let mut out = format!(
        r#"<h3><span class="flag">{}</span> {} <span class="arrow">→</span> <span class="flag">{}</span> {}</h3>"#,
        panel.from.flag,
        escape(&panel.from.name),
        panel.to.flag,
        escape(&panel.to.name)
    );
    info_stat(&mut out, "Direct Routes", &panel.routes.to_string());
    endpoint_html(&mut out, "From", &panel.from);
    endpoint_html(&mut out, "To", &panel.to);
    let _ = write!(
        out,
        r#"<button class="{BACK_BUTTON_CLASS}">{}</button>"#,
        escape(&panel.back_label)
    );
    out
}

fn tooltip_stat(out: &mut String, label: &str, value: &str) {
    let _ = write!(
        out,
        r#"<div class="stat"><span class="stat-label">{label}</span> <span class="stat-value">{value}</span></div>"#
    );
}

pub fn tooltip_html(tooltip: &Tooltip) -> String {
    match tooltip {
        Tooltip::Country {
            flag,
            name,
            connected_countries,
            total_routes,
            top_destinations,
        } => {
            let mut out = format!("<h3>{flag} {}</h3>", escape(name));
            tooltip_stat(&mut out, "Connected to:", &format!("{connected_countries} countries"));
            tooltip_stat(&mut out, "Total routes:", total_routes);
            if !top_destinations.is_empty() {
                out.push_str(r#"<div class="tooltip-section"><div class="tooltip-heading">Top Destinations</div>"#);
                for dest in top_destinations {
                    let _ = write!(
                        out,
                        r#"<div class="destination">{} ({} routes)</div>"#,
                        escape(&dest.country),
                        dest.routes
                    );
                }
                out.push_str("</div>");
            }
            out
        }
        Tooltip::Connection { from, to, routes } => {
            let mut out = String::from("<h3>Route Connection</h3>");
            tooltip_stat(&mut out, "From:", &escape(from));
            tooltip_stat(&mut out, "To:", &escape(to));
            tooltip_stat(&mut out, "Routes:", &routes.to_string());
            out
        }
    }
}
