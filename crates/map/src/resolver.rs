//! Map-feature id to country name.

use std::collections::HashMap;

use formats::{StatsTable, normalize_id};
use foundation::math::{Projection, Vec2, stable_total_cmp_f64};

/// ISO 3166 numeric id to the country names used by the stats dataset.
pub const COUNTRY_IDS: &[(&str, &str)] = &[
    ("840", "United States"),
    ("124", "Canada"),
    ("484", "Mexico"),
    ("826", "United Kingdom"),
    ("276", "Germany"),
    ("250", "France"),
    ("724", "Spain"),
    ("380", "Italy"),
    ("528", "Netherlands"),
    ("756", "Switzerland"),
    ("56", "Belgium"),
    ("40", "Austria"),
    ("620", "Portugal"),
    ("300", "Greece"),
    ("792", "Turkey"),
    ("643", "Russia"),
    ("156", "China"),
    ("392", "Japan"),
    ("410", "South Korea"),
    ("356", "India"),
    ("764", "Thailand"),
    ("702", "Singapore"),
    ("458", "Malaysia"),
    ("360", "Indonesia"),
    ("608", "Philippines"),
    ("704", "Vietnam"),
    ("36", "Australia"),
    ("554", "New Zealand"),
    ("784", "United Arab Emirates"),
    ("682", "Saudi Arabia"),
    ("634", "Qatar"),
    ("376", "Israel"),
    ("818", "Egypt"),
    ("710", "South Africa"),
    ("504", "Morocco"),
    ("404", "Kenya"),
    ("566", "Nigeria"),
    ("76", "Brazil"),
    ("32", "Argentina"),
    ("152", "Chile"),
    ("170", "Colombia"),
    ("604", "Peru"),
    ("208", "Denmark"),
    ("578", "Norway"),
    ("752", "Sweden"),
    ("246", "Finland"),
    ("616", "Poland"),
    ("203", "Czech Republic"),
    ("348", "Hungary"),
    ("642", "Romania"),
    ("100", "Bulgaria"),
    ("191", "Croatia"),
    ("372", "Ireland"),
    ("352", "Iceland"),
    ("804", "Ukraine"),
    ("344", "Hong Kong"),
    ("158", "Taiwan"),
    ("50", "Bangladesh"),
    ("586", "Pakistan"),
    ("144", "Sri Lanka"),
    ("104", "Myanmar"),
    ("116", "Cambodia"),
    ("414", "Kuwait"),
    ("512", "Oman"),
    ("48", "Bahrain"),
    ("400", "Jordan"),
    ("422", "Lebanon"),
];

/// Resolves boundary features to stats entries.
///
/// Exact id lookup first; on a miss, the nearest stats coordinate (projected)
/// to the feature centroid, if strictly closer than the threshold. Stats with
/// degenerate coordinates never match. Ties go to the earlier stats entry.
#[derive(Debug, Clone)]
pub struct EntityResolver {
    exact: HashMap<String, String>,
    candidates: Vec<(String, Vec2)>,
    threshold: f64,
}

impl EntityResolver {
    pub fn new<P: Projection>(stats: &StatsTable, projection: &P, threshold: f64) -> Self {
        Self::with_table(
            COUNTRY_IDS
                .iter()
                .map(|&(id, name)| (id.to_string(), name.to_string())),
            stats,
            projection,
            threshold,
        )
    }

    pub fn with_table<P: Projection>(
        table: impl IntoIterator<Item = (String, String)>,
        stats: &StatsTable,
        projection: &P,
        threshold: f64,
    ) -> Self {
        let exact = table
            .into_iter()
            .map(|(id, name)| (normalize_id(&id), name))
            .collect();
        let candidates = stats
            .iter()
            .filter(|stat| !stat.coords.is_degenerate())
            .map(|stat| (stat.name.clone(), projection.project(stat.coords)))
            .filter(|(_, p)| p.is_finite())
            .collect();
        Self {
            exact,
            candidates,
            threshold,
        }
    }

    pub fn resolve(&self, feature_id: Option<&str>, centroid: Option<Vec2>) -> Option<&str> {
        if let Some(name) = feature_id.and_then(|id| self.exact.get(&normalize_id(id))) {
            return Some(name.as_str());
        }
        self.nearest(centroid?)
    }

    fn nearest(&self, centroid: Vec2) -> Option<&str> {
        if !centroid.is_finite() {
            return None;
        }
        let mut best: Option<(&str, f64)> = None;
        for (name, point) in &self.candidates {
            let distance = point.distance(centroid);
            if stable_total_cmp_f64(distance, self.threshold).is_ge() {
                continue;
            }
            match best {
                Some((_, d)) if stable_total_cmp_f64(distance, d).is_ge() => {}
                _ => best = Some((name.as_str(), distance)),
            }
        }
        best.map(|(name, _)| name)
    }
}

#[cfg(test)]
mod tests {
    use super::EntityResolver;
    use formats::parse_stats;
    use foundation::math::{GeoPoint, NaturalEarth1, Projection, Vec2};

    const STATS: &str = r#"{
        "Japan": { "coords": [138.25, 36.2] },
        "Unknownland": { "coords": [0, 0] },
        "Australia": { "coords": [133.77, -25.27] },
        "Twin A": { "coords": [-40, 10] },
        "Twin B": { "coords": [-40, 10] },
        "Chile": { "coords": [-71.5, -35.7] }
    }"#;

    fn projection() -> NaturalEarth1 {
        NaturalEarth1::for_viewport(200.0, 1400.0, 700.0)
    }

    #[test]
    fn every_located_country_resolves_at_its_own_point() {
        let stats = parse_stats(STATS).expect("stats");
        let proj = projection();

        // Exact path.
        let exact = EntityResolver::with_table(
            stats
                .iter()
                .enumerate()
                .map(|(i, s)| (format!("{}", 900 + i), s.name.clone())),
            &stats,
            &proj,
            100.0,
        );
        for (i, stat) in stats.iter().enumerate() {
            let id = format!("{}", 900 + i);
            assert_eq!(exact.resolve(Some(&id), None), Some(stat.name.as_str()));
        }

        // Fallback path with an empty table.
        let fallback = EntityResolver::with_table(Vec::new(), &stats, &proj, 100.0);
        for stat in stats.iter().filter(|s| !s.coords.is_degenerate()) {
            let at = proj.project(stat.coords);
            let expected = if stat.name == "Twin B" { "Twin A" } else { stat.name.as_str() };
            assert_eq!(fallback.resolve(Some("-99"), Some(at)), Some(expected));
        }
    }

    #[test]
    fn zero_padded_ids_hit_the_builtin_table() {
        let stats = parse_stats(STATS).expect("stats");
        let resolver = EntityResolver::new(&stats, &projection(), 100.0);
        assert_eq!(resolver.resolve(Some("036"), None), Some("Australia"));
        assert_eq!(resolver.resolve(Some("392"), None), Some("Japan"));
    }

    #[test]
    fn fallback_respects_strict_threshold_and_skips_degenerate() {
        let stats = parse_stats(STATS).expect("stats");
        let proj = projection();
        let resolver = EntityResolver::with_table(Vec::new(), &stats, &proj, 100.0);

        // The (0, 0) sentinel is never a candidate.
        let origin = proj.project(GeoPoint::new(0.0, 0.0));
        assert_eq!(resolver.resolve(None, Some(origin)), None);

        let chile = proj.project(GeoPoint::new(-71.5, -35.7));
        assert_eq!(resolver.resolve(None, Some(chile + Vec2::new(99.5, 0.0))), Some("Chile"));
        assert_eq!(resolver.resolve(None, Some(chile + Vec2::new(100.5, 0.0))), None);
        assert_eq!(resolver.resolve(None, None), None);
        assert_eq!(resolver.resolve(None, Some(Vec2::new(f64::NAN, 1.0))), None);
    }

    struct Flat;

    impl Projection for Flat {
        fn project(&self, p: GeoPoint) -> Vec2 {
            Vec2::new(p.lon, p.lat)
        }

        fn invert(&self, p: Vec2) -> Option<GeoPoint> {
            Some(GeoPoint::new(p.x, p.y))
        }
    }

    #[test]
    fn distance_equal_to_threshold_does_not_match() {
        let stats = parse_stats(r#"{ "Here": { "coords": [10, 20] } }"#).expect("stats");
        let resolver = EntityResolver::with_table(Vec::new(), &stats, &Flat, 100.0);
        assert_eq!(resolver.resolve(None, Some(Vec2::new(110.0, 20.0))), None);
        assert_eq!(resolver.resolve(None, Some(Vec2::new(109.0, 20.0))), Some("Here"));
    }
}
