use std::collections::HashMap;

use crate::braille::BrailleCanvas;
use crate::map::cluster::{self, Cluster};
use crate::map::geometry::{draw_disc, draw_line, draw_ring};
use crate::map::Projection;
use crate::news::format::summary_lines;
use crate::news::group::{group_by_coordinates, CoordinateKey};
use crate::news::NewsRecord;

/// A geographic line (sequence of lon/lat coordinates)
pub type LineString = Vec<(f64, f64)>;

/// Markers closer than this merge into one cluster (braille pixels).
const CLUSTER_CELL_PX: i32 = 12;
/// Click picking radius around a cluster centroid (braille pixels).
const PICK_RADIUS_PX: i32 = 8;

/// Level of detail for basemap data
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Lod {
    Low,    // 110m - world view
    Medium, // 50m - continental
    High,   // 10m - regional
}

impl Lod {
    /// Select LOD based on zoom level
    pub fn from_zoom(zoom: f64) -> Self {
        if zoom < 2.0 {
            Lod::Low
        } else if zoom < 8.0 {
            Lod::Medium
        } else {
            Lod::High
        }
    }
}

/// One news marker: a unique coordinate with every summary contributed there.
#[derive(Clone, Debug)]
pub struct Marker {
    pub lon: f64,
    pub lat: f64,
    /// First location name seen at this coordinate
    pub location: Option<String>,
    /// First headline seen at this coordinate (overlay labels)
    pub headline: Option<String>,
    /// Summaries in input record order
    pub summaries: Vec<String>,
}

impl Marker {
    /// Panel/label title: the location name, or the raw coordinate.
    pub fn title(&self) -> String {
        match &self.location {
            Some(name) => name.clone(),
            None => format!("{:.4}, {:.4}", self.lat, self.lon),
        }
    }
}

/// Build one marker per unique coordinate from the raw records.
///
/// Grouping is by exact coordinate equality; the first non-empty location
/// and headline contributed at a coordinate name its marker. Output order is
/// deterministic (sorted by coordinate key) so rendering and tests are
/// stable across runs.
pub fn markers_from_records(records: &[NewsRecord]) -> Vec<Marker> {
    let groups = group_by_coordinates(records);

    let mut locations: HashMap<CoordinateKey, &str> = HashMap::new();
    let mut headlines: HashMap<CoordinateKey, &str> = HashMap::new();
    for record in records {
        if let Some([lat, lon]) = record.coordinates {
            let key = CoordinateKey::new(lat, lon);
            if let Some(location) = record.location.as_deref().filter(|s| !s.is_empty()) {
                locations.entry(key).or_insert(location);
            }
            if let Some(headline) = record.headline.as_deref().filter(|s| !s.is_empty()) {
                headlines.entry(key).or_insert(headline);
            }
        }
    }

    let mut markers: Vec<Marker> = groups
        .into_iter()
        .map(|(key, summaries)| Marker {
            lon: key.lon(),
            lat: key.lat(),
            location: locations.get(&key).map(|s| s.to_string()),
            headline: headlines.get(&key).map(|s| s.to_string()),
            summaries,
        })
        .collect();
    markers.sort_by_key(|m| CoordinateKey::new(m.lat, m.lon).sort_bits());
    markers
}

/// Runtime layer toggles
#[derive(Clone)]
pub struct DisplaySettings {
    pub show_coastlines: bool,
    pub show_borders: bool,
    pub show_labels: bool,
    /// Label-overlay variant: headline boxes pinned at marker positions
    pub show_overlay: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_coastlines: true,
            show_borders: true,
            show_labels: true,
            show_overlay: false,
        }
    }
}

/// What a text label is, so the widget layer can style it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LabelKind {
    /// Location name beside a single marker
    Name,
    /// Member count beside a cluster ring
    Count,
    /// Boxed headline pinned at a marker (overlay mode)
    Overlay,
}

/// A positioned text label in character coordinates.
#[derive(Clone, Debug)]
pub struct Label {
    pub x: u16,
    pub y: u16,
    pub text: String,
    pub kind: LabelKind,
}

/// Per-frame render output: one canvas per color layer plus text labels.
pub struct MapLayers {
    pub coastlines: BrailleCanvas,
    pub borders: BrailleCanvas,
    pub markers: BrailleCanvas,
    pub labels: Vec<Label>,
}

/// Renderer owning the basemap geometry, the news markers and the layer
/// toggles.
pub struct MapRenderer {
    coastlines_low: Vec<LineString>,
    coastlines_medium: Vec<LineString>,
    coastlines_high: Vec<LineString>,
    borders: Vec<LineString>,
    pub markers: Vec<Marker>,
    pub settings: DisplaySettings,
}

impl MapRenderer {
    pub fn new() -> Self {
        Self {
            coastlines_low: Vec::new(),
            coastlines_medium: Vec::new(),
            coastlines_high: Vec::new(),
            borders: Vec::new(),
            markers: Vec::new(),
            settings: DisplaySettings::default(),
        }
    }

    pub fn add_coastline(&mut self, line: LineString, lod: Lod) {
        match lod {
            Lod::Low => self.coastlines_low.push(line),
            Lod::Medium => self.coastlines_medium.push(line),
            Lod::High => self.coastlines_high.push(line),
        }
    }

    pub fn add_border(&mut self, line: LineString) {
        self.borders.push(line);
    }

    pub fn set_markers(&mut self, markers: Vec<Marker>) {
        self.markers = markers;
    }

    pub fn has_basemap(&self) -> bool {
        !self.coastlines_low.is_empty()
            || !self.coastlines_medium.is_empty()
            || !self.coastlines_high.is_empty()
    }

    pub fn toggle_coastlines(&mut self) {
        self.settings.show_coastlines = !self.settings.show_coastlines;
    }

    pub fn toggle_borders(&mut self) {
        self.settings.show_borders = !self.settings.show_borders;
    }

    pub fn toggle_labels(&mut self) {
        self.settings.show_labels = !self.settings.show_labels;
    }

    pub fn toggle_overlay(&mut self) {
        self.settings.show_overlay = !self.settings.show_overlay;
    }

    /// Coastlines at the requested LOD, falling back to coarser data when a
    /// resolution was never loaded.
    fn coastlines_at(&self, lod: Lod) -> &[LineString] {
        match lod {
            Lod::High if !self.coastlines_high.is_empty() => &self.coastlines_high,
            Lod::High | Lod::Medium if !self.coastlines_medium.is_empty() => {
                &self.coastlines_medium
            }
            _ => &self.coastlines_low,
        }
    }

    /// Render all layers for one frame. Basemap and marker layers are
    /// independent rasters, so they render on parallel rayon branches.
    pub fn render(&self, cols: usize, rows: usize, proj: &Projection) -> MapLayers {
        let ((coastlines, borders), (markers, labels)) = rayon::join(
            || self.render_basemap(cols, rows, proj),
            || self.render_markers(cols, rows, proj),
        );
        MapLayers {
            coastlines,
            borders,
            markers,
            labels,
        }
    }

    fn render_basemap(
        &self,
        cols: usize,
        rows: usize,
        proj: &Projection,
    ) -> (BrailleCanvas, BrailleCanvas) {
        let lod = Lod::from_zoom(proj.zoom());

        let mut coastlines = BrailleCanvas::new(cols, rows);
        if self.settings.show_coastlines {
            for line in self.coastlines_at(lod) {
                draw_linestring(&mut coastlines, line, proj);
            }
        }

        let mut borders = BrailleCanvas::new(cols, rows);
        if self.settings.show_borders {
            for line in &self.borders {
                draw_linestring(&mut borders, line, proj);
            }
        }

        (coastlines, borders)
    }

    fn render_markers(
        &self,
        cols: usize,
        rows: usize,
        proj: &Projection,
    ) -> (BrailleCanvas, Vec<Label>) {
        let mut canvas = BrailleCanvas::new(cols, rows);
        let mut labels = Vec::new();

        for cluster in self.clusters(proj) {
            let (px, py) = (cluster.px, cluster.py);
            let (cx, cy) = ((px / 2) as u16, (py / 4) as u16);

            if cluster.members.len() > 1 {
                draw_ring(&mut canvas, px, py, 3);
                labels.push(Label {
                    x: cx.saturating_add(2),
                    y: cy,
                    text: cluster.members.len().to_string(),
                    kind: LabelKind::Count,
                });
                continue;
            }

            let marker = &self.markers[cluster.members[0]];
            draw_disc(&mut canvas, px, py, 1);

            if self.settings.show_overlay {
                labels.push(Label {
                    x: cx.saturating_add(1),
                    y: cy,
                    text: overlay_text(marker),
                    kind: LabelKind::Overlay,
                });
            } else if self.settings.show_labels {
                if let Some(location) = &marker.location {
                    labels.push(Label {
                        x: cx.saturating_add(1),
                        y: cy,
                        text: location.clone(),
                        kind: LabelKind::Name,
                    });
                }
            }
        }

        (canvas, labels)
    }

    /// Project markers and bucket the visible ones into screen clusters.
    pub fn clusters(&self, proj: &Projection) -> Vec<Cluster> {
        let positions: Vec<(usize, i32, i32)> = self
            .markers
            .iter()
            .enumerate()
            .filter_map(|(idx, marker)| {
                proj.project(marker.lon, marker.lat)
                    .filter(|&(px, py)| proj.is_visible(px, py))
                    .map(|(px, py)| (idx, px, py))
            })
            .collect();
        cluster::cluster_markers(&positions, CLUSTER_CELL_PX)
    }

    /// Marker indices under a pick at braille pixel (px, py), if any.
    pub fn hit_test(&self, px: i32, py: i32, proj: &Projection) -> Option<Vec<usize>> {
        let clusters = self.clusters(proj);
        cluster::pick(&clusters, px, py, PICK_RADIUS_PX).map(|c| c.members.clone())
    }
}

/// Overlay label: location plus headline, falling back to the first summary
/// line when the record carried no headline.
fn overlay_text(marker: &Marker) -> String {
    let detail = marker
        .headline
        .clone()
        .or_else(|| {
            marker
                .summaries
                .first()
                .and_then(|s| summary_lines(s).into_iter().find(|l| !l.is_empty()))
        })
        .unwrap_or_default();

    match (&marker.location, detail.is_empty()) {
        (Some(location), false) => format!(" {location}: {detail} "),
        (Some(location), true) => format!(" {location} "),
        (None, false) => format!(" {detail} "),
        (None, true) => marker.title(),
    }
}

/// Project and draw one linestring, skipping culled and off-screen segments.
fn draw_linestring(canvas: &mut BrailleCanvas, line: &[(f64, f64)], proj: &Projection) {
    let mut prev: Option<(i32, i32)> = None;
    for &(lon, lat) in line {
        let current = proj.project(lon, lat);
        if let (Some(p1), Some(p2)) = (prev, current) {
            if proj.segment_might_be_visible(p1, p2) {
                draw_line(canvas, p1.0, p1.1, p2.0, p2.1);
            }
        }
        prev = current;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        coordinates: Option<[f64; 2]>,
        location: Option<&str>,
        headline: Option<&str>,
        summary: &str,
    ) -> NewsRecord {
        NewsRecord {
            coordinates,
            location: location.map(str::to_string),
            headline: headline.map(str::to_string),
            summary: summary.to_string(),
        }
    }

    #[test]
    fn one_marker_per_unique_coordinate() {
        let records = vec![
            record(Some([10.0, 20.0]), Some("Greece"), None, "x"),
            record(Some([10.0, 20.0]), Some("Hellas"), None, "y"),
            record(Some([30.0, 40.0]), None, None, "z"),
            record(None, Some("Nowhere"), None, "ignored"),
        ];
        let markers = markers_from_records(&records);

        assert_eq!(markers.len(), 2);
        let greece = markers.iter().find(|m| m.lat == 10.0).unwrap();
        // First-seen location wins
        assert_eq!(greece.location.as_deref(), Some("Greece"));
        assert_eq!(greece.summaries, vec!["x", "y"]);
        let other = markers.iter().find(|m| m.lat == 30.0).unwrap();
        assert!(other.location.is_none());
        assert_eq!(other.summaries, vec!["z"]);
    }

    #[test]
    fn summary_total_survives_marker_construction() {
        let records = vec![
            record(Some([1.0, 1.0]), None, None, "a"),
            record(Some([1.0, 1.0]), None, None, "b"),
            record(Some([2.0, 2.0]), None, None, "c"),
            record(None, None, None, "dropped"),
        ];
        let markers = markers_from_records(&records);
        let total: usize = markers.iter().map(|m| m.summaries.len()).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn marker_order_is_deterministic() {
        let records = vec![
            record(Some([30.0, 40.0]), None, None, "z"),
            record(Some([10.0, 20.0]), None, None, "x"),
        ];
        let a = markers_from_records(&records);
        let b = markers_from_records(&records);
        let order = |ms: &[Marker]| ms.iter().map(|m| (m.lat as i64, m.lon as i64)).collect::<Vec<_>>();
        assert_eq!(order(&a), order(&b));
    }

    #[test]
    fn untitled_marker_falls_back_to_coordinates() {
        let marker = Marker {
            lon: 21.8243,
            lat: 39.0742,
            location: None,
            headline: None,
            summaries: vec![],
        };
        assert_eq!(marker.title(), "39.0742, 21.8243");
    }

    #[test]
    fn close_markers_cluster_with_count() {
        let mut renderer = MapRenderer::new();
        renderer.set_markers(vec![
            Marker {
                lon: 0.0,
                lat: 0.0,
                location: Some("A".into()),
                headline: None,
                summaries: vec!["a".into()],
            },
            Marker {
                lon: 0.3,
                lat: 0.3,
                location: Some("B".into()),
                headline: None,
                summaries: vec!["b".into()],
            },
            Marker {
                lon: 120.0,
                lat: 40.0,
                location: Some("C".into()),
                headline: None,
                summaries: vec!["c".into()],
            },
        ]);

        // At world zoom 0.3 degrees is well under one cluster cell
        let proj = Projection::world(160, 160);
        let clusters = renderer.clusters(&proj);
        assert_eq!(clusters.len(), 2);
        let sizes: Vec<usize> = clusters.iter().map(|c| c.members.len()).collect();
        assert!(sizes.contains(&2));
        assert!(sizes.contains(&1));

        let layers = renderer.render(80, 40, &proj);
        assert!(layers
            .labels
            .iter()
            .any(|l| l.kind == LabelKind::Count && l.text == "2"));
    }

    #[test]
    fn hit_test_picks_the_cluster_under_the_cursor() {
        let mut renderer = MapRenderer::new();
        renderer.set_markers(vec![Marker {
            lon: 0.0,
            lat: 0.0,
            location: None,
            headline: None,
            summaries: vec!["a".into()],
        }]);

        let proj = Projection::world(160, 160);
        let (px, py) = proj.project(0.0, 0.0).unwrap();
        assert_eq!(renderer.hit_test(px, py, &proj), Some(vec![0]));
        assert_eq!(renderer.hit_test(px + 50, py + 50, &proj), None);
    }

    #[test]
    fn overlay_prefers_headline_over_summary() {
        let marker = Marker {
            lon: 0.0,
            lat: 0.0,
            location: Some("Greece".into()),
            headline: Some("Headline".into()),
            summaries: vec!["\u{2022} first point".into()],
        };
        assert_eq!(overlay_text(&marker), " Greece: Headline ");

        let without_headline = Marker {
            headline: None,
            ..marker
        };
        assert_eq!(overlay_text(&without_headline), " Greece: first point ");
    }
}
