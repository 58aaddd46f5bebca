pub mod format;
pub mod group;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// One geotagged news item as produced by the summarization pipeline.
/// Every field tolerates absence: records missing coordinates are valid
/// input and simply never reach the map.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsRecord {
    /// (latitude, longitude); None when the pipeline could not geocode.
    #[serde(default)]
    pub coordinates: Option<[f64; 2]>,
    /// Display name of the location (usually a country).
    #[serde(default)]
    pub location: Option<String>,
    /// Original headline, used by the label overlay.
    #[serde(default)]
    pub headline: Option<String>,
    /// Bulleted multi-line summary for the location.
    #[serde(default)]
    pub summary: String,
}

/// Load news records from a JSON array on disk.
pub fn load_news(path: &Path) -> Result<Vec<NewsRecord>> {
    let mut bytes = fs::read(path)
        .with_context(|| format!("failed to read news file {}", path.display()))?;
    let records: Vec<NewsRecord> = simd_json::from_slice(&mut bytes)
        .with_context(|| format!("failed to parse news file {}", path.display()))?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Vec<NewsRecord> {
        let mut bytes = json.as_bytes().to_vec();
        simd_json::from_slice(&mut bytes).unwrap()
    }

    #[test]
    fn full_record_parses() {
        let records = parse(
            r#"[{"coordinates": [39.0742, 21.8243], "location": "Greece",
                 "headline": "Example headline",
                 "summary": "• one\n• two"}]"#,
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].coordinates, Some([39.0742, 21.8243]));
        assert_eq!(records[0].location.as_deref(), Some("Greece"));
        assert_eq!(records[0].headline.as_deref(), Some("Example headline"));
    }

    #[test]
    fn null_and_absent_coordinates_are_none() {
        let records = parse(
            r#"[{"coordinates": null, "location": "Nowhere", "summary": "a"},
                {"location": "Elsewhere", "summary": "b"}]"#,
        );
        assert!(records[0].coordinates.is_none());
        assert!(records[1].coordinates.is_none());
    }

    #[test]
    fn missing_summary_defaults_to_empty() {
        let records = parse(r#"[{"coordinates": [1.0, 2.0]}]"#);
        assert_eq!(records[0].summary, "");
        assert!(records[0].location.is_none());
    }
}
