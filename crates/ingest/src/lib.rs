//! Dataset ingestion boundary.
//!
//! Parses the candidate-id to raw-record mapping produced by the external
//! fetch layer and normalizes it into core `Candidate` records: coordinate
//! field renaming (`{latitude, longitude}` to `{lat, lng}`), coercion of
//! invalid numerics to "no coordinates", defaults for missing collections,
//! and id backfill from the map key. Also defines the optional key-value
//! cache collaborator the caller may use for memoization; the core behaves
//! identically with or without it.

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use serde::Deserialize;
use serde_json::Value;
use talentflow_model::{Candidate, Coordinates, Project, WorkExperience};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Dataset is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Coordinates as they arrive from the dataset: `{latitude, longitude}`
/// fields of arbitrary JSON type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCoordinates {
    #[serde(default)]
    pub latitude: Value,
    #[serde(default)]
    pub longitude: Value,
}

/// One raw record from the fetched dataset. Every field may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCandidate {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub location_coordinates: Option<RawCoordinates>,

    #[serde(default)]
    pub work_experience: Vec<WorkExperience>,

    #[serde(default)]
    pub projects: Vec<Project>,

    #[serde(default)]
    pub total_we_months: u32,

    #[serde(default)]
    pub error: Option<String>,
}

/// Parse a candidate-id to raw-record JSON object into normalized records,
/// ordered by id so downstream clustering sees a deterministic sequence.
///
/// Error-marked records are kept, flagged, and left for the core's own
/// exclusion rule.
pub fn parse_dataset(json: &str) -> Result<Vec<Candidate>, IngestError> {
    let raw: BTreeMap<String, RawCandidate> = serde_json::from_str(json)?;

    let mut flagged = 0usize;
    let mut candidates = Vec::with_capacity(raw.len());
    for (key, record) in raw {
        let candidate = normalize_record(key, record);
        if candidate.has_error() {
            flagged += 1;
        }
        candidates.push(candidate);
    }

    if flagged > 0 {
        tracing::warn!(flagged, total = candidates.len(), "dataset contains error-marked records");
    }
    tracing::debug!(candidates = candidates.len(), "parsed candidate dataset");

    Ok(candidates)
}

/// Normalize one raw record. `key` is the record's key in the dataset map and
/// fills in a missing or empty `id`.
pub fn normalize_record(key: String, raw: RawCandidate) -> Candidate {
    Candidate {
        id: raw.id.filter(|id| !id.is_empty()).unwrap_or(key),
        name: raw.name,
        email: raw.email,
        phone: raw.phone,
        location: raw.location,
        location_coordinates: raw.location_coordinates.and_then(convert_coordinates),
        work_experience: raw.work_experience,
        projects: raw.projects,
        total_we_months: raw.total_we_months,
        error: raw.error,
        computed: None,
    }
}

/// Rename `{latitude, longitude}` to `{lat, lng}`. Anything non-numeric or
/// non-finite means "no coordinates".
fn convert_coordinates(raw: RawCoordinates) -> Option<Coordinates> {
    let lat = raw.latitude.as_f64().filter(|v| v.is_finite())?;
    let lng = raw.longitude.as_f64().filter(|v| v.is_finite())?;
    Some(Coordinates::new(lat, lng))
}

/// External key-value cache collaborator with time-based expiration.
///
/// Purely a memoization layer owned by the caller; nothing in the core reads
/// or writes it.
pub trait DatasetCache {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn is_valid(&self, key: &str, ttl: Duration) -> bool;
    fn clear(&mut self);
}

/// In-process `DatasetCache` used by the CLI and tests.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: HashMap<String, CacheEntry>,
}

#[derive(Debug)]
struct CacheEntry {
    value: String,
    stored_at: Instant,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DatasetCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    fn is_valid(&self, key: &str, ttl: Duration) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| entry.stored_at.elapsed() < ttl)
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dataset_renames_coordinates() {
        let json = r#"{
            "c1": {
                "name": "Ada",
                "location": "Berlin",
                "location_coordinates": {"latitude": 52.52, "longitude": 13.405},
                "work_experience": [{"title": "Engineer", "skills": ["Rust"]}],
                "total_we_months": 24
            }
        }"#;

        let candidates = parse_dataset(json).unwrap();
        assert_eq!(candidates.len(), 1);

        let candidate = &candidates[0];
        assert_eq!(candidate.id, "c1");
        let coords = candidate.location_coordinates.unwrap();
        assert_eq!(coords.lat, 52.52);
        assert_eq!(coords.lng, 13.405);
        assert_eq!(candidate.work_experience[0].skills, vec!["Rust"]);
    }

    #[test]
    fn test_non_numeric_coordinates_are_dropped() {
        let json = r#"{
            "c1": {"name": "Ada", "location_coordinates": {"latitude": "52.52", "longitude": 13.405}},
            "c2": {"name": "Bob", "location_coordinates": {"latitude": 1.0}}
        }"#;

        let candidates = parse_dataset(json).unwrap();
        assert!(candidates[0].location_coordinates.is_none());
        assert!(candidates[1].location_coordinates.is_none());
    }

    #[test]
    fn test_record_id_backfills_from_key() {
        let json = r#"{
            "k1": {"name": "Ada"},
            "k2": {"id": "explicit", "name": "Bob"},
            "k3": {"id": "", "name": "Cleo"}
        }"#;

        let candidates = parse_dataset(json).unwrap();
        assert_eq!(candidates[0].id, "k1");
        assert_eq!(candidates[1].id, "explicit");
        assert_eq!(candidates[2].id, "k3");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let json = r#"{"c1": {}}"#;
        let candidates = parse_dataset(json).unwrap();

        let candidate = &candidates[0];
        assert_eq!(candidate.name, "");
        assert!(candidate.work_experience.is_empty());
        assert!(candidate.projects.is_empty());
        assert_eq!(candidate.total_we_months, 0);
        assert!(!candidate.has_error());
    }

    #[test]
    fn test_error_flag_is_carried_through() {
        let json = r#"{"c1": {"name": "Ada", "error": "resume parse failed"}}"#;
        let candidates = parse_dataset(json).unwrap();
        assert!(candidates[0].has_error());
    }

    #[test]
    fn test_records_ordered_by_id() {
        let json = r#"{"b": {"name": "B"}, "a": {"name": "A"}, "c": {"name": "C"}}"#;
        let candidates = parse_dataset(json).unwrap();
        let ids: Vec<&str> = candidates.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            parse_dataset("not json"),
            Err(IngestError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_memory_cache_round_trip() {
        let mut cache = MemoryCache::new();
        assert!(cache.get("dataset").is_none());

        cache.set("dataset", "{}".to_string());
        assert_eq!(cache.get("dataset").as_deref(), Some("{}"));
        assert!(cache.is_valid("dataset", Duration::from_secs(60)));

        cache.clear();
        assert!(cache.get("dataset").is_none());
    }

    #[test]
    fn test_memory_cache_expiry() {
        let mut cache = MemoryCache::new();
        cache.set("dataset", "{}".to_string());

        // A zero TTL can never be valid.
        assert!(!cache.is_valid("dataset", Duration::ZERO));
        assert!(!cache.is_valid("missing", Duration::from_secs(60)));
    }
}
