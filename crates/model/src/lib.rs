//! Core domain model for TalentFlow candidate ranking.
//!
//! This crate defines the fundamental types used throughout the system:
//! - `Candidate`: the normalized candidate record from the data boundary
//! - `Computed`: the derived score/level/status block, refreshed per ranking pass
//! - `CandidateFilter`: the conjunctive filter applied over the collection
//! - `MatchSignal` / `ScoreBreakdown`: why a candidate scored the way it did

use serde::{Deserialize, Serialize};

/// Experience bucket derived from total months of work experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExperienceLevel {
    #[serde(rename = "No Experience")]
    NoExperience,
    #[serde(rename = "Less than 1 year")]
    LessThanOneYear,
    #[serde(rename = "1-3 years")]
    OneToThreeYears,
    #[serde(rename = "3-5 years")]
    ThreeToFiveYears,
    #[serde(rename = "5+ years")]
    FivePlusYears,
}

impl Default for ExperienceLevel {
    fn default() -> Self {
        Self::NoExperience
    }
}

impl ExperienceLevel {
    /// Bucket a month count. Boundaries are exclusive upper bounds.
    pub fn from_months(months: u32) -> Self {
        match months {
            0 => Self::NoExperience,
            m if m < 12 => Self::LessThanOneYear,
            m if m < 36 => Self::OneToThreeYears,
            m if m < 60 => Self::ThreeToFiveYears,
            _ => Self::FivePlusYears,
        }
    }

    /// Display tag, identical to the serialized form and the filter vocabulary.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoExperience => "No Experience",
            Self::LessThanOneYear => "Less than 1 year",
            Self::OneToThreeYears => "1-3 years",
            Self::ThreeToFiveYears => "3-5 years",
            Self::FivePlusYears => "5+ years",
        }
    }

    /// Parse a display tag back into a level.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "No Experience" => Some(Self::NoExperience),
            "Less than 1 year" => Some(Self::LessThanOneYear),
            "1-3 years" => Some(Self::OneToThreeYears),
            "3-5 years" => Some(Self::ThreeToFiveYears),
            "5+ years" => Some(Self::FivePlusYears),
            _ => None,
        }
    }
}

/// Whether the candidate currently holds a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmploymentStatus {
    Employed,
    Unemployed,
}

impl Default for EmploymentStatus {
    fn default() -> Self {
        Self::Unemployed
    }
}

impl EmploymentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Employed => "Employed",
            Self::Unemployed => "Unemployed",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Employed" => Some(Self::Employed),
            "Unemployed" => Some(Self::Unemployed),
            _ => None,
        }
    }
}

/// Geographic point. Raw records use `{latitude, longitude}` naming; the
/// ingest boundary renames to `{lat, lng}` before the core sees them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Non-finite components count as "no coordinates" downstream.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// One work-experience entry, in the candidate's given order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkExperience {
    #[serde(default)]
    pub company: String,

    #[serde(default)]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,

    #[serde(default)]
    pub is_current: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default)]
    pub responsibilities: Vec<String>,

    #[serde(default)]
    pub skills: Vec<String>,
}

/// A portfolio project attached to a candidate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub skills: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Derived block, a pure function of (candidate, current job requirement).
/// Recomputed wholesale on every requirement change, never patched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Computed {
    /// Total score, 0-100.
    pub score: u8,
    pub experience_level: ExperienceLevel,
    pub employment_status: EmploymentStatus,
}

/// A candidate record as consumed by the scoring core.
///
/// Raw records are immutable for the session except for `computed`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_coordinates: Option<Coordinates>,

    #[serde(default)]
    pub work_experience: Vec<WorkExperience>,

    #[serde(default)]
    pub projects: Vec<Project>,

    /// Total months of work experience, precomputed upstream.
    #[serde(default)]
    pub total_we_months: u32,

    /// Non-empty marks the record invalid; excluded from scoring and filtering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computed: Option<Computed>,
}

impl Candidate {
    /// Create a minimal record for testing.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Whether this record carries an upstream error marker.
    pub fn has_error(&self) -> bool {
        self.error.as_deref().is_some_and(|e| !e.is_empty())
    }

    /// Every raw skill string attached to the candidate, work experience
    /// entries first, then projects, in their given order.
    pub fn all_skills(&self) -> impl Iterator<Item = &str> {
        self.work_experience
            .iter()
            .flat_map(|we| we.skills.iter())
            .chain(self.projects.iter().flat_map(|p| p.skills.iter()))
            .map(String::as_str)
    }

    /// Coordinates usable for distance math, if any.
    pub fn valid_coordinates(&self) -> Option<Coordinates> {
        self.location_coordinates.filter(Coordinates::is_valid)
    }

    /// Employed if any work-experience entry is marked current.
    pub fn employment_status(&self) -> EmploymentStatus {
        if self.work_experience.iter().any(|we| we.is_current) {
            EmploymentStatus::Employed
        } else {
            EmploymentStatus::Unemployed
        }
    }

    /// The location shown to and matched by the location filter.
    pub fn location_or_unknown(&self) -> &str {
        self.location.as_deref().unwrap_or("Unknown")
    }
}

/// How a single requirement term contributed to the skill-match score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail")]
pub enum MatchSignal {
    /// The term is a substring of one of the candidate's raw skills.
    ExactSkill {
        term: String,
    },

    /// The term only matched via TF-IDF over the candidate's document.
    PartialTerm {
        term: String,
        /// Weighted TF-IDF contribution.
        weight: f64,
    },
}

impl MatchSignal {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ExactSkill { .. } => "Exact skill match",
            Self::PartialTerm { .. } => "Partial match",
        }
    }
}

/// Full decomposition of a candidate's total score for one requirement text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Skill-match component, 0-40.
    pub skill_points: f64,
    /// Experience component, 0-30.
    pub experience_points: f64,
    /// Project component, 0-30.
    pub project_points: f64,
    /// Rounded sum, 0-100.
    pub total: u8,
    /// Per-term signals behind the skill-match component.
    pub signals: Vec<MatchSignal>,
}

/// Conjunctive filter over the candidate collection.
///
/// Set-valued fields are OR within the field and AND across fields; an empty
/// field passes every candidate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateFilter {
    #[serde(default)]
    pub search: String,

    #[serde(default)]
    pub experience: Vec<ExperienceLevel>,

    /// Canonical skill strings, as produced by the normalization map.
    #[serde(default)]
    pub skills: Vec<String>,

    #[serde(default)]
    pub location: Vec<String>,

    #[serde(default)]
    pub employment_status: Vec<EmploymentStatus>,

    #[serde(default)]
    pub job_requirement: String,
}

impl CandidateFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_skills(mut self, skills: Vec<String>) -> Self {
        self.skills = skills;
        self
    }

    pub fn with_requirement(mut self, requirement: impl Into<String>) -> Self {
        self.job_requirement = requirement.into();
        self
    }

    /// True when no field constrains the collection.
    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.experience.is_empty()
            && self.skills.is_empty()
            && self.location.is_empty()
            && self.employment_status.is_empty()
    }
}
