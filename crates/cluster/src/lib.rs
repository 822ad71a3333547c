//! Skill clustering and normalization.
//!
//! Groups near-duplicate skill strings ("React", "ReactJS", "React.js") into
//! clusters and picks one canonical representative per cluster. The resulting
//! normalization map powers skill filtering and aggregate counts.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use talentflow_features::similarity;
use talentflow_model::Candidate;

/// Configuration for the clustering pass.
#[derive(Debug, Clone)]
pub struct ClusterConfig {
    /// Minimum similarity for a skill to join an existing group.
    pub threshold: f64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self { threshold: 0.8 }
    }
}

/// One cluster of skill variants with its chosen canonical name.
#[derive(Debug, Clone, Serialize)]
pub struct SkillGroup {
    pub representative: String,
    /// Raw variants in first-seen order; always contains the representative.
    pub members: Vec<String>,
}

/// Group skills by similarity, greedy and order-dependent.
///
/// Each incoming skill is compared against every existing group's first-seen
/// member only, and joins the first group that clears the threshold.
/// Duplicates in the input simply reinforce an existing group.
pub fn cluster_skills(skills: &[String], config: &ClusterConfig) -> Vec<SkillGroup> {
    let mut groups: Vec<Vec<String>> = Vec::new();

    for skill in skills {
        match groups
            .iter_mut()
            .find(|group| similarity(&group[0], skill) >= config.threshold)
        {
            Some(group) => group.push(skill.clone()),
            None => groups.push(vec![skill.clone()]),
        }
    }

    groups
        .into_iter()
        .map(|members| SkillGroup {
            representative: select_representative(&members),
            members,
        })
        .collect()
}

/// Pick the canonical name for a group of variants.
///
/// Abbreviation-like members (shorter than 4 characters and without any
/// lowercase letter) rank last; among the rest the shortest wins, first-seen
/// order breaking ties.
pub fn select_representative(members: &[String]) -> String {
    let mut ranked: Vec<&String> = members.iter().collect();
    ranked.sort_by_key(|s| (looks_like_abbreviation(s), s.chars().count()));
    ranked.first().map(|s| (*s).clone()).unwrap_or_default()
}

fn looks_like_abbreviation(s: &str) -> bool {
    s.chars().count() < 4 && s.chars().all(|c| !c.is_lowercase())
}

/// The total raw-skill -> canonical-representative mapping for a candidate
/// set. Must be rebuilt whenever the candidate set changes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SkillNormalizer {
    canonical: HashMap<String, String>,
    groups: Vec<SkillGroup>,
}

impl SkillNormalizer {
    /// Build the map from an explicit vocabulary, in its given order.
    pub fn from_skills(skills: &[String], config: &ClusterConfig) -> Self {
        let groups = cluster_skills(skills, config);

        let mut canonical = HashMap::new();
        for group in &groups {
            for member in &group.members {
                canonical.insert(member.clone(), group.representative.clone());
            }
        }

        tracing::debug!(
            skills = skills.len(),
            groups = groups.len(),
            "rebuilt skill normalization map"
        );

        Self { canonical, groups }
    }

    /// Build the map from the vocabulary observed across a candidate set.
    pub fn from_candidates(candidates: &[Candidate], config: &ClusterConfig) -> Self {
        Self::from_skills(&extract_vocabulary(candidates), config)
    }

    /// Canonical representative for a raw skill. A skill outside the
    /// vocabulary maps to itself.
    pub fn canonical_of<'a>(&'a self, skill: &'a str) -> &'a str {
        self.canonical
            .get(skill)
            .map(String::as_str)
            .unwrap_or(skill)
    }

    /// The clusters behind the map, in first-seen order.
    pub fn groups(&self) -> &[SkillGroup] {
        &self.groups
    }

    /// Inverse view: representative -> raw variants.
    pub fn grouped(&self) -> HashMap<&str, Vec<&str>> {
        self.groups
            .iter()
            .map(|group| {
                (
                    group.representative.as_str(),
                    group.members.iter().map(String::as_str).collect(),
                )
            })
            .collect()
    }

    /// Number of raw skills covered by the map.
    pub fn len(&self) -> usize {
        self.canonical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }
}

/// Every distinct raw skill across the candidate set, in first-seen order.
/// Error-marked records contribute nothing.
pub fn extract_vocabulary(candidates: &[Candidate]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut vocabulary = Vec::new();

    for candidate in candidates.iter().filter(|c| !c.has_error()) {
        for skill in candidate.all_skills() {
            if seen.insert(skill.to_string()) {
                vocabulary.push(skill.to_string());
            }
        }
    }

    vocabulary
}

/// Distinct-candidate count per raw skill, pre-normalization, for display
/// alongside the normalized groups.
pub fn skill_candidate_counts(candidates: &[Candidate]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();

    for candidate in candidates.iter().filter(|c| !c.has_error()) {
        let distinct: HashSet<&str> = candidate.all_skills().collect();
        for skill in distinct {
            *counts.entry(skill.to_string()).or_insert(0) += 1;
        }
    }

    counts
}
