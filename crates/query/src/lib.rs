//! Filtering and pagination over the candidate collection.
//!
//! The filter is conjunctive: every non-empty field must pass, set-valued
//! fields match on any member. Filtering is pure, never mutates, and keeps
//! the relative order of survivors.

use talentflow_cluster::SkillNormalizer;
use talentflow_model::{Candidate, CandidateFilter};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Page size must be greater than zero")]
    EmptyPage,
}

/// A 1-based page request.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub number: usize,
    pub size: usize,
}

impl Page {
    pub fn new(number: usize, size: usize) -> Self {
        Self { number, size }
    }
}

/// Apply the filter, preserving the relative order of survivors.
///
/// Skill matching goes through the normalization map, so a filter on "React"
/// also admits candidates listing "ReactJS".
pub fn apply_filter(
    candidates: &[Candidate],
    filter: &CandidateFilter,
    normalizer: &SkillNormalizer,
) -> Vec<Candidate> {
    candidates
        .iter()
        .filter(|candidate| matches_filter(candidate, filter, normalizer))
        .cloned()
        .collect()
}

fn matches_filter(
    candidate: &Candidate,
    filter: &CandidateFilter,
    normalizer: &SkillNormalizer,
) -> bool {
    if candidate.has_error() {
        return false;
    }

    if !filter.search.is_empty() && !matches_search(candidate, &filter.search) {
        return false;
    }

    if !filter.experience.is_empty() {
        // The computed block is refreshed before filtering; a record without
        // one cannot be verified and does not match.
        let Some(computed) = candidate.computed else {
            return false;
        };
        if !filter.experience.contains(&computed.experience_level) {
            return false;
        }
    }

    if !filter.skills.is_empty() {
        let any_skill = candidate.all_skills().any(|skill| {
            let canonical = normalizer.canonical_of(skill);
            filter.skills.iter().any(|wanted| wanted == canonical)
        });
        if !any_skill {
            return false;
        }
    }

    if !filter.location.is_empty() {
        let location = candidate.location_or_unknown();
        if !filter.location.iter().any(|wanted| wanted == location) {
            return false;
        }
    }

    if !filter.employment_status.is_empty() {
        let Some(computed) = candidate.computed else {
            return false;
        };
        if !filter.employment_status.contains(&computed.employment_status) {
            return false;
        }
    }

    true
}

/// Case-insensitive substring search across every text surface of the record.
fn matches_search(candidate: &Candidate, search: &str) -> bool {
    let needle = search.to_lowercase();
    let contains = |text: &str| text.to_lowercase().contains(&needle);

    contains(&candidate.name)
        || candidate.all_skills().any(|skill| contains(skill))
        || candidate.location.as_deref().is_some_and(|loc| contains(loc))
        || candidate
            .work_experience
            .iter()
            .any(|we| contains(&we.title) || contains(&we.company))
        || candidate
            .projects
            .iter()
            .any(|project| contains(&project.name) || contains(&project.description))
}

/// Slice out one page of an already-filtered, already-sorted collection.
/// A page past the end is empty, not an error.
pub fn paginate<'a>(candidates: &'a [Candidate], page: &Page) -> Result<&'a [Candidate], QueryError> {
    if page.size == 0 {
        return Err(QueryError::EmptyPage);
    }

    let start = page.number.saturating_sub(1) * page.size;
    if start >= candidates.len() {
        return Ok(&[]);
    }

    let end = (start + page.size).min(candidates.len());
    Ok(&candidates[start..end])
}
