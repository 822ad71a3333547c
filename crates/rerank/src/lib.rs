//! Scoring and ranking for candidates against a job requirement.
//!
//! Combines exact-skill-match bonuses with TF-IDF partial-match scores into a
//! job-match fraction, then folds in experience and project sub-scores to
//! produce the 0-100 total. Also provides distance and multi-field orderings.

use std::cmp::Ordering;

use talentflow_features::normalize_text;
use talentflow_model::{
    Candidate, Computed, Coordinates, ExperienceLevel, MatchSignal, ScoreBreakdown,
};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Function words dropped from requirement text before term matching.
const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "was", "that", "this", "are", "have", "from", "not", "has",
    "were", "they", "their", "been", "who", "what", "when", "where", "why", "how", "all", "any",
    "both", "each", "more", "most", "some", "such",
];

/// Configuration for the scoring pass.
#[derive(Debug, Clone)]
pub struct ScoreWeights {
    /// Bonus per requirement term found inside a raw skill string.
    pub exact_bonus: f64,
    /// Multiplier on the TF-IDF score of a term with no skill match.
    pub partial_weight: f64,
    /// Points available to the skill-match component.
    pub skill_points: f64,
    /// Points per month of work experience.
    pub experience_per_month: f64,
    /// Cap on the experience component.
    pub experience_cap: f64,
    /// Points per project.
    pub project_points: f64,
    /// Cap on the project component.
    pub project_cap: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            exact_bonus: 1.5,
            partial_weight: 0.5,
            skill_points: 40.0,
            experience_per_month: 0.5,
            experience_cap: 30.0,
            project_points: 7.5,
            project_cap: 30.0,
        }
    }
}

/// Term frequency of `term` within a tokenized document.
pub fn term_frequency(term: &str, document: &[String]) -> f64 {
    if document.is_empty() {
        return 0.0;
    }
    let term = term.to_lowercase();
    let count = document.iter().filter(|token| **token == term).count();
    count as f64 / document.len() as f64
}

/// Smoothed inverse document frequency of `term` over a corpus.
pub fn inverse_document_frequency(term: &str, corpus: &[Vec<String>]) -> f64 {
    let term = term.to_lowercase();
    let doc_freq = corpus
        .iter()
        .filter(|document| document.iter().any(|token| *token == term))
        .count();
    ((corpus.len() + 1) as f64 / (doc_freq + 1) as f64).ln() + 1.0
}

pub fn tf_idf(term: &str, document: &[String], corpus: &[Vec<String>]) -> f64 {
    term_frequency(term, document) * inverse_document_frequency(term, corpus)
}

/// Build a candidate's document: lowercase tokens drawn from work-experience
/// skills, titles, companies, and responsibilities, then project skills,
/// names, and descriptions. Responsibility and description words must be
/// longer than three characters. Absent fields contribute nothing.
pub fn build_document(candidate: &Candidate) -> Vec<String> {
    let mut document = Vec::new();

    for we in &candidate.work_experience {
        for skill in &we.skills {
            push_words(&mut document, skill, 0);
        }
        push_words(&mut document, &we.title, 0);
        push_words(&mut document, &we.company, 0);
        for responsibility in &we.responsibilities {
            push_words(&mut document, responsibility, 3);
        }
    }

    for project in &candidate.projects {
        for skill in &project.skills {
            push_words(&mut document, skill, 0);
        }
        push_words(&mut document, &project.name, 0);
        push_words(&mut document, &project.description, 3);
    }

    document
}

fn push_words(document: &mut Vec<String>, text: &str, min_len: usize) {
    document.extend(
        text.to_lowercase()
            .split_whitespace()
            .filter(|word| word.chars().count() > min_len)
            .map(str::to_string),
    );
}

/// Extract requirement terms: lowercase, punctuation stripped, tokens longer
/// than three characters that are not stop words.
pub fn requirement_terms(text: &str) -> Vec<String> {
    normalize_text(text)
        .split_whitespace()
        .filter(|token| token.chars().count() > 3)
        .filter(|token| !STOP_WORDS.contains(token))
        .map(str::to_string)
        .collect()
}

/// Per-term match signals for a candidate against extracted requirement terms.
///
/// A term inside any raw skill string earns the flat exact bonus; otherwise
/// it falls back to weighted TF-IDF over a corpus containing only this
/// candidate's document.
fn collect_signals(
    candidate: &Candidate,
    terms: &[String],
    weights: &ScoreWeights,
) -> Vec<MatchSignal> {
    let document = build_document(candidate);
    let corpus = std::slice::from_ref(&document);

    terms
        .iter()
        .map(|term| {
            let exact = candidate
                .all_skills()
                .any(|skill| skill.to_lowercase().contains(term.as_str()));

            if exact {
                MatchSignal::ExactSkill { term: term.clone() }
            } else {
                MatchSignal::PartialTerm {
                    term: term.clone(),
                    weight: tf_idf(term, &document, corpus) * weights.partial_weight,
                }
            }
        })
        .collect()
}

fn signal_weight(signal: &MatchSignal, weights: &ScoreWeights) -> f64 {
    match signal {
        MatchSignal::ExactSkill { .. } => weights.exact_bonus,
        MatchSignal::PartialTerm { weight, .. } => *weight,
    }
}

/// Job-match fraction in `[0, 1]`: accumulated term scores normalized by the
/// maximum possible if every term were an exact match.
pub fn match_score(candidate: &Candidate, requirement: &str, weights: &ScoreWeights) -> f64 {
    let terms = requirement_terms(requirement);
    if terms.is_empty() {
        return 0.0;
    }

    let signals = collect_signals(candidate, &terms, weights);
    let raw: f64 = signals
        .iter()
        .map(|signal| signal_weight(signal, weights))
        .sum();

    (raw / (terms.len() as f64 * weights.exact_bonus)).min(1.0)
}

/// Full score decomposition for one candidate and requirement text.
pub fn score_breakdown(
    candidate: &Candidate,
    requirement: &str,
    weights: &ScoreWeights,
) -> ScoreBreakdown {
    let terms = requirement_terms(requirement);

    let (signals, match_fraction) = if terms.is_empty() {
        (Vec::new(), 0.0)
    } else {
        let signals = collect_signals(candidate, &terms, weights);
        let raw: f64 = signals
            .iter()
            .map(|signal| signal_weight(signal, weights))
            .sum();
        let fraction = (raw / (terms.len() as f64 * weights.exact_bonus)).min(1.0);
        (signals, fraction)
    };

    let skill_points = match_fraction * weights.skill_points;
    let experience_points =
        (candidate.total_we_months as f64 * weights.experience_per_month).min(weights.experience_cap);
    let project_points =
        (candidate.projects.len() as f64 * weights.project_points).min(weights.project_cap);

    // Component caps already bound the sum to [0, 100].
    let total = (skill_points + experience_points + project_points).round() as u8;

    ScoreBreakdown {
        skill_points,
        experience_points,
        project_points,
        total,
        signals,
    }
}

/// Total score in `[0, 100]`.
pub fn total_score(candidate: &Candidate, requirement: &str, weights: &ScoreWeights) -> u8 {
    score_breakdown(candidate, requirement, weights).total
}

/// The derived block for one candidate, a pure function of the pair.
pub fn compute(candidate: &Candidate, requirement: &str, weights: &ScoreWeights) -> Computed {
    Computed {
        score: total_score(candidate, requirement, weights),
        experience_level: ExperienceLevel::from_months(candidate.total_we_months),
        employment_status: candidate.employment_status(),
    }
}

/// Wholesale scoring pass: repopulate every candidate's `computed` block for
/// the given requirement and sort by score. Error-marked records keep no
/// `computed` block and sort last.
pub fn rank(
    mut candidates: Vec<Candidate>,
    requirement: &str,
    weights: &ScoreWeights,
) -> Vec<Candidate> {
    for candidate in &mut candidates {
        candidate.computed = if candidate.has_error() {
            None
        } else {
            Some(compute(candidate, requirement, weights))
        };
    }

    tracing::debug!(
        candidates = candidates.len(),
        requirement_terms = requirement_terms(requirement).len(),
        "scored candidate set"
    );

    sort_candidates(&mut candidates, &SortOrder::Score);
    candidates
}

/// Orderings over the candidate collection. All sorts are stable.
#[derive(Debug, Clone)]
pub enum SortOrder {
    /// Score descending, ties broken by experience months then name.
    Score,
    /// Total work-experience months, descending.
    ExperienceMonths,
    /// Name, ascending.
    Name,
    /// Great-circle distance from a reference point, ascending; candidates
    /// without valid coordinates sort last.
    Distance(Coordinates),
}

pub fn sort_candidates(candidates: &mut [Candidate], order: &SortOrder) {
    match order {
        SortOrder::Score => candidates.sort_by(|a, b| {
            score_key(b)
                .cmp(&score_key(a))
                .then_with(|| b.total_we_months.cmp(&a.total_we_months))
                .then_with(|| a.name.cmp(&b.name))
        }),
        SortOrder::ExperienceMonths => {
            candidates.sort_by(|a, b| b.total_we_months.cmp(&a.total_we_months))
        }
        SortOrder::Name => candidates.sort_by(|a, b| a.name.cmp(&b.name)),
        SortOrder::Distance(origin) => {
            candidates.sort_by(|a, b| compare_by_distance(a, b, origin))
        }
    }
}

fn score_key(candidate: &Candidate) -> i16 {
    candidate
        .computed
        .map(|computed| computed.score as i16)
        .unwrap_or(-1)
}

/// Distance comparator: valid coordinates sort before missing ones; two
/// candidates both lacking coordinates compare equal.
pub fn compare_by_distance(a: &Candidate, b: &Candidate, origin: &Coordinates) -> Ordering {
    match (a.valid_coordinates(), b.valid_coordinates()) {
        (Some(ca), Some(cb)) => haversine_km(origin, &ca)
            .partial_cmp(&haversine_km(origin, &cb))
            .unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Great-circle distance in kilometers.
pub fn haversine_km(a: &Coordinates, b: &Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use talentflow_model::{Project, WorkExperience};

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn frontend_candidate() -> Candidate {
        let mut candidate = Candidate::new("c1", "Ada");
        candidate.total_we_months = 24;
        candidate.work_experience.push(WorkExperience {
            company: "Initech".into(),
            title: "Frontend Developer".into(),
            is_current: true,
            skills: strings(&["React", "TypeScript"]),
            responsibilities: strings(&["Built the dashboard UI components"]),
            ..Default::default()
        });
        candidate.projects.push(Project {
            name: "Storefront".into(),
            description: "Checkout flow rewrite".into(),
            skills: strings(&["React"]),
            ..Default::default()
        });
        candidate.projects.push(Project {
            name: "Docs site".into(),
            ..Default::default()
        });
        candidate
    }

    #[test]
    fn test_requirement_terms_filtering() {
        let terms = requirement_terms("We are looking for a Senior React developer with REST APIs!");
        // "with" and "are" are stop words; "we", "a", and "for" are too short.
        assert_eq!(
            terms,
            strings(&["looking", "senior", "react", "developer", "rest", "apis"])
        );
    }

    #[test]
    fn test_term_frequency() {
        let document = strings(&["react", "redux", "react"]);
        assert!((term_frequency("React", &document) - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(term_frequency("react", &[]), 0.0);
    }

    #[test]
    fn test_single_document_idf_is_constant() {
        let document = strings(&["react", "redux"]);
        let corpus = vec![document];
        // Term present in the only document: ln(2/2) + 1 = 1.
        assert!((inverse_document_frequency("react", &corpus) - 1.0).abs() < 1e-9);
        // Term absent: ln(2/1) + 1.
        let absent = inverse_document_frequency("cobol", &corpus);
        assert!((absent - (2.0_f64.ln() + 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_document_construction_order_and_filters() {
        let candidate = frontend_candidate();
        let document = build_document(&candidate);

        assert_eq!(document[0], "react");
        assert_eq!(document[1], "typescript");
        assert_eq!(document[2], "frontend");
        // Responsibility words of three characters or fewer are dropped.
        assert!(!document.contains(&"the".to_string()));
        assert!(!document.contains(&"ui".to_string()));
        assert!(document.contains(&"dashboard".to_string()));
        assert!(document.contains(&"storefront".to_string()));
    }

    #[test]
    fn test_empty_requirement_scores_zero() {
        let candidate = frontend_candidate();
        assert_eq!(match_score(&candidate, "", &ScoreWeights::default()), 0.0);
        assert_eq!(match_score(&candidate, "a an or", &ScoreWeights::default()), 0.0);
    }

    #[test]
    fn test_exact_skill_match_earns_bonus() {
        let candidate = frontend_candidate();
        let breakdown = score_breakdown(
            &candidate,
            "Senior React developer",
            &ScoreWeights::default(),
        );

        assert!(breakdown
            .signals
            .iter()
            .any(|signal| matches!(signal, MatchSignal::ExactSkill { term } if term == "react")));
        assert!(breakdown.skill_points > 0.0);
    }

    #[test]
    fn test_spec_worked_example() {
        // 24 months -> 12 experience points, 2 projects -> 15 project points.
        let candidate = frontend_candidate();
        let breakdown = score_breakdown(&candidate, "React", &ScoreWeights::default());

        assert!((breakdown.experience_points - 12.0).abs() < 1e-9);
        assert!((breakdown.project_points - 15.0).abs() < 1e-9);
        assert_eq!(
            breakdown.signals,
            vec![MatchSignal::ExactSkill {
                term: "react".into()
            }]
        );
    }

    #[test]
    fn test_match_score_is_capped_at_one() {
        let candidate = frontend_candidate();
        // Every term matches a skill exactly, so the raw score equals the
        // normalization ceiling.
        let score = match_score(&candidate, "React TypeScript", &ScoreWeights::default());
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_total_score_bounds() {
        let weights = ScoreWeights::default();

        let empty = Candidate::new("c0", "Empty");
        assert_eq!(total_score(&empty, "", &weights), 0);

        let mut maxed = frontend_candidate();
        maxed.total_we_months = 100_000;
        for i in 0..10 {
            maxed.projects.push(Project {
                name: format!("p{i}"),
                ..Default::default()
            });
        }
        let total = total_score(&maxed, "React TypeScript", &weights);
        assert!(total <= 100);
        // Caps: 40 + 30 + 30.
        assert_eq!(total, 100);
    }

    #[test]
    fn test_compute_fills_derived_block() {
        let candidate = frontend_candidate();
        let computed = compute(&candidate, "React", &ScoreWeights::default());

        assert_eq!(computed.experience_level, ExperienceLevel::OneToThreeYears);
        assert_eq!(
            computed.employment_status,
            talentflow_model::EmploymentStatus::Employed
        );
        assert!(computed.score > 0);
    }

    #[test]
    fn test_rank_sorts_and_skips_error_records() {
        let strong = frontend_candidate();

        let mut weak = Candidate::new("c2", "Bob");
        weak.total_we_months = 3;

        let mut broken = frontend_candidate();
        broken.id = "c3".into();
        broken.error = Some("fetch failed".into());

        let ranked = rank(
            vec![weak, broken, strong],
            "React developer",
            &ScoreWeights::default(),
        );

        assert_eq!(ranked[0].id, "c1");
        assert_eq!(ranked[1].id, "c2");
        assert_eq!(ranked[2].id, "c3");
        assert!(ranked[2].computed.is_none());
        assert!(ranked[0].computed.is_some());
    }

    #[test]
    fn test_haversine_known_distance() {
        // One degree of longitude on the equator.
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(0.0, 1.0);
        let distance = haversine_km(&a, &b);
        assert!((distance - 111.19).abs() < 0.5, "got {distance}");
        assert_eq!(haversine_km(&a, &a), 0.0);
    }

    #[test]
    fn test_distance_sort_puts_missing_coordinates_last() {
        let origin = Coordinates::new(0.0, 0.0);

        let mut near = Candidate::new("near", "Near");
        near.location_coordinates = Some(Coordinates::new(0.0, 1.0));
        let mut far = Candidate::new("far", "Far");
        far.location_coordinates = Some(Coordinates::new(0.0, 10.0));
        let mut invalid = Candidate::new("invalid", "Invalid");
        invalid.location_coordinates = Some(Coordinates::new(f64::NAN, 0.0));
        let missing = Candidate::new("missing", "Missing");

        let mut candidates = vec![missing, far, invalid, near];
        sort_candidates(&mut candidates, &SortOrder::Distance(origin));

        let ids: Vec<&str> = candidates.iter().map(|c| c.id.as_str()).collect();
        // The two coordinate-less records compare equal, so their original
        // relative order is preserved.
        assert_eq!(ids, vec!["near", "far", "missing", "invalid"]);
    }
}
