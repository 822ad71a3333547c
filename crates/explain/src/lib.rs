//! Explanation generation for candidate scores.
//!
//! Converts score breakdowns into human-readable explanations suitable for
//! display in the dashboard and exports.

use serde::{Deserialize, Serialize};
use talentflow_model::{MatchSignal, ScoreBreakdown};

/// A structured explanation of one part of a candidate's score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanation {
    /// Short summary (1 line)
    pub summary: String,

    /// Detailed explanation (1-2 sentences)
    pub detail: String,

    /// Points this part contributed.
    pub points: f64,
}

/// Generate explanations for a full score breakdown: one entry per score
/// component, then one per requirement-term signal.
pub fn explain_breakdown(breakdown: &ScoreBreakdown) -> Vec<Explanation> {
    let mut explanations = vec![
        Explanation {
            summary: "Skill match".to_string(),
            detail: format!(
                "Requirement terms matched against the candidate's skills and \
                 experience text earned {:.1} of 40 points.",
                breakdown.skill_points
            ),
            points: breakdown.skill_points,
        },
        Explanation {
            summary: "Work experience".to_string(),
            detail: format!(
                "Total months of work experience earned {:.1} of 30 points.",
                breakdown.experience_points
            ),
            points: breakdown.experience_points,
        },
        Explanation {
            summary: "Projects".to_string(),
            detail: format!(
                "Portfolio projects earned {:.1} of 30 points.",
                breakdown.project_points
            ),
            points: breakdown.project_points,
        },
    ];

    explanations.extend(breakdown.signals.iter().map(explain_signal));
    explanations
}

/// Generate an explanation for a single requirement-term signal.
pub fn explain_signal(signal: &MatchSignal) -> Explanation {
    match signal {
        MatchSignal::ExactSkill { term } => Explanation {
            summary: format!("'{}' matches a listed skill", term),
            detail: format!(
                "The requirement term '{}' appears inside one of the \
                 candidate's skill entries and earned the full match bonus.",
                term
            ),
            points: 1.5,
        },

        MatchSignal::PartialTerm { term, weight } => Explanation {
            summary: format!("'{}' found in experience text", term),
            detail: format!(
                "The requirement term '{}' did not match a listed skill but \
                 appears in the candidate's experience and project text.",
                term
            ),
            points: *weight,
        },
    }
}

/// One-line verdict for a scored candidate.
pub fn summarize_match(breakdown: &ScoreBreakdown) -> String {
    let level = if breakdown.total >= 70 {
        "STRONG MATCH"
    } else if breakdown.total >= 40 {
        "MODERATE MATCH"
    } else {
        "WEAK MATCH"
    };

    let exact = breakdown
        .signals
        .iter()
        .filter(|signal| matches!(signal, MatchSignal::ExactSkill { .. }))
        .count();

    if breakdown.signals.is_empty() {
        format!("{}: {} points", level, breakdown.total)
    } else {
        format!(
            "{}: {} points, {} of {} requirement terms matched a skill",
            level,
            breakdown.total,
            exact,
            breakdown.signals.len()
        )
    }
}
