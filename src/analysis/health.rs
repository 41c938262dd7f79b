//! Project health report
//!
//! Strengths, weaknesses, opportunities and risks are derived from the
//! analysis already held by a [`ProjectContext`], then folded into a 0-100
//! score and a prioritized recommendation list.

use serde::{Deserialize, Serialize};

use super::Severity;
use crate::context::ProjectContext;

const BASE_SCORE: i64 = 50;
const MAX_OPPORTUNITY_RECOMMENDATIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strength {
    pub area: String,
    pub description: String,
    pub impact: Severity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weakness {
    pub area: String,
    pub description: String,
    pub impact: Severity,
    pub suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opportunity {
    pub area: String,
    pub description: String,
    pub potential: Severity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Risk {
    pub area: String,
    pub description: String,
    pub severity: Severity,
    pub mitigation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Severity,
    pub area: String,
    pub action: String,
    pub impact: String,
    pub effort: Severity,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub strengths: Vec<Strength>,
    pub weaknesses: Vec<Weakness>,
    pub opportunities: Vec<Opportunity>,
    pub risks: Vec<Risk>,
    pub score: u8,
    pub recommendations: Vec<Recommendation>,
}

/// Dependencies known to be superseded
pub fn outdated_dependencies(dependencies: &[String]) -> Vec<&str> {
    dependencies
        .iter()
        .map(String::as_str)
        .filter(|d| d.contains("jquery") || (d.contains("angular") && !d.contains("@angular")))
        .collect()
}

pub fn assess(project: &ProjectContext) -> HealthReport {
    let quality = &project.analysis.quality;
    let metadata = &project.metadata;
    let mut report = HealthReport::default();

    if project.analysis.patterns.iter().any(|p| p.confidence > 0.8) {
        report.strengths.push(Strength {
            area: "Architecture".to_string(),
            description: "Clear architectural patterns detected".to_string(),
            impact: Severity::High,
        });
    }
    if quality.coverage > 70.0 {
        report.strengths.push(Strength {
            area: "Testing".to_string(),
            description: format!("Good test coverage ({:.1}%)", quality.coverage),
            impact: Severity::High,
        });
    }
    if !metadata.dependencies.is_empty() {
        report.strengths.push(Strength {
            area: "Dependencies".to_string(),
            description: "Using modern libraries and frameworks".to_string(),
            impact: Severity::Medium,
        });
    }

    if quality.avg_complexity > 10.0 {
        report.weaknesses.push(Weakness {
            area: "Complexity".to_string(),
            description: format!("High average complexity ({:.1})", quality.avg_complexity),
            impact: Severity::High,
            suggestion: "Consider breaking down complex functions".to_string(),
        });
    }
    if quality.code_smells.len() > 10 {
        report.weaknesses.push(Weakness {
            area: "Code Quality".to_string(),
            description: format!("{} code smells detected", quality.code_smells.len()),
            impact: Severity::Medium,
            suggestion: "Refactor problematic areas".to_string(),
        });
    }
    if project.content.comments.len() < 5 {
        report.weaknesses.push(Weakness {
            area: "Documentation".to_string(),
            description: "Limited code documentation".to_string(),
            impact: Severity::Low,
            suggestion: "Add JSDoc comments to main functions".to_string(),
        });
    }

    if metadata.framework.is_none() {
        report.opportunities.push(Opportunity {
            area: "Framework".to_string(),
            description: "Could benefit from a modern framework".to_string(),
            potential: Severity::High,
        });
    }
    if quality.coverage < 50.0 {
        report.opportunities.push(Opportunity {
            area: "Testing".to_string(),
            description: "Increase test coverage for better reliability".to_string(),
            potential: Severity::High,
        });
    }

    let outdated = outdated_dependencies(&metadata.dependencies);
    if !outdated.is_empty() {
        report.risks.push(Risk {
            area: "Dependencies".to_string(),
            description: format!("{} potentially outdated dependencies", outdated.len()),
            severity: Severity::Medium,
            mitigation: "Update dependencies regularly".to_string(),
        });
    }
    if !project.analysis.security.is_empty() {
        report.risks.push(Risk {
            area: "Security".to_string(),
            description: format!(
                "{} potential security issues",
                project.analysis.security.len()
            ),
            severity: Severity::High,
            mitigation: "Review and fix security vulnerabilities".to_string(),
        });
    }

    report.score = score(&report);
    report.recommendations = recommendations(&report);
    report
}

fn score(report: &HealthReport) -> u8 {
    let weakness_penalty: i64 = report
        .weaknesses
        .iter()
        .map(|w| match w.impact {
            Severity::High => 15,
            Severity::Medium => 10,
            Severity::Low => 5,
        })
        .sum();
    let risk_penalty: i64 = report
        .risks
        .iter()
        .map(|r| match r.severity {
            Severity::High => 20,
            Severity::Medium => 10,
            Severity::Low => 0,
        })
        .sum();

    let strengths = i64::try_from(report.strengths.len()).unwrap_or(i64::MAX / 20);
    let raw = BASE_SCORE + strengths * 10 - weakness_penalty - risk_penalty;
    u8::try_from(raw.clamp(0, 100)).unwrap_or(100)
}

fn recommendations(report: &HealthReport) -> Vec<Recommendation> {
    let risks = report
        .risks
        .iter()
        .filter(|r| r.severity == Severity::High)
        .map(|r| Recommendation {
            priority: Severity::High,
            area: r.area.clone(),
            action: r.mitigation.clone(),
            impact: "Reduces critical risk".to_string(),
            effort: Severity::Medium,
        });

    let weaknesses = report
        .weaknesses
        .iter()
        .filter(|w| w.impact == Severity::High)
        .map(|w| Recommendation {
            priority: Severity::Medium,
            area: w.area.clone(),
            action: w.suggestion.clone(),
            impact: "Improves code quality".to_string(),
            effort: Severity::Medium,
        });

    let opportunities = report
        .opportunities
        .iter()
        .take(MAX_OPPORTUNITY_RECOMMENDATIONS)
        .map(|o| Recommendation {
            priority: Severity::Low,
            area: o.area.clone(),
            action: o.description.clone(),
            impact: "Enhances capabilities".to_string(),
            effort: Severity::High,
        });

    risks.chain(weaknesses).chain(opportunities).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::patterns::ArchitecturalPattern;
    use crate::analysis::quality::SecurityFinding;

    #[test]
    fn test_outdated_dependencies() {
        let deps: Vec<String> = ["jquery", "angular", "@angular/core", "react"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(outdated_dependencies(&deps), vec!["jquery", "angular"]);
    }

    #[test]
    fn test_empty_project_report() {
        let report = assess(&ProjectContext::default());

        // Documentation weakness only; framework and testing opportunities
        assert!(report.strengths.is_empty());
        assert_eq!(report.weaknesses.len(), 1);
        assert_eq!(report.opportunities.len(), 2);
        assert_eq!(report.score, 45);
        assert_eq!(report.recommendations.len(), 2);
        assert!(report
            .recommendations
            .iter()
            .all(|r| r.priority == Severity::Low));
    }

    #[test]
    fn test_score_and_recommendation_order() {
        let mut project = ProjectContext::default();
        project.metadata.dependencies = vec!["jquery".to_string()];
        project.metadata.framework = Some("Express".to_string());
        project.analysis.patterns.push(ArchitecturalPattern {
            name: "RESTful API".to_string(),
            confidence: 0.85,
            evidence: Vec::new(),
        });
        project.analysis.quality.avg_complexity = 12.0;
        project.analysis.security.push(SecurityFinding {
            path: "a.js".to_string(),
            rule: "eval".to_string(),
            line: 1,
        });

        let report = assess(&project);
        // 50 + 2*10 - (15 + 5) - (10 + 20)
        assert_eq!(report.score, 20);

        let priorities: Vec<_> = report.recommendations.iter().map(|r| r.priority).collect();
        assert_eq!(priorities, vec![Severity::High, Severity::Medium, Severity::Low]);
        assert_eq!(report.recommendations[0].area, "Security");
        assert_eq!(report.recommendations[1].area, "Complexity");
    }

    #[test]
    fn test_score_clamps_at_zero() {
        let report = HealthReport {
            risks: vec![
                Risk {
                    area: "Security".to_string(),
                    description: String::new(),
                    severity: Severity::High,
                    mitigation: String::new(),
                };
                4
            ],
            ..HealthReport::default()
        };
        assert_eq!(score(&report), 0);
    }
}
