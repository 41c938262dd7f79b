//! Health command - strengths, weaknesses, risks and a score

use anyhow::{Context as _, Result};
use std::path::Path;

use super::ui::{self, colors, symbols};
use nexus_context::analysis::health::HealthReport;
use nexus_context::analysis::Severity;
use nexus_context::config::Config;

pub async fn run(config: &Config, path: Option<&str>, json: bool) -> Result<()> {
    let path = Path::new(path.unwrap_or("."));

    if !json {
        ui::print_header(path, "Project health");
    }

    let (manager, _stats) = super::load_project(config, path, !json).await?;
    let report = manager.analyze_project_health();

    if json {
        let out = serde_json::to_string_pretty(&report).context("Failed to serialize health report")?;
        println!("{}", out);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::High => colors::ERROR,
        Severity::Medium => colors::WARNING,
        Severity::Low => colors::MUTED,
    }
}

fn print_report(report: &HealthReport) {
    let (icon, color) = match report.score {
        70..=100 => (symbols::SUCCESS, colors::SUCCESS),
        40..=69 => (symbols::WARNING, colors::WARNING),
        _ => (symbols::ERROR, colors::ERROR),
    };

    ui::box_top(color, icon, "Project Health");
    ui::box_blank(color);
    ui::box_row(color, "Score", &format!("{}/100", report.score), colors::AI_ACCENT);

    if !report.strengths.is_empty() {
        ui::box_blank(color);
        ui::box_text(color, colors::BOLD, "Strengths");
        for s in &report.strengths {
            ui::box_text(color, colors::SUCCESS, &format!("+ {}: {}", s.area, s.description));
        }
    }

    if !report.weaknesses.is_empty() {
        ui::box_blank(color);
        ui::box_text(color, colors::BOLD, "Weaknesses");
        for w in &report.weaknesses {
            ui::box_text(
                color,
                severity_color(w.impact),
                &format!("- {}: {}", w.area, w.description),
            );
        }
    }

    if !report.risks.is_empty() {
        ui::box_blank(color);
        ui::box_text(color, colors::BOLD, "Risks");
        for r in &report.risks {
            ui::box_text(
                color,
                severity_color(r.severity),
                &format!("! {} [{}]: {}", r.area, r.severity, r.description),
            );
        }
    }

    if !report.recommendations.is_empty() {
        ui::box_blank(color);
        ui::box_text(color, colors::BOLD, "Recommendations");
        for (i, rec) in report.recommendations.iter().enumerate() {
            ui::box_text(
                color,
                severity_color(rec.priority),
                &format!("{}. {}", i + 1, rec.action),
            );
        }
    }

    ui::box_blank(color);
    ui::box_bottom(color);
    println!();
}
