//! Analyze command - scan a repository and summarize the analysis

use anyhow::{Context as _, Result};
use std::path::Path;
use std::time::Instant;

use super::ui::{self, colors, symbols};
use nexus_context::config::Config;
use nexus_context::index::IndexStats;
use nexus_context::ProjectContext;

pub async fn run(config: &Config, path: Option<&str>, json: bool) -> Result<()> {
    let path = Path::new(path.unwrap_or("."));
    let start_time = Instant::now();

    if !json {
        ui::print_header(path, "Heuristic analysis");
    }

    let (manager, stats) = super::load_project(config, path, !json).await?;
    let project = manager.read();

    if json {
        let out = serde_json::to_string_pretty(&*project).context("Failed to serialize analysis")?;
        println!("{}", out);
        return Ok(());
    }

    if stats.files == 0 {
        ui::print_warning("No readable files found in directory");
        return Ok(());
    }

    print_summary(&project, &stats, start_time.elapsed().as_secs_f64());
    Ok(())
}

fn print_summary(project: &ProjectContext, stats: &IndexStats, elapsed: f64) {
    let security = project.analysis.security.len();
    let (icon, color, title) = if security > 0 {
        (symbols::WARNING, colors::WARNING, "Analysis Completed with Findings")
    } else {
        (symbols::SUCCESS, colors::SUCCESS, "Analysis Successful")
    };
    let metadata = &project.metadata;
    let unknown = "unknown".to_string();

    ui::box_top(color, icon, title);
    ui::box_blank(color);
    ui::box_row(color, "Project", metadata.name.as_ref().unwrap_or(&unknown), colors::FG);
    ui::box_row(color, "Language", metadata.language.as_ref().unwrap_or(&unknown), colors::FG);
    ui::box_row(color, "Framework", metadata.framework.as_ref().unwrap_or(&unknown), colors::FG);
    ui::box_blank(color);
    ui::box_row(color, "Files Loaded", &stats.files.to_string(), colors::FG);
    ui::box_row(color, "Total Lines", &stats.total_lines.to_string(), colors::FG);
    ui::box_row(color, "Records", &stats.total_records().to_string(), colors::AI_ACCENT);
    ui::box_text(
        color,
        colors::MUTED,
        &format!(
            "  Functions: {} │ Classes: {} │ Tests: {}",
            stats.functions, stats.classes, stats.test_files
        ),
    );
    ui::box_row(color, "Modules", &project.structure.modules.len().to_string(), colors::FG);
    ui::box_row(color, "Routes", &project.structure.routes.len().to_string(), colors::FG);
    ui::box_row(
        color,
        "Avg Complexity",
        &format!("{:.2}", project.analysis.quality.avg_complexity),
        colors::FG,
    );

    if !project.analysis.patterns.is_empty() {
        ui::box_blank(color);
        for pattern in &project.analysis.patterns {
            ui::box_text(
                color,
                colors::FG,
                &format!("{} ({:.0}%)", pattern.name, pattern.confidence * 100.0),
            );
        }
    }

    if security > 0 {
        ui::box_blank(color);
        ui::box_row(color, "Security Findings", &security.to_string(), colors::ERROR);
        for finding in project.analysis.security.iter().take(5) {
            ui::box_text(
                color,
                colors::MUTED,
                &format!("{}:{} {}", finding.path, finding.line, finding.rule),
            );
        }
    }

    ui::box_row(color, "Time Elapsed", &format!("{:.2}s", elapsed), colors::FG);
    ui::box_blank(color);
    ui::box_text(
        color,
        colors::MUTED,
        "Ready for queries. Try: `nexus-ctx context \"How does auth work?\"`",
    );
    ui::box_bottom(color);
    println!();
}
