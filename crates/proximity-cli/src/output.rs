//! Output formatting utilities

use std::fmt::Write;

use clap::ValueEnum;
use serde::Serialize;

use proximity_core::{Author, AuthorId, GuideReport, RunSummary, SocialGraph};

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

pub fn to_json<T: Serialize + ?Sized>(data: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

pub fn render_author(author: &Author, format: OutputFormat) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        return to_json(author);
    }

    let mut out = String::new();
    writeln!(out, "{} ({})", author.label(), author.author_id)?;
    writeln!(
        out,
        "  papers: {}",
        author.paper_count.unwrap_or(author.papers.len() as u32)
    )?;
    writeln!(out, "  co-authors: {}", author.co_author_ids().len())?;
    for paper in &author.papers {
        writeln!(out, "  - {}", paper.title)?;
    }
    Ok(out.trim_end().to_string())
}

pub fn render_summary(summary: &RunSummary, format: OutputFormat) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        return to_json(summary);
    }

    let mut out = String::new();
    let name = summary.seeker_name.as_deref().unwrap_or("unknown");
    writeln!(out, "Run {} for {} ({})", summary.run_id, summary.seeker, name)?;
    for stats in &summary.circles {
        writeln!(
            out,
            "  circle {}: {} authors ({} fetched, {} failed of {})",
            stats.level, stats.discovered, stats.fetched, stats.failed, stats.requested
        )?;
    }
    for error in &summary.errors {
        writeln!(out, "  error: {}", error)?;
    }
    Ok(out.trim_end().to_string())
}

fn display_name(graph: &SocialGraph, id: &AuthorId) -> String {
    match graph.author(id).and_then(|a| a.name.as_deref()) {
        Some(name) => format!("{} [{}]", name, id),
        None => id.to_string(),
    }
}

fn render_path(graph: &SocialGraph, path: &[AuthorId]) -> String {
    path.iter()
        .map(|id| display_name(graph, id))
        .collect::<Vec<_>>()
        .join(" -> ")
}

pub fn render_guides(
    report: &GuideReport,
    graph: &SocialGraph,
    format: OutputFormat,
) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        return to_json(report);
    }

    let mut out = String::new();
    writeln!(
        out,
        "Guides for {} within {} hops: {} found",
        display_name(graph, &report.seeker),
        report.max_hops,
        report.found()
    )?;
    for found in report.paths.values() {
        writeln!(
            out,
            "  {} ({} hops): {}",
            found.guide,
            found.length,
            render_path(graph, &found.path)
        )?;
    }
    for found in &report.beyond_cutoff {
        writeln!(out, "  {} beyond cutoff ({} hops)", found.guide, found.length)?;
    }
    for guide in &report.unreachable {
        writeln!(out, "  {} unreachable", guide)?;
    }
    Ok(out.trim_end().to_string())
}
