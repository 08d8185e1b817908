use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::assess::Assessment;
use crate::region::{LookupPolicy, RegionRegistry};
use crate::scenario::{ScenarioConfig, ScenarioReport};
use crate::scoring::RiskLevel;
use crate::session::SessionStats;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score with one decimal place
pub fn format_score(score: f64) -> String {
    format!("{:.1}", score)
}

/// Format a level as "High (Vulnerable)", colored by severity
pub fn format_level(level: RiskLevel, use_colors: bool) -> String {
    let text = format!("{} ({})", level.label(), level.tier());
    if !use_colors {
        return text;
    }
    match level {
        RiskLevel::Low => text.green().to_string(),
        RiskLevel::Medium => text.yellow().to_string(),
        RiskLevel::High => text.red().bold().to_string(),
    }
}

fn format_optional(value: Option<f64>) -> String {
    value.map(format_score).unwrap_or_else(|| "-".to_string())
}

/// Format a single assessment with its component breakdown
pub fn format_assessment(assessment: &Assessment, use_colors: bool) -> String {
    let b = &assessment.breakdown;
    let mut lines = Vec::new();

    let score = format_score(b.total_score);
    let region = format!("{} ({})", assessment.region_key, assessment.region_currency);
    if use_colors {
        lines.push(format!(
            "Risk score: {}  {}",
            score.bold(),
            format_level(b.level, true)
        ));
        lines.push(format!("  Region: {}", region.cyan()));
    } else {
        lines.push(format!("Risk score: {}  {}", score, format_level(b.level, false)));
        lines.push(format!("  Region: {}", region));
    }

    lines.push(format!("  Income: {}", b.comparison.label()));
    lines.push(format!("  Monetary: {}", format_score(b.components.monetary)));
    lines.push(format!("  Capability: {}", format_score(b.components.capability)));
    lines.push(format!("  Structural: {}", format_score(b.components.structural)));
    if let Some(employment) = b.components.employment {
        lines.push(format!("  Employment: {}", format_score(employment)));
    }
    if let Some(p) = b.classifier_probability {
        lines.push(format!("  Classifier probability: {:.2}", p));
    }
    if b.floor_applied {
        lines.push("  Income floor applied".to_string());
    }

    if use_colors {
        lines.push(format!("  Advice: {}", assessment.advisory_text.italic()));
    } else {
        lines.push(format!("  Advice: {}", assessment.advisory_text));
    }

    lines.join("\n")
}

/// Format scenario deltas, marking the recommended intervention
pub fn format_scenarios(
    report: &ScenarioReport,
    config: &ScenarioConfig,
    use_colors: bool,
) -> String {
    // Scenarios rescore without the classifier, so this can differ from `assess`
    let mut lines = vec![format!(
        "Rule-based baseline: {}",
        format_score(report.baseline)
    )];

    for outcome in &report.outcomes {
        let marker = if outcome.intervention == report.recommended {
            "*"
        } else {
            " "
        };
        let line = format!(
            "{} {:<32} {:>6} -> {:>5}",
            marker,
            outcome.intervention.describe(config),
            format!("{:+.1}", -outcome.delta),
            format_score(outcome.perturbed_score)
        );
        if use_colors && marker == "*" {
            lines.push(line.bold().to_string());
        } else {
            lines.push(line);
        }
    }

    lines.push(format!(
        "Recommended: {}",
        report.recommended.describe(config)
    ));
    lines.join("\n")
}

/// Format rolling session statistics
pub fn format_session_stats(stats: &SessionStats) -> String {
    if stats.count == 0 {
        return "No assessments recorded.".to_string();
    }

    let mut lines = vec![
        format!("Assessments: {}", stats.count),
        format!(
            "  Average: {}  Min: {}  Max: {}",
            format_optional(stats.average),
            format_optional(stats.min),
            format_optional(stats.max)
        ),
        format!(
            "  Levels: Low {} / Medium {} / High {}",
            stats.levels.low, stats.levels.medium, stats.levels.high
        ),
    ];
    if let Some(trend) = stats.trend {
        lines.push(format!("  Trend: {:+.1}", trend));
    }
    lines.join("\n")
}

/// Format configured regions, one per line, followed by the lookup policy
pub fn format_regions(registry: &RegionRegistry, use_colors: bool) -> String {
    if registry.is_empty() {
        return "No regions configured.".to_string();
    }

    let mut lines: Vec<String> = registry
        .iter()
        .map(|(key, region)| {
            let name = format!("{:<10}", key);
            let line = format!(
                "line {:>10.0} {}  education {:>4.1}y  cap {:.1}",
                region.poverty_line,
                region.currency,
                region.education_target,
                region.dependency_cap
            );
            if use_colors {
                format!("{} {}", name.cyan(), line)
            } else {
                format!("{} {}", name, line)
            }
        })
        .collect();

    lines.push(match registry.policy() {
        LookupPolicy::Strict => "Unknown regions are rejected".to_string(),
        LookupPolicy::Fallback(key) => format!("Unknown regions fall back to {}", key),
    });
    lines.join("\n")
}

/// Format assessments as tab-separated values for scripting
/// Columns: region, score, level, comparison (no headers, no colors)
pub fn format_tsv(assessments: &[Assessment]) -> String {
    assessments
        .iter()
        .map(|a| {
            format!(
                "{}\t{:.1}\t{}\t{}",
                a.region_key,
                a.breakdown.total_score,
                a.breakdown.level.label(),
                a.breakdown.comparison.label()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
