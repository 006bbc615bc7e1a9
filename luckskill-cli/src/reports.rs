use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;
use luckskill_engine::numbers::usize_to_f64;
use luckskill_engine::{
    Histogram, Summary, SweepPoint, TrialHistograms, TrialParams, TrialSeries, TrialSummary,
};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::time::Duration;

/// Everything one CLI invocation produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub generated_at: DateTime<Utc>,
    pub fingerprint: String,
    pub seed: u64,
    pub params: TrialParams,
    pub trials: Option<TrialsSection>,
    pub sweep: Option<Vec<SweepPoint>>,
}

impl SimulationReport {
    pub fn new(
        params: TrialParams,
        seed: u64,
        trials: Option<TrialsSection>,
        sweep: Option<Vec<SweepPoint>>,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            fingerprint: format!("{:016x}", params.fingerprint()),
            seed,
            params,
            trials,
            sweep,
        }
    }
}

/// Per-trial output at the requested luck weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialsSection {
    pub summary: Option<TrialSummary>,
    pub histograms: TrialHistograms,
    pub series: TrialSeries,
}

impl TrialsSection {
    pub fn new(series: TrialSeries, bins: usize) -> Self {
        Self {
            summary: series.summary(),
            histograms: series.histograms(bins),
            series,
        }
    }
}

pub fn generate_console_report(
    out: &mut dyn Write,
    report: &SimulationReport,
    total_duration: Duration,
    verbose: bool,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Simulation Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "=====================".cyan())?;

    let params = &report.params;
    writeln!(out, "Applicants: {}", params.num_applicants)?;
    writeln!(out, "Selected: {}", params.num_selected)?;
    writeln!(out, "Luck weight: {:.2}", params.luck_weight)?;
    writeln!(out, "Simulations: {}", params.num_simulations)?;
    writeln!(out, "Distribution: {}", params.distribution)?;
    writeln!(out, "Seed: {} (params {})", report.seed, report.fingerprint)?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    if let Some(trials) = &report.trials {
        writeln!(out, "{}", "🎲 Trials".bright_yellow().bold())?;
        writeln!(out, "{}", "=========".yellow())?;
        if let Some(summary) = &trials.summary {
            writeln!(
                out,
                "{:<22} {:>9} {:>9} {:>9} {:>9}",
                "metric", "mean", "std", "min", "max"
            )?;
            for (label, stats) in summary_rows(summary) {
                writeln!(
                    out,
                    "{:<22} {:>9.3} {:>9.3} {:>9.3} {:>9.3}",
                    label, stats.mean, stats.std_dev, stats.min, stats.max
                )?;
            }
            writeln!(out, "{}", top_skill_line(summary, params.num_selected))?;
            let impact = summary.luck_impact.mean;
            let headline = format!(
                "On average {:.1}% of the selected cohort would not have made a skill-only cut.",
                impact * 100.0
            );
            if impact > 0.0 {
                writeln!(out, "{}", headline.bold())?;
            } else {
                writeln!(out, "{}", headline.green())?;
            }
        } else {
            writeln!(out, "No trials executed.")?;
        }
        if verbose {
            writeln!(out)?;
            write_text_histogram(out, "Mean luck of selected", &trials.histograms.luck_score)?;
            write_text_histogram(out, "Top-skill overlap", &trials.histograms.top_skill_overlap)?;
            write_text_histogram(out, "Impact of luck", &trials.histograms.luck_impact)?;
        }
        writeln!(out)?;
    }

    if let Some(points) = &report.sweep {
        writeln!(out, "{}", "📈 Luck-weight Sweep (95% CI)".bright_yellow().bold())?;
        writeln!(out, "{}", "=============================".yellow())?;
        writeln!(
            out,
            "{:>6} {:>11} {:>11} {:>11}",
            "weight", "mean", "lower", "upper"
        )?;
        for point in points {
            writeln!(
                out,
                "{:>6.2} {:>11.4} {:>11.4} {:>11.4}",
                point.weight, point.mean_impact, point.lower_bound, point.upper_bound
            )?;
        }
    }

    Ok(())
}

/// Mean skill-only overlap as a share of the cohort, e.g. `7.5 / 10 (75.0%)`.
fn top_skill_line(summary: &TrialSummary, num_selected: usize) -> String {
    let mean = summary.top_skill_overlap.mean;
    let share = if num_selected == 0 {
        0.0
    } else {
        mean / usize_to_f64(num_selected)
    };
    format!(
        "Average top-skilled selected: {mean:.1} / {num_selected} ({:.1}%)",
        share * 100.0
    )
}

fn summary_rows(summary: &TrialSummary) -> [(&'static str, &Summary); 3] {
    [
        ("mean luck of selected", &summary.luck_score),
        ("top-skill overlap", &summary.top_skill_overlap),
        ("impact of luck", &summary.luck_impact),
    ]
}

fn write_text_histogram(out: &mut dyn Write, title: &str, histogram: &Histogram) -> Result<()> {
    const BAR_WIDTH: usize = 40;
    writeln!(out, "{}", title.bold())?;
    let peak = histogram
        .bins
        .iter()
        .map(|bin| bin.count)
        .max()
        .unwrap_or(0);
    for bin in &histogram.bins {
        let bar = if peak == 0 {
            0
        } else {
            bin.count * BAR_WIDTH / peak
        };
        writeln!(
            out,
            "  [{:>8.3}, {:>8.3}] {:>6} {}",
            bin.lower,
            bin.upper,
            bin.count,
            "#".repeat(bar)
        )?;
    }
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, report: &SimulationReport) -> Result<()> {
    let json_output = serde_json::to_string_pretty(report)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, report: &SimulationReport) -> Result<()> {
    let params = &report.params;
    writeln!(out, "# Luck vs. Skill Simulation\n")?;
    writeln!(out, "## Parameters\n")?;
    writeln!(out, "- **Applicants**: {}", params.num_applicants)?;
    writeln!(out, "- **Selected**: {}", params.num_selected)?;
    writeln!(out, "- **Luck weight**: {:.2}", params.luck_weight)?;
    writeln!(out, "- **Simulations**: {}", params.num_simulations)?;
    writeln!(out, "- **Distribution**: {}", params.distribution)?;
    writeln!(out, "- **Seed**: {}", report.seed)?;
    writeln!(out, "- **Fingerprint**: `{}`\n", report.fingerprint)?;

    if let Some(summary) = report.trials.as_ref().and_then(|t| t.summary.as_ref()) {
        writeln!(out, "## Trials\n")?;
        writeln!(out, "| Metric | Mean | Std | Min | Max |")?;
        writeln!(out, "|---|---:|---:|---:|---:|")?;
        for (label, stats) in summary_rows(summary) {
            writeln!(
                out,
                "| {label} | {:.3} | {:.3} | {:.3} | {:.3} |",
                stats.mean, stats.std_dev, stats.min, stats.max
            )?;
        }
        writeln!(out)?;
        writeln!(out, "{}\n", top_skill_line(summary, params.num_selected))?;
    }

    if let Some(points) = &report.sweep {
        writeln!(out, "## Luck-weight Sweep\n")?;
        writeln!(out, "| Weight | Mean impact | Lower 95% | Upper 95% |")?;
        writeln!(out, "|---:|---:|---:|---:|")?;
        for point in points {
            writeln!(
                out,
                "| {:.2} | {:.4} | {:.4} | {:.4} |",
                point.weight, point.mean_impact, point.lower_bound, point.upper_bound
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Per-trial rows and/or sweep rows; sections are separated by a blank line.
pub fn generate_csv_report(out: &mut dyn Write, report: &SimulationReport) -> Result<()> {
    if let Some(trials) = &report.trials {
        let series = &trials.series;
        writeln!(out, "trial,mean_selected_luck,top_skill_overlap,luck_impact")?;
        for idx in 0..series.len() {
            writeln!(
                out,
                "{idx},{:.6},{},{:.6}",
                series.luck_scores[idx], series.top_skill_overlap[idx], series.luck_impact[idx]
            )?;
        }
    }
    if let Some(points) = &report.sweep {
        if report.trials.is_some() {
            writeln!(out)?;
        }
        writeln!(out, "weight,mean_impact,lower_bound,upper_bound")?;
        for point in points {
            writeln!(
                out,
                "{:.2},{:.6},{:.6},{:.6}",
                point.weight, point.mean_impact, point.lower_bound, point.upper_bound
            )?;
        }
    }
    Ok(())
}
