//! Console reporter with colored output

use colored::Colorize;

use crate::assessment::ScoreCalculator;
use crate::narrative::NarrativeSource;
use crate::Tier;

use super::{AssessmentReport, FOOTER_NOTE};

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Print the full report to stdout
    pub fn report(&self, report: &AssessmentReport) {
        print!("{}", self.render(report));
    }

    /// Report in quiet mode (just the index and tier)
    pub fn report_quiet(&self, report: &AssessmentReport) {
        println!("{}", self.render_quiet(report));
    }

    pub fn render_quiet(&self, report: &AssessmentReport) -> String {
        format!(
            "{}: {:.2} ({})",
            report.profile.business_name,
            report.result.global_index,
            self.colorize_tier(report.result.tier)
        )
    }

    pub fn render(&self, report: &AssessmentReport) -> String {
        let mut out = String::new();
        self.write_header(&mut out, report);
        self.write_score(&mut out, report);
        self.write_breakdown(&mut out, report);
        self.write_extremes(&mut out, report);
        self.write_narrative(&mut out, report);
        out.push_str(&format!("   {}\n", self.paint_dimmed(FOOTER_NOTE)));
        out.push('\n');
        out
    }

    fn write_header(&self, out: &mut String, report: &AssessmentReport) {
        let p = &report.profile;
        out.push('\n');
        out.push_str(&format!(
            "{}\n",
            self.paint_bold(&format!("📊 Digital Maturity Assessment: {}", p.business_name))
        ));
        out.push_str(&format!(
            "   Sector: {} | Size: {} | Evaluated: {}\n",
            p.sector,
            p.size,
            report.evaluated_on.format("%Y-%m-%d")
        ));
        out.push('\n');
    }

    fn write_score(&self, out: &mut String, report: &AssessmentReport) {
        let r = &report.result;
        let bar = self.create_score_bar(r.global_index);
        out.push_str(&format!(
            "   Global Index: {} {}\n",
            bar,
            self.colorize_tier(r.tier)
        ));
        out.push_str(&format!(
            "   {}\n",
            self.paint_dimmed(ScoreCalculator::tier_description(r.tier))
        ));
        out.push('\n');
    }

    fn write_breakdown(&self, out: &mut String, report: &AssessmentReport) {
        out.push_str(&format!("   {}\n", self.paint_bold("Dimension Breakdown:")));
        for d in &report.result.dimensions {
            let bar = self.create_mini_bar(d.average);
            let score = self.colorize_value(d.average, &format!("{:.2}", d.average));
            if self.verbose {
                out.push_str(&format!(
                    "   {} {} {} (weight {:.0}%, contributes {:.2}, {})\n",
                    bar,
                    score,
                    d.name,
                    d.weight * 100.0,
                    d.weight * d.average,
                    ScoreCalculator::status_label(d.average)
                ));
            } else {
                out.push_str(&format!(
                    "   {} {} {} (weight {:.0}%)\n",
                    bar,
                    score,
                    d.short_name,
                    d.weight * 100.0
                ));
            }
        }
        out.push('\n');
    }

    fn write_extremes(&self, out: &mut String, report: &AssessmentReport) {
        let r = &report.result;
        let avg = |name: &str| {
            r.dimension(name)
                .map(|d| format!(" ({:.2})", d.average))
                .unwrap_or_default()
        };
        out.push_str(&format!(
            "   {} Strongest: {}{}\n",
            self.paint_icon("✓", IconColor::Green),
            r.strongest,
            avg(&r.strongest)
        ));
        out.push_str(&format!(
            "   {} Priority attention: {}{}\n",
            self.paint_icon("⚠", IconColor::Yellow),
            r.weakest,
            avg(&r.weakest)
        ));
        out.push('\n');
    }

    fn write_narrative(&self, out: &mut String, report: &AssessmentReport) {
        let Some(narrative) = &report.result.narrative else {
            return;
        };
        out.push_str(&format!("   {}\n", self.paint_bold("Recommendations:")));
        for line in narrative.text.lines() {
            out.push_str(&format!("   {}\n", line));
        }
        out.push('\n');

        match &narrative.source {
            NarrativeSource::Fallback { reason } => {
                out.push_str(&format!(
                    "   {} Offline mode: {}. Showing the built-in recommendations.\n",
                    self.paint_icon("ℹ", IconColor::Blue),
                    reason
                ));
                out.push('\n');
            }
            NarrativeSource::Generated { provider } if self.verbose => {
                out.push_str(&format!(
                    "   {}\n",
                    self.paint_dimmed(&format!("Narrative generated by {}", provider))
                ));
                out.push('\n');
            }
            NarrativeSource::Generated { .. } => {}
        }
    }

    fn colorize_tier(&self, tier: Tier) -> String {
        let s = tier.to_string();
        if !self.use_colors {
            return s;
        }
        match tier {
            Tier::Optimized => s.green().bold().to_string(),
            Tier::Managed => s.green().to_string(),
            Tier::Defined => s.yellow().to_string(),
            Tier::Aware => s.red().to_string(),
            Tier::Initial => s.red().bold().to_string(),
        }
    }

    fn colorize_value(&self, value: f64, text: &str) -> String {
        if !self.use_colors {
            return text.to_string();
        }
        if value >= 3.5 {
            text.green().to_string()
        } else if value >= 2.5 {
            text.yellow().to_string()
        } else {
            text.red().to_string()
        }
    }

    fn paint_bold(&self, text: &str) -> String {
        if self.use_colors {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn paint_dimmed(&self, text: &str) -> String {
        if self.use_colors {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    fn paint_icon(&self, icon: &str, color: IconColor) -> String {
        if !self.use_colors {
            return icon.to_string();
        }
        match color {
            IconColor::Green => icon.green().to_string(),
            IconColor::Yellow => icon.yellow().to_string(),
            IconColor::Blue => icon.blue().to_string(),
        }
    }

    /// 20-cell bar for the 1-5 index, followed by the value
    fn create_score_bar(&self, index: f64) -> String {
        let filled = filled_cells(index, 20);
        let bar = format!(
            "[{}{}] {:.2} / 5.0",
            "█".repeat(filled),
            "░".repeat(20 - filled),
            index
        );
        self.colorize_value(index, &bar)
    }

    fn create_mini_bar(&self, average: f64) -> String {
        let filled = filled_cells(average, 10);
        format!("[{}{}]", "▓".repeat(filled), "░".repeat(10 - filled))
    }
}

#[derive(Clone, Copy)]
enum IconColor {
    Green,
    Yellow,
    Blue,
}

/// Cells to fill for a 1-5 value on a bar of `width` cells
fn filled_cells(value: f64, width: usize) -> usize {
    let ratio = ((value - 1.0) / 4.0).clamp(0.0, 1.0);
    (ratio * width as f64).round() as usize
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}
