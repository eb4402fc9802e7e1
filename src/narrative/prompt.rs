//! Prompt construction for the network narrative providers

use crate::assessment::ScoreCalculator;

use super::NarrativeContext;

/// Instructions that go in the system slot where the API has one
pub const SYSTEM_PROMPT: &str = "You are an expert consultant in the digital transformation of \
small and medium-sized businesses. You write concise, practical advice in Markdown.";

/// Builds the user prompt for one assessment
pub struct PromptBuilder {
    /// Ask for the per-dimension table in the prompt
    include_breakdown: bool,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self {
            include_breakdown: true,
        }
    }

    pub fn include_breakdown(mut self, include: bool) -> Self {
        self.include_breakdown = include;
        self
    }

    pub fn build(&self, ctx: &NarrativeContext) -> String {
        let breakdown = if self.include_breakdown {
            self.format_breakdown(ctx)
        } else {
            String::new()
        };

        format!(
            r#"Analyse this digital maturity self-assessment.

## Business Profile
**Sector:** {}
**Size:** {}

## Results
**Global Index:** {:.2} / 5.0
**Tier:** {} ({})
**Strongest dimension:** {}
**Weakest dimension:** {}
{}
## Task
1. Summarise the current situation in two sentences.
2. Propose a 3-step roadmap for the next 6 months, starting with the weakest dimension.
3. Recommend one concrete, affordable tool or practice for each step.

Keep the answer under 300 words. Do not restate the scores table.
"#,
            ctx.sector,
            ctx.size,
            ctx.global_index,
            ctx.tier,
            ScoreCalculator::tier_description(ctx.tier),
            ctx.strongest,
            ctx.weakest,
            breakdown,
        )
    }

    fn format_breakdown(&self, ctx: &NarrativeContext) -> String {
        let mut out = String::from("\n## Dimension Scores\n| Dimension | Weight | Average |\n|---|---|---|\n");
        for d in &ctx.dimensions {
            out.push_str(&format!(
                "| {} | {:.0}% | {:.2} |\n",
                d.name,
                d.weight * 100.0,
                d.average
            ));
        }
        out
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}
