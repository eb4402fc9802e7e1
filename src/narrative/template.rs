//! Rule-based narrative used offline and as the fallback for every provider

use crate::assessment::scoring::{ADVANCED_NOTE, ADVANCED_THRESHOLD, ADVICE_THRESHOLD};
use crate::assessment::ScoreCalculator;
use crate::error::ProviderError;
use crate::questionnaire::Questionnaire;

use super::{NarrativeContext, NarrativeProvider};

/// Deterministic narrative built from the computed scores and the
/// questionnaire's advice texts. Never fails.
#[derive(Debug, Clone)]
pub struct TemplateNarrativeProvider {
    questionnaire: Questionnaire,
}

impl TemplateNarrativeProvider {
    pub fn new(questionnaire: Questionnaire) -> Self {
        Self { questionnaire }
    }

    /// Infallible rendering, used directly by the fallback path
    pub fn render(&self, ctx: &NarrativeContext) -> String {
        let mut out = String::new();

        out.push_str(&format!("## Diagnosis for {}\n", ctx.business_name));
        out.push_str(&format!("{} · {}\n", ctx.sector, ctx.size));
        out.push('\n');
        out.push_str(&format!(
            "Global maturity index: **{:.2} / 5.0** ({}).\n",
            ctx.global_index, ctx.tier
        ));
        out.push_str(&format!("{}.\n", ScoreCalculator::tier_description(ctx.tier)));
        out.push('\n');

        if let Some(avg) = ctx.average(&ctx.strongest) {
            out.push_str(&format!("- Strongest dimension: **{}** ({:.2})\n", ctx.strongest, avg));
        }
        if let Some(avg) = ctx.average(&ctx.weakest) {
            out.push_str(&format!(
                "- Priority attention: **{}** ({:.2})\n",
                ctx.weakest, avg
            ));
        }
        out.push('\n');
        out.push_str("### Recommendations\n");

        let mut any = false;
        for score in ctx.dimensions.iter().filter(|d| d.average < ADVICE_THRESHOLD) {
            if let Some(advice) = self
                .questionnaire
                .dimension(&score.name)
                .and_then(|d| d.advice.as_deref())
            {
                out.push_str(&format!("- {}\n", advice));
                any = true;
            }
        }
        if ctx.global_index > ADVANCED_THRESHOLD {
            out.push_str(&format!("- {}\n", ADVANCED_NOTE));
            any = true;
        }
        if !any {
            out.push_str(&format!(
                "- Keep consolidating: start with **{}**, the dimension with the most room to grow.\n",
                ctx.weakest
            ));
        }

        out
    }
}

impl NarrativeProvider for TemplateNarrativeProvider {
    fn name(&self) -> &'static str {
        "template"
    }

    fn generate(&self, context: &NarrativeContext) -> Result<String, ProviderError> {
        Ok(self.render(context))
    }
}
