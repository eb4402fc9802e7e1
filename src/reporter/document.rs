//! Plain-text report document in a fixed single-byte encoding (ISO-8859-1)
//!
//! Narrative text arrives as Markdown from arbitrary providers. It is
//! stripped to plain text, and every character outside Latin-1 is either
//! mapped to a close equivalent or replaced with `?`, so rendering never
//! fails on content.

use regex::Regex;
use std::sync::OnceLock;

use crate::assessment::ScoreCalculator;

use super::{AssessmentReport, FOOTER_NOTE};

const RULE_WIDTH: usize = 60;

/// Reporter that renders an ISO-8859-1 encoded text document
pub struct DocumentReporter;

impl DocumentReporter {
    pub fn new() -> Self {
        Self
    }

    /// Render the document as Latin-1 bytes
    pub fn render(&self, report: &AssessmentReport) -> Vec<u8> {
        encode_latin1(&self.render_text(report))
    }

    /// The document before encoding
    pub fn render_text(&self, report: &AssessmentReport) -> String {
        let result = &report.result;
        let profile = &report.profile;
        let mut out = String::new();

        out.push_str("LINARES-DIGITAL - DIGITAL MATURITY REPORT\n");
        out.push_str(&format!("{}\n", "=".repeat(RULE_WIDTH)));
        out.push_str(&format!("Business:        {}\n", profile.business_name));
        out.push_str(&format!("Sector:          {}\n", profile.sector));
        out.push_str(&format!("Size:            {}\n", profile.size));
        out.push_str(&format!("Evaluation date: {}\n", report.evaluated_on.format("%Y-%m-%d")));
        out.push('\n');

        out.push_str(&format!("Global Index:    {:.2} / 5.0\n", result.global_index));
        out.push_str(&format!("Maturity:        {}\n", result.tier));
        out.push_str(&format!("                 {}\n", ScoreCalculator::tier_description(result.tier)));
        out.push('\n');

        out.push_str("DIMENSION SCORES\n");
        out.push_str(&format!("{}\n", "-".repeat(RULE_WIDTH)));
        for d in &result.dimensions {
            let label = format!("{} ({:.0}%)", d.name, d.weight * 100.0);
            out.push_str(&format!("  {:<44} {:>6.2}\n", label, d.average));
        }
        out.push('\n');

        let strongest = result.dimension(&result.strongest).map(|d| d.average);
        let weakest = result.dimension(&result.weakest).map(|d| d.average);
        out.push_str(&format!(
            "Strongest dimension: {}{}\n",
            result.strongest,
            strongest.map(|a| format!(" ({:.2})", a)).unwrap_or_default()
        ));
        out.push_str(&format!(
            "Weakest dimension:   {}{}\n",
            result.weakest,
            weakest.map(|a| format!(" ({:.2})", a)).unwrap_or_default()
        ));
        out.push('\n');

        if let Some(narrative) = &result.narrative {
            out.push_str("RECOMMENDATIONS\n");
            out.push_str(&format!("{}\n", "-".repeat(RULE_WIDTH)));
            out.push_str(&format!("{}\n", strip_markdown(&narrative.text).trim_end()));
            out.push('\n');
        }

        out.push_str(&format!("{}\n", FOOTER_NOTE));
        out
    }
}

impl Default for DocumentReporter {
    fn default() -> Self {
        Self::new()
    }
}

struct MarkdownPatterns {
    heading: Regex,
    rule: Regex,
    bullet: Regex,
    bold: Regex,
    italic: Regex,
    code: Regex,
    link: Regex,
}

fn patterns() -> &'static MarkdownPatterns {
    static PATTERNS: OnceLock<MarkdownPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| MarkdownPatterns {
        heading: Regex::new(r"(?m)^\s{0,3}#{1,6}\s*").expect("static pattern"),
        rule: Regex::new(r"(?m)^\s*([-*_]\s*){3,}$").expect("static pattern"),
        bullet: Regex::new(r"(?m)^(\s*)[*+]\s+").expect("static pattern"),
        bold: Regex::new(r"\*\*(.+?)\*\*|__(.+?)__").expect("static pattern"),
        italic: Regex::new(r"\*([^*\s][^*]*)\*").expect("static pattern"),
        code: Regex::new(r"`{1,3}([^`]*)`{1,3}").expect("static pattern"),
        link: Regex::new(r"\[([^\]]+)\]\([^)]*\)").expect("static pattern"),
    })
}

/// Reduce Markdown to readable plain text
pub(crate) fn strip_markdown(text: &str) -> String {
    let p = patterns();
    let text = p.rule.replace_all(text, "");
    let text = p.heading.replace_all(&text, "");
    let text = p.bullet.replace_all(&text, "$1- ");
    let text = p.bold.replace_all(&text, "$1$2");
    let text = p.italic.replace_all(&text, "$1");
    let text = p.code.replace_all(&text, "$1");
    let text = p.link.replace_all(&text, "$1");
    text.into_owned()
}

/// Map a character to its ISO-8859-1 representation
fn latin1_substitute(c: char) -> &'static str {
    match c {
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => "'",
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => "\"",
        '\u{2013}' | '\u{2014}' | '\u{2212}' => "-",
        '\u{2026}' => "...",
        '\u{2022}' | '\u{25CF}' | '\u{25AA}' | '\u{2023}' => "-",
        '\u{20AC}' => "EUR",
        '\u{2192}' => "->",
        _ => "?",
    }
}

/// Encode as ISO-8859-1, substituting what the charset cannot hold
pub(crate) fn encode_latin1(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    for c in text.chars() {
        let code = c as u32;
        if code <= 0xFF {
            bytes.push(code as u8);
        } else {
            bytes.extend_from_slice(latin1_substitute(c).as_bytes());
        }
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narrative::{Narrative, NarrativeSource};
    use crate::reporter::tests::sample_report;

    #[test]
    fn test_document_contents() {
        let text = DocumentReporter::new().render_text(&sample_report());
        assert!(text.contains("Business:        Talleres Ejemplo"));
        assert!(text.contains("Evaluation date: 2026-03-14"));
        assert!(text.contains("Global Index:    2.30 / 5.0"));
        assert!(text.contains("Tier 2: Aware/Siloed"));
        assert!(text.contains("Customers & Products (15%)"));
        assert!(text.contains("Strongest dimension: Technology & Infrastructure (4.00)"));
        assert!(text.contains("Weakest dimension:   Customers & Products (1.00)"));
        assert!(text.contains("- Step 1: adopt a cloud ERP"));
        assert!(!text.contains("**"));
        assert!(!text.contains("## "));
        assert!(text.trim_end().ends_with(FOOTER_NOTE));
    }

    #[test]
    fn test_strip_markdown() {
        let md = "# Title\n\n**Bold** and *italic* and `code`\n* item\n---\n[site](https://x.y)";
        let plain = strip_markdown(md);
        assert_eq!(plain, "Title\n\nBold and italic and code\n- item\n\nsite");
    }

    #[test]
    fn test_latin1_keeps_spanish_characters() {
        let bytes = encode_latin1("Diagnóstico: año, señal");
        assert_eq!(bytes.len(), "Diagnóstico: año, señal".chars().count());
        assert!(bytes.contains(&0xF3)); // ó
        assert!(bytes.contains(&0xF1)); // ñ
    }

    #[test]
    fn test_latin1_substitutions() {
        assert_eq!(encode_latin1("\u{201C}hi\u{201D} \u{2014} ok\u{2026}"), b"\"hi\" - ok...");
        assert_eq!(encode_latin1("\u{2022} 5\u{20AC}"), b"- 5EUR");
        assert_eq!(encode_latin1("rocket \u{1F680}"), b"rocket ?");
    }

    #[test]
    fn test_render_never_fails_on_hostile_text() {
        let mut report = sample_report();
        report.result.narrative = Some(Narrative {
            text: "\u{1F680}\u{1F4C8} 进步 \u{FFFD}".to_string(),
            source: NarrativeSource::Fallback {
                reason: "timeout".to_string(),
            },
        });
        let bytes = DocumentReporter::new().render(&report);
        assert!(bytes.windows(4).any(|w| w == b"?? ?"));
    }
}
