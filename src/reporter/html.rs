//! HTML reporter: generates a self-contained, printable HTML report
//!
//! All styling is inline in the document; no scripts or external assets.

use crate::assessment::ScoreCalculator;
use crate::Tier;

use super::document::strip_markdown;
use super::{AssessmentReport, FOOTER_NOTE};

/// Escape text for HTML element content and attribute values
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// CSS colour class for a value on the 1-5 scale
fn level_class(value: f64) -> &'static str {
    if value < 1.5 {
        "c-red"
    } else if value < 2.5 {
        "c-orange"
    } else if value < 3.5 {
        "c-yellow"
    } else if value < 4.5 {
        "c-lime"
    } else {
        "c-green"
    }
}

fn tier_class(tier: Tier) -> &'static str {
    match tier {
        Tier::Initial => "bg-red",
        Tier::Aware => "bg-orange",
        Tier::Defined => "bg-yellow",
        Tier::Managed => "bg-lime",
        Tier::Optimized => "bg-green",
    }
}

/// Reporter that generates a standalone HTML document
pub struct HtmlReporter;

impl HtmlReporter {
    pub fn new() -> Self {
        Self
    }

    /// Generate the full HTML report
    pub fn report(&self, report: &AssessmentReport) -> String {
        let mut html = String::with_capacity(8_192);
        html.push_str(Self::template_head());
        self.write_header(&mut html, report);
        self.write_score(&mut html, report);
        self.write_dimensions(&mut html, report);
        self.write_narrative(&mut html, report);
        html.push_str(&format!("<footer>{}</footer>\n", escape_html(FOOTER_NOTE)));
        html.push_str("</main>\n</body>\n</html>\n");
        html
    }

    fn write_header(&self, html: &mut String, report: &AssessmentReport) {
        let p = &report.profile;
        html.push_str(&format!(
            "<header><h1>Digital Maturity Report: {}</h1>\n<div class=\"meta\">{} &middot; {} &middot; evaluated {}</div></header>\n",
            escape_html(&p.business_name),
            escape_html(&p.sector.to_string()),
            escape_html(&p.size.to_string()),
            report.evaluated_on.format("%Y-%m-%d")
        ));
    }

    fn write_score(&self, html: &mut String, report: &AssessmentReport) {
        let r = &report.result;
        let pct = ((r.global_index - 1.0) / 4.0 * 100.0).clamp(0.0, 100.0);
        html.push_str(&format!(
            r#"<section class="score">
<div class="index {cls}">{index:.2}<span> / 5.0</span></div>
<div class="tier"><span class="badge {tier_cls}">{tier}</span>
<p>{desc}</p></div>
<div class="bar"><span class="{tier_cls}" style="width:{pct:.0}%"></span></div>
</section>
"#,
            cls = level_class(r.global_index),
            index = r.global_index,
            tier_cls = tier_class(r.tier),
            tier = escape_html(&r.tier.to_string()),
            desc = escape_html(ScoreCalculator::tier_description(r.tier)),
            pct = pct,
        ));
    }

    fn write_dimensions(&self, html: &mut String, report: &AssessmentReport) {
        let r = &report.result;
        html.push_str("<section><h2>Dimension Scores</h2>\n<table>\n<thead><tr><th>Dimension</th><th>Weight</th><th>Average</th><th></th></tr></thead>\n<tbody>\n");
        for d in &r.dimensions {
            let mut marks = String::new();
            if d.name == r.strongest {
                marks.push_str("<span class=\"tag c-green\">strongest</span>");
            }
            if d.name == r.weakest {
                marks.push_str("<span class=\"tag c-red\">priority</span>");
            }
            html.push_str(&format!(
                "<tr><td>{}</td><td>{:.0}%</td><td class=\"{}\">{:.2}</td><td>{}</td></tr>\n",
                escape_html(&d.name),
                d.weight * 100.0,
                level_class(d.average),
                d.average,
                marks
            ));
        }
        html.push_str("</tbody>\n</table>\n");
        html.push_str(&format!(
            "<p class=\"extremes\">Strongest: <strong>{}</strong> &middot; Priority attention: <strong>{}</strong></p>\n</section>\n",
            escape_html(&r.strongest),
            escape_html(&r.weakest)
        ));
    }

    fn write_narrative(&self, html: &mut String, report: &AssessmentReport) {
        let Some(narrative) = &report.result.narrative else {
            return;
        };
        html.push_str("<section class=\"narrative\"><h2>Recommendations</h2>\n");
        if narrative.is_fallback() {
            html.push_str("<p class=\"notice\">Offline mode: showing the built-in recommendations.</p>\n");
        }
        for line in strip_markdown(&narrative.text).lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match line.strip_prefix("- ") {
                Some(item) => {
                    html.push_str(&format!("<p class=\"item\">&bull; {}</p>\n", escape_html(item)));
                }
                None => {
                    html.push_str(&format!("<p>{}</p>\n", escape_html(line)));
                }
            }
        }
        html.push_str("</section>\n");
    }

    fn template_head() -> &'static str {
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Linares-Digital – Digital Maturity Report</title>
<style>
:root{--bg:#0d0d11;--surface:#16161b;--border:#2a2a32;--text:#e4e4e7;--muted:#71717a;--green:#22c55e;--lime:#84cc16;--yellow:#eab308;--orange:#f97316;--red:#ef4444;--radius:8px}
*{box-sizing:border-box;margin:0;padding:0}
body{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,Oxygen,sans-serif;background:var(--bg);color:var(--text);line-height:1.5}
main{max-width:860px;margin:0 auto;padding:1.5rem}
header{padding-bottom:1rem;border-bottom:1px solid var(--border);margin-bottom:1.25rem}
header h1{font-size:1.25rem;font-weight:700}
header .meta{font-size:.8125rem;color:var(--muted)}
h2{font-size:.875rem;text-transform:uppercase;letter-spacing:.5px;color:var(--muted);margin:1.25rem 0 .5rem}
section{background:var(--surface);border:1px solid var(--border);border-radius:var(--radius);padding:1rem 1.25rem;margin-bottom:1rem}
.score .index{font-size:2.5rem;font-weight:700}
.score .index span{font-size:1rem;color:var(--muted)}
.badge{display:inline-block;padding:.125rem .625rem;border-radius:10px;font-size:.8125rem;font-weight:600;color:#0d0d11}
.tier p{color:var(--muted);font-size:.875rem;margin-top:.25rem}
.bar{height:8px;background:var(--border);border-radius:4px;margin-top:.75rem;overflow:hidden}
.bar span{display:block;height:100%}
table{width:100%;border-collapse:collapse;font-size:.875rem}
th{text-align:left;color:var(--muted);font-weight:600;font-size:.75rem;text-transform:uppercase}
td,th{padding:.4rem .5rem;border-bottom:1px solid var(--border)}
td:nth-child(2),td:nth-child(3){font-variant-numeric:tabular-nums}
.tag{font-size:.6875rem;font-weight:700;text-transform:uppercase;margin-right:.375rem}
.extremes{margin-top:.75rem;font-size:.875rem}
.narrative p{margin-bottom:.5rem;font-size:.875rem}
.narrative .item{padding-left:.75rem}
.notice{color:var(--yellow)}
footer{font-size:.75rem;color:var(--muted);text-align:center;margin-top:1.5rem}
.c-green{color:var(--green)}.c-lime{color:var(--lime)}.c-yellow{color:var(--yellow)}.c-orange{color:var(--orange)}.c-red{color:var(--red)}
.bg-green{background:var(--green)}.bg-lime{background:var(--lime)}.bg-yellow{background:var(--yellow)}.bg-orange{background:var(--orange)}.bg-red{background:var(--red)}
@media print{body{background:#fff;color:#000}section{border-color:#ccc;background:#fff}}
</style>
</head>
<body>
<main>
"##
    }
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}
