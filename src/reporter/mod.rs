//! Reporter module for output formatting

pub mod console;
pub mod document;
pub mod html;
pub mod json;

pub use console::ConsoleReporter;
pub use document::DocumentReporter;
pub use html::HtmlReporter;
pub use json::JsonReporter;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

use crate::error::ReportError;
use crate::{AssessmentResult, Profile};

/// Footer printed on every report
pub const FOOTER_NOTE: &str =
    "Note: This report was generated automatically by the Linares-Digital system.";

/// What every reporter renders: who, when, and the scored result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentReport {
    pub profile: Profile,
    pub evaluated_on: NaiveDate,
    pub result: AssessmentResult,
}

impl AssessmentReport {
    pub fn new(profile: Profile, evaluated_on: NaiveDate, result: AssessmentResult) -> Self {
        Self {
            profile,
            evaluated_on,
            result,
        }
    }
}

/// File format of a written report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Html,
    /// ISO-8859-1 plain-text document
    Text,
    Json,
}

impl ReportFormat {
    /// Infer the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "html" | "htm" => Some(Self::Html),
            "txt" | "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ReportError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render the report in `format` and write it to `path`
pub fn write_report(
    report: &AssessmentReport,
    path: &Path,
    format: ReportFormat,
) -> Result<(), ReportError> {
    let bytes = match format {
        ReportFormat::Html => HtmlReporter::new().report(report).into_bytes(),
        ReportFormat::Text => DocumentReporter::new().render(report),
        ReportFormat::Json => JsonReporter::new().pretty().try_report(report)?.into_bytes(),
    };

    fs::write(path, &bytes).map_err(|source| ReportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    info!(path = %path.display(), %format, bytes = bytes.len(), "report written");
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::narrative::{Narrative, NarrativeSource};
    use crate::{CompanySize, DimensionScore, Sector, Tier};
    use tempfile::TempDir;

    /// Scored scenario shared by the reporter tests
    pub(crate) fn sample_report() -> AssessmentReport {
        let dims = [
            ("Strategy & Leadership", "Strategy", 0.30, 2.0),
            ("People & Culture", "People", 0.25, 3.0),
            ("Operations & Processes", "Operations", 0.20, 2.0),
            ("Customers & Products", "Customers", 0.15, 1.0),
            ("Technology & Infrastructure", "Technology", 0.10, 4.0),
        ];
        let result = AssessmentResult {
            global_index: 2.3,
            tier: Tier::Aware,
            dimensions: dims
                .iter()
                .map(|(name, short, weight, average)| DimensionScore {
                    name: name.to_string(),
                    short_name: short.to_string(),
                    weight: *weight,
                    average: *average,
                })
                .collect(),
            strongest: "Technology & Infrastructure".to_string(),
            weakest: "Customers & Products".to_string(),
            narrative: Some(Narrative {
                text: "## Roadmap\n- **Step 1**: adopt a cloud ERP\n- Step 2: train the team"
                    .to_string(),
                source: NarrativeSource::Generated {
                    provider: "anthropic".to_string(),
                },
            }),
        };
        AssessmentReport::new(
            Profile {
                business_name: "Talleres Ejemplo".to_string(),
                sector: Sector::IndustryMetal,
                size: CompanySize::Small,
            },
            NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            result,
        )
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ReportFormat::from_path(Path::new("r.html")), Some(ReportFormat::Html));
        assert_eq!(ReportFormat::from_path(Path::new("r.HTM")), Some(ReportFormat::Html));
        assert_eq!(ReportFormat::from_path(Path::new("r.txt")), Some(ReportFormat::Text));
        assert_eq!(ReportFormat::from_path(Path::new("r.json")), Some(ReportFormat::Json));
        assert_eq!(ReportFormat::from_path(Path::new("r.pdf")), None);
        assert_eq!(ReportFormat::from_path(Path::new("report")), None);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("TEXT".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        let err = "pdf".parse::<ReportFormat>().unwrap_err();
        assert!(err.to_string().contains("unsupported report format 'pdf'"));
    }

    #[test]
    fn test_write_report_each_format() {
        let dir = TempDir::new().unwrap();
        let report = sample_report();

        let html = dir.path().join("out.html");
        write_report(&report, &html, ReportFormat::Html).unwrap();
        assert!(fs::read_to_string(&html).unwrap().starts_with("<!DOCTYPE html>"));

        let text = dir.path().join("out.txt");
        write_report(&report, &text, ReportFormat::Text).unwrap();
        let bytes = fs::read(&text).unwrap();
        assert!(bytes.windows(4).any(|w| w == b"2.30"));

        let json = dir.path().join("out.json");
        write_report(&report, &json, ReportFormat::Json).unwrap();
        let parsed: AssessmentReport =
            serde_json::from_str(&fs::read_to_string(&json).unwrap()).unwrap();
        assert_eq!(parsed.profile, report.profile);
        assert_eq!(parsed.evaluated_on, report.evaluated_on);
        assert_eq!(parsed.result.weakest, "Customers & Products");
    }

    #[test]
    fn test_write_report_io_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.html");
        let err = write_report(&sample_report(), &path, ReportFormat::Html).unwrap_err();
        assert!(matches!(err, ReportError::Io { .. }));
        assert!(err.to_string().contains("failed to write report"));
    }
}
