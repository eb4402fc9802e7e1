//! JSON reporter for machine-readable output

use super::AssessmentReport;

/// Reporter for JSON output. Numbers are emitted unrounded.
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Serialize a report, surfacing serializer errors
    pub fn try_report(&self, report: &AssessmentReport) -> Result<String, serde_json::Error> {
        if self.pretty {
            serde_json::to_string_pretty(report)
        } else {
            serde_json::to_string(report)
        }
    }

    /// Report as JSON, `{}` if serialization fails
    pub fn report(&self, report: &AssessmentReport) -> String {
        self.try_report(report).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}
