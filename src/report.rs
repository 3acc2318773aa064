//! Plain-text presenter.
//!
//! Renders an [`Assessment`] with the same sections as the TUI report
//! screen. Used by the headless `assess` binary.

use std::fmt;

use crate::domain::{Assessment, Severity};

/// Shown under every report.
pub const DISCLAIMER: &str =
    "DISCLAIMER: This tool provides indicative estimates and does not replace professional medical evaluation.";

/// Display adapter: `TextReport(&assessment).to_string()`.
pub struct TextReport<'a>(pub &'a Assessment);

fn severity_tag(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "[ok]  ",
        Severity::Warning => "[warn]",
        Severity::Error => "[!!]  ",
    }
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = self.0;

        writeln!(f, "Heart Disease Prediction System")?;
        writeln!(
            f,
            "Assessed at {}",
            a.assessed_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(f)?;

        writeln!(f, "Patient Data Summary")?;
        writeln!(f, "  {:<18} Value", "Parameter")?;
        for (parameter, value) in a.record.summary_rows() {
            writeln!(f, "  {parameter:<18} {value}")?;
        }
        writeln!(f)?;

        writeln!(f, "Heart Disease Risk Prediction")?;
        writeln!(f, "  [ {} ]", a.tier.label())?;
        writeln!(f, "  Risk Score: {:.2}%", a.prediction.probability)?;
        writeln!(f, "  Diagnosis: {}", a.prediction.diagnosis_label())?;
        writeln!(f)?;

        writeln!(f, "Insights Based on Inputs")?;
        for insight in &a.insights {
            writeln!(f, "  {} {}", severity_tag(insight.severity), insight.message)?;
        }
        writeln!(f)?;

        writeln!(f, "Recommended Precautions")?;
        for item in a.precautions.items {
            writeln!(f, "  - {item}")?;
        }
        writeln!(f)?;

        write!(f, "{DISCLAIMER}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PatientRecord, PredictionResult};

    #[test]
    fn test_text_report_sections() {
        let assessment = Assessment::new(PatientRecord::default(), PredictionResult::new(72.5, 1));
        let text = TextReport(&assessment).to_string();

        assert!(text.contains("Patient Data Summary"));
        assert!(text.contains("Chest Pain Type"));
        assert!(text.contains("[ HIGH RISK ]"));
        assert!(text.contains("Risk Score: 72.50%"));
        assert!(text.contains("Diagnosis: High chance of Heart Disease"));
        assert!(text.contains("[warn] Cholesterol is elevated."));
        assert!(text.contains("  - Seek immediate medical attention"));
        assert!(text.ends_with(DISCLAIMER));
    }

    #[test]
    fn test_insights_keep_order() {
        let assessment = Assessment::new(PatientRecord::default(), PredictionResult::new(10.0, 0));
        let text = TextReport(&assessment).to_string();

        let hr = text.find("Maximum heart rate achieved is high").expect("hr");
        let bp = text.find("Blood pressure is within normal range").expect("bp");
        let chol = text.find("Cholesterol is elevated").expect("chol");
        assert!(hr < bp && bp < chol);
        assert!(text.contains("Low chance of Heart Disease"));
    }
}
