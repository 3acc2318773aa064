//! Log redaction for patient data.
//!
//! The pipeline never formats clinical values into log messages, but third
//! party crates and error chains might. Every formatted log line is passed
//! through [`redact`] before it reaches the sink, masking:
//! - Clinical `field=value` / `field: value` pairs, numeric or categorical
//!   (display labels such as `Typical Angina`, variant names, yes/no)
//! - UUIDs
//! - Medical record numbers
//! - E-mail addresses
//!
//! Input is capped (see `CARDIOLENS_SANITIZE_MAX_BYTES`) so an oversized
//! line cannot make redaction expensive.

use std::sync::OnceLock;

use regex::Regex;
use tracing_subscriber::fmt::MakeWriter;

use crate::domain::{ChestPainType, RestingEcg, Sex, StSlope, Thalassemia};

const DEFAULT_MAX_BYTES: usize = 16 * 1024;

struct Rule {
    regex: Regex,
    replacement: &'static str,
}

static RULES: OnceLock<Vec<Rule>> = OnceLock::new();

fn rules() -> &'static [Rule] {
    RULES.get_or_init(|| {
        let clinical = format!(
            r"(?i)\b(age|sex|cp|trestbps|chol|fbs|restecg|thalach|exang|oldpeak|slope|ca|thal|chest_pain|resting_bp|cholesterol|fasting_blood_sugar|resting_ecg|max_heart_rate|exercise_angina|st_depression|st_slope|vessels|thalassemia)\b(\s*[:=]\s*)(?:[0-9]+(?:\.[0-9]+)?|(?:{})\b)",
            categorical_values()
        );
        let patterns: [(&str, &'static str); 4] = [
            (clinical.as_str(), "${1}${2}[REDACTED]"),
            (
                r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}",
                "[REDACTED-UUID]",
            ),
            (r"\bMRN[:\s]?\d{6,10}\b", "[REDACTED-MRN]"),
            (
                r"(?i)\b[a-z0-9._%+-]{1,64}@(?:[a-z0-9-]{1,63}\.)+[a-z]{2,}\b",
                "[REDACTED-EMAIL]",
            ),
        ];

        patterns
            .into_iter()
            .map(|(pattern, replacement)| Rule {
                regex: Regex::new(pattern).expect("Valid regex"),
                replacement,
            })
            .collect()
    })
}

/// Alternation of every categorical value as it may appear in a log line:
/// display labels, `Debug` variant names and yes/no flags. Longest first so
/// "Normal" wins over "No".
fn categorical_values() -> String {
    fn push_all<T: Copy + std::fmt::Debug>(
        out: &mut Vec<String>,
        all: &[T],
        label: fn(T) -> &'static str,
    ) {
        for &v in all {
            out.push(label(v).to_string());
            out.push(format!("{v:?}"));
        }
    }

    let mut values: Vec<String> = ["Yes", "No", "true", "false"]
        .iter()
        .map(|s| (*s).to_string())
        .collect();
    push_all(&mut values, Sex::ALL, Sex::label);
    push_all(&mut values, ChestPainType::ALL, ChestPainType::label);
    push_all(&mut values, RestingEcg::ALL, RestingEcg::label);
    push_all(&mut values, StSlope::ALL, StSlope::label);
    push_all(&mut values, Thalassemia::ALL, Thalassemia::label);

    values.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    values.dedup();
    values
        .iter()
        .map(|v| regex::escape(v))
        .collect::<Vec<_>>()
        .join("|")
}

fn max_bytes() -> usize {
    std::env::var("CARDIOLENS_SANITIZE_MAX_BYTES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_MAX_BYTES)
}

/// Redact patient data from a string.
#[must_use]
pub fn redact(input: &str) -> String {
    redact_with_limit(input, max_bytes())
}

fn redact_with_limit(input: &str, limit: usize) -> String {
    let mut end = input.len().min(limit);
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    let truncated = end < input.len();

    let mut out = input[..end].to_string();
    for rule in rules() {
        if rule.regex.is_match(&out) {
            out = rule.regex.replace_all(&out, rule.replacement).into_owned();
        }
    }
    if truncated {
        out.push_str(" [TRUNCATED]");
    }
    out
}

/// A `tracing_subscriber` writer factory that redacts each formatted log
/// line before passing it to the wrapped sink.
#[derive(Debug, Clone)]
pub struct RedactingMakeWriter<M> {
    inner: M,
}

impl<M> RedactingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

/// Line-buffering writer produced by [`RedactingMakeWriter`].
pub struct RedactingWriter<W: std::io::Write> {
    inner: W,
    pending: Vec<u8>,
}

impl<W: std::io::Write> RedactingWriter<W> {
    fn emit(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        let redacted = redact(&String::from_utf8_lossy(bytes));
        self.inner.write_all(redacted.as_bytes())
    }
}

impl<W: std::io::Write> std::io::Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.pending.extend_from_slice(buf);

        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            self.emit(&line)?;
        }

        // No newline in sight: flush what we have rather than grow forever.
        if self.pending.len() > max_bytes().saturating_mul(2) {
            let chunk = std::mem::take(&mut self.pending);
            self.emit(&chunk)?;
            self.inner.write_all(b"\n")?;
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            self.emit(&rest)?;
        }
        self.inner.flush()
    }
}

impl<W: std::io::Write> Drop for RedactingWriter<W> {
    fn drop(&mut self) {
        let _ = std::io::Write::flush(self);
    }
}

impl<'a, M> MakeWriter<'a> for RedactingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = RedactingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        RedactingWriter {
            inner: self.inner.make_writer(),
            pending: Vec::new(),
        }
    }
}
