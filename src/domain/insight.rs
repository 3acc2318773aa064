//! Clinical insights derived from raw input values.
//!
//! Each parameter is checked against its own threshold ladder. Rules are
//! independent of each other and of the model output; a record always
//! produces the same insights in the same order:
//! heart rate, blood pressure, cholesterol, ST depression, age, chest pain.

use serde::{Deserialize, Serialize};

use super::patient::{ChestPainType, PatientRecord};

/// Severity of an insight, also used for precaution blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single advisory message tied to one threshold check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub severity: Severity,
    pub message: String,
}

impl Insight {
    fn new(severity: Severity, message: &str) -> Self {
        Self {
            severity,
            message: message.to_string(),
        }
    }
}

const HEART_RATE_LOW: u32 = 60;
const HEART_RATE_HIGH: u32 = 100;

const BP_STAGE_3: u32 = 160;
const BP_STAGE_2: u32 = 140;
const BP_STAGE_1: u32 = 130;

const CHOLESTEROL_VERY_HIGH: u32 = 240;
const CHOLESTEROL_ELEVATED: u32 = 200;

const ST_DEPRESSION_SIGNIFICANT: f64 = 2.0;
const ST_DEPRESSION_PRESENT: f64 = 1.0;

const AGE_RISK: u32 = 60;

/// Generate all insights for a record, in evaluation order.
#[must_use]
pub fn generate_insights(record: &PatientRecord) -> Vec<Insight> {
    [
        Some(heart_rate(record.max_heart_rate)),
        Some(blood_pressure(record.resting_bp)),
        Some(cholesterol(record.cholesterol)),
        st_depression(record.st_depression),
        age(record.age),
        chest_pain(record.chest_pain),
    ]
    .into_iter()
    .flatten()
    .collect()
}

// Thresholds as deployed; `thalach` is a maximum rate but is judged against
// resting-rate bounds.
fn heart_rate(thalach: u32) -> Insight {
    if thalach < HEART_RATE_LOW {
        Insight::new(
            Severity::Warning,
            "Resting heart rate is low. Monitor for bradycardia.",
        )
    } else if thalach > HEART_RATE_HIGH {
        Insight::new(
            Severity::Warning,
            "Maximum heart rate achieved is high. May indicate cardiac strain.",
        )
    } else {
        Insight::new(Severity::Info, "Maximum heart rate is within normal range.")
    }
}

fn blood_pressure(trestbps: u32) -> Insight {
    if trestbps >= BP_STAGE_3 {
        Insight::new(
            Severity::Error,
            "Blood pressure is critically high (Stage 3 Hypertension).",
        )
    } else if trestbps >= BP_STAGE_2 {
        Insight::new(
            Severity::Error,
            "Blood pressure is elevated (Stage 2 Hypertension).",
        )
    } else if trestbps >= BP_STAGE_1 {
        Insight::new(
            Severity::Warning,
            "Blood pressure is slightly elevated (Stage 1 Hypertension).",
        )
    } else {
        Insight::new(Severity::Info, "Blood pressure is within normal range.")
    }
}

fn cholesterol(chol: u32) -> Insight {
    if chol >= CHOLESTEROL_VERY_HIGH {
        Insight::new(
            Severity::Error,
            "Cholesterol is very high. Strong heart disease risk factor.",
        )
    } else if chol >= CHOLESTEROL_ELEVATED {
        Insight::new(
            Severity::Warning,
            "Cholesterol is elevated. Consider dietary changes.",
        )
    } else {
        Insight::new(Severity::Info, "Cholesterol level is desirable.")
    }
}

fn st_depression(oldpeak: f64) -> Option<Insight> {
    if oldpeak >= ST_DEPRESSION_SIGNIFICANT {
        Some(Insight::new(
            Severity::Error,
            "ST depression is significant. Indicates exercise-induced ischemia.",
        ))
    } else if oldpeak >= ST_DEPRESSION_PRESENT {
        Some(Insight::new(
            Severity::Warning,
            "ST depression present. May indicate cardiac stress.",
        ))
    } else {
        None
    }
}

fn age(years: u32) -> Option<Insight> {
    (years >= AGE_RISK).then(|| {
        Insight::new(
            Severity::Warning,
            "Age above 60 increases heart disease risk.",
        )
    })
}

fn chest_pain(cp: ChestPainType) -> Option<Insight> {
    match cp {
        ChestPainType::TypicalAngina => Some(Insight::new(
            Severity::Error,
            "Typical angina reported. Seek immediate medical evaluation.",
        )),
        ChestPainType::AtypicalAngina | ChestPainType::NonAnginalPain => Some(Insight::new(
            Severity::Warning,
            "Atypical chest pain reported. Monitor closely.",
        )),
        ChestPainType::Asymptomatic => None,
    }
}
