//! Patient record for heart-disease risk prediction.
//!
//! Thirteen clinical features in the column order of the Cleveland heart
//! disease dataset the model was trained on.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Number of model features.
pub const FEATURE_COUNT: usize = 13;

/// Feature names in model order. The exported scaler and classifier must
/// list exactly these names, in this order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal",
];

/// Declares a categorical feature stored as its dataset code.
macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $what:literal {
            $($(#[$vmeta:meta])* $variant:ident = $code:literal => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "u8", into = "u8")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// All choices, in form order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Dataset code fed to the model.
            #[must_use]
            pub fn code(self) -> u8 {
                match self {
                    $(Self::$variant => $code),+
                }
            }

            #[must_use]
            pub fn from_code(code: u8) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// Human-readable label.
            #[must_use]
            pub fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> Self {
                value.code()
            }
        }

        impl TryFrom<u8> for $name {
            type Error = String;

            fn try_from(code: u8) -> Result<Self, Self::Error> {
                Self::from_code(code).ok_or_else(|| {
                    let allowed: Vec<u8> = Self::ALL.iter().map(|v| v.code()).collect();
                    format!("{} code {} is not one of {:?}", $what, code, allowed)
                })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

coded_enum! {
    /// Biological sex (dataset `sex`).
    Sex, "sex" {
        Female = 0 => "Female",
        Male = 1 => "Male",
    }
}

coded_enum! {
    /// Chest pain type (dataset `cp`).
    ChestPainType, "chest pain type" {
        TypicalAngina = 1 => "Typical Angina",
        AtypicalAngina = 2 => "Atypical Angina",
        NonAnginalPain = 3 => "Non-anginal Pain",
        Asymptomatic = 4 => "Asymptomatic",
    }
}

coded_enum! {
    /// Resting electrocardiographic result (dataset `restecg`).
    RestingEcg, "resting ECG" {
        Normal = 0 => "Normal",
        StTAbnormality = 1 => "ST-T Abnormality",
        LvHypertrophy = 2 => "LV Hypertrophy",
    }
}

coded_enum! {
    /// Slope of the peak exercise ST segment (dataset `slope`).
    StSlope, "ST slope" {
        Upsloping = 1 => "Upsloping",
        Flat = 2 => "Flat",
        Downsloping = 3 => "Downsloping",
    }
}

coded_enum! {
    /// Thalassemia category (dataset `thal`).
    Thalassemia, "thalassemia" {
        Normal = 3 => "Normal",
        FixedDefect = 6 => "Fixed Defect",
        ReversibleDefect = 7 => "Reversible Defect",
    }
}

/// Serializes a yes/no feature as its 0/1 dataset code.
mod binary_flag {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(D::Error::custom(format!("flag must be 0 or 1, got {other}"))),
        }
    }
}

/// Clinical parameters for one assessment.
///
/// Serialized field names are the dataset column names so exported patient
/// rows can be fed straight to the headless `assess` binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Age in years
    pub age: u32,

    pub sex: Sex,

    #[serde(rename = "cp")]
    pub chest_pain: ChestPainType,

    /// Resting blood pressure in mm Hg
    #[serde(rename = "trestbps")]
    pub resting_bp: u32,

    /// Serum cholesterol in mg/dl
    #[serde(rename = "chol")]
    pub cholesterol: u32,

    /// Fasting blood sugar > 120 mg/dl
    #[serde(rename = "fbs", with = "binary_flag")]
    pub fasting_blood_sugar: bool,

    #[serde(rename = "restecg")]
    pub resting_ecg: RestingEcg,

    /// Maximum heart rate achieved
    #[serde(rename = "thalach")]
    pub max_heart_rate: u32,

    /// Exercise-induced angina
    #[serde(rename = "exang", with = "binary_flag")]
    pub exercise_angina: bool,

    /// ST depression induced by exercise relative to rest
    #[serde(rename = "oldpeak")]
    pub st_depression: f64,

    #[serde(rename = "slope")]
    pub st_slope: StSlope,

    /// Major vessels colored by fluoroscopy (0-3)
    #[serde(rename = "ca")]
    pub vessels: u8,

    #[serde(rename = "thal")]
    pub thalassemia: Thalassemia,
}

impl PatientRecord {
    pub const AGE_RANGE: RangeInclusive<u32> = 1..=120;
    pub const RESTING_BP_RANGE: RangeInclusive<u32> = 0..=250;
    pub const CHOLESTEROL_RANGE: RangeInclusive<u32> = 0..=400;
    pub const MAX_HEART_RATE_RANGE: RangeInclusive<u32> = 0..=220;
    pub const ST_DEPRESSION_RANGE: RangeInclusive<f64> = 0.0..=10.0;
    pub const VESSELS_RANGE: RangeInclusive<u8> = 0..=3;

    /// Convert the record to the model's feature vector.
    /// Order matches [`FEATURE_NAMES`].
    #[must_use]
    pub fn to_feature_vector(&self) -> [f64; FEATURE_COUNT] {
        [
            f64::from(self.age),
            f64::from(self.sex.code()),
            f64::from(self.chest_pain.code()),
            f64::from(self.resting_bp),
            f64::from(self.cholesterol),
            f64::from(u8::from(self.fasting_blood_sugar)),
            f64::from(self.resting_ecg.code()),
            f64::from(self.max_heart_rate),
            f64::from(u8::from(self.exercise_angina)),
            self.st_depression,
            f64::from(self.st_slope.code()),
            f64::from(self.vessels),
            f64::from(self.thalassemia.code()),
        ]
    }

    /// Rebuild a record from a feature vector.
    ///
    /// # Errors
    /// Returns an error if the vector does not have 13 entries, if a
    /// count or code is not a whole number, or if a code is not valid
    /// for its feature.
    pub fn from_feature_vector(v: &[f64]) -> Result<Self, String> {
        if v.len() != FEATURE_COUNT {
            return Err(format!("Expected {FEATURE_COUNT} features, got {}", v.len()));
        }

        let code = |i: usize| -> Result<u8, String> {
            let n = whole(v[i], FEATURE_NAMES[i])?;
            u8::try_from(n).map_err(|_| format!("{}: code {n} out of range", FEATURE_NAMES[i]))
        };
        let flag = |i: usize| -> Result<bool, String> {
            match code(i)? {
                0 => Ok(false),
                1 => Ok(true),
                other => Err(format!("{}: flag must be 0 or 1, got {other}", FEATURE_NAMES[i])),
            }
        };

        if !v[9].is_finite() {
            return Err(format!("oldpeak: {} is not a finite number", v[9]));
        }
        let vessels = code(11)?;
        if !Self::VESSELS_RANGE.contains(&vessels) {
            return Err(format!(
                "ca: {vessels} is not one of {}-{}",
                Self::VESSELS_RANGE.start(),
                Self::VESSELS_RANGE.end()
            ));
        }

        Ok(Self {
            age: whole(v[0], "age")?,
            sex: Sex::try_from(code(1)?)?,
            chest_pain: ChestPainType::try_from(code(2)?)?,
            resting_bp: whole(v[3], "trestbps")?,
            cholesterol: whole(v[4], "chol")?,
            fasting_blood_sugar: flag(5)?,
            resting_ecg: RestingEcg::try_from(code(6)?)?,
            max_heart_rate: whole(v[7], "thalach")?,
            exercise_angina: flag(8)?,
            st_depression: v[9],
            st_slope: StSlope::try_from(code(10)?)?,
            vessels,
            thalassemia: Thalassemia::try_from(code(12)?)?,
        })
    }

    /// Validate that numeric fields are within the form's ranges.
    ///
    /// Categorical fields are valid by construction.
    ///
    /// # Errors
    /// Returns validation errors as a vector of strings.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        check_range(&mut errors, "Age", self.age, &Self::AGE_RANGE);
        check_range(&mut errors, "Resting BP", self.resting_bp, &Self::RESTING_BP_RANGE);
        check_range(&mut errors, "Cholesterol", self.cholesterol, &Self::CHOLESTEROL_RANGE);
        check_range(
            &mut errors,
            "Max heart rate",
            self.max_heart_rate,
            &Self::MAX_HEART_RATE_RANGE,
        );
        check_range(&mut errors, "Major vessels", self.vessels, &Self::VESSELS_RANGE);
        if !Self::ST_DEPRESSION_RANGE.contains(&self.st_depression) {
            errors.push(format!(
                "ST depression {} out of range [{}, {}]",
                self.st_depression,
                Self::ST_DEPRESSION_RANGE.start(),
                Self::ST_DEPRESSION_RANGE.end()
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Parameter/value rows for the patient data summary table.
    #[must_use]
    pub fn summary_rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Age", self.age.to_string()),
            ("Sex", self.sex.to_string()),
            ("Chest Pain Type", self.chest_pain.to_string()),
            ("Resting BP", self.resting_bp.to_string()),
            ("Cholesterol", self.cholesterol.to_string()),
            ("Fasting BS", yes_no(self.fasting_blood_sugar).to_string()),
            ("Resting ECG", self.resting_ecg.to_string()),
            ("Max Heart Rate", self.max_heart_rate.to_string()),
            ("Exercise Angina", yes_no(self.exercise_angina).to_string()),
            ("ST Depression", format!("{:.2}", self.st_depression)),
            ("Slope", self.st_slope.to_string()),
            ("Major Vessels", self.vessels.to_string()),
            ("Thalassemia", self.thalassemia.to_string()),
        ]
    }
}

impl Default for PatientRecord {
    fn default() -> Self {
        Self {
            age: 50,
            sex: Sex::Female,
            chest_pain: ChestPainType::TypicalAngina,
            resting_bp: 120,
            cholesterol: 200,
            fasting_blood_sugar: false,
            resting_ecg: RestingEcg::Normal,
            max_heart_rate: 150,
            exercise_angina: false,
            st_depression: 1.0,
            st_slope: StSlope::Upsloping,
            vessels: 0,
            thalassemia: Thalassemia::Normal,
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

fn whole(value: f64, name: &str) -> Result<u32, String> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(format!("{name}: {value} is not a whole non-negative number"));
    }
    Ok(value as u32)
}

fn check_range<T>(errors: &mut Vec<String>, label: &str, value: T, range: &RangeInclusive<T>)
where
    T: PartialOrd + std::fmt::Display,
{
    if !range.contains(&value) {
        errors.push(format!(
            "{label} {value} out of range [{}, {}]",
            range.start(),
            range.end()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn high_risk_record() -> PatientRecord {
        PatientRecord {
            age: 65,
            sex: Sex::Male,
            chest_pain: ChestPainType::TypicalAngina,
            resting_bp: 165,
            cholesterol: 250,
            fasting_blood_sugar: true,
            resting_ecg: RestingEcg::StTAbnormality,
            max_heart_rate: 55,
            exercise_angina: true,
            st_depression: 2.5,
            st_slope: StSlope::Flat,
            vessels: 2,
            thalassemia: Thalassemia::ReversibleDefect,
        }
    }

    #[test]
    fn test_feature_vector_order() {
        let v = high_risk_record().to_feature_vector();
        assert_eq!(
            v,
            [65.0, 1.0, 1.0, 165.0, 250.0, 1.0, 1.0, 55.0, 1.0, 2.5, 2.0, 2.0, 7.0]
        );
    }

    #[test]
    fn test_from_feature_vector() {
        let v = [65.0, 1.0, 1.0, 165.0, 250.0, 1.0, 1.0, 55.0, 1.0, 2.5, 2.0, 2.0, 7.0];
        let record = PatientRecord::from_feature_vector(&v).expect("Should parse");
        assert_eq!(record, high_risk_record());
    }

    #[test]
    fn test_from_feature_vector_rejects_bad_input() {
        assert!(PatientRecord::from_feature_vector(&[1.0; 12]).is_err());

        let mut v = high_risk_record().to_feature_vector();
        v[12] = 5.0; // not a thalassemia code
        let err = PatientRecord::from_feature_vector(&v).unwrap_err();
        assert!(err.contains("thalassemia"));

        let mut v = high_risk_record().to_feature_vector();
        v[0] = 64.5;
        assert!(PatientRecord::from_feature_vector(&v).is_err());

        let mut v = high_risk_record().to_feature_vector();
        v[5] = 2.0;
        assert!(PatientRecord::from_feature_vector(&v).is_err());
    }

    #[test]
    fn test_from_feature_vector_rejects_vessel_count_above_three() {
        let mut v = high_risk_record().to_feature_vector();
        v[11] = 3.0;
        assert_eq!(
            PatientRecord::from_feature_vector(&v).expect("3 vessels").vessels,
            3
        );

        for bad in [4.0, 255.0] {
            v[11] = bad;
            let err = PatientRecord::from_feature_vector(&v).unwrap_err();
            assert!(err.starts_with("ca:"), "{err}");
        }
    }

    #[test]
    fn test_validation() {
        assert!(high_risk_record().validate().is_ok());
        assert!(PatientRecord::default().validate().is_ok());

        let invalid = PatientRecord {
            age: 0,
            cholesterol: 401,
            st_depression: f64::NAN,
            vessels: 4,
            ..high_risk_record()
        };
        let errors = invalid.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_json_uses_dataset_codes() {
        let json = r#"{
            "age": 65, "sex": 1, "cp": 1, "trestbps": 165, "chol": 250, "fbs": 1,
            "restecg": 1, "thalach": 55, "exang": 1, "oldpeak": 2.5, "slope": 2,
            "ca": 2, "thal": 7
        }"#;
        let record: PatientRecord = serde_json::from_str(json).expect("Should deserialize");
        assert_eq!(record, high_risk_record());

        let out = serde_json::to_value(&record).expect("Should serialize");
        assert_eq!(out["thal"], 7);
        assert_eq!(out["exang"], 1);

        let bad = json.replace("\"thal\": 7", "\"thal\": 5");
        assert!(serde_json::from_str::<PatientRecord>(&bad).is_err());
    }

    #[test]
    fn test_summary_rows_use_labels() {
        let rows = high_risk_record().summary_rows();
        assert_eq!(rows.len(), FEATURE_COUNT);
        assert_eq!(rows[1], ("Sex", "Male".to_string()));
        assert_eq!(rows[2], ("Chest Pain Type", "Typical Angina".to_string()));
        assert_eq!(rows[9], ("ST Depression", "2.50".to_string()));
        assert_eq!(rows[12], ("Thalassemia", "Reversible Defect".to_string()));
    }
}
