//! Patient data input form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{
    ChestPainType, PatientRecord, RestingEcg, Sex, StSlope, Thalassemia, FEATURE_COUNT,
};
use crate::tui::styles::ClinicalTheme;

/// Longest numeric entry accepted ("10.00", "400").
const MAX_INPUT_LEN: usize = 6;

const NO_YES: &[(&str, u8)] = &[("No", 0), ("Yes", 1)];
const VESSEL_COUNTS: &[(&str, u8)] = &[("0", 0), ("1", 1), ("2", 2), ("3", 3)];

/// How a field is edited.
#[derive(Debug, Clone)]
pub enum FieldInput {
    /// Typed value, clamped into `[min, max]` on submit.
    Number {
        value: String,
        min: f64,
        max: f64,
        decimal: bool,
    },
    /// One of a fixed set of coded choices, cycled with Left/Right.
    Choice {
        options: Vec<(&'static str, u8)>,
        selected: usize,
    },
}

/// Form field definition
#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub hint: &'static str,
    pub input: FieldInput,
}

impl FormField {
    fn number(label: &'static str, hint: &'static str, min: f64, max: f64, decimal: bool) -> Self {
        Self {
            label,
            hint,
            input: FieldInput::Number {
                value: String::new(),
                min,
                max,
                decimal,
            },
        }
    }

    fn choice(label: &'static str, hint: &'static str, options: Vec<(&'static str, u8)>) -> Self {
        Self {
            label,
            hint,
            input: FieldInput::Choice {
                options,
                selected: 0,
            },
        }
    }

    /// Text shown in the field box.
    #[must_use]
    pub fn display(&self) -> String {
        match &self.input {
            FieldInput::Number { value, .. } => value.clone(),
            FieldInput::Choice { options, selected } => options
                .get(*selected)
                .map(|(label, _)| format!("‹ {label} ›"))
                .unwrap_or_default(),
        }
    }

    fn set(&mut self, feature: f64) {
        match &mut self.input {
            FieldInput::Number { value, decimal, .. } => {
                value.zeroize();
                *value = if *decimal {
                    format!("{feature:.1}")
                } else {
                    format!("{feature:.0}")
                };
            }
            FieldInput::Choice { options, selected } => {
                if let Some(i) = options
                    .iter()
                    .position(|&(_, code)| f64::from(code) == feature)
                {
                    *selected = i;
                }
            }
        }
    }

    fn feature(&self) -> Result<f64, String> {
        match &self.input {
            FieldInput::Number {
                value, min, max, ..
            } => {
                if value.is_empty() {
                    return Err(format!("{}: Value required", self.label));
                }
                let parsed: f64 = value
                    .parse()
                    .map_err(|_| format!("{}: Invalid number", self.label))?;
                Ok(parsed.clamp(*min, *max))
            }
            FieldInput::Choice { options, selected } => options
                .get(*selected)
                .map(|&(_, code)| f64::from(code))
                .ok_or_else(|| format!("{}: No option selected", self.label)),
        }
    }
}

fn options<T: Copy>(all: &[T], label: fn(T) -> &'static str, code: fn(T) -> u8) -> Vec<(&'static str, u8)> {
    all.iter().map(|&v| (label(v), code(v))).collect()
}

fn range_u32(range: &std::ops::RangeInclusive<u32>) -> (f64, f64) {
    (f64::from(*range.start()), f64::from(*range.end()))
}

/// Patient form state
pub struct PatientFormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,
}

impl Default for PatientFormState {
    fn default() -> Self {
        let (age_min, age_max) = range_u32(&PatientRecord::AGE_RANGE);
        let (bp_min, bp_max) = range_u32(&PatientRecord::RESTING_BP_RANGE);
        let (chol_min, chol_max) = range_u32(&PatientRecord::CHOLESTEROL_RANGE);
        let (hr_min, hr_max) = range_u32(&PatientRecord::MAX_HEART_RATE_RANGE);
        let st = &PatientRecord::ST_DEPRESSION_RANGE;

        // Order must match FEATURE_NAMES.
        let fields = vec![
            FormField::number("Age", "years (1-120)", age_min, age_max, false),
            FormField::choice("Sex", "", options(Sex::ALL, Sex::label, Sex::code)),
            FormField::choice(
                "Chest Pain Type",
                "",
                options(ChestPainType::ALL, ChestPainType::label, ChestPainType::code),
            ),
            FormField::number("Resting BP", "mmHg (0-250)", bp_min, bp_max, false),
            FormField::number("Cholesterol", "mg/dL (0-400)", chol_min, chol_max, false),
            FormField::choice("Fasting BS > 120", "", NO_YES.to_vec()),
            FormField::choice(
                "Resting ECG",
                "",
                options(RestingEcg::ALL, RestingEcg::label, RestingEcg::code),
            ),
            FormField::number("Max Heart Rate", "bpm (0-220)", hr_min, hr_max, false),
            FormField::choice("Exercise Angina", "", NO_YES.to_vec()),
            FormField::number("ST Depression", "mm (0.0-10.0)", *st.start(), *st.end(), true),
            FormField::choice(
                "Slope",
                "",
                options(StSlope::ALL, StSlope::label, StSlope::code),
            ),
            FormField::choice("Major Vessels", "", VESSEL_COUNTS.to_vec()),
            FormField::choice(
                "Thalassemia",
                "",
                options(Thalassemia::ALL, Thalassemia::label, Thalassemia::code),
            ),
        ];
        debug_assert_eq!(fields.len(), FEATURE_COUNT);

        let mut state = Self {
            fields,
            selected_field: 0,
            error_message: None,
        };
        state.load_record(&PatientRecord::default());
        state
    }
}

impl PatientFormState {
    /// Move to the next field
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Add a character to the current numeric field
    pub fn input_char(&mut self, c: char) {
        if let FieldInput::Number { value, decimal, .. } =
            &mut self.fields[self.selected_field].input
        {
            let accepted = c.is_ascii_digit() || (*decimal && c == '.' && !value.contains('.'));
            if accepted && value.len() < MAX_INPUT_LEN {
                value.push(c);
                self.error_message = None;
            }
        }
    }

    /// Delete the last character
    pub fn delete_char(&mut self) {
        if let FieldInput::Number { value, .. } = &mut self.fields[self.selected_field].input {
            value.pop();
        }
    }

    /// Cycle the current choice field forwards or backwards.
    pub fn cycle_choice(&mut self, forward: bool) {
        if let FieldInput::Choice { options, selected } =
            &mut self.fields[self.selected_field].input
        {
            let n = options.len();
            *selected = if forward {
                (*selected + 1) % n
            } else {
                (*selected + n - 1) % n
            };
            self.error_message = None;
        }
    }

    /// Fill every field from a record.
    pub fn load_record(&mut self, record: &PatientRecord) {
        for (field, feature) in self.fields.iter_mut().zip(record.to_feature_vector()) {
            field.set(feature);
        }
        self.error_message = None;
    }

    /// Restore the default values.
    pub fn reset(&mut self) {
        self.load_record(&PatientRecord::default());
        self.selected_field = 0;
    }

    /// Load a sample high-risk patient
    pub fn load_sample_data(&mut self) {
        self.load_record(&PatientRecord {
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
        });
    }

    /// Wipe typed buffers from memory and restore defaults.
    ///
    /// Called as soon as a record has been built so plaintext inputs do
    /// not persist in the UI state.
    pub fn clear_sensitive(&mut self) {
        for field in &mut self.fields {
            if let FieldInput::Number { value, .. } = &mut field.input {
                value.zeroize();
            }
        }
        self.reset();
    }

    /// Build a record, clamping numeric entries into range.
    ///
    /// # Errors
    /// Returns a message naming the first field that is empty or unparsable.
    pub fn to_record(&self) -> Result<PatientRecord, String> {
        let features = self
            .fields
            .iter()
            .map(FormField::feature)
            .collect::<Result<Vec<f64>, String>>()?;

        PatientRecord::from_feature_vector(&features)
    }
}

/// Render the patient data input form
pub fn render_patient_form(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0]);
    render_form_fields(f, chunks[1], state);
    render_form_footer(f, chunks[2], state);
}

fn render_form_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", ClinicalTheme::text()),
        Span::styled("Patient Data Entry", ClinicalTheme::title()),
        Span::styled(" │ 13 Clinical Parameters", ClinicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ClinicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let mid = (state.fields.len() + 1) / 2;

    render_field_column(f, columns[0], &state.fields[..mid], 0, state.selected_field);
    render_field_column(
        f,
        columns[1],
        &state.fields[mid..],
        mid,
        state.selected_field,
    );
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: usize,
) {
    let field_height = 3;
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(field_height))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let border_style = if is_selected {
            ClinicalTheme::border_focused()
        } else {
            ClinicalTheme::border()
        };
        let title_style = if is_selected {
            ClinicalTheme::focused()
        } else {
            ClinicalTheme::text_secondary()
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.label), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let mut spans = vec![Span::raw(" "), Span::styled(field.display(), ClinicalTheme::text())];
        if let FieldInput::Number { .. } = field.input {
            if is_selected {
                spans.push(Span::styled("▌", ClinicalTheme::cursor()));
            }
            spans.push(Span::styled(format!("  {}", field.hint), ClinicalTheme::text_muted()));
        }

        f.render_widget(Paragraph::new(Line::from(spans)).block(block), chunks[i]);
    }
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", ClinicalTheme::danger()),
            Span::styled(err.clone(), ClinicalTheme::danger()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", ClinicalTheme::key_hint()),
            Span::styled("Navigate ", ClinicalTheme::key_desc()),
            Span::styled("[←→] ", ClinicalTheme::key_hint()),
            Span::styled("Change ", ClinicalTheme::key_desc()),
            Span::styled("[Enter] ", ClinicalTheme::key_hint()),
            Span::styled("Predict ", ClinicalTheme::key_desc()),
            Span::styled("[S] ", ClinicalTheme::key_hint()),
            Span::styled("Sample ", ClinicalTheme::key_desc()),
            Span::styled("[R] ", ClinicalTheme::key_hint()),
            Span::styled("Reset ", ClinicalTheme::key_desc()),
            Span::styled("[Q] ", ClinicalTheme::key_hint()),
            Span::styled("Quit", ClinicalTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(ClinicalTheme::border()),
    );

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn select(state: &mut PatientFormState, label: &str) {
        state.selected_field = state
            .fields
            .iter()
            .position(|f| f.label == label)
            .expect("field exists");
    }

    fn retype(state: &mut PatientFormState, label: &str, text: &str) {
        select(state, label);
        while let FieldInput::Number { value, .. } = &state.fields[state.selected_field].input {
            if value.is_empty() {
                break;
            }
            state.delete_char();
        }
        for c in text.chars() {
            state.input_char(c);
        }
    }

    #[test]
    fn test_defaults_build_default_record() {
        let state = PatientFormState::default();
        assert_eq!(state.fields.len(), FEATURE_COUNT);
        assert_eq!(state.to_record().expect("record"), PatientRecord::default());
    }

    #[test]
    fn test_numeric_entries_are_clamped() {
        let mut state = PatientFormState::default();
        retype(&mut state, "Max Heart Rate", "999");
        retype(&mut state, "Age", "0");

        let record = state.to_record().expect("record");
        assert_eq!(record.max_heart_rate, 220);
        assert_eq!(record.age, 1);
    }

    #[test]
    fn test_input_filters_characters() {
        let mut state = PatientFormState::default();
        retype(&mut state, "Age", "4a5-");
        assert_eq!(state.fields[0].display(), "45");

        retype(&mut state, "ST Depression", "1..5");
        let record = state.to_record().expect("record");
        assert!((record.st_depression - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_field_is_reported() {
        let mut state = PatientFormState::default();
        retype(&mut state, "Cholesterol", "");
        let err = state.to_record().unwrap_err();
        assert!(err.starts_with("Cholesterol"));
    }

    #[test]
    fn test_cycle_choice_wraps() {
        let mut state = PatientFormState::default();
        select(&mut state, "Thalassemia");
        state.cycle_choice(false);
        assert_eq!(
            state.to_record().expect("record").thalassemia,
            Thalassemia::ReversibleDefect
        );
        state.cycle_choice(true);
        assert_eq!(
            state.to_record().expect("record").thalassemia,
            Thalassemia::Normal
        );
    }

    #[test]
    fn test_cycle_ignores_numeric_fields() {
        let mut state = PatientFormState::default();
        state.cycle_choice(true);
        assert_eq!(state.to_record().expect("record"), PatientRecord::default());
    }

    #[test]
    fn test_sample_then_clear_sensitive() {
        let mut state = PatientFormState::default();
        state.load_sample_data();
        let sample = state.to_record().expect("record");
        assert_eq!(sample.age, 65);
        assert_eq!(sample.chest_pain, ChestPainType::TypicalAngina);
        assert!(sample.exercise_angina);

        state.selected_field = 4;
        state.clear_sensitive();
        assert_eq!(state.selected_field, 0);
        assert_eq!(state.to_record().expect("record"), PatientRecord::default());
    }
}
