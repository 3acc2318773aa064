//! Main TUI application state machine.
//!
//! Two screens: the patient form and the assessment report. A submission
//! runs the whole pipeline synchronously before the next frame is drawn;
//! failures show an error panel over the form.

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::application::AssessmentService;
use crate::domain::Assessment;
use crate::ports::{Classifier, FeatureScaler};
use crate::CardiolensError;

use super::ui::{
    patient::{render_patient_form, PatientFormState},
    render_disclaimer, render_error,
    report::render_report,
};

/// Rows moved by PageUp/PageDown on the report.
const PAGE_ROWS: u16 = 10;

/// Current screen/view in the application
#[derive(Debug)]
pub enum Screen {
    Form,
    Report {
        assessment: Box<Assessment>,
        /// Rows scrolled past; clamped by the renderer every frame
        scroll: u16,
    },
}

/// Main application state
pub struct App<S, C>
where
    S: FeatureScaler,
    C: Classifier,
{
    screen: Screen,
    should_quit: bool,
    service: AssessmentService<S, C>,
    form: PatientFormState,
    /// Error panel shown over the form until dismissed
    error: Option<String>,
}

impl<S, C> App<S, C>
where
    S: FeatureScaler,
    C: Classifier,
{
    /// Create the application around a ready assessment service.
    pub fn new(service: AssessmentService<S, C>) -> Self {
        Self {
            screen: Screen::Form,
            should_quit: false,
            service,
            form: PatientFormState::default(),
            error: None,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|f| {
                let area = f.area();
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(area);

                match &mut self.screen {
                    Screen::Form => render_patient_form(f, chunks[0], &self.form),
                    Screen::Report { assessment, scroll } => {
                        *scroll = render_report(f, chunks[0], assessment, *scroll);
                    }
                }
                render_disclaimer(f, chunks[1]);

                if let Some(message) = &self.error {
                    render_error(f, area, message);
                }
            })?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if matches!(key, KeyCode::Char('q') | KeyCode::Char('Q'))
            && modifiers.contains(KeyModifiers::CONTROL)
        {
            self.should_quit = true;
            return;
        }

        if self.error.is_some() {
            if matches!(key, KeyCode::Enter | KeyCode::Esc) {
                self.error = None;
            }
            return;
        }

        match self.screen {
            Screen::Form => self.handle_form_key(key),
            Screen::Report { .. } => self.handle_report_key(key),
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Up | KeyCode::BackTab => self.form.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.form.next_field(),
            KeyCode::Left => self.form.cycle_choice(false),
            KeyCode::Right => self.form.cycle_choice(true),
            KeyCode::Char('s') | KeyCode::Char('S') => self.form.load_sample_data(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.form.reset(),
            KeyCode::Char(c) => self.form.input_char(c),
            KeyCode::Backspace => self.form.delete_char(),
            KeyCode::Enter => self.submit(),
            _ => {}
        }
    }

    fn handle_report_key(&mut self, key: KeyCode) {
        let Screen::Report { scroll, .. } = &mut self.screen else {
            return;
        };

        match key {
            KeyCode::Up => *scroll = scroll.saturating_sub(1),
            KeyCode::Down => *scroll = scroll.saturating_add(1),
            KeyCode::PageUp => *scroll = scroll.saturating_sub(PAGE_ROWS),
            KeyCode::PageDown => *scroll = scroll.saturating_add(PAGE_ROWS),
            KeyCode::Home => *scroll = 0,
            KeyCode::End => *scroll = u16::MAX,
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.screen = Screen::Form;
            }
            _ => {}
        }
    }

    fn submit(&mut self) {
        let record = match self.form.to_record() {
            Ok(record) => record,
            Err(e) => {
                self.form.error_message = Some(e);
                return;
            }
        };

        // Clear plaintext buffers from the UI immediately.
        self.form.clear_sensitive();

        match self.service.assess(record) {
            Ok(assessment) => {
                self.screen = Screen::Report {
                    assessment: Box::new(assessment),
                    scroll: 0,
                };
            }
            Err(e) => {
                match &e {
                    CardiolensError::Validation(errors) => {
                        tracing::warn!("Record rejected with {} validation errors", errors.len());
                    }
                    other => tracing::error!("Assessment failed: {}", other),
                }
                self.error = Some(e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RiskTier;
    use crate::ports::{FeatureVector, ModelError, ModelOutput};
    use std::sync::Arc;

    struct Passthrough;

    impl FeatureScaler for Passthrough {
        fn transform(&self, features: &FeatureVector) -> Result<FeatureVector, ModelError> {
            Ok(*features)
        }
    }

    /// Risk rises with the first feature (age), so the sample patient
    /// lands higher than the defaults.
    struct AgeClassifier;

    impl Classifier for AgeClassifier {
        fn predict(&self, features: &FeatureVector) -> Result<ModelOutput, ModelError> {
            let probability = (features[0] / 100.0).clamp(0.0, 1.0);
            Ok(ModelOutput {
                label: u8::from(probability >= 0.5),
                probability,
            })
        }
    }

    struct BrokenClassifier;

    impl Classifier for BrokenClassifier {
        fn predict(&self, _features: &FeatureVector) -> Result<ModelOutput, ModelError> {
            Err(ModelError::InvalidOutput("non-finite logit".into()))
        }
    }

    fn new_app() -> App<Passthrough, AgeClassifier> {
        App::new(AssessmentService::new(Arc::new(Passthrough), Arc::new(AgeClassifier)))
    }

    fn press(app: &mut App<impl FeatureScaler, impl Classifier>, key: KeyCode) {
        app.handle_key(key, KeyModifiers::NONE);
    }

    fn report_tier<S: FeatureScaler, C: Classifier>(app: &App<S, C>) -> Option<RiskTier> {
        match &app.screen {
            Screen::Report { assessment, .. } => Some(assessment.tier),
            Screen::Form => None,
        }
    }

    #[test]
    fn test_submit_defaults_shows_report() {
        let mut app = new_app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(report_tier(&app), Some(RiskTier::Moderate));

        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.screen, Screen::Form));
        assert!(!app.should_quit);
    }

    fn report_scroll<S: FeatureScaler, C: Classifier>(app: &App<S, C>) -> Option<u16> {
        match &app.screen {
            Screen::Report { scroll, .. } => Some(*scroll),
            Screen::Form => None,
        }
    }

    #[test]
    fn test_report_scroll_keys() {
        let mut app = new_app();
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(report_scroll(&app), Some(0));

        press(&mut app, KeyCode::Up);
        assert_eq!(report_scroll(&app), Some(0));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(report_scroll(&app), Some(2));
        press(&mut app, KeyCode::PageDown);
        assert_eq!(report_scroll(&app), Some(2 + PAGE_ROWS));
        press(&mut app, KeyCode::PageUp);
        press(&mut app, KeyCode::Up);
        assert_eq!(report_scroll(&app), Some(1));
        press(&mut app, KeyCode::End);
        assert_eq!(report_scroll(&app), Some(u16::MAX));
        press(&mut app, KeyCode::Home);
        assert_eq!(report_scroll(&app), Some(0));

        // Scrolling never leaves the report.
        assert_eq!(report_tier(&app), Some(RiskTier::High));
    }

    #[test]
    fn test_sample_patient_is_high_risk() {
        let mut app = new_app();
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(report_tier(&app), Some(RiskTier::High));
    }

    #[test]
    fn test_form_is_wiped_after_submit() {
        let mut app = new_app();
        press(&mut app, KeyCode::Char('S'));
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Esc);

        assert_eq!(
            app.form.to_record().expect("record"),
            crate::domain::PatientRecord::default()
        );
    }

    #[test]
    fn test_model_failure_shows_error_panel() {
        let mut app = App::new(AssessmentService::new(
            Arc::new(Passthrough),
            Arc::new(BrokenClassifier),
        ));
        press(&mut app, KeyCode::Enter);

        assert!(matches!(app.screen, Screen::Form));
        let message = app.error.clone().expect("error shown");
        assert!(message.contains("non-finite logit"));

        // Keys other than Enter/Esc are swallowed while the panel is up.
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Esc);
        assert!(app.error.is_none());
    }

    #[test]
    fn test_quit_keys() {
        let mut app = new_app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);

        let mut app = new_app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        app.handle_key(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }
}
