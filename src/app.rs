use anyhow::Result;
use ratatui::widgets::ListState;

use crate::auth;
use crate::gemini::{AnalysisResult, GeminiClient};
use crate::jurisdiction::LawSystem;
use crate::session::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Main,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Jurisdiction,
    Details,
    Result,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub screen: Screen,
    pub theme: Theme,
    pub input_mode: InputMode,
    pub focus: FocusPane,

    // Login screen
    pub login_field: LoginField,
    pub username_input: String,
    pub username_cursor: usize,
    pub password_input: String,
    pub password_cursor: usize,
    pub login_error: Option<&'static str>,

    // Case form
    pub jurisdiction_state: ListState,
    pub details_input: String,
    pub details_cursor: usize,

    // Analysis state
    pub result: Option<AnalysisResult>,
    pub analyzed_jurisdiction: Option<LawSystem>,
    pub result_scroll: u16,
    pub result_height: u16,
    pub result_width: u16,
    pub loading: bool,
    pub analysis_task: Option<tokio::task::JoinHandle<Result<AnalysisResult>>>,

    // Animation state (0-2 for the ellipsis while loading)
    pub animation_frame: u8,

    pub gemini: GeminiClient,
    pub session: SessionStore,
}

impl App {
    pub fn new(gemini: GeminiClient, session: SessionStore) -> Self {
        // A surviving marker means the previous session did not end cleanly;
        // skip the gate, matching a reload mid-session.
        let screen = if session.is_active() {
            Screen::Main
        } else {
            Screen::Login
        };

        Self {
            should_quit: false,
            screen,
            theme: Theme::Dark,
            input_mode: InputMode::Normal,
            focus: FocusPane::Jurisdiction,

            login_field: LoginField::Username,
            username_input: String::new(),
            username_cursor: 0,
            password_input: String::new(),
            password_cursor: 0,
            login_error: None,

            jurisdiction_state: ListState::default(),
            details_input: String::new(),
            details_cursor: 0,

            result: None,
            analyzed_jurisdiction: None,
            result_scroll: 0,
            result_height: 0,
            result_width: 0,
            loading: false,
            analysis_task: None,

            animation_frame: 0,

            gemini,
            session,
        }
    }

    // Login gate

    pub fn submit_login(&mut self) {
        if auth::verify(&self.username_input, &self.password_input) {
            self.login_error = None;
            self.screen = Screen::Main;
            if let Err(err) = self.session.activate() {
                tracing::warn!("Failed to persist session marker: {err:#}");
            }
            tracing::info!("Login accepted");
        } else {
            self.login_error = Some(auth::LOGIN_ERROR);
            tracing::info!("Login rejected");
        }
    }

    pub fn logout(&mut self) {
        self.session.clear();
        self.screen = Screen::Login;
        self.login_field = LoginField::Username;
        self.password_input.clear();
        self.password_cursor = 0;
        self.login_error = None;
        self.input_mode = InputMode::Normal;
        tracing::info!("Logged out");
    }

    // Case form

    pub fn selected_jurisdiction(&self) -> Option<LawSystem> {
        self.jurisdiction_state
            .selected()
            .and_then(|i| LawSystem::all().get(i).copied())
    }

    pub fn jurisdiction_nav_down(&mut self) {
        let len = LawSystem::all().len();
        let i = self.jurisdiction_state.selected().map(|i| i + 1).unwrap_or(0);
        self.jurisdiction_state.select(Some(i.min(len - 1)));
    }

    pub fn jurisdiction_nav_up(&mut self) {
        let i = self.jurisdiction_state.selected().unwrap_or(0);
        self.jurisdiction_state.select(Some(i.saturating_sub(1)));
    }

    /// Both fields filled and no request outstanding.
    pub fn can_submit(&self) -> bool {
        self.selected_jurisdiction().is_some()
            && !self.details_input.trim().is_empty()
            && self.analysis_task.is_none()
    }

    /// Spawn the analysis request. A no-op unless [`App::can_submit`] holds,
    /// so an empty form or an in-flight request never reaches the client.
    ///
    /// The prior result is dropped immediately: only the loading indicator
    /// renders while a request is in flight.
    pub fn submit_analysis(&mut self) {
        if !self.can_submit() {
            return;
        }
        let Some(law_system) = self.selected_jurisdiction() else {
            return;
        };

        let client = self.gemini.clone();
        let details = self.details_input.clone();

        self.loading = true;
        self.result = None;
        self.analyzed_jurisdiction = Some(law_system);
        self.result_scroll = 0;
        self.analysis_task = Some(tokio::spawn(async move {
            client.analyze(law_system, &details).await
        }));
    }

    /// Reap the analysis task once it has finished. Called on every tick; the
    /// handle stays `Some` until then, keeping submit inert.
    pub async fn poll_analysis(&mut self) {
        let finished = self
            .analysis_task
            .as_ref()
            .map(|task| task.is_finished())
            .unwrap_or(false);
        if !finished {
            return;
        }

        if let Some(task) = self.analysis_task.take() {
            let outcome = match task.await {
                Ok(outcome) => outcome,
                Err(err) => Err(anyhow::anyhow!("Analysis task panicked: {err}")),
            };
            self.apply_analysis_outcome(outcome);
        }
    }

    /// Store the outcome, replacing any prior result wholesale. A failure of
    /// any kind becomes the fixed fallback result.
    pub fn apply_analysis_outcome(&mut self, outcome: Result<AnalysisResult>) {
        self.loading = false;
        self.result_scroll = 0;
        self.result = Some(match outcome {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!("Analysis failed: {err:#}");
                AnalysisResult::fallback()
            }
        });
    }

    // Presentation

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.loading {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    // Result scrolling

    pub fn scroll_result_down(&mut self) {
        let total = self.result_line_count();
        if self.result_scroll < total.saturating_sub(self.result_height) {
            self.result_scroll = self.result_scroll.saturating_add(1);
        }
    }

    pub fn scroll_result_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    /// Estimate of the wrapped line count of the narrative, using the width
    /// recorded during the last render. Character count, not byte length, so
    /// Arabic text wraps correctly.
    fn result_line_count(&self) -> u16 {
        let Some(result) = &self.result else {
            return 0;
        };
        let wrap_width = if self.result_width > 0 {
            self.result_width as usize
        } else {
            50
        };

        let mut total: u16 = 0;
        for line in result.text.lines() {
            let char_count = line.chars().count();
            if char_count == 0 {
                total += 1;
            } else {
                total += ((char_count / wrap_width) + 1) as u16;
            }
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::{SourceLink, ANALYSIS_FALLBACK, DEFAULT_MODEL};
    use tempfile::TempDir;

    fn test_app() -> (App, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(
            GeminiClient::new("test-key", DEFAULT_MODEL),
            SessionStore::at(dir.path()),
        );
        (app, dir)
    }

    fn sample_result(text: &str) -> AnalysisResult {
        AnalysisResult {
            text: text.to_string(),
            sources: vec![SourceLink {
                title: "مصدر".to_string(),
                uri: "https://example.com".to_string(),
            }],
        }
    }

    #[test]
    fn fresh_start_without_marker_begins_at_the_gate() {
        let (app, _dir) = test_app();
        assert_eq!(app.screen, Screen::Login);
    }

    #[test]
    fn surviving_marker_skips_the_gate() {
        let dir = tempfile::tempdir().unwrap();
        let session = SessionStore::at(dir.path());
        session.activate().unwrap();

        let app = App::new(GeminiClient::new("test-key", DEFAULT_MODEL), session);
        assert_eq!(app.screen, Screen::Main);
    }

    #[test]
    fn accepted_login_enters_main_and_persists_the_marker() {
        let (mut app, _dir) = test_app();
        app.username_input = " admin ".to_string();
        app.password_input = "admin 6787".to_string();

        app.submit_login();

        assert_eq!(app.screen, Screen::Main);
        assert!(app.login_error.is_none());
        assert!(app.session.is_active());
    }

    #[test]
    fn rejected_login_shows_the_fixed_error_and_changes_nothing_else() {
        let (mut app, _dir) = test_app();
        app.username_input = "ADMIN".to_string();
        app.password_input = "WRONG".to_string();

        app.submit_login();

        assert_eq!(app.screen, Screen::Login);
        assert_eq!(app.login_error, Some(auth::LOGIN_ERROR));
        assert!(!app.session.is_active());
    }

    #[tokio::test]
    async fn submit_without_jurisdiction_is_a_no_op() {
        let (mut app, _dir) = test_app();
        app.details_input = "نزاع تجاري".to_string();

        app.submit_analysis();

        assert!(!app.loading);
        assert!(app.analysis_task.is_none());
    }

    #[tokio::test]
    async fn submit_with_blank_details_is_a_no_op() {
        let (mut app, _dir) = test_app();
        app.jurisdiction_state.select(Some(0));
        app.details_input = "   ".to_string();

        app.submit_analysis();

        assert!(!app.loading);
        assert!(app.analysis_task.is_none());
    }

    #[tokio::test]
    async fn new_submit_drops_the_prior_result_for_the_loading_window() {
        let (mut app, _dir) = test_app();
        app.apply_analysis_outcome(Ok(sample_result("قديم")));
        app.jurisdiction_state.select(Some(0));
        app.details_input = "وقائع جديدة".to_string();

        app.submit_analysis();

        assert!(app.loading);
        assert!(app.result.is_none());
        app.analysis_task.take().unwrap().abort();
    }

    #[tokio::test]
    async fn submit_records_the_jurisdiction_it_analyzed() {
        let (mut app, _dir) = test_app();
        app.jurisdiction_state.select(Some(1));
        app.details_input = "نزاع".to_string();

        app.submit_analysis();
        app.analysis_task.take().unwrap().abort();

        // Re-selecting afterwards does not rewrite what was submitted
        app.jurisdiction_state.select(Some(3));
        assert_eq!(app.analyzed_jurisdiction, Some(LawSystem::all()[1]));
    }

    #[test]
    fn success_replaces_the_prior_result_wholesale() {
        let (mut app, _dir) = test_app();
        app.apply_analysis_outcome(Ok(sample_result("الدراسة الأولى")));
        app.apply_analysis_outcome(Ok(AnalysisResult {
            text: "الدراسة الثانية".to_string(),
            sources: Vec::new(),
        }));

        let result = app.result.as_ref().unwrap();
        assert_eq!(result.text, "الدراسة الثانية");
        assert!(result.sources.is_empty());
        assert!(!app.loading);
    }

    #[test]
    fn failure_yields_the_fallback_result_regardless_of_cause() {
        let (mut app, _dir) = test_app();
        app.loading = true;
        app.apply_analysis_outcome(Err(anyhow::anyhow!("connection refused")));

        let result = app.result.as_ref().unwrap();
        assert_eq!(result.text, ANALYSIS_FALLBACK);
        assert!(result.sources.is_empty());
        assert!(!app.loading);
    }

    #[tokio::test]
    async fn poll_reaps_a_finished_task_into_the_result() {
        let (mut app, _dir) = test_app();
        app.loading = true;
        app.analysis_task = Some(tokio::spawn(async { Ok(sample_result("جاهز")) }));

        // Let the spawned future run to completion.
        tokio::task::yield_now().await;
        while app.analysis_task.is_some() {
            app.poll_analysis().await;
            tokio::task::yield_now().await;
        }

        assert_eq!(app.result.as_ref().unwrap().text, "جاهز");
        assert!(!app.loading);
    }

    #[test]
    fn theme_toggle_touches_presentation_only() {
        let (mut app, _dir) = test_app();
        app.screen = Screen::Main;
        app.jurisdiction_state.select(Some(2));
        app.details_input = "وقائع".to_string();
        app.apply_analysis_outcome(Ok(sample_result("نتيجة")));

        app.toggle_theme();
        assert_eq!(app.theme, Theme::Light);
        app.toggle_theme();
        assert_eq!(app.theme, Theme::Dark);

        assert_eq!(app.screen, Screen::Main);
        assert_eq!(app.jurisdiction_state.selected(), Some(2));
        assert_eq!(app.details_input, "وقائع");
        assert_eq!(app.result.as_ref().unwrap().text, "نتيجة");
    }

    #[test]
    fn logout_clears_the_marker_and_returns_to_the_gate() {
        let (mut app, _dir) = test_app();
        app.username_input = "ADMIN1".to_string();
        app.password_input = "ADMIN1".to_string();
        app.submit_login();
        assert!(app.session.is_active());

        app.logout();

        assert_eq!(app.screen, Screen::Login);
        assert!(!app.session.is_active());
        assert!(app.password_input.is_empty());
    }
}
