//! Application state for the ruhestand TUI.
//!
//! All mutable state lives in the `App` struct and is advanced explicitly:
//! the main loop hands the current instant to [`App::advance_to`], so tests
//! drive virtual time instead of waiting on a wall clock. Preference
//! changes are written through the injected settings store synchronously.

use anyhow::Result;
use chrono::{Duration, NaiveDateTime};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{info, warn};

use ruhestand_core::cache::{AssetCache, CacheManifest, CacheProxy, InstallReport};
use ruhestand_core::countdown::{countdown_from_input, Clock, Countdown, SystemClock, DEFAULT_MAX_DAYS};
use ruhestand_core::i18n::Strings;
use ruhestand_core::settings::{
    self, JsonFileStore, Preferences, SettingsStore, KEY_ACCENT_COLOR, KEY_BG_COLOR,
    KEY_CUSTOM_TITLE, KEY_LANGUAGE, KEY_TARGET_DATE,
};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background cache task channel.
const CHANNEL_BUFFER_SIZE: usize = 4;

/// Maximum length for the target date input (`YYYY-MM-DD HH:MM`).
const MAX_DATE_LENGTH: usize = 16;

/// Maximum length for the custom title input.
const MAX_TITLE_LENGTH: usize = 60;

/// How long the hourglass stays flipped after a second boundary.
const FLIP_REVERT_MS: i64 = 700;

/// Environment variable overriding the progress scale.
const MAX_DAYS_ENV: &str = "RUHESTAND_MAX_DAYS";

/// Backgrounds the `b` key cycles through.
pub const BG_PRESETS: &[&str] = &["#1e1e2e", "#002b36", "#1c2023", "#2d2a2e", "#0b2239"];

/// Accent colors for the digits and the chart.
pub const ACCENT_PRESETS: &[&str] = &["#ff9800", "#e06c75", "#61afef", "#98c379", "#c678dd"];

pub fn can_add_date_char(input: &str, c: char) -> bool {
    input.len() < MAX_DATE_LENGTH && (c.is_ascii_digit() || matches!(c, '-' | ' ' | ':'))
}

pub fn can_add_title_char(input: &str, c: char) -> bool {
    input.chars().count() < MAX_TITLE_LENGTH && !c.is_control()
}

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    EditingDate,
    EditingTitle,
    ShowingHelp,
    Quitting,
}

/// Where the offline cache currently stands, for the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheStatus {
    Unknown,
    Warming,
    Ready { stored: usize, failed: usize },
    Unavailable,
}

/// Result of the background cache warm-up task.
enum CacheEvent {
    Installed { report: InstallReport, purged: usize },
    Failed(String),
}

pub struct App {
    pub state: AppState,
    pub prefs: Preferences,
    store: Box<dyn SettingsStore + Send>,
    pub countdown: Countdown,
    pub max_days: i64,
    pub now: NaiveDateTime,
    pub date_input: String,
    pub title_input: String,
    pub cache_status: CacheStatus,
    pub cache_age: Option<String>,
    flip_until: Option<NaiveDateTime>,
    cache_rx: Option<mpsc::Receiver<CacheEvent>>,
    last_tick_secs: i64,
}

impl App {
    pub fn new() -> Result<Self> {
        let store = Box::new(JsonFileStore::open_default()?);
        let mut app = Self::with_store(store, SystemClock.now());
        app.refresh_cache_age();
        Ok(app)
    }

    /// Build the app around any settings store, starting at `now`.
    pub fn with_store(store: Box<dyn SettingsStore + Send>, now: NaiveDateTime) -> Self {
        let prefs = Preferences::load(store.as_ref());
        let max_days = std::env::var(MAX_DAYS_ENV)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_MAX_DAYS);

        let mut app = Self {
            state: AppState::Normal,
            prefs,
            store,
            countdown: Countdown::Done,
            max_days,
            now,
            date_input: String::new(),
            title_input: String::new(),
            cache_status: CacheStatus::Unknown,
            cache_age: None,
            flip_until: None,
            cache_rx: None,
            last_tick_secs: i64::MIN,
        };
        app.advance_to(now);
        app
    }

    pub fn strings(&self) -> &'static Strings {
        self.prefs.language.strings()
    }

    /// Custom title if set, else the localized default.
    pub fn display_title(&self) -> &str {
        self.prefs
            .custom_title
            .as_deref()
            .unwrap_or(self.strings().title)
    }

    pub fn hourglass_flipped(&self) -> bool {
        self.flip_until.is_some_and(|until| self.now < until)
    }

    // ========================================================================
    // Time
    // ========================================================================

    /// Called once per main-loop iteration.
    pub fn on_idle(&mut self) {
        self.drain_background();
        self.advance_to(SystemClock.now());
    }

    /// Move the app to `now`. Recomputes the countdown on whole-second
    /// boundaries and reverts an elapsed hourglass flip.
    pub fn advance_to(&mut self, now: NaiveDateTime) {
        self.now = now;
        let secs = now.and_utc().timestamp();
        if secs != self.last_tick_secs {
            self.last_tick_secs = secs;
            self.tick(now);
        }
        if self.flip_until.is_some_and(|until| now >= until) {
            self.flip_until = None;
        }
    }

    fn tick(&mut self, now: NaiveDateTime) {
        self.countdown = countdown_from_input(&self.prefs.target_date, now);
        if let Countdown::Remaining { duration, .. } = self.countdown {
            if duration.seconds == 0 {
                self.flip_until = Some(now + Duration::milliseconds(FLIP_REVERT_MS));
            }
        }
    }

    // ========================================================================
    // Preference mutations
    // ========================================================================

    pub fn start_date_edit(&mut self) {
        self.date_input = self.prefs.target_date.clone();
        self.state = AppState::EditingDate;
    }

    pub fn start_title_edit(&mut self) {
        self.title_input = self.prefs.custom_title.clone().unwrap_or_default();
        self.state = AppState::EditingTitle;
    }

    pub fn cancel_edit(&mut self) {
        self.state = AppState::Normal;
    }

    pub fn commit_date(&mut self) {
        let value = self.date_input.trim().to_string();
        self.persist(KEY_TARGET_DATE, &value);
        self.prefs.target_date = value;
        self.state = AppState::Normal;
        self.tick(self.now);
    }

    pub fn commit_title(&mut self) {
        let value = self.title_input.trim().to_string();
        if value.is_empty() {
            if let Err(err) = self.store.remove(KEY_CUSTOM_TITLE) {
                warn!(error = %err, "failed to remove custom title");
            }
            self.prefs.custom_title = None;
        } else {
            self.persist(KEY_CUSTOM_TITLE, &value);
            self.prefs.custom_title = Some(value);
        }
        self.state = AppState::Normal;
    }

    pub fn toggle_language(&mut self) {
        let language = self.prefs.language.toggle();
        self.persist(KEY_LANGUAGE, language.code());
        self.prefs.language = language;
    }

    pub fn cycle_bg_color(&mut self) {
        let next = next_preset(BG_PRESETS, self.prefs.bg_color.as_deref());
        self.persist(KEY_BG_COLOR, next);
        self.prefs.bg_color = Some(next.to_string());
    }

    pub fn cycle_accent_color(&mut self) {
        let next = next_preset(ACCENT_PRESETS, self.prefs.accent_color.as_deref());
        self.persist(KEY_ACCENT_COLOR, next);
        self.prefs.accent_color = Some(next.to_string());
    }

    /// Clear every persisted key and reapply defaults. Irreversible.
    pub fn reset(&mut self) {
        if let Err(err) = self.store.clear() {
            warn!(error = %err, "failed to clear settings");
        }
        self.prefs = Preferences::load(self.store.as_ref());
        self.date_input.clear();
        self.title_input.clear();
        info!("settings reset to defaults");
        self.tick(self.now);
    }

    fn persist(&mut self, key: &str, value: &str) {
        if let Err(err) = self.store.set(key, value) {
            warn!(key, error = %err, "failed to persist setting");
        }
    }

    // ========================================================================
    // Background cache warm-up
    // ========================================================================

    /// Install the manifest and purge stale versions on a background task.
    pub fn warm_cache_background(&mut self) {
        if matches!(self.cache_status, CacheStatus::Warming) {
            return;
        }
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        self.cache_rx = Some(rx);
        self.cache_status = CacheStatus::Warming;

        tokio::spawn(async move {
            let event = match warm_cache().await {
                Ok((report, purged)) => CacheEvent::Installed { report, purged },
                Err(err) => CacheEvent::Failed(err.to_string()),
            };
            let _ = tx.send(event).await;
        });
    }

    fn drain_background(&mut self) {
        let Some(rx) = self.cache_rx.as_mut() else {
            return;
        };
        match rx.try_recv() {
            Ok(CacheEvent::Installed { report, purged }) => {
                info!(
                    namespace = %report.namespace,
                    stored = report.stored,
                    failed = report.failed.len(),
                    purged,
                    "offline cache refreshed"
                );
                self.cache_status = CacheStatus::Ready {
                    stored: report.stored,
                    failed: report.failed.len(),
                };
                self.cache_rx = None;
                self.refresh_cache_age();
            }
            Ok(CacheEvent::Failed(message)) => {
                warn!(error = %message, "offline cache refresh failed");
                self.cache_status = CacheStatus::Unavailable;
                self.cache_rx = None;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.cache_status = CacheStatus::Unavailable;
                self.cache_rx = None;
            }
        }
    }

    fn refresh_cache_age(&mut self) {
        self.cache_age = settings::cache_dir()
            .and_then(|dir| AssetCache::new(dir.join("assets")))
            .ok()
            .and_then(|cache| cache.activation().ok().flatten())
            .map(|activation| activation.age_display());
    }
}

fn next_preset<'a>(presets: &'a [&'a str], current: Option<&str>) -> &'a str {
    match current.and_then(|value| presets.iter().position(|preset| *preset == value)) {
        Some(index) => presets[(index + 1) % presets.len()],
        None => presets[0],
    }
}

async fn warm_cache() -> Result<(InstallReport, usize)> {
    let manifest = CacheManifest::load_or_default()?;
    let cache = AssetCache::new(settings::cache_dir()?.join("assets"))?;
    let proxy = CacheProxy::new(cache, manifest)?;
    let report = proxy.install().await;
    let purged = proxy.activate()?;
    Ok((report, purged))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ruhestand_core::countdown::DEFAULT_TARGET;
    use ruhestand_core::i18n::Language;
    use ruhestand_core::settings::MemoryStore;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    fn app_at(now: NaiveDateTime) -> App {
        App::with_store(Box::new(MemoryStore::default()), now)
    }

    #[test]
    fn test_fresh_app_counts_down_to_default_target() {
        let app = app_at(at(2026, 1, 1, 12, 0, 0));
        assert_eq!(app.prefs.target_date, DEFAULT_TARGET);
        assert_eq!(app.prefs.language, Language::De);
        assert!(matches!(app.countdown, Countdown::Remaining { .. }));
    }

    #[test]
    fn test_commit_date_recomputes_immediately() {
        let mut app = app_at(at(2026, 1, 1, 12, 0, 0));
        app.start_date_edit();
        app.date_input = "2020-01-01".to_string();
        app.commit_date();

        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.countdown, Countdown::Done);

        app.start_date_edit();
        app.date_input = "2030-06-15".to_string();
        app.commit_date();
        assert!(matches!(app.countdown, Countdown::Remaining { .. }));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut app = app_at(at(2026, 1, 1, 12, 0, 0));
        app.date_input = "2031-01-01".to_string();
        app.commit_date();
        app.title_input = "Feierabend".to_string();
        app.commit_title();
        app.toggle_language();
        app.cycle_accent_color();

        app.reset();
        assert_eq!(app.prefs.target_date, DEFAULT_TARGET);
        assert_eq!(app.prefs.custom_title, None);
        assert_eq!(app.prefs.language, Language::De);
        assert_eq!(app.prefs.accent_color, None);
    }

    #[test]
    fn test_empty_title_falls_back_to_localized_default() {
        let mut app = app_at(at(2026, 1, 1, 12, 0, 0));
        app.title_input = "  ".to_string();
        app.commit_title();
        assert_eq!(app.display_title(), Language::De.strings().title);

        app.title_input = "Nur noch kurz".to_string();
        app.commit_title();
        assert_eq!(app.display_title(), "Nur noch kurz");
    }

    #[test]
    fn test_hourglass_flips_on_second_boundary_and_reverts() {
        let now = at(2029, 12, 31, 23, 0, 0);
        let mut app = app_at(now);
        app.date_input = "2030-01-01".to_string();
        app.commit_date();

        // Remaining seconds are exactly zero, so the flip is armed.
        assert!(app.hourglass_flipped());

        app.advance_to(now + Duration::milliseconds(500));
        assert!(app.hourglass_flipped());

        app.advance_to(now + Duration::milliseconds(800));
        assert!(!app.hourglass_flipped());
    }

    #[test]
    fn test_color_cycling_starts_at_first_preset_and_wraps() {
        let mut app = app_at(at(2026, 1, 1, 12, 0, 0));
        assert_eq!(app.prefs.accent_color, None);

        app.cycle_accent_color();
        assert_eq!(app.prefs.accent_color.as_deref(), Some(ACCENT_PRESETS[0]));

        for _ in 0..ACCENT_PRESETS.len() {
            app.cycle_accent_color();
        }
        assert_eq!(app.prefs.accent_color.as_deref(), Some(ACCENT_PRESETS[0]));
    }

    #[test]
    fn test_language_toggle_persists_and_switches_strings() {
        let mut app = app_at(at(2026, 1, 1, 12, 0, 0));
        app.toggle_language();
        assert_eq!(app.prefs.language, Language::En);
        assert_eq!(app.strings().unit_labels[0], "Years");
    }

    #[test]
    fn test_input_length_limits() {
        assert!(can_add_date_char("2027-09-0", '2'));
        assert!(!can_add_date_char("2027-09-02 18:30", '0'));
        assert!(!can_add_date_char("2027", 'x'));
        assert!(can_add_title_char("Countdown", '!'));
        assert!(!can_add_title_char(&"x".repeat(MAX_TITLE_LENGTH), 'y'));
    }
}
