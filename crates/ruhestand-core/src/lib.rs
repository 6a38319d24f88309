//! Core library for ruhestand.
//!
//! Everything the terminal frontend needs short of drawing:
//!
//! - `countdown`: calendar-correct remaining-time arithmetic
//! - `i18n`: localized user-facing strings
//! - `settings`: flat key-value preference persistence
//! - `cache`: versioned offline asset cache with a pure fetch policy
//! - `error`: typed errors for the cache proxy

pub mod cache;
pub mod countdown;
pub mod error;
pub mod i18n;
pub mod settings;

pub use countdown::{
    compute_remaining, countdown_from_input, parse_target, Clock, Countdown, RemainingDuration,
    SystemClock,
};
pub use error::ProxyError;
pub use i18n::Language;
pub use settings::{JsonFileStore, MemoryStore, Preferences, SettingsStore};
