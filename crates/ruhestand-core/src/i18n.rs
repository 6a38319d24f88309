//! Localized user-facing strings.
//!
//! Every string the frontend shows is resolved through a language-keyed
//! lookup, so switching the language re-renders immediately without
//! touching the countdown itself. German is the default.

/// Supported display languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    De,
    En,
}

impl Language {
    /// Parse a persisted language code, falling back to German.
    pub fn from_code(code: &str) -> Self {
        match code {
            "en" => Language::En,
            _ => Language::De,
        }
    }

    /// The code persisted in the settings store.
    pub fn code(&self) -> &'static str {
        match self {
            Language::De => "de",
            Language::En => "en",
        }
    }

    /// The other language (the selector cycles between two).
    pub fn toggle(&self) -> Self {
        match self {
            Language::De => Language::En,
            Language::En => Language::De,
        }
    }

    pub fn strings(&self) -> &'static Strings {
        match self {
            Language::De => &DE,
            Language::En => &EN,
        }
    }

    /// Center label of the progress chart.
    pub fn center_label(&self, days: i64) -> String {
        match self {
            Language::De => format!("Noch {days} Tage"),
            Language::En => format!("{days} days left"),
        }
    }
}

/// Full string table for one language.
#[derive(Debug)]
pub struct Strings {
    pub title: &'static str,
    pub subtitle: &'static str,
    /// Years, months, days, hours, minutes, seconds.
    pub unit_labels: [&'static str; 6],
    pub done: &'static str,
    pub title_placeholder: &'static str,
    pub ui_target_date: &'static str,
    pub ui_custom_title: &'static str,
    pub ui_language: &'static str,
    pub ui_colors: &'static str,
    pub ui_reset: &'static str,
    pub ui_quit: &'static str,
    /// Elapsed, remaining.
    pub chart_legend: [&'static str; 2],
}

static DE: Strings = Strings {
    title: "Countdown bis zur Pensionierung",
    subtitle: "Visualisiere deine verbleibende Zeit bis zur Pensionierung.",
    unit_labels: ["Jahre", "Monate", "Tage", "Stunden", "Minuten", "Sekunden"],
    done: "🎉 Es ist soweit! Glückliche Pensionierung! 🎉",
    title_placeholder: "Titel eingeben",
    ui_target_date: "Zieldatum",
    ui_custom_title: "Eigener Titel",
    ui_language: "Sprache",
    ui_colors: "Farben",
    ui_reset: "Reset",
    ui_quit: "Beenden",
    chart_legend: ["Verstrichen", "Übrig"],
};

static EN: Strings = Strings {
    title: "Countdown to Retirement",
    subtitle: "Visualize your remaining time until retirement.",
    unit_labels: ["Years", "Months", "Days", "Hours", "Minutes", "Seconds"],
    done: "🎉 It's time! Happy Retirement! 🎉",
    title_placeholder: "Enter title",
    ui_target_date: "Target date",
    ui_custom_title: "Custom title",
    ui_language: "Language",
    ui_colors: "Colors",
    ui_reset: "Reset",
    ui_quit: "Quit",
    chart_legend: ["Elapsed", "Remaining"],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_falls_back_to_german() {
        assert_eq!(Language::from_code("en"), Language::En);
        assert_eq!(Language::from_code("de"), Language::De);
        assert_eq!(Language::from_code("fr"), Language::De);
        assert_eq!(Language::from_code(""), Language::De);
    }

    #[test]
    fn test_toggle_cycles_both_ways() {
        assert_eq!(Language::De.toggle(), Language::En);
        assert_eq!(Language::En.toggle().toggle(), Language::En);
    }

    #[test]
    fn test_center_label_is_localized() {
        assert_eq!(Language::De.center_label(42), "Noch 42 Tage");
        assert_eq!(Language::En.center_label(42), "42 days left");
    }
}
