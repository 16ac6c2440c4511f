use std::io;
use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::dates::CalendarDate;
use crate::error::PlannerError;
use crate::mistakes::Subject;

const DEFAULT_EXAM_DATE: (i32, u32, u32) = (2026, 7, 19);
const DEFAULT_DAILY_HOURS: f64 = 6.0;
const DEFAULT_LANGUAGE_RATIO: u8 = 50;
const DEFAULT_TIMER_HOURS: f64 = 6.0;
const DEFAULT_THEME: &str = "red";

/// User-owned planner settings. The engine only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub exam_date: CalendarDate,
    pub daily_study_hours: f64,
    /// Percentage of problem-solving time given to language (the rest goes to logic).
    pub language_ratio: u8,
    pub timer_hours: f64,
    pub theme: String,
}

fn default_exam_date() -> CalendarDate {
    let (y, m, d) = DEFAULT_EXAM_DATE;
    CalendarDate::from_ymd(y, m, d).unwrap_or_else(CalendarDate::today)
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            exam_date: default_exam_date(),
            daily_study_hours: DEFAULT_DAILY_HOURS,
            language_ratio: DEFAULT_LANGUAGE_RATIO,
            timer_hours: DEFAULT_TIMER_HOURS,
            theme: DEFAULT_THEME.to_string(),
        }
    }
}

fn positive_hours(value: Option<&toml::Value>) -> Option<f64> {
    let hours = match value? {
        toml::Value::Float(f) => *f,
        toml::Value::Integer(i) => *i as f64,
        toml::Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (hours.is_finite() && hours > 0.0).then_some(hours)
}

fn ratio(value: Option<&toml::Value>) -> Option<u8> {
    let raw = match value? {
        toml::Value::Integer(i) => *i,
        toml::Value::Float(f) if f.is_finite() => f.round() as i64,
        toml::Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    (0..=100).contains(&raw).then_some(raw as u8)
}

impl Settings {
    /// Parse settings field by field. Anything missing or malformed falls back
    /// to its default; this never fails.
    pub fn from_toml_str(text: &str) -> Settings {
        let defaults = Settings::default();
        let table = match text.parse::<toml::Table>() {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to parse settings, using defaults");
                return defaults;
            }
        };

        let exam_date = table.get("exam_date")
            .and_then(|v| v.as_str())
            .and_then(|s| CalendarDate::parse(s).ok());
        let daily_study_hours = positive_hours(table.get("daily_study_hours"));
        let language_ratio = ratio(table.get("language_ratio"));
        let timer_hours = positive_hours(table.get("timer_hours"));
        let theme = table.get("theme")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string);

        for (field, present, parsed) in [
            ("exam_date", table.contains_key("exam_date"), exam_date.is_some()),
            ("daily_study_hours", table.contains_key("daily_study_hours"), daily_study_hours.is_some()),
            ("language_ratio", table.contains_key("language_ratio"), language_ratio.is_some()),
            ("timer_hours", table.contains_key("timer_hours"), timer_hours.is_some()),
        ] {
            if present && !parsed {
                tracing::warn!(field = field, "Malformed settings field, using default");
            }
        }

        Settings {
            exam_date: exam_date.unwrap_or(defaults.exam_date),
            daily_study_hours: daily_study_hours.unwrap_or(defaults.daily_study_hours),
            language_ratio: language_ratio.unwrap_or(defaults.language_ratio),
            timer_hours: timer_hours.unwrap_or(defaults.timer_hours),
            theme: theme.unwrap_or(defaults.theme),
        }
    }

    pub fn to_toml_string(&self) -> Result<String, PlannerError> {
        toml::to_string_pretty(self)
            .map_err(|e| PlannerError::new(
                format!("Failed to serialize settings: {}", e),
                "toml_serialize"
            ))
    }

    /// Replace degenerate values (possible when built in code) with defaults.
    pub fn sanitized(&self) -> Settings {
        let defaults = Settings::default();
        let mut s = self.clone();
        if !(s.daily_study_hours.is_finite() && s.daily_study_hours > 0.0) {
            s.daily_study_hours = defaults.daily_study_hours;
        }
        if s.language_ratio > 100 {
            s.language_ratio = defaults.language_ratio;
        }
        if !(s.timer_hours.is_finite() && s.timer_hours > 0.0) {
            s.timer_hours = defaults.timer_hours;
        }
        s
    }

    /// Subject that gets the larger share of problem-solving time (language on a tie).
    pub fn favored_subject(&self) -> Subject {
        if self.language_ratio >= 50 {
            Subject::Language
        } else {
            Subject::Logic
        }
    }

    pub fn other_subject(&self) -> Subject {
        match self.favored_subject() {
            Subject::Language => Subject::Logic,
            _ => Subject::Language,
        }
    }

    /// `round(daily_study_hours * 60 * fraction)` minutes.
    pub fn minutes_for(&self, fraction: f64) -> u32 {
        (self.daily_study_hours * 60.0 * fraction).round().max(0.0) as u32
    }

    /// Initial duration for the external countdown timer.
    pub fn timer_duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(self.sanitized().timer_hours * 3600.0)
    }
}

/// Load settings from a TOML file. A missing file yields defaults and
/// malformed fields fall back individually; any other read failure is returned.
pub async fn load_settings(path: &Path) -> io::Result<Settings> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => {
            tracing::debug!(path = ?path, "Loaded settings file");
            Ok(Settings::from_toml_str(&content))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = ?path, "No settings file, using defaults");
            Ok(Settings::default())
        }
        Err(e) => {
            tracing::error!(path = ?path, error = %e, "Failed to read settings file");
            Err(e)
        }
    }
}

/// Save settings as TOML, creating parent directories as needed.
/// The file is replaced through a sibling temp file so a partial write never lands.
pub async fn save_settings(path: &Path, settings: &Settings) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let text = settings
        .to_toml_string()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
    let tmp = path.with_extension("toml.tmp");
    tokio::fs::write(&tmp, text).await?;
    tokio::fs::rename(&tmp, path).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.exam_date.to_string(), "2026-07-19");
        assert_eq!(s.daily_study_hours, 6.0);
        assert_eq!(s.language_ratio, 50);
        assert_eq!(s.theme, "red");
    }

    #[test]
    fn test_parse_full_document() {
        let s = Settings::from_toml_str(r#"
            exam_date = "2025-07-20"
            daily_study_hours = 8
            language_ratio = 30
            timer_hours = 2.5
            theme = "blue"
        "#);
        assert_eq!(s.exam_date.to_string(), "2025-07-20");
        assert_eq!(s.daily_study_hours, 8.0);
        assert_eq!(s.language_ratio, 30);
        assert_eq!(s.timer_hours, 2.5);
        assert_eq!(s.theme, "blue");
        assert_eq!(s.favored_subject(), Subject::Logic);
        assert_eq!(s.other_subject(), Subject::Language);
    }

    #[test]
    fn test_malformed_fields_fall_back_individually() {
        let s = Settings::from_toml_str(r#"
            exam_date = "someday"
            daily_study_hours = "lots"
            language_ratio = 140
            timer_hours = -1
            theme = "green"
        "#);
        let d = Settings::default();
        assert_eq!(s.exam_date, d.exam_date);
        assert_eq!(s.daily_study_hours, d.daily_study_hours);
        assert_eq!(s.language_ratio, d.language_ratio);
        assert_eq!(s.timer_hours, d.timer_hours);
        assert_eq!(s.theme, "green");
    }

    #[test]
    fn test_unparseable_document_gives_defaults() {
        assert_eq!(Settings::from_toml_str("=== not toml"), Settings::default());
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let s = Settings::from_toml_str("daily_study_hours = \"4\"\nlanguage_ratio = \"70\"");
        assert_eq!(s.daily_study_hours, 4.0);
        assert_eq!(s.language_ratio, 70);
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut s = Settings::default();
        s.language_ratio = 65;
        let text = s.to_toml_string().unwrap();
        assert_eq!(Settings::from_toml_str(&text), s);
    }

    #[test]
    fn test_minutes_and_sanitize() {
        let mut s = Settings::default();
        assert_eq!(s.minutes_for(0.4), 144);
        assert_eq!(s.minutes_for(0.35), 126);
        assert_eq!(s.minutes_for(0.25), 90);
        s.daily_study_hours = f64::NAN;
        assert_eq!(s.sanitized().daily_study_hours, 6.0);
        assert_eq!(s.timer_duration(), std::time::Duration::from_secs(6 * 3600));
    }
}
