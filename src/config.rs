use crate::telemetry::LogLevel;
use serde::Deserialize;

pub const CONFIG_ELEMENT_ID: &str = "interaction-config";

pub const DEFAULT_CHIP_SCROLL_STEP: f64 = 400.0;
pub const DEFAULT_CHIP_RESUME_DELAY_MS: u32 = 3_000;
pub const DEFAULT_PROJECT_EXIT_MS: u32 = 600;
pub const DEFAULT_REVEAL_DELAY_MS: u32 = 100;
pub const DEFAULT_CURSOR_LAG: f64 = 0.15;
pub const DEFAULT_SMOOTH_SCROLL_DURATION: f64 = 1.618;
pub const DEFAULT_CHAT_NOTICE: &str = "Message sent! I will get back to you soon.";
pub const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;

const CHIP_SCROLL_STEP_BOUNDS: (f64, f64) = (1.0, 4_000.0);
const CHIP_RESUME_DELAY_MS_BOUNDS: (u32, u32) = (0, 60_000);
const PROJECT_EXIT_MS_BOUNDS: (u32, u32) = (0, 10_000);
const REVEAL_DELAY_MS_BOUNDS: (u32, u32) = (0, 10_000);
const CURSOR_LAG_BOUNDS: (f64, f64) = (0.01, 1.0);
const SMOOTH_SCROLL_DURATION_BOUNDS: (f64, f64) = (0.1, 10.0);

#[derive(Clone, Debug, PartialEq)]
pub struct InteractionConfig {
    pub chip_scroll_step: f64,
    pub chip_resume_delay_ms: u32,
    pub project_exit_ms: u32,
    pub reveal_delay_ms: u32,
    pub cursor_lag: f64,
    pub smooth_scroll_duration: f64,
    pub chat_notice: String,
    pub log_level: LogLevel,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            chip_scroll_step: DEFAULT_CHIP_SCROLL_STEP,
            chip_resume_delay_ms: DEFAULT_CHIP_RESUME_DELAY_MS,
            project_exit_ms: DEFAULT_PROJECT_EXIT_MS,
            reveal_delay_ms: DEFAULT_REVEAL_DELAY_MS,
            cursor_lag: DEFAULT_CURSOR_LAG,
            smooth_scroll_duration: DEFAULT_SMOOTH_SCROLL_DURATION,
            chat_notice: DEFAULT_CHAT_NOTICE.to_string(),
            log_level: DEFAULT_LOG_LEVEL,
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ConfigOverrides {
    chip_scroll_step: Option<f64>,
    chip_resume_delay_ms: Option<u32>,
    project_exit_ms: Option<u32>,
    reveal_delay_ms: Option<u32>,
    cursor_lag: Option<f64>,
    smooth_scroll_duration: Option<f64>,
    chat_notice: Option<String>,
    log_level: Option<String>,
}

impl InteractionConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }

        let overrides: ConfigOverrides = serde_json::from_str(raw)?;
        Ok(Self::from_overrides(overrides))
    }

    fn from_overrides(overrides: ConfigOverrides) -> Self {
        Self {
            chip_scroll_step: f64_with_bounds(
                overrides.chip_scroll_step,
                DEFAULT_CHIP_SCROLL_STEP,
                CHIP_SCROLL_STEP_BOUNDS,
            ),
            chip_resume_delay_ms: u32_with_bounds(
                overrides.chip_resume_delay_ms,
                DEFAULT_CHIP_RESUME_DELAY_MS,
                CHIP_RESUME_DELAY_MS_BOUNDS,
            ),
            project_exit_ms: u32_with_bounds(
                overrides.project_exit_ms,
                DEFAULT_PROJECT_EXIT_MS,
                PROJECT_EXIT_MS_BOUNDS,
            ),
            reveal_delay_ms: u32_with_bounds(
                overrides.reveal_delay_ms,
                DEFAULT_REVEAL_DELAY_MS,
                REVEAL_DELAY_MS_BOUNDS,
            ),
            cursor_lag: f64_with_bounds(
                overrides.cursor_lag,
                DEFAULT_CURSOR_LAG,
                CURSOR_LAG_BOUNDS,
            ),
            smooth_scroll_duration: f64_with_bounds(
                overrides.smooth_scroll_duration,
                DEFAULT_SMOOTH_SCROLL_DURATION,
                SMOOTH_SCROLL_DURATION_BOUNDS,
            ),
            chat_notice: overrides
                .chat_notice
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| DEFAULT_CHAT_NOTICE.to_string()),
            log_level: overrides
                .log_level
                .as_deref()
                .and_then(LogLevel::parse)
                .unwrap_or(DEFAULT_LOG_LEVEL),
        }
    }
}

fn u32_with_bounds(value: Option<u32>, default: u32, bounds: (u32, u32)) -> u32 {
    value
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn f64_with_bounds(value: Option<f64>, default: f64, bounds: (f64, f64)) -> f64 {
    value
        .filter(|value| value.is_finite() && (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_blob_yields_defaults() {
        let config = InteractionConfig::from_json("  ").expect("blank config is accepted");

        assert_eq!(config, InteractionConfig::default());
        assert_eq!(config.chip_scroll_step, 400.0);
        assert_eq!(config.chip_resume_delay_ms, 3_000);
        assert_eq!(config.project_exit_ms, 600);
        assert_eq!(config.reveal_delay_ms, 100);
    }

    #[test]
    fn overrides_inside_bounds_are_applied() {
        let config = InteractionConfig::from_json(
            r#"{
                "chipScrollStep": 250,
                "projectExitMs": 800,
                "logLevel": "debug",
                "chatNotice": " Thanks! "
            }"#,
        )
        .expect("valid config");

        assert_eq!(config.chip_scroll_step, 250.0);
        assert_eq!(config.project_exit_ms, 800);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.chat_notice, "Thanks!");
        assert_eq!(config.cursor_lag, DEFAULT_CURSOR_LAG);
    }

    #[test]
    fn out_of_range_overrides_keep_defaults() {
        let config = InteractionConfig::from_json(
            r#"{
                "cursorLag": 3.5,
                "chipResumeDelayMs": 999999,
                "smoothScrollDuration": 0,
                "logLevel": "loud"
            }"#,
        )
        .expect("valid config");

        assert_eq!(config.cursor_lag, DEFAULT_CURSOR_LAG);
        assert_eq!(config.chip_resume_delay_ms, DEFAULT_CHIP_RESUME_DELAY_MS);
        assert_eq!(config.smooth_scroll_duration, DEFAULT_SMOOTH_SCROLL_DURATION);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn malformed_blob_is_an_error() {
        assert!(InteractionConfig::from_json("{ chipScrollStep: ").is_err());
    }
}
