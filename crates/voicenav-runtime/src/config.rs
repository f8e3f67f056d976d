#![forbid(unsafe_code)]

//! Dispatcher configuration.
//!
//! Configuration is supplied once, at dispatcher construction. Hosts either
//! build a [`DispatcherConfig`] in code or load one from the environment:
//!
//! - `VOICENAV_REPEAT_DELAY_MS` (u64, > 0): hold time before the first repeat
//! - `VOICENAV_REPEAT_INTERVAL_MS` (u64, > 0): time between repeats
//! - `VOICENAV_MAX_REPEATS_PER_TICK` (u32, > 0)
//! - `VOICENAV_WRAP` (bool): wrap at list ends instead of clamping
//! - `VOICENAV_BINDINGS` (`Ctrl+Up=first;F2=read`): merged over the defaults
//!
//! Invalid values are reported as [`DispatcherConfigError`]s and the default
//! is kept for that field.

use std::env;
use std::fmt;
use std::time::Duration;

use voicenav_core::keymap::{KeyMap, parse_binding_list};

pub const ENV_REPEAT_DELAY_MS: &str = "VOICENAV_REPEAT_DELAY_MS";
pub const ENV_REPEAT_INTERVAL_MS: &str = "VOICENAV_REPEAT_INTERVAL_MS";
pub const ENV_MAX_REPEATS_PER_TICK: &str = "VOICENAV_MAX_REPEATS_PER_TICK";
pub const ENV_WRAP: &str = "VOICENAV_WRAP";
pub const ENV_BINDINGS: &str = "VOICENAV_BINDINGS";

/// Key map and repeat timing for an [`InputDispatcher`](crate::InputDispatcher).
#[derive(Debug, Clone, PartialEq)]
pub struct DispatcherConfig {
    pub keymap: KeyMap,
    /// Hold time before a held key first repeats.
    pub repeat_delay: Duration,
    /// Time between subsequent repeats.
    pub repeat_interval: Duration,
    /// Cap on repeats fired for one key in a single tick, so a long frame
    /// does not dump a burst of moves.
    pub max_repeats_per_tick: u32,
    /// Wrap Up/Down at the ends of every menu.
    pub wrap_navigation: bool,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            keymap: KeyMap::default(),
            repeat_delay: Duration::from_millis(400),
            repeat_interval: Duration::from_millis(80),
            max_repeats_per_tick: 4,
            wrap_navigation: false,
        }
    }
}

/// Configuration parse diagnostics (env + validation).
#[derive(Debug, Clone)]
pub struct DispatcherConfigParse {
    pub config: DispatcherConfig,
    pub errors: Vec<DispatcherConfigError>,
}

/// Configuration error with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl DispatcherConfigError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for DispatcherConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for DispatcherConfigError {}

impl DispatcherConfig {
    #[must_use]
    pub fn with_keymap(mut self, keymap: KeyMap) -> Self {
        self.keymap = keymap;
        self
    }

    #[must_use]
    pub fn with_repeat_delay(mut self, delay: Duration) -> Self {
        self.repeat_delay = delay;
        self
    }

    #[must_use]
    pub fn with_repeat_interval(mut self, interval: Duration) -> Self {
        self.repeat_interval = interval;
        self
    }

    #[must_use]
    pub fn with_max_repeats_per_tick(mut self, max: u32) -> Self {
        self.max_repeats_per_tick = max;
        self
    }

    #[must_use]
    pub fn with_wrap_navigation(mut self, wrap: bool) -> Self {
        self.wrap_navigation = wrap;
        self
    }

    /// Parse config from environment variables.
    #[must_use]
    pub fn from_env() -> DispatcherConfig {
        Self::from_env_with_diagnostics().config
    }

    /// Parse config from environment variables and return diagnostics.
    #[must_use]
    pub fn from_env_with_diagnostics() -> DispatcherConfigParse {
        from_env_with(|key| env::var(key).ok())
    }

    /// Validate config constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<DispatcherConfigError>> {
        let mut errors = Vec::new();
        if self.repeat_delay.is_zero() {
            errors.push(DispatcherConfigError::new(
                "repeat_delay",
                "0",
                "must be greater than zero",
            ));
        }
        if self.repeat_interval.is_zero() {
            errors.push(DispatcherConfigError::new(
                "repeat_interval",
                "0",
                "must be greater than zero",
            ));
        }
        if self.max_repeats_per_tick == 0 {
            errors.push(DispatcherConfigError::new(
                "max_repeats_per_tick",
                "0",
                "must be at least 1",
            ));
        }
        if self.keymap.is_empty() {
            errors.push(DispatcherConfigError::new(
                "keymap",
                "{}",
                "no keys are bound",
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn from_env_with<F>(mut get: F) -> DispatcherConfigParse
where
    F: FnMut(&str) -> Option<String>,
{
    let mut config = DispatcherConfig::default();
    let mut errors = Vec::new();

    if let Some(value) = get(ENV_REPEAT_DELAY_MS) {
        match parse_positive_u64(&value) {
            Some(ms) => config.repeat_delay = Duration::from_millis(ms),
            None => errors.push(DispatcherConfigError::new(
                "repeat_delay",
                value,
                "expected positive integer milliseconds",
            )),
        }
    }

    if let Some(value) = get(ENV_REPEAT_INTERVAL_MS) {
        match parse_positive_u64(&value) {
            Some(ms) => config.repeat_interval = Duration::from_millis(ms),
            None => errors.push(DispatcherConfigError::new(
                "repeat_interval",
                value,
                "expected positive integer milliseconds",
            )),
        }
    }

    if let Some(value) = get(ENV_MAX_REPEATS_PER_TICK) {
        match value.trim().parse::<u32>().ok().filter(|n| *n > 0) {
            Some(n) => config.max_repeats_per_tick = n,
            None => errors.push(DispatcherConfigError::new(
                "max_repeats_per_tick",
                value,
                "expected positive integer",
            )),
        }
    }

    if let Some(value) = get(ENV_WRAP) {
        match parse_bool(&value) {
            Some(wrap) => config.wrap_navigation = wrap,
            None => errors.push(DispatcherConfigError::new(
                "wrap_navigation",
                value,
                "expected bool (1/0/true/false)",
            )),
        }
    }

    if let Some(value) = get(ENV_BINDINGS) {
        match parse_binding_list(&value) {
            Ok(bindings) => {
                for (binding, action) in bindings {
                    config.keymap.bind(binding, action);
                }
            }
            Err(err) => errors.push(DispatcherConfigError::new(
                "keymap",
                value,
                err.to_string(),
            )),
        }
    }

    if let Err(mut invalid) = config.validate() {
        errors.append(&mut invalid);
    }

    DispatcherConfigParse { config, errors }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_positive_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok().filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use voicenav_core::{KeyCode, KeyEvent, Modifiers, NavAction};

    fn parse(vars: &[(&str, &str)]) -> DispatcherConfigParse {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        from_env_with(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_are_valid() {
        let config = DispatcherConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.repeat_delay, Duration::from_millis(400));
        assert_eq!(config.repeat_interval, Duration::from_millis(80));
        assert!(!config.wrap_navigation);
    }

    #[test]
    fn empty_env_yields_defaults() {
        let parsed = parse(&[]);
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.config, DispatcherConfig::default());
    }

    #[test]
    fn env_overrides_timing_and_wrap() {
        let parsed = parse(&[
            (ENV_REPEAT_DELAY_MS, "250"),
            (ENV_REPEAT_INTERVAL_MS, " 50 "),
            (ENV_MAX_REPEATS_PER_TICK, "2"),
            (ENV_WRAP, "yes"),
        ]);
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        assert_eq!(parsed.config.repeat_delay, Duration::from_millis(250));
        assert_eq!(parsed.config.repeat_interval, Duration::from_millis(50));
        assert_eq!(parsed.config.max_repeats_per_tick, 2);
        assert!(parsed.config.wrap_navigation);
    }

    #[test]
    fn env_bindings_merge_over_defaults() {
        let parsed = parse(&[(ENV_BINDINGS, "Ctrl+Up=first;F2=read")]);
        assert!(parsed.errors.is_empty());
        let keymap = &parsed.config.keymap;
        let ctrl_up = KeyEvent::new(KeyCode::Up).with_modifiers(Modifiers::CTRL);
        assert_eq!(keymap.resolve(&ctrl_up), Some(NavAction::First));
        assert_eq!(
            keymap.resolve(&KeyEvent::new(KeyCode::F(2))),
            Some(NavAction::ReadCurrent)
        );
        assert_eq!(keymap.resolve(&KeyEvent::new(KeyCode::Up)), Some(NavAction::Up));
    }

    #[test]
    fn invalid_values_keep_defaults_and_report() {
        let parsed = parse(&[
            (ENV_REPEAT_DELAY_MS, "soon"),
            (ENV_REPEAT_INTERVAL_MS, "0"),
            (ENV_WRAP, "maybe"),
            (ENV_BINDINGS, "Ctrl+Up=teleport"),
        ]);
        let fields: Vec<&str> = parsed.errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["repeat_delay", "repeat_interval", "wrap_navigation", "keymap"]
        );
        assert_eq!(parsed.config, DispatcherConfig::default());
    }

    #[test]
    fn validate_collects_every_violation() {
        let config = DispatcherConfig::default()
            .with_repeat_delay(Duration::ZERO)
            .with_repeat_interval(Duration::ZERO)
            .with_max_repeats_per_tick(0)
            .with_keymap(KeyMap::empty());
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(
            errors[0].to_string(),
            "repeat_delay=0 (must be greater than zero)"
        );
    }
}
