//! UCI options: declarations advertised on `uci` and their current values

use crate::error::{ChessError, Result};
use crate::search::SearchParams;

pub const MAX_DEPTH_LIMIT: u8 = 32;

/// UCI option types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionType {
    Check { default: bool },
    Spin { default: i64, min: i64, max: i64 },
}

/// Individual UCI option definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UciOption {
    pub name: &'static str,
    pub opt_type: OptionType,
}

impl UciOption {
    /// The `option name ...` line sent in reply to `uci`
    pub fn declaration(&self) -> String {
        match &self.opt_type {
            OptionType::Check { default } => {
                format!("option name {} type check default {}", self.name, default)
            }
            OptionType::Spin { default, min, max } => format!(
                "option name {} type spin default {} min {} max {}",
                self.name, default, min, max
            ),
        }
    }
}

/// Current option values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UciOptions {
    /// Deepest iteration a timed search may reach
    pub max_depth: u8,

    /// Budget in ms for a `go` without clock fields
    pub move_time: u64,

    pub mate_scoring: bool,
}

impl Default for UciOptions {
    fn default() -> Self {
        let params = SearchParams::default();
        Self {
            max_depth: params.max_depth,
            move_time: params.time_limit_ms,
            mate_scoring: params.mate_scoring,
        }
    }
}

impl UciOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every option this engine understands, with defaults and bounds
    pub fn definitions() -> Vec<UciOption> {
        let defaults = Self::default();
        vec![
            UciOption {
                name: "MaxDepth",
                opt_type: OptionType::Spin {
                    default: defaults.max_depth as i64,
                    min: 1,
                    max: MAX_DEPTH_LIMIT as i64,
                },
            },
            UciOption {
                name: "MoveTime",
                opt_type: OptionType::Spin {
                    default: defaults.move_time as i64,
                    min: 1,
                    max: 3_600_000,
                },
            },
            UciOption {
                name: "MateScoring",
                opt_type: OptionType::Check {
                    default: defaults.mate_scoring,
                },
            },
        ]
    }

    /// Set option value. Names are matched case-insensitively, as UCI asks.
    pub fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        let invalid = |reason: &str| ChessError::InvalidOption {
            name: name.to_string(),
            reason: reason.to_string(),
        };
        let definition = Self::definitions()
            .into_iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| invalid("unknown option"))?;
        let raw = value.map(str::trim).ok_or_else(|| invalid("missing value"))?;

        match definition.opt_type {
            OptionType::Spin { min, max, .. } => {
                let v: i64 = raw.parse().map_err(|_| invalid("expected an integer"))?;
                if !(min..=max).contains(&v) {
                    return Err(invalid(&format!("{v} is outside {min}..={max}")));
                }
                match definition.name {
                    "MaxDepth" => self.max_depth = v as u8,
                    _ => self.move_time = v as u64,
                }
            }
            OptionType::Check { .. } => {
                self.mate_scoring = match raw {
                    "true" => true,
                    "false" => false,
                    _ => return Err(invalid("expected true or false")),
                };
            }
        }
        Ok(())
    }

    /// Search parameters reflecting the current option values
    pub fn search_params(&self) -> SearchParams {
        SearchParams::new()
            .max_depth(self.max_depth)
            .time_limit(self.move_time)
            .mate_scoring(self.mate_scoring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_defaults() {
        let options = UciOptions::new();
        assert_eq!(options.max_depth, 10);
        assert_eq!(options.move_time, 5000);
        assert!(options.mate_scoring);
    }

    #[test]
    fn test_set_option_validates() {
        let mut options = UciOptions::new();
        options.set_option("maxdepth", Some("6")).unwrap();
        assert_eq!(options.max_depth, 6);
        options.set_option("MateScoring", Some("false")).unwrap();
        assert!(!options.search_params().mate_scoring);

        assert!(options.set_option("MaxDepth", Some("0")).is_err());
        assert!(options.set_option("MoveTime", Some("soon")).is_err());
        assert!(options.set_option("Hash", Some("16")).is_err());
        assert!(options.set_option("MoveTime", None).is_err());
    }

    #[test]
    fn test_declarations() {
        let lines: Vec<String> = UciOptions::definitions().iter().map(|o| o.declaration()).collect();
        assert!(lines.contains(&"option name MaxDepth type spin default 10 min 1 max 32".to_string()));
        assert!(lines.contains(&"option name MateScoring type check default true".to_string()));
    }
}
