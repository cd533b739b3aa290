use log::LevelFilter;
use sleeper_api::client::SLEEPER_V1;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::time::Duration;

pub const DIV1_LEAGUE_ID: &str = "FSLCUP_DIV1_LEAGUE_ID";
pub const DIV2_LEAGUE_ID: &str = "FSLCUP_DIV2_LEAGUE_ID";
pub const DIV1_PREVIOUS_LEAGUE_ID: &str = "FSLCUP_DIV1_PREVIOUS_LEAGUE_ID";
pub const DIV2_PREVIOUS_LEAGUE_ID: &str = "FSLCUP_DIV2_PREVIOUS_LEAGUE_ID";
pub const WEEK_START: &str = "FSLCUP_WEEK_START";
pub const WEEK_END: &str = "FSLCUP_WEEK_END";
pub const REFRESH_SECS: &str = "FSLCUP_REFRESH_SECS";
pub const LOG_LEVEL: &str = "FSLCUP_LOG";
pub const SLEEPER_URL: &str = "FSLCUP_SLEEPER_URL";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingVar(Vec<&'static str>),
    #[error("Invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub div1_league_id: String,
    pub div2_league_id: String,
    /// Overrides for the previous-season leagues the cup is seeded from.
    pub div1_previous_league_id: Option<String>,
    pub div2_previous_league_id: Option<String>,
    pub week_start: u8,
    pub week_end: u8,
    pub refresh_interval: Duration,
    pub log_level: LevelFilter,
    pub sleeper_url: String,
    pub full_screen: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            div1_league_id: String::new(),
            div2_league_id: String::new(),
            div1_previous_league_id: None,
            div2_previous_league_id: None,
            week_start: 3,
            week_end: 12,
            refresh_interval: Duration::from_secs(60),
            log_level: LevelFilter::Error,
            sleeper_url: SLEEPER_V1.to_string(),
            full_screen: false,
        }
    }
}

impl AppSettings {
    /// Read settings from the process environment.
    pub fn load() -> Result<Self, SettingsError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`. Every missing required variable is
    /// reported at once.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let div1 = get(DIV1_LEAGUE_ID);
        let div2 = get(DIV2_LEAGUE_ID);
        let missing: Vec<&'static str> = [(DIV1_LEAGUE_ID, &div1), (DIV2_LEAGUE_ID, &div2)]
            .into_iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| name)
            .collect();
        let (Some(div1_league_id), Some(div2_league_id)) = (div1, div2) else {
            return Err(SettingsError::MissingVar(missing));
        };

        let week_start = parse_or(WEEK_START, get(WEEK_START), defaults.week_start)?;
        let week_end = parse_or(WEEK_END, get(WEEK_END), defaults.week_end)?;
        if week_start == 0 || week_start > week_end {
            return Err(SettingsError::Invalid {
                name: WEEK_START,
                value: week_start.to_string(),
                reason: format!("cup window {week_start}..={week_end} is empty"),
            });
        }

        let refresh_secs: u64 = parse_or(REFRESH_SECS, get(REFRESH_SECS), defaults.refresh_interval.as_secs())?;
        if refresh_secs == 0 {
            return Err(SettingsError::Invalid {
                name: REFRESH_SECS,
                value: "0".into(),
                reason: "must be at least 1 second".into(),
            });
        }

        Ok(Self {
            div1_league_id,
            div2_league_id,
            div1_previous_league_id: get(DIV1_PREVIOUS_LEAGUE_ID),
            div2_previous_league_id: get(DIV2_PREVIOUS_LEAGUE_ID),
            week_start,
            week_end,
            refresh_interval: Duration::from_secs(refresh_secs),
            log_level: parse_or(LOG_LEVEL, get(LOG_LEVEL), defaults.log_level)?,
            sleeper_url: get(SLEEPER_URL).unwrap_or(defaults.sleeper_url),
            full_screen: false,
        })
    }

    /// Weeks during which the cup is being played.
    pub fn cup_weeks(&self) -> RangeInclusive<u8> {
        self.week_start..=self.week_end
    }
}

fn parse_or<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, SettingsError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.parse().map_err(|e: T::Err| SettingsError::Invalid {
            name,
            reason: e.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<AppSettings, SettingsError> {
        let env: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppSettings::from_lookup(|name| env.get(name).cloned())
    }

    const REQUIRED: [(&str, &str); 2] = [(DIV1_LEAGUE_ID, "111"), (DIV2_LEAGUE_ID, "222")];

    #[test]
    fn defaults_apply_when_only_league_ids_are_set() {
        let s = settings(&REQUIRED).unwrap();
        assert_eq!(s.div1_league_id, "111");
        assert_eq!(s.div2_league_id, "222");
        assert_eq!(s.cup_weeks(), 3..=12);
        assert_eq!(s.refresh_interval, Duration::from_secs(60));
        assert_eq!(s.log_level, LevelFilter::Error);
        assert_eq!(s.sleeper_url, SLEEPER_V1);
        assert!(s.div1_previous_league_id.is_none());
    }

    #[test]
    fn all_missing_variables_are_reported() {
        let err = settings(&[]).unwrap_err();
        assert_eq!(err, SettingsError::MissingVar(vec![DIV1_LEAGUE_ID, DIV2_LEAGUE_ID]));
        assert!(err.to_string().contains("FSLCUP_DIV2_LEAGUE_ID"));

        let err = settings(&[(DIV2_LEAGUE_ID, "222"), (DIV1_LEAGUE_ID, "  ")]).unwrap_err();
        assert_eq!(err, SettingsError::MissingVar(vec![DIV1_LEAGUE_ID]));
    }

    #[test]
    fn overrides_are_read() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            (DIV1_PREVIOUS_LEAGUE_ID, "old1"),
            (WEEK_START, "5"),
            (WEEK_END, "10"),
            (REFRESH_SECS, "15"),
            (LOG_LEVEL, "debug"),
            (SLEEPER_URL, "http://localhost:9999"),
        ]);
        let s = settings(&vars).unwrap();
        assert_eq!(s.div1_previous_league_id.as_deref(), Some("old1"));
        assert!(s.div2_previous_league_id.is_none());
        assert_eq!(s.cup_weeks(), 5..=10);
        assert_eq!(s.refresh_interval, Duration::from_secs(15));
        assert_eq!(s.log_level, LevelFilter::Debug);
        assert_eq!(s.sleeper_url, "http://localhost:9999");
    }

    #[test]
    fn unparsable_values_are_invalid() {
        let mut vars = REQUIRED.to_vec();
        vars.push((WEEK_START, "three"));
        let err = settings(&vars).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { name: WEEK_START, .. }));

        let mut vars = REQUIRED.to_vec();
        vars.push((LOG_LEVEL, "loud"));
        assert!(matches!(
            settings(&vars).unwrap_err(),
            SettingsError::Invalid { name: LOG_LEVEL, .. }
        ));
    }

    #[test]
    fn empty_window_and_zero_refresh_are_invalid() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([(WEEK_START, "9"), (WEEK_END, "4")]);
        assert!(matches!(settings(&vars).unwrap_err(), SettingsError::Invalid { .. }));

        let mut vars = REQUIRED.to_vec();
        vars.push((REFRESH_SECS, "0"));
        assert!(matches!(
            settings(&vars).unwrap_err(),
            SettingsError::Invalid { name: REFRESH_SECS, .. }
        ));
    }
}
