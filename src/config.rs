//! Engine configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};
use crate::models::SpecialtyRule;

/// On-call engine parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallConfig {
    /// Minimum days between two calls for the same faculty.
    pub minimum_gap_days: i64,
    pub weekend_weight: f64,
    pub holiday_weight: f64,
    /// Advisory ceiling on calls assigned per run. Reported, never enforced.
    #[serde(alias = "max_calls_per_month")]
    pub max_calls_per_period: u32,
    /// Equity credit per absence day. Zero disables the adjustment.
    pub absence_equity_credit: f64,
}

impl Default for CallConfig {
    fn default() -> Self {
        Self {
            minimum_gap_days: 3,
            weekend_weight: 1.5,
            holiday_weight: 2.0,
            max_calls_per_period: 8,
            absence_equity_credit: 0.0,
        }
    }
}

impl CallConfig {
    pub fn with_minimum_gap_days(mut self, days: i64) -> Self {
        self.minimum_gap_days = days;
        self
    }

    pub fn with_weights(mut self, weekend: f64, holiday: f64) -> Self {
        self.weekend_weight = weekend;
        self.holiday_weight = holiday;
        self
    }

    pub fn with_absence_equity_credit(mut self, credit: f64) -> Self {
        self.absence_equity_credit = credit;
        self
    }

    /// Requires `holiday > weekend > 1.0`, finite values and a
    /// non-negative gap.
    pub fn validate(&self) -> ScheduleResult<()> {
        let values = [
            self.weekend_weight,
            self.holiday_weight,
            self.absence_equity_credit,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ScheduleError::InvalidConfig(
                "call weights must be finite".into(),
            ));
        }
        if self.minimum_gap_days < 0 {
            return Err(ScheduleError::InvalidConfig(format!(
                "minimum_gap_days must be non-negative, got {}",
                self.minimum_gap_days
            )));
        }
        if !(self.holiday_weight > self.weekend_weight && self.weekend_weight > 1.0) {
            return Err(ScheduleError::InvalidConfig(format!(
                "expected holiday_weight > weekend_weight > 1.0, got {} and {}",
                self.holiday_weight, self.weekend_weight
            )));
        }
        Ok(())
    }
}

/// Run-wide configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Refuse to run without a leave channel.
    pub absence_aware: bool,
    /// Ignore leave whose approval flags are explicitly false.
    pub honor_approval_flags: bool,
    pub call: CallConfig,
    /// Ordered specialty table; the first matching entry wins.
    pub specialties: Vec<SpecialtyRule>,
    /// Holidays in addition to the fixed yearly set.
    pub extra_holidays: Vec<NaiveDate>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            absence_aware: true,
            honor_approval_flags: false,
            call: CallConfig::default(),
            specialties: SpecialtyRule::default_table(),
            extra_holidays: Vec::new(),
        }
    }
}

impl EngineConfig {
    pub fn with_absence_aware(mut self, aware: bool) -> Self {
        self.absence_aware = aware;
        self
    }

    pub fn with_call(mut self, call: CallConfig) -> Self {
        self.call = call;
        self
    }

    pub fn with_specialties(mut self, specialties: Vec<SpecialtyRule>) -> Self {
        self.specialties = specialties;
        self
    }

    /// Appends one specialty entry after the existing ones.
    pub fn with_specialty(mut self, rule: SpecialtyRule) -> Self {
        self.specialties.push(rule);
        self
    }

    pub fn validate(&self) -> ScheduleResult<()> {
        self.call.validate()?;
        if let Some(rule) = self.specialties.iter().find(|r| r.name.trim().is_empty()) {
            return Err(ScheduleError::InvalidConfig(format!(
                "specialty entry with empty name: {rule:?}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = EngineConfig::default();
        assert!(c.absence_aware);
        assert_eq!(c.call.minimum_gap_days, 3);
        assert!((c.call.weekend_weight - 1.5).abs() < 1e-10);
        assert!((c.call.holiday_weight - 2.0).abs() < 1e-10);
        assert_eq!(c.call.max_calls_per_period, 8);
        assert_eq!(c.specialties.len(), 2);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_empty_json_is_default() {
        let c: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(c, EngineConfig::default());
    }

    #[test]
    fn test_max_calls_alias() {
        let c: CallConfig = serde_json::from_str(r#"{"max_calls_per_month": 5}"#).unwrap();
        assert_eq!(c.max_calls_per_period, 5);
        assert_eq!(c.minimum_gap_days, 3);
    }

    #[test]
    fn test_weight_ordering_enforced() {
        let bad = CallConfig::default().with_weights(2.0, 1.5);
        assert!(matches!(bad.validate(), Err(ScheduleError::InvalidConfig(_))));
        let bad = CallConfig::default().with_weights(1.0, 2.0);
        assert!(bad.validate().is_err());
        let bad = CallConfig::default().with_weights(f64::NAN, 2.0);
        assert!(bad.validate().is_err());
        let bad = CallConfig::default().with_minimum_gap_days(-1);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_empty_specialty_name_rejected() {
        let c = EngineConfig::default().with_specialty(SpecialtyRule::faculty(" ", vec![]));
        assert!(c.validate().is_err());
    }
}
