//! Expiration specifications.

use chrono::{DateTime, Duration, FixedOffset, Months, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::CacheError;

/// How long a cached value should live.
///
/// Precedence when resolving: `date` wins outright, then `at_midnight`,
/// then the relative offsets, which are all added together.
///
/// # Example
///
/// ```ignore
/// // Five days and two hours from now.
/// let spec = ExpirySpec::default().with_days(5).with_hours(2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExpirySpec {
    /// Absolute expiration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    /// Expire at the next midnight.
    #[serde(skip_serializing_if = "is_false")]
    pub at_midnight: bool,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "truncated")]
    pub minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "truncated")]
    pub hours: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "truncated")]
    pub days: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "truncated")]
    pub months: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "truncated")]
    pub years: Option<i64>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

// Fractional offsets are truncated toward zero.
fn truncated<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let number = Option::<serde_json::Number>::deserialize(deserializer)?;
    Ok(number.and_then(|n| n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64))))
}

impl ExpirySpec {
    /// Expire at an absolute instant.
    pub fn at(date: DateTime<Utc>) -> Self {
        Self {
            date: Some(date),
            ..Self::default()
        }
    }

    /// Expire at the next midnight.
    pub fn next_midnight() -> Self {
        Self {
            at_midnight: true,
            ..Self::default()
        }
    }

    /// The default lifetime of a cached value: one day.
    pub fn one_day() -> Self {
        Self::default().with_days(1)
    }

    pub fn with_minutes(mut self, minutes: i64) -> Self {
        self.minutes = Some(minutes);
        self
    }

    pub fn with_hours(mut self, hours: i64) -> Self {
        self.hours = Some(hours);
        self
    }

    pub fn with_days(mut self, days: i64) -> Self {
        self.days = Some(days);
        self
    }

    pub fn with_months(mut self, months: i64) -> Self {
        self.months = Some(months);
        self
    }

    pub fn with_years(mut self, years: i64) -> Self {
        self.years = Some(years);
        self
    }

    /// Resolve to an absolute instant.
    ///
    /// Calendar steps (midnight, months, years) are taken in `offset`. A
    /// spec with no fields set resolves to `now`.
    pub fn resolve(
        &self,
        now: DateTime<Utc>,
        offset: FixedOffset,
    ) -> Result<DateTime<Utc>, CacheError> {
        if let Some(date) = self.date {
            return Ok(date);
        }

        let local = now.with_timezone(&offset);

        if self.at_midnight {
            let tomorrow = local
                .date_naive()
                .succ_opt()
                .ok_or_else(|| overflow("midnight"))?;
            return offset
                .from_local_datetime(&tomorrow.and_time(NaiveTime::MIN))
                .single()
                .map(|at| at.with_timezone(&Utc))
                .ok_or_else(|| overflow("midnight"));
        }

        let mut at = local;
        if let Some(minutes) = self.minutes {
            at = add_delta(at, Duration::try_minutes(minutes), "minutes")?;
        }
        if let Some(hours) = self.hours {
            at = add_delta(at, Duration::try_hours(hours), "hours")?;
        }
        if let Some(days) = self.days {
            at = add_delta(at, Duration::try_days(days), "days")?;
        }
        if let Some(months) = self.months {
            at = add_months(at, months).ok_or_else(|| overflow("months"))?;
        }
        if let Some(years) = self.years {
            at = years
                .checked_mul(12)
                .and_then(|months| add_months(at, months))
                .ok_or_else(|| overflow("years"))?;
        }

        Ok(at.with_timezone(&Utc))
    }
}

fn add_delta(
    at: DateTime<FixedOffset>,
    delta: Option<Duration>,
    field: &str,
) -> Result<DateTime<FixedOffset>, CacheError> {
    delta
        .and_then(|delta| at.checked_add_signed(delta))
        .ok_or_else(|| overflow(field))
}

// Month arithmetic clamps to the last day of a shorter month.
fn add_months(at: DateTime<FixedOffset>, months: i64) -> Option<DateTime<FixedOffset>> {
    let step = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        at.checked_add_months(step)
    } else {
        at.checked_sub_months(step)
    }
}

fn overflow(field: &str) -> CacheError {
    CacheError::InvalidExpiration(format!("{} offset out of range", field))
}

/// Resolve an optional caller spec, falling back to `default`.
pub fn resolve_expiration(
    spec: Option<&ExpirySpec>,
    default: &ExpirySpec,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Result<DateTime<Utc>, CacheError> {
    spec.unwrap_or(default).resolve(now, offset)
}
