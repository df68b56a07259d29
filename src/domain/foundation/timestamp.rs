//! UTC timestamps for session bookkeeping.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in time, always UTC, serialized as RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Time elapsed since this timestamp. Zero for timestamps in the future.
    pub fn age(&self) -> Duration {
        Utc::now()
            .signed_duration_since(self.0)
            .max(Duration::zero())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn now_is_ordered() {
        let first = Timestamp::now();
        let second = Timestamp::now();
        assert!(first <= second);
    }

    #[test]
    fn age_never_negative() {
        let future = Timestamp::from(Utc::now() + Duration::hours(1));
        assert_eq!(future.age(), Duration::zero());

        let past = Timestamp::from(Utc::now() - Duration::minutes(5));
        assert!(past.age() >= Duration::minutes(5));
    }

    #[test]
    fn displays_with_millis_and_z() {
        let ts = Timestamp::from(Utc.with_ymd_and_hms(2024, 3, 9, 8, 5, 0).unwrap());
        assert_eq!(ts.to_string(), "2024-03-09T08:05:00.000Z");
    }
}
