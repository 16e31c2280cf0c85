//! User profile types

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::{InvalidTimezone, ServiceType, UserId};

/// Timezone used when a user has not picked one
pub const DEFAULT_TIMEZONE: &str = "America/New_York";

/// A validated IANA timezone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timezone(Tz);

impl Timezone {
    /// Parse an IANA zone name (e.g. `America/Los_Angeles`)
    pub fn parse(name: &str) -> Result<Self, InvalidTimezone> {
        name.parse::<Tz>()
            .map(Self)
            .map_err(|_| InvalidTimezone(name.to_string()))
    }

    /// IANA name
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// Calendar date of the instant `now` as observed in this zone.
    ///
    /// The conversion goes through the zone's offset at that instant, so DST
    /// changes are accounted for.
    pub fn local_date(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.0).date_naive()
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::America::New_York)
    }
}

impl std::fmt::Display for Timezone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<String> for Timezone {
    type Error = InvalidTimezone;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Timezone> for String {
    fn from(tz: Timezone) -> Self {
        tz.name().to_string()
    }
}

/// User preferences that drive content selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Owning user
    pub user_id: UserId,
    /// Selected content category
    pub service_type: ServiceType,
    /// Timezone that decides when "today" rolls over
    pub timezone: Timezone,
    /// Whether onboarding was completed
    pub onboarding_completed: bool,
}

impl Profile {
    /// Profile used for users who never onboarded
    pub fn default_for(user_id: UserId) -> Self {
        Self {
            user_id,
            service_type: ServiceType::default(),
            timezone: Timezone::default(),
            onboarding_completed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tz(name: &str) -> Timezone {
        Timezone::parse(name).unwrap()
    }

    #[test]
    fn test_same_instant_different_local_dates() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 3, 0, 0).unwrap();
        assert_eq!(tz("America/New_York").local_date(now), date(2024, 1, 14));
        assert_eq!(tz("America/Los_Angeles").local_date(now), date(2024, 1, 14));
        assert_eq!(tz("Asia/Tokyo").local_date(now), date(2024, 1, 15));
        assert_eq!(tz("Europe/London").local_date(now), date(2024, 1, 15));
        assert_eq!(tz("UTC").local_date(now), date(2024, 1, 15));
    }

    #[test]
    fn test_midnight_flip_in_user_zone() {
        let ny = tz("America/New_York");
        let before = Utc.with_ymd_and_hms(2024, 1, 15, 4, 58, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 1, 15, 5, 2, 0).unwrap();
        assert_eq!(ny.local_date(before), date(2024, 1, 14));
        assert_eq!(ny.local_date(after), date(2024, 1, 15));
    }

    #[test]
    fn test_midnight_flip_tracks_dst() {
        let ny = tz("America/New_York");
        // EDT (UTC-4) in July: local midnight is 04:00 UTC
        let before = Utc.with_ymd_and_hms(2024, 7, 15, 3, 59, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 7, 15, 4, 1, 0).unwrap();
        assert_eq!(ny.local_date(before), date(2024, 7, 14));
        assert_eq!(ny.local_date(after), date(2024, 7, 15));

        // Spring-forward day: 2024-03-10 02:00 EST jumps to 03:00 EDT
        let spring = Utc.with_ymd_and_hms(2024, 3, 10, 7, 30, 0).unwrap();
        assert_eq!(ny.local_date(spring), date(2024, 3, 10));
    }

    #[test]
    fn test_half_hour_and_far_east_zones() {
        let now = Utc.with_ymd_and_hms(2024, 1, 14, 18, 45, 0).unwrap();
        // Kolkata is UTC+5:30 -> 00:15 next day
        assert_eq!(tz("Asia/Kolkata").local_date(now), date(2024, 1, 15));
        // Kiritimati is UTC+14
        assert_eq!(tz("Pacific/Kiritimati").local_date(now), date(2024, 1, 15));
        // Honolulu is UTC-10
        assert_eq!(tz("Pacific/Honolulu").local_date(now), date(2024, 1, 14));
    }

    #[test]
    fn test_invalid_timezone_rejected() {
        assert_eq!(
            Timezone::parse("Mars/Olympus_Mons").unwrap_err(),
            InvalidTimezone("Mars/Olympus_Mons".to_string())
        );
        assert!(Timezone::parse("").is_err());
    }

    #[test]
    fn test_default_profile() {
        let profile = Profile::default_for(UserId::new());
        assert_eq!(profile.service_type, ServiceType::DeepClean);
        assert_eq!(profile.timezone.name(), DEFAULT_TIMEZONE);
        assert!(!profile.onboarding_completed);
    }

    #[test]
    fn test_timezone_serializes_as_name() {
        let json = serde_json::to_string(&tz("Asia/Tokyo")).unwrap();
        assert_eq!(json, "\"Asia/Tokyo\"");
        let parsed: Timezone = serde_json::from_str("\"Europe/London\"").unwrap();
        assert_eq!(parsed.name(), "Europe/London");
        assert!(serde_json::from_str::<Timezone>("\"Nowhere/Land\"").is_err());
    }

    proptest! {
        /// A local date is never more than one day away from the UTC date.
        #[test]
        fn prop_local_date_within_one_day_of_utc(
            secs in 0i64..4_102_444_800,
            zone_idx in 0usize..6,
        ) {
            let zones = [
                "America/New_York",
                "America/Los_Angeles",
                "Asia/Tokyo",
                "Pacific/Kiritimati",
                "Pacific/Pago_Pago",
                "Australia/Lord_Howe",
            ];
            let now = Utc.timestamp_opt(secs, 0).unwrap();
            let local = tz(zones[zone_idx]).local_date(now);
            let diff = (local - now.date_naive()).num_days();
            prop_assert!((-1..=1).contains(&diff));
        }

        /// Local dates never go backwards as time moves forward.
        #[test]
        fn prop_local_date_is_monotonic(
            secs in 0i64..4_102_444_800,
            step in 1i64..200_000,
        ) {
            let ny = tz("America/New_York");
            let a = Utc.timestamp_opt(secs, 0).unwrap();
            let b = a + Duration::seconds(step);
            prop_assert!(ny.local_date(a) <= ny.local_date(b));
        }
    }
}
