use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;

/// Canonical timezone for market dates and the job schedule.
/// The simulated exchange follows US market hours.
pub const MARKET_TZ: Tz = chrono_tz::America::New_York;

/// Converts a UTC instant to a calendar date in the market timezone.
pub fn market_date_from_utc(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&MARKET_TZ).date_naive()
}

/// Today's calendar date in the market timezone.
pub fn market_date_today() -> NaiveDate {
    market_date_from_utc(Utc::now())
}

/// Current wall-clock time in the market timezone.
pub fn market_now() -> NaiveDateTime {
    Utc::now().with_timezone(&MARKET_TZ).naive_local()
}

pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Whether the given market-local time falls within regular trading hours.
pub fn is_market_hours(time: NaiveTime) -> bool {
    let open = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
    let close = NaiveTime::from_hms_opt(16, 0, 0).unwrap();
    time >= open && time <= close
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn market_date_rolls_back_before_est_midnight() {
        // 03:00 UTC is still the previous evening in New York.
        let instant = Utc.with_ymd_and_hms(2024, 9, 3, 3, 0, 0).unwrap();
        assert_eq!(
            market_date_from_utc(instant),
            NaiveDate::from_ymd_opt(2024, 9, 2).unwrap()
        );
    }

    #[test]
    fn weekends_are_not_weekdays() {
        assert!(is_weekday(NaiveDate::from_ymd_opt(2024, 9, 2).unwrap())); // Monday
        assert!(!is_weekday(NaiveDate::from_ymd_opt(2024, 9, 7).unwrap())); // Saturday
    }

    #[test]
    fn market_hours_bounds() {
        assert!(!is_market_hours(NaiveTime::from_hms_opt(9, 29, 0).unwrap()));
        assert!(is_market_hours(NaiveTime::from_hms_opt(9, 30, 0).unwrap()));
        assert!(is_market_hours(NaiveTime::from_hms_opt(16, 0, 0).unwrap()));
        assert!(!is_market_hours(NaiveTime::from_hms_opt(16, 1, 0).unwrap()));
    }
}
