use chrono::{FixedOffset, NaiveDate, Utc};

/// Source of "today" for composition, ranking and completion
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

impl<T: Clock + ?Sized> Clock for Box<T> {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

/// Today's calendar date at a fixed UTC offset
#[derive(Debug, Clone, Copy)]
pub struct ZonedClock {
    offset: FixedOffset,
}

impl ZonedClock {
    pub fn new(offset: FixedOffset) -> Self {
        ZonedClock { offset }
    }
}

impl Clock for ZonedClock {
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.offset).date_naive()
    }
}

/// Always the same date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Parse `Z`, `+HH:MM`, `-HH:MM` or `+HH` into an offset.
pub fn parse_utc_offset(s: &str) -> Option<FixedOffset> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }

    let sign = match s.chars().next()? {
        '+' => 1,
        '-' => -1,
        _ => return None,
    };
    let body = &s[1..];
    let (hours, minutes) = match body.split_once(':') {
        Some((h, m)) => (h, m),
        None => (body, "0"),
    };
    if hours.is_empty() || hours.len() > 2 || minutes.len() > 2 {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 14 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_offsets() {
        assert_eq!(parse_utc_offset("+09:00").unwrap().local_minus_utc(), 9 * 3600);
        assert_eq!(
            parse_utc_offset("-05:30").unwrap().local_minus_utc(),
            -(5 * 3600 + 30 * 60)
        );
        assert_eq!(parse_utc_offset("+2").unwrap().local_minus_utc(), 2 * 3600);
        assert_eq!(parse_utc_offset("Z").unwrap().local_minus_utc(), 0);
    }

    #[test]
    fn test_parse_offset_rejects_garbage() {
        for bad in ["", "09:00", "+", "+25:00", "+09:75", "+09:0a", "Asia/Tokyo", "+123"] {
            assert!(parse_utc_offset(bad).is_none(), "{}", bad);
        }
    }

    #[test]
    fn test_fixed_clock() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(FixedClock(day).today(), day);
    }

    #[test]
    fn test_zoned_clock_tracks_offset() {
        // Two clocks a full day apart in offset can never agree on the date
        let east = ZonedClock::new(FixedOffset::east_opt(14 * 3600).unwrap());
        let west = ZonedClock::new(FixedOffset::west_opt(12 * 3600).unwrap());
        let diff = east.today() - west.today();
        assert!(diff.num_days() == 1 || diff.num_days() == 2);
    }
}
