//! Cadence stepping - turns a frequency tag into an ordered sequence of dates.
//!
//! Calendar steps (monthly, quarterly, yearly) are always measured from the start date,
//! so a schedule starting on the 31st returns to the 31st whenever the month allows it
//! and clamps to the last day of shorter months otherwise.

use chrono::{Days, Months, NaiveDate};
use std::fmt;

/// A repetition interval for a recurring definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cadence {
    /// Every 7 days
    Weekly,
    /// Every 14 days
    Fortnightly,
    /// Every calendar month
    Monthly,
    /// Every 3 calendar months
    Quarterly,
    /// Every calendar year
    Yearly,
    /// A single occurrence on the start date
    Once,
}

#[derive(Clone, Copy)]
enum Step {
    Days(u64),
    Months(u32),
}

impl Cadence {
    /// Interprets a stored frequency tag. Matching ignores case and surrounding
    /// whitespace; a missing or unknown tag is a one-off, never an error.
    #[must_use]
    pub fn parse(tag: Option<&str>) -> Self {
        match tag.map(|t| t.trim().to_ascii_lowercase()).as_deref() {
            Some("weekly") => Self::Weekly,
            Some("fortnightly") => Self::Fortnightly,
            Some("monthly") => Self::Monthly,
            Some("quarterly") => Self::Quarterly,
            Some("yearly") => Self::Yearly,
            _ => Self::Once,
        }
    }

    /// Canonical tag for this cadence, `None` for a one-off
    #[must_use]
    pub const fn as_tag(self) -> Option<&'static str> {
        match self {
            Self::Weekly => Some("Weekly"),
            Self::Fortnightly => Some("Fortnightly"),
            Self::Monthly => Some("Monthly"),
            Self::Quarterly => Some("Quarterly"),
            Self::Yearly => Some("Yearly"),
            Self::Once => None,
        }
    }

    const fn step(self) -> Option<Step> {
        match self {
            Self::Weekly => Some(Step::Days(7)),
            Self::Fortnightly => Some(Step::Days(14)),
            Self::Monthly => Some(Step::Months(1)),
            Self::Quarterly => Some(Step::Months(3)),
            Self::Yearly => Some(Step::Months(12)),
            Self::Once => None,
        }
    }

    /// The `n`-th date of a schedule starting at `start` (`n = 0` is `start` itself).
    /// Returns `None` past the end of a one-off or of chrono's representable range.
    #[must_use]
    pub fn nth_date(self, start: NaiveDate, n: u32) -> Option<NaiveDate> {
        match self.step() {
            None => (n == 0).then_some(start),
            Some(Step::Days(days)) => start.checked_add_days(Days::new(days * u64::from(n))),
            Some(Step::Months(months)) => months
                .checked_mul(n)
                .and_then(|total| start.checked_add_months(Months::new(total))),
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag().unwrap_or("Once"))
    }
}

/// A cadence anchored at a start date. Cheap to copy; every call to [`Schedule::iter`]
/// starts again from the start date.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Schedule {
    cadence: Cadence,
    start: NaiveDate,
}

impl Schedule {
    /// Anchors `cadence` at `start`
    #[must_use]
    pub const fn new(cadence: Cadence, start: NaiveDate) -> Self {
        Self { cadence, start }
    }

    /// The first date of this schedule
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Lazy, strictly increasing dates beginning at the start date. Unbounded for
    /// recurring cadences; callers decide where to stop.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let Self { cadence, start } = *self;
        (0u32..).map_while(move |n| cadence.nth_date(start, n))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn first_n(cadence: Cadence, start: NaiveDate, n: usize) -> Vec<NaiveDate> {
        Schedule::new(cadence, start).iter().take(n).collect()
    }

    #[test]
    fn test_parse_recognized_tags() {
        assert_eq!(Cadence::parse(Some("Weekly")), Cadence::Weekly);
        assert_eq!(Cadence::parse(Some("fortnightly")), Cadence::Fortnightly);
        assert_eq!(Cadence::parse(Some("MONTHLY")), Cadence::Monthly);
        assert_eq!(Cadence::parse(Some("  Quarterly ")), Cadence::Quarterly);
        assert_eq!(Cadence::parse(Some("Yearly")), Cadence::Yearly);
    }

    #[test]
    fn test_parse_unknown_or_missing_is_once() {
        assert_eq!(Cadence::parse(None), Cadence::Once);
        assert_eq!(Cadence::parse(Some("")), Cadence::Once);
        assert_eq!(Cadence::parse(Some("daily")), Cadence::Once);
        assert_eq!(Cadence::parse(Some("bi-monthly")), Cadence::Once);
    }

    #[test]
    fn test_tag_round_trip() {
        for cadence in [
            Cadence::Weekly,
            Cadence::Fortnightly,
            Cadence::Monthly,
            Cadence::Quarterly,
            Cadence::Yearly,
            Cadence::Once,
        ] {
            assert_eq!(Cadence::parse(cadence.as_tag()), cadence);
        }
        assert_eq!(Cadence::Quarterly.to_string(), "Quarterly");
        assert_eq!(Cadence::Once.to_string(), "Once");
    }

    #[test]
    fn test_once_yields_only_start() {
        let start = date(2024, 5, 1);
        let dates: Vec<_> = Schedule::new(Cadence::Once, start).iter().collect();
        assert_eq!(dates, vec![start]);
    }

    #[test]
    fn test_weekly_and_fortnightly_steps() {
        let start = date(2024, 12, 20);
        assert_eq!(
            first_n(Cadence::Weekly, start, 3),
            vec![start, date(2024, 12, 27), date(2025, 1, 3)]
        );
        assert_eq!(
            first_n(Cadence::Fortnightly, start, 3),
            vec![start, date(2025, 1, 3), date(2025, 1, 17)]
        );
    }

    #[test]
    fn test_monthly_clamps_end_of_month_non_leap() {
        let dates = first_n(Cadence::Monthly, date(2023, 1, 31), 4);
        assert_eq!(
            dates,
            vec![
                date(2023, 1, 31),
                date(2023, 2, 28),
                date(2023, 3, 31),
                date(2023, 4, 30),
            ]
        );
    }

    #[test]
    fn test_monthly_clamps_end_of_month_leap() {
        let dates = first_n(Cadence::Monthly, date(2024, 1, 31), 2);
        assert_eq!(dates, vec![date(2024, 1, 31), date(2024, 2, 29)]);
    }

    #[test]
    fn test_quarterly_preserves_day_of_month() {
        let dates = first_n(Cadence::Quarterly, date(2023, 11, 30), 3);
        assert_eq!(
            dates,
            vec![date(2023, 11, 30), date(2024, 2, 29), date(2024, 5, 30)]
        );
    }

    #[test]
    fn test_yearly_from_leap_day() {
        let dates = first_n(Cadence::Yearly, date(2024, 2, 29), 5);
        assert_eq!(
            dates,
            vec![
                date(2024, 2, 29),
                date(2025, 2, 28),
                date(2026, 2, 28),
                date(2027, 2, 28),
                date(2028, 2, 29),
            ]
        );
    }

    #[test]
    fn test_schedule_is_restartable() {
        let schedule = Schedule::new(Cadence::Monthly, date(2024, 1, 15));
        let first: Vec<_> = schedule.iter().take(5).collect();
        let second: Vec<_> = schedule.iter().take(5).collect();
        assert_eq!(first, second);
        assert_eq!(first[0], schedule.start());
    }

    #[test]
    fn test_sequences_strictly_increase() {
        let start = date(2024, 1, 31);
        for cadence in [
            Cadence::Weekly,
            Cadence::Fortnightly,
            Cadence::Monthly,
            Cadence::Quarterly,
            Cadence::Yearly,
        ] {
            let dates = first_n(cadence, start, 60);
            assert_eq!(dates.len(), 60);
            assert_eq!(dates[0], start);
            assert!(dates.windows(2).all(|w| w[0] < w[1]), "{cadence} not increasing");
        }
    }

    #[test]
    fn test_iteration_stops_at_calendar_limit() {
        let dates: Vec<_> = Schedule::new(Cadence::Yearly, NaiveDate::MAX)
            .iter()
            .collect();
        assert_eq!(dates, vec![NaiveDate::MAX]);
    }
}
