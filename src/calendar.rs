use chrono::{Datelike, Month, NaiveDate};
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};

/// Polish month names as shown in the month selector.
pub const MONTH_NAMES: [&str; 12] = [
    "Styczeń",
    "Luty",
    "Marzec",
    "Kwiecień",
    "Maj",
    "Czerwiec",
    "Lipiec",
    "Sierpień",
    "Wrzesień",
    "Październik",
    "Listopad",
    "Grudzień",
];

/// Monday-first day-of-week headers.
pub const DAY_HEADERS: [&str; 7] = ["Pn", "Wt", "Śr", "Cz", "Pt", "So", "Nd"];

/// The categorical tags a user may attach to a selected day.
///
/// Wire names (`duty`, `duty_off`, ...) are fixed by the server's
/// `/api/add-events` contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Duty,
    DutyOff,
    Delegation,
    Training,
    Blood,
}

impl EventType {
    pub const ALL: [EventType; 5] = [
        EventType::Duty,
        EventType::DutyOff,
        EventType::Delegation,
        EventType::Training,
        EventType::Blood,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EventType::Duty => "Służba",
            EventType::DutyOff => "Wolna służba",
            EventType::Delegation => "Delegacja",
            EventType::Training => "Szkolenie",
            EventType::Blood => "Krew",
        }
    }

    /// Single-character marker shown inside a selected day cell.
    pub fn marker(&self) -> char {
        match self {
            EventType::Duty => 'S',
            EventType::DutyOff => 'W',
            EventType::Delegation => 'D',
            EventType::Training => 'Z',
            EventType::Blood => 'K',
        }
    }

    pub fn next(&self) -> EventType {
        match self {
            EventType::Duty => EventType::DutyOff,
            EventType::DutyOff => EventType::Delegation,
            EventType::Delegation => EventType::Training,
            EventType::Training => EventType::Blood,
            EventType::Blood => EventType::Duty,
        }
    }
}

/// Recurring 3-day shift cycle label, derived from a fixed reference date.
/// Purely cosmetic; never stored with a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftTag {
    First,
    Second,
    Third,
}

impl ShiftTag {
    pub const CYCLE: [ShiftTag; 3] = [ShiftTag::First, ShiftTag::Second, ShiftTag::Third];

    /// Derives the cycle label for `date` from the whole-day distance to the
    /// reference date. Absolute value keeps the assignment stable for dates
    /// before the reference as well.
    pub fn for_date(date: NaiveDate) -> ShiftTag {
        let days = date.signed_duration_since(shift_epoch()).num_days();
        ShiftTag::CYCLE[(days.unsigned_abs() % 3) as usize]
    }

    pub fn index(&self) -> usize {
        match self {
            ShiftTag::First => 0,
            ShiftTag::Second => 1,
            ShiftTag::Third => 2,
        }
    }
}

/// Reference date from which the shift cycle is calculated.
pub fn shift_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()
}

pub fn days_of_month(month: &Month, year: i32) -> u64 {
    let first = NaiveDate::from_ymd_opt(year, month.number_from_month(), 1).unwrap();
    let next = if month.number_from_month() == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1).unwrap()
    } else {
        NaiveDate::from_ymd_opt(year, month.number_from_month() + 1, 1).unwrap()
    };

    next.signed_duration_since(first).num_days() as u64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub shift: ShiftTag,
}

/// One month laid out for a Monday-first grid: the number of leading blank
/// cells followed by one cell per day of the month.
#[derive(Debug, Clone)]
pub struct MonthGrid {
    pub year: i32,
    pub month0: u32,
    pub leading_blanks: u32,
    pub days: Vec<DayCell>,
}

/// Computes the grid for `(year, month0)` with `month0` in `0..12`.
pub fn month_grid(year: i32, month0: u32) -> MonthGrid {
    assert!(month0 < 12, "month index out of range: {}", month0);

    let first = NaiveDate::from_ymd_opt(year, month0 + 1, 1).unwrap();
    let leading_blanks = first.weekday().num_days_from_monday();

    let month = Month::from_u32(month0 + 1).unwrap();
    let days = (0..days_of_month(&month, year))
        .map(|offset| {
            let date = first + chrono::Duration::days(offset as i64);
            DayCell {
                date,
                shift: ShiftTag::for_date(date),
            }
        })
        .collect();

    MonthGrid {
        year,
        month0,
        leading_blanks,
        days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn grid_has_true_day_count() {
        assert_eq!(month_grid(2024, 1).days.len(), 29); // leap February
        assert_eq!(month_grid(2025, 1).days.len(), 28);
        assert_eq!(month_grid(2025, 0).days.len(), 31);
        assert_eq!(month_grid(2025, 3).days.len(), 30);
        assert_eq!(month_grid(2025, 11).days.len(), 31);
    }

    #[test]
    fn leading_blanks_follow_monday_first_layout() {
        // 2025-01-01 is a Wednesday
        assert_eq!(month_grid(2025, 0).leading_blanks, 2);
        // 2024-01-01 is a Monday
        assert_eq!(month_grid(2024, 0).leading_blanks, 0);
        // 2024-12-01 is a Sunday
        assert_eq!(month_grid(2024, 11).leading_blanks, 6);
    }

    #[test]
    fn grid_days_are_consecutive_dates_of_the_month() {
        let grid = month_grid(2025, 5);
        assert_eq!(grid.days.first().unwrap().date, date(2025, 6, 1));
        assert_eq!(grid.days.last().unwrap().date, date(2025, 6, 30));
    }

    #[test]
    fn shift_tag_at_epoch() {
        assert_eq!(ShiftTag::for_date(shift_epoch()), ShiftTag::First);
    }

    #[test]
    fn shift_tag_has_period_three() {
        for offset in 0..90i64 {
            let day = shift_epoch() + chrono::Duration::days(offset);
            assert_eq!(
                ShiftTag::for_date(day),
                ShiftTag::CYCLE[(offset % 3) as usize]
            );
            assert_eq!(
                ShiftTag::for_date(day),
                ShiftTag::for_date(day + chrono::Duration::days(3))
            );
        }
    }

    #[test]
    fn shift_tag_is_stable_before_epoch() {
        let before = shift_epoch() - chrono::Duration::days(4);
        assert_eq!(ShiftTag::for_date(before), ShiftTag::Second);
        assert_eq!(
            ShiftTag::for_date(shift_epoch() - chrono::Duration::days(3)),
            ShiftTag::First
        );
    }

    #[test]
    fn event_type_wire_names() {
        let names: Vec<String> = EventType::ALL
            .iter()
            .map(|t| serde_json::to_string(t).unwrap())
            .collect();
        assert_eq!(
            names,
            [
                "\"duty\"",
                "\"duty_off\"",
                "\"delegation\"",
                "\"training\"",
                "\"blood\""
            ]
        );
    }

    #[test]
    fn event_type_cycle_visits_all_variants() {
        let mut current = EventType::Duty;
        for expected in EventType::ALL.iter().cycle().skip(1).take(5) {
            current = current.next();
            assert_eq!(current, *expected);
        }
    }
}
