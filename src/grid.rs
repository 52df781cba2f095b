//! The fixed 6×7 month matrices the year grid is made of

use chrono::{Datelike, Duration, Local, NaiveDate};

use crate::document::FirstDayOfWeek;

pub const GRID_ROWS: usize = 6;
pub const GRID_COLS: usize = 7;
/// Every month renders as exactly this many cells, whatever its length
pub const GRID_CELLS: usize = GRID_ROWS * GRID_COLS;

pub const MONTH_NAMES: [&str; 12] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

const WEEKDAY_NAMES_MON: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const WEEKDAY_NAMES_SUN: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// The weekday header row, in display order
pub fn weekday_names(first_day: FirstDayOfWeek) -> [&'static str; 7] {
    match first_day {
        FirstDayOfWeek::Mon => WEEKDAY_NAMES_MON,
        FirstDayOfWeek::Sun => WEEKDAY_NAMES_SUN,
    }
}

/// One cell of a month matrix.
///
/// Out-of-month cells carry the real date of the adjacent month they belong to,
/// so that clicking them can navigate there.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    /// Whether this cell belongs to the displayed month (as opposed to the leading or
    /// trailing days of its neighbours)
    pub in_month: bool,
}

/// Lay out one month as a fixed 6-row, 7-column matrix of 42 cells, row-major.
///
/// The first row starts on the configured week start; the cells before the 1st and after
/// the last day of the month resolve into the adjacent months and are marked
/// `in_month = false`. Always 6 rows, even when 5 would suffice, so that row positions
/// are stable across all 12 months.
///
/// This is a pure function. Inputs chrono cannot represent (month outside 1..=12, or a
/// year at the very edge of the representable range) yield an empty vector instead of
/// 42 cells.
pub fn build_month_matrix(year: i32, month: u32, first_day: FirstDayOfWeek) -> Vec<CalendarCell> {
    let first = match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(date) => date,
        None => return Vec::new(),
    };
    let shift = match first_day {
        FirstDayOfWeek::Mon => first.weekday().num_days_from_monday(),
        FirstDayOfWeek::Sun => first.weekday().num_days_from_sunday(),
    } as i64;

    let mut cells = Vec::with_capacity(GRID_CELLS);
    for i in 0..GRID_CELLS as i64 {
        let date = match first.checked_add_signed(Duration::days(i - shift)) {
            Some(date) => date,
            None => return Vec::new(),
        };
        cells.push(CalendarCell {
            date,
            in_month: date.year() == year && date.month() == month,
        });
    }
    cells
}

/// Today, according to the local clock
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// The current year, according to the local clock (the year a fresh view opens on)
pub fn current_year() -> i32 {
    today().year()
}
