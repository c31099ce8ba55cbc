use chrono::{Datelike, Month, NaiveDate};
use num_traits::FromPrimitive;
use std::fmt;
use std::ops::{Add, Sub};
use unicode_width::UnicodeWidthStr;

use crate::error::{Error, ErrorKind, Result};
use crate::holidays::{self, ACADEMIC_YEAR, MONTH_NAMES, WEEKDAY_NAMES};

/// Zero-based month of the academic year. All arithmetic wraps around, so
/// the index is always within `0..12`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthIndex(u32);

impl MonthIndex {
    pub const JANUARY: MonthIndex = MonthIndex(0);
    pub const DECEMBER: MonthIndex = MonthIndex(11);

    pub fn new(index: u32) -> Option<Self> {
        if index < 12 {
            Some(MonthIndex(index))
        } else {
            None
        }
    }

    /// Month from its 1-based number as users write it.
    pub fn from_number(number: u32) -> Result<Self> {
        number
            .checked_sub(1)
            .and_then(MonthIndex::new)
            .ok_or_else(|| Error::new(ErrorKind::MonthOutOfRange, &number.to_string()))
    }

    pub fn wrapping(index: i64) -> Self {
        MonthIndex(index.rem_euclid(12) as u32)
    }

    pub fn index(&self) -> u32 {
        self.0
    }

    pub fn number_from_month(&self) -> u32 {
        self.0 + 1
    }

    pub fn next(&self) -> Self {
        *self + 1
    }

    pub fn prev(&self) -> Self {
        *self - 1
    }

    pub fn name(&self) -> &'static str {
        MONTH_NAMES[self.0 as usize]
    }

    pub fn month(&self) -> Month {
        Month::from_u32(self.number_from_month()).unwrap_or(Month::January)
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(ACADEMIC_YEAR, self.number_from_month(), 1)
            .expect("month index is always within 0..12")
    }
}

impl<T: Datelike> From<T> for MonthIndex {
    fn from(d: T) -> Self {
        MonthIndex(d.month0())
    }
}

impl Add<u32> for MonthIndex {
    type Output = MonthIndex;
    fn add(self, rhs: u32) -> Self::Output {
        MonthIndex::wrapping(self.0 as i64 + rhs as i64)
    }
}

impl Sub<u32> for MonthIndex {
    type Output = MonthIndex;
    fn sub(self, rhs: u32) -> Self::Output {
        MonthIndex::wrapping(self.0 as i64 - rhs as i64)
    }
}

/// Number of days of `month` in the academic year, taken from the day before
/// the first of the following month.
pub fn days_in_month(month: MonthIndex) -> u32 {
    let month = month.month();
    let year = if month == Month::December {
        ACADEMIC_YEAR + 1
    } else {
        ACADEMIC_YEAR
    };

    NaiveDate::from_ymd_opt(year, month.succ().number_from_month(), 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map(|last| last.day())
        .expect("the first of a month always has a predecessor")
}

/// Weekday of the first day of `month`, counted from Sunday.
pub fn starting_weekday(month: MonthIndex) -> u32 {
    month.first_day().weekday().num_days_from_sunday()
}

/// Right-aligns `text` to `width` terminal columns.
pub fn pad_to_width(text: &str, width: usize) -> String {
    format!("{}{}", " ".repeat(width.saturating_sub(text.width())), text)
}

/// Weekday names, one grid cell each.
pub fn weekday_header() -> String {
    WEEKDAY_NAMES
        .iter()
        .map(|name| format!("{} ", pad_to_width(name, MonthGrid::CELL_WIDTH - 1)))
        .collect()
}

pub fn date_key(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayCell {
    pub day_num: u8,
    pub date: NaiveDate,
    pub holiday: Option<&'static str>,
    pub selected: bool,
}

impl DayCell {
    pub fn is_holiday(&self) -> bool {
        self.holiday.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GridCell {
    Blank,
    Day(DayCell),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthGrid {
    pub month: MonthIndex,
    pub cells: Vec<GridCell>,
}

impl MonthGrid {
    pub const COLUMNS: usize = 7;
    pub const CELL_WIDTH: usize = 7;

    pub fn blank_count(&self) -> usize {
        self.cells
            .iter()
            .take_while(|cell| matches!(cell, GridCell::Blank))
            .count()
    }

    pub fn days(&self) -> impl Iterator<Item = &DayCell> {
        self.cells.iter().filter_map(|cell| match cell {
            GridCell::Day(day) => Some(day),
            GridCell::Blank => None,
        })
    }

    pub fn day(&self, day_num: u8) -> Option<&DayCell> {
        self.days().find(|day| day.day_num == day_num)
    }

    pub fn weeks(&self) -> std::slice::Chunks<'_, GridCell> {
        self.cells.chunks(Self::COLUMNS)
    }
}

/// Lays out `month` of the academic year: one blank per weekday before the
/// first, then one cell per day flagged against the holiday table and the
/// current selection.
pub fn render_month_grid(month: MonthIndex, selected: Option<&NaiveDate>) -> MonthGrid {
    let offset = starting_weekday(month) as usize;
    let num_days = days_in_month(month);
    let first = month.first_day();

    let cells = std::iter::repeat_with(|| GridCell::Blank)
        .take(offset)
        .chain(
            first
                .iter_days()
                .take(num_days as usize)
                .map(|date| {
                    GridCell::Day(DayCell {
                        day_num: date.day() as u8,
                        date,
                        holiday: holidays::holiday_label(&date_key(&date)),
                        selected: selected == Some(&date),
                    })
                }),
        )
        .collect();

    MonthGrid { month, cells }
}

/// Holidays falling into `month`, ordered by date.
pub fn holidays_of_month(month: MonthIndex) -> Vec<(NaiveDate, &'static str)> {
    let mut entries: Vec<(NaiveDate, &'static str)> = holidays::HOLIDAYS
        .entries()
        .filter_map(|(key, label)| {
            NaiveDate::parse_from_str(key, "%Y-%m-%d")
                .ok()
                .map(|date| (date, *label))
        })
        .filter(|(date, _)| MonthIndex::from(*date) == month)
        .collect();

    entries.sort_unstable_by_key(|(date, _)| *date);
    entries
}

impl fmt::Display for MonthGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.month.name(), ACADEMIC_YEAR)?;

        writeln!(f, "{}", weekday_header())?;

        for week in self.weeks() {
            for cell in week {
                match cell {
                    GridCell::Blank => write!(f, "{:width$}", "", width = Self::CELL_WIDTH)?,
                    GridCell::Day(day) => {
                        let marker = if day.is_holiday() { '*' } else { ' ' };
                        write!(f, "{:>5}{} ", day.day_num, marker)?
                    }
                }
            }
            writeln!(f)?;
        }

        for (date, label) in holidays_of_month(self.month) {
            writeln!(f, "* {}: {}", date_key(&date), label)?;
        }

        Ok(())
    }
}
