//! Click-to-build custom range picker.
//!
//! The selection is an explicit three-state machine:
//!
//! - [`Selection::Empty`]: nothing clicked yet.
//! - [`Selection::AnchorSet`]: first day clicked.
//! - [`Selection::RangeSet`]: both days clicked, `from <= to`.
//!
//! A completed range is never extended: the next click starts a new
//! selection from that day.
use chrono::{Datelike, Days, Months, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::{DateRange, EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Empty,
    AnchorSet {
        from: NaiveDate,
    },
    RangeSet {
        from: NaiveDate,
        to: NaiveDate,
    },
}

impl Selection {
    /// Applies a day click and returns the next state.
    #[must_use]
    pub fn click(self, day: NaiveDate) -> Self {
        match self {
            Self::Empty | Self::RangeSet { .. } => Self::AnchorSet { from: day },
            Self::AnchorSet { from } if day < from => Self::RangeSet { from: day, to: from },
            Self::AnchorSet { from } => Self::RangeSet { from, to: day },
        }
    }

    /// `true` when `day` lies inside a completed range.
    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        match self {
            Self::RangeSet { from, to } => *from <= day && day <= *to,
            _ => false,
        }
    }

    /// `true` when `day` is the anchor or one of the range ends.
    #[must_use]
    pub fn is_endpoint(&self, day: NaiveDate) -> bool {
        match self {
            Self::Empty => false,
            Self::AnchorSet { from } => *from == day,
            Self::RangeSet { from, to } => *from == day || *to == day,
        }
    }

    /// Converts a completed selection into instants at local midnight.
    ///
    /// Fails with [`EngineError::IncompleteRange`] in `Empty` and `AnchorSet`.
    pub fn to_range<Tz: TimeZone>(&self, tz: &Tz) -> ResultEngine<DateRange> {
        let Self::RangeSet { from, to } = *self else {
            return Err(EngineError::IncompleteRange);
        };
        DateRange::new(local_midnight(from, tz)?, local_midnight(to, tz)?)
    }
}

fn local_midnight<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> ResultEngine<chrono::DateTime<Utc>> {
    tz.from_local_datetime(&day.and_time(NaiveTime::MIN))
        .earliest()
        .map(|instant| instant.with_timezone(&Utc))
        .ok_or_else(|| EngineError::InvalidRange(format!("{day} has no local midnight")))
}

/// One calendar page: Sunday-first cells, `None` for the leading blanks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub cells: Vec<Option<NaiveDate>>,
}

impl MonthGrid {
    /// Builds the page of `month` (1-based). Returns `None` for an invalid month.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let leading = first.weekday().num_days_from_sunday() as usize;

        let mut cells = vec![None; leading];
        cells.extend(
            first
                .iter_days()
                .take_while(|day| day.month() == month)
                .map(Some),
        );

        Some(Self { year, month, cells })
    }

    /// Rows of seven cells, the last one padded with `None`.
    #[must_use]
    pub fn weeks(&self) -> Vec<[Option<NaiveDate>; 7]> {
        self.cells
            .chunks(7)
            .map(|chunk| {
                let mut week = [None; 7];
                week[..chunk.len()].copy_from_slice(chunk);
                week
            })
            .collect()
    }
}

/// Custom range picker: the selection plus the visible month and a day cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Picker {
    selection: Selection,
    cursor: NaiveDate,
    month: NaiveDate,
}

impl Picker {
    /// Opens the picker on the month of `today` with an empty selection.
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self {
            selection: Selection::Empty,
            cursor: today,
            month: first_of_month(today),
        }
    }

    /// Opens the picker showing an already applied range.
    #[must_use]
    pub fn with_selection(today: NaiveDate, selection: Selection) -> Self {
        Self {
            selection,
            ..Self::new(today)
        }
    }

    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    #[must_use]
    pub fn cursor(&self) -> NaiveDate {
        self.cursor
    }

    pub fn click(&mut self, day: NaiveDate) {
        self.selection = self.selection.click(day);
        tracing::debug!("picker selection: {:?}", self.selection);
    }

    pub fn click_cursor(&mut self) {
        self.click(self.cursor);
    }

    /// Moves the cursor by `days` and follows it to another month if needed.
    pub fn move_cursor(&mut self, days: i64) {
        let moved = if days >= 0 {
            self.cursor.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            self.cursor.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        if let Some(cursor) = moved {
            self.cursor = cursor;
            self.month = first_of_month(cursor);
        }
    }

    pub fn prev_month(&mut self) {
        self.shift_month(false);
    }

    pub fn next_month(&mut self) {
        self.shift_month(true);
    }

    fn shift_month(&mut self, forward: bool) {
        let shifted = if forward {
            self.month.checked_add_months(Months::new(1))
        } else {
            self.month.checked_sub_months(Months::new(1))
        };
        let Some(month) = shifted else {
            return;
        };
        self.month = month;
        // Keep the day of month, clamped to the length of the new month.
        let day = self.cursor.day().min(days_in_month(month));
        self.cursor = month.with_day(day).unwrap_or(month);
    }

    #[must_use]
    pub fn grid(&self) -> MonthGrid {
        MonthGrid::new(self.month.year(), self.month.month()).unwrap_or(MonthGrid {
            year: self.month.year(),
            month: self.month.month(),
            cells: Vec::new(),
        })
    }

    /// Validates the selection for "Apply".
    pub fn confirm<Tz: TimeZone>(&self, tz: &Tz) -> ResultEngine<DateRange> {
        self.selection.to_range(tz)
    }
}

fn first_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

fn days_in_month(first: NaiveDate) -> u32 {
    first
        .iter_days()
        .take_while(|day| day.month() == first.month())
        .count() as u32
}
