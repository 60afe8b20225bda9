use std::fmt;

use time::{Month, OffsetDateTime, UtcOffset};

/// A calendar month, e.g. 2024-03.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    pub year: i32,
    pub month: Month,
}

impl Period {
    pub const fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    /// The month `at` falls in, read from its calendar fields at `offset`.
    pub fn of(at: OffsetDateTime, offset: UtcOffset) -> Self {
        let local = at.to_offset(offset);
        Self::new(local.year(), local.month())
    }

    pub fn previous(self) -> Self {
        match self.month {
            Month::January => Self::new(self.year - 1, Month::December),
            month => Self::new(self.year, month.previous()),
        }
    }

    pub fn contains(self, at: OffsetDateTime, offset: UtcOffset) -> bool {
        Self::of(at, offset) == self
    }

    /// `count` consecutive months ending with `self`, oldest first.
    pub fn trailing(self, count: usize) -> Vec<Period> {
        let mut periods: Vec<Period> = std::iter::successors(Some(self), |p| Some(p.previous()))
            .take(count)
            .collect();
        periods.reverse();
        periods
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, u8::from(self.month))
    }
}
