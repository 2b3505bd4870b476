//! Calendar arithmetic and date parsing.
//!
//! Notes are keyed by [`NaiveDate`]. The [`DateService`] trait is the seam the
//! controller uses, so tests can pin "today" with [`FixedDates`].

use chrono::{Days, Local, NaiveDate};

/// Formats accepted by [`DateService::parse`], tried in order.
const INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d/%m/%Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

/// Format used for note file names and the note's title line.
pub const STORAGE_FORMAT: &str = "%Y-%m-%d";

/// Source of "today" plus the date arithmetic built on it.
pub trait DateService {
    /// The current local date.
    fn today(&self) -> NaiveDate;

    /// The day before `date`.
    fn yesterday(&self, date: NaiveDate) -> NaiveDate {
        date.checked_sub_days(Days::new(1)).unwrap_or(date)
    }

    /// The day after `date`.
    fn tomorrow(&self, date: NaiveDate) -> NaiveDate {
        date.checked_add_days(Days::new(1)).unwrap_or(date)
    }

    /// Parse user input into a date.
    ///
    /// Accepts `today`, `yesterday`, `tomorrow` (relative to [`Self::today`])
    /// and the numeric and month-name forms in [`INPUT_FORMATS`].
    fn parse(&self, input: &str) -> Option<NaiveDate> {
        let input = input.trim();
        match input.to_lowercase().as_str() {
            "today" => return Some(self.today()),
            "yesterday" => return Some(self.yesterday(self.today())),
            "tomorrow" => return Some(self.tomorrow(self.today())),
            _ => {}
        }
        INPUT_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
    }
}

/// Dates from the local system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemDates;

impl DateService for SystemDates {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock stopped on one day.
#[derive(Debug, Clone, Copy)]
pub struct FixedDates(pub NaiveDate);

impl DateService for FixedDates {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Long form for the status bar, e.g. `Monday, December 15, 2025`.
pub fn format_display(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// `YYYY-MM-DD` form used for file names.
pub fn format_storage(date: NaiveDate) -> String {
    date.format(STORAGE_FORMAT).to_string()
}
