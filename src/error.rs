use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised by the calculation engine and its input validation.
///
/// Stores and the command layer wrap these in `anyhow::Error`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("invalid clock time `{0}`, expected HH:MM")]
    InvalidClockTime(String),

    #[error("invalid date `{0}`, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("work start date {work_start} is before birth date {birth}")]
    WorkStartBeforeBirth {
        birth: NaiveDate,
        work_start: NaiveDate,
    },

    #[error("birth date {0} is in the future")]
    BirthDateInFuture(NaiveDate),

    #[error("date {0} is in the future")]
    FutureDate(NaiveDate),

    #[error("hours must be between 0 and 24, got {0}")]
    InvalidHours(f64),

    #[error("unknown gender `{0}`, expected male or female")]
    UnknownGender(String),

    #[error("unknown job type `{0}`")]
    UnknownJobType(String),
}

pub type Result<T> = std::result::Result<T, Error>;
