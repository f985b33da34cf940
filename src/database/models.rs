use crate::error::Error;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => Err(Error::UnknownGender(other.to_string())),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Employment category driving the base retirement age.
///
/// `Other` covers categories read back from storage that this build does
/// not know about; it follows the general 60/55 table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    General,
    Special,
    CivilServant,
    Enterprise,
    Flexible,
    Other,
}

impl JobType {
    pub const ALL: [JobType; 5] = [
        JobType::General,
        JobType::Special,
        JobType::CivilServant,
        JobType::Enterprise,
        JobType::Flexible,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::General => "general",
            JobType::Special => "special",
            JobType::CivilServant => "civil_servant",
            JobType::Enterprise => "enterprise",
            JobType::Flexible => "flexible",
            JobType::Other => "other",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            JobType::General => "general worker",
            JobType::Special => "special-category worker",
            JobType::CivilServant => "civil servant / public institution",
            JobType::Enterprise => "enterprise manager",
            JobType::Flexible => "flexible employment",
            JobType::Other => "other",
        }
    }

    /// Lenient conversion for stored values: unknown strings become `Other`.
    pub fn from_stored(s: &str) -> Self {
        s.parse().unwrap_or(JobType::Other)
    }
}

impl FromStr for JobType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        JobType::ALL
            .into_iter()
            .find(|job_type| job_type.as_str() == normalized)
            .ok_or(Error::UnknownJobType(normalized))
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub job_type: JobType,
    pub work_start_date: Option<NaiveDate>,
    // Derived from the policy inputs above, only written by the profile store.
    pub(crate) retirement_age: u32,
    pub(crate) retirement_date: NaiveDate,
    pub profile_image: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl UserProfile {
    pub fn retirement_age(&self) -> u32 {
        self.retirement_age
    }

    pub fn retirement_date(&self) -> NaiveDate {
        self.retirement_date
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeSlice {
    pub hours: f64,
    pub percentage: f64,
}

impl TimeSlice {
    pub fn new(hours: f64, percentage: f64) -> Self {
        Self { hours, percentage }
    }

    /// Slice of a 24 hour day.
    pub fn of_day(hours: f64) -> Self {
        Self {
            hours,
            percentage: hours / 24.0 * 100.0,
        }
    }
}

/// Work/sleep/free split of a single day.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeData {
    pub work: TimeSlice,
    pub sleep: TimeSlice,
    pub free: TimeSlice,
}

impl TimeData {
    /// Builds a day from work and sleep hours; free time is the clamped residual.
    pub fn from_hours(work_hours: f64, sleep_hours: f64) -> Self {
        let free_hours = (24.0 - work_hours - sleep_hours).max(0.0);
        Self {
            work: TimeSlice::of_day(work_hours),
            sleep: TimeSlice::of_day(sleep_hours),
            free: TimeSlice::of_day(free_hours),
        }
    }

    pub fn total_hours(&self) -> f64 {
        self.work.hours + self.sleep.hours + self.free.hours
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTimeRecord {
    pub date: NaiveDate,
    pub time_data: TimeData,
    pub timestamp: NaiveDateTime,
}

/// Raw clock times for one day, each `HH:MM`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySchedule {
    pub date: NaiveDate,
    pub work_start_time: String,
    pub work_end_time: String,
    pub sleep_time: String,
    pub wake_up_time: String,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}
