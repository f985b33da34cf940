//! Statutory retirement age resolution.
//!
//! The base age comes from a fixed (job type, gender) table. Special-category
//! workers only keep their lower age after ten years of tenure. A graduated
//! delay keyed on birth year is then applied from an ordered rule table.

use crate::clock::Clock;
use crate::database::models::{Gender, JobType, UserProfile};
use crate::utils::time::{add_months, add_years, start_of_day, MILLIS_PER_DAY};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;

pub const SPECIAL_TENURE_YEARS: i64 = 10;
pub const MAX_DELAY_MONTHS: u32 = 60;

const MILLIS_PER_YEAR: f64 = 365.25 * MILLIS_PER_DAY as f64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetirementPolicy {
    pub normal_retirement_age: u32,
    pub early_retirement_age: Option<u32>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetirementOutcome {
    pub retirement_age: u32,
    pub retirement_date: NaiveDate,
    pub policy: RetirementPolicy,
}

/// One row of the graduated delay table.
struct DelayRule {
    applies_to: fn(Gender, JobType) -> bool,
    first_birth_year: i32,
    months_per_year: u32,
}

impl DelayRule {
    fn delay_months(&self, gender: Gender, job_type: JobType, birth_year: i32) -> Option<u32> {
        if !(self.applies_to)(gender, job_type) || birth_year < self.first_birth_year {
            return None;
        }
        let years_past = (birth_year - self.first_birth_year) as u32;
        Some(years_past.saturating_mul(self.months_per_year).min(MAX_DELAY_MONTHS))
    }
}

fn female_general(gender: Gender, job_type: JobType) -> bool {
    gender == Gender::Female && job_type == JobType::General
}

fn female_cadre(gender: Gender, job_type: JobType) -> bool {
    gender == Gender::Female && matches!(job_type, JobType::CivilServant | JobType::Enterprise)
}

fn male_any(gender: Gender, _job_type: JobType) -> bool {
    gender == Gender::Male
}

// Evaluated top to bottom, first match wins.
const DELAY_RULES: &[DelayRule] = &[
    DelayRule {
        applies_to: female_general,
        first_birth_year: 1965,
        months_per_year: 4,
    },
    DelayRule {
        applies_to: female_cadre,
        first_birth_year: 1963,
        months_per_year: 6,
    },
    DelayRule {
        applies_to: male_any,
        first_birth_year: 1962,
        months_per_year: 4,
    },
];

/// Months of graduated delay, or `None` when no delay rule covers the person.
pub fn delay_months(gender: Gender, job_type: JobType, birth_year: i32) -> Option<u32> {
    DELAY_RULES
        .iter()
        .find_map(|rule| rule.delay_months(gender, job_type, birth_year))
}

pub fn base_policy(gender: Gender, job_type: JobType) -> RetirementPolicy {
    let (age, early, description) = match (job_type, gender) {
        (JobType::General, Gender::Male) => (60, None, "Male workers retire at 60"),
        (JobType::General, Gender::Female) => (
            50,
            Some(45),
            "Female workers retire at 50, or 45 in special-category roles",
        ),
        (JobType::CivilServant, Gender::Male) => (
            60,
            None,
            "Male civil servants and public institution staff retire at 60",
        ),
        (JobType::CivilServant, Gender::Female) => (
            55,
            None,
            "Female civil servants and public institution staff retire at 55",
        ),
        (JobType::Enterprise, Gender::Male) => (60, None, "Male enterprise staff retire at 60"),
        (JobType::Enterprise, Gender::Female) => {
            (55, None, "Female enterprise managers retire at 55")
        }
        (JobType::Special, Gender::Male) => {
            (55, None, "Male special-category workers retire at 55")
        }
        (JobType::Special, Gender::Female) => {
            (45, None, "Female special-category workers retire at 45")
        }
        (JobType::Flexible, Gender::Male) => {
            (60, None, "Male flexible-employment workers retire at 60")
        }
        (JobType::Flexible, Gender::Female) => {
            (55, None, "Female flexible-employment workers retire at 55")
        }
        (JobType::Other, Gender::Male) => (60, None, "General policy applies"),
        (JobType::Other, Gender::Female) => (55, None, "General policy applies"),
    };

    RetirementPolicy {
        normal_retirement_age: age,
        early_retirement_age: early,
        description: description.to_string(),
    }
}

fn general_age(gender: Gender) -> u32 {
    match gender {
        Gender::Male => 60,
        Gender::Female => 50,
    }
}

/// Completed years between `work_start_date` and `now`, using 365.25-day years.
pub fn calculate_work_years(work_start_date: NaiveDate, now: NaiveDateTime) -> i64 {
    let elapsed = now
        .signed_duration_since(start_of_day(work_start_date))
        .num_milliseconds();
    (elapsed as f64 / MILLIS_PER_YEAR).floor() as i64
}

pub fn calculate_retirement(
    gender: Gender,
    job_type: JobType,
    birth_date: NaiveDate,
    work_start_date: Option<NaiveDate>,
    clock: &dyn Clock,
) -> RetirementOutcome {
    let policy = base_policy(gender, job_type);
    let mut retirement_age = policy.normal_retirement_age;

    if job_type == JobType::Special {
        if let Some(work_start) = work_start_date {
            let work_years = calculate_work_years(work_start, clock.now());
            if work_years < SPECIAL_TENURE_YEARS {
                tracing::debug!(
                    "Special-category tenure {} years below {}, using general age",
                    work_years,
                    SPECIAL_TENURE_YEARS
                );
                retirement_age = general_age(gender);
            }
        }
    }

    let base_date = add_years(birth_date, retirement_age as i32);

    match delay_months(gender, job_type, birth_date.year()) {
        Some(months) => RetirementOutcome {
            retirement_age: retirement_age + months / 12,
            retirement_date: add_months(base_date, months as i32),
            policy,
        },
        None => RetirementOutcome {
            retirement_age,
            retirement_date: base_date,
            policy,
        },
    }
}

/// Human-readable explanation of the policy that applies to `profile`.
pub fn policy_explanation(profile: &UserProfile, clock: &dyn Clock) -> String {
    let policy = base_policy(profile.gender, profile.job_type);
    let mut explanation = policy.description;

    if profile.job_type == JobType::Special {
        if let Some(work_start) = profile.work_start_date {
            let work_years = calculate_work_years(work_start, clock.now());
            if work_years >= SPECIAL_TENURE_YEARS {
                explanation.push_str(&format!(
                    "\nYears worked: {}, special-category retirement conditions met.",
                    work_years
                ));
            } else {
                explanation.push_str(&format!(
                    "\nYears worked: {}, {} years are required to retire as a special-category worker.",
                    work_years, SPECIAL_TENURE_YEARS
                ));
            }
        }
    }

    if delay_months(profile.gender, profile.job_type, profile.birth_date.year()).is_some() {
        explanation.push_str(
            "\n\nNote: under the delayed retirement policy your actual retirement date may be adjusted.",
        );
    }

    explanation
}
