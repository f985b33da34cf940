//! Pure retirement and time-distribution calculations.
//!
//! Nothing in here performs I/O; "now" is always read through a [`Clock`].
//!
//! [`Clock`]: crate::clock::Clock

pub mod career;
pub mod countdown;
pub mod daily;
pub mod policy;

pub use career::{calculate_career_time_distribution, calculate_time_analysis, CareerTimeDistribution, TimeAnalysis};
pub use countdown::{calculate_retirement_progress, format_time_until_retirement, Countdown, CountdownUnit};
pub use daily::calculate_daily_time_distribution;
pub use policy::{calculate_retirement, policy_explanation, RetirementOutcome, RetirementPolicy};
