use crate::database::models::{DailyTimeRecord, TimeData, UserProfile};
use crate::engine::career::{CareerTimeDistribution, TimeAnalysis};
use crate::engine::countdown::CountdownUnit;
use crate::utils::time::{format_date, relative_date_label, safe_format_date};
use chrono::NaiveDate;

pub const CALCULATION_ERROR: &str = "calculation error";

pub fn format_hours(hours: f64) -> String {
    format!("{:.1}h", hours)
}

pub fn format_countdown_line(countdown: &str, unit: CountdownUnit) -> String {
    if countdown.parse::<i64>().is_ok() {
        format!("⏳ {} {} until retirement", countdown, unit)
    } else {
        format!("⏳ {}", countdown)
    }
}

pub fn format_status(
    profile: &UserProfile,
    age: i32,
    countdown: &str,
    unit: CountdownUnit,
    progress: f64,
    explanation: &str,
) -> String {
    let mut status = String::new();

    status.push_str(&format!(
        "👤 {}, {} ({}, {})\n",
        profile.name,
        age,
        profile.gender,
        profile.job_type.description()
    ));
    let work_start = profile.work_start_date.map(format_date);
    status.push_str(&format!("🏁 Work start: {}\n", safe_format_date(work_start.as_deref())));
    status.push_str(&format!(
        "📅 Retirement: {} at age {}\n",
        format_date(profile.retirement_date()),
        profile.retirement_age()
    ));
    status.push_str(&format_countdown_line(countdown, unit));
    status.push('\n');
    status.push_str(&format!("📊 Career {:.1}% complete\n", progress));
    status.push('\n');
    status.push_str(explanation);

    status
}

pub fn format_time_data(date: NaiveDate, data: &TimeData) -> String {
    format!(
        "📅 {}\n   💼 Work:  {} ({:.1}%)\n   😴 Sleep: {} ({:.1}%)\n   🌿 Free:  {} ({:.1}%)",
        format_date(date),
        format_hours(data.work.hours),
        data.work.percentage,
        format_hours(data.sleep.hours),
        data.sleep.percentage,
        format_hours(data.free.hours),
        data.free.percentage
    )
}

pub fn format_career_report(career: &CareerTimeDistribution) -> String {
    let mut report = String::new();

    report.push_str(&format!(
        "🗓️ Career: {} days total, {} worked, {} remaining\n",
        career.total_days, career.worked_days, career.remaining_days
    ));
    report.push_str(&format!(
        "📈 Averages from {} recorded days: work {}, sleep {}, free {}\n\n",
        career.historical_days_count,
        format_hours(career.averages.work),
        format_hours(career.averages.sleep),
        format_hours(career.averages.free)
    ));

    let rows = [
        ("Spent work", &career.spent_work),
        ("Spent sleep", &career.spent_sleep),
        ("Spent free", &career.spent_free),
        ("Remaining work", &career.remaining_work),
        ("Remaining sleep", &career.remaining_sleep),
        ("Remaining free", &career.remaining_free),
    ];
    for (label, slice) in rows {
        report.push_str(&format!(
            "   {:<16} {:>12} ({:.1}%)\n",
            label,
            format_hours(slice.hours),
            slice.percentage
        ));
    }

    report.push_str(&format!(
        "\n🎯 Unspent before retirement: {} ({:.1}%)",
        format_hours(career.unspent_time.hours),
        career.unspent_time.percentage
    ));

    report
}

pub fn format_time_analysis(analysis: &TimeAnalysis) -> String {
    format!(
        "Average per scheduled day: work {}, sleep {}, free {}\n{} days until retirement, about {} days of free time",
        format_hours(analysis.average_work_hours),
        format_hours(analysis.average_sleep_hours),
        format_hours(analysis.average_free_hours),
        analysis.days_until_retirement,
        (analysis.free_time_until_retirement / 24.0).floor()
    )
}

pub fn format_history(records: &[DailyTimeRecord], today: NaiveDate) -> String {
    if records.is_empty() {
        return "No time records yet".to_string();
    }

    let mut history = String::new();
    for record in records {
        history.push_str(&format!(
            "{:<12} 💼 {:>6} 😴 {:>6} 🌿 {:>6}\n",
            relative_date_label(record.date, today),
            format_hours(record.time_data.work.hours),
            format_hours(record.time_data.sleep.hours),
            format_hours(record.time_data.free.hours)
        ));
    }
    history
}

pub fn format_error_message(error: &str) -> String {
    format!("❌ Error: {}", error)
}

pub fn format_success_message(message: &str) -> String {
    format!("✅ {}", message)
}
