use super::require_profile;
use crate::cli::App;
use crate::database::queries;
use crate::engine::career::{calculate_career_time_distribution, calculate_time_analysis};
use crate::utils::format::{format_career_report, format_time_analysis, CALCULATION_ERROR};
use anyhow::Result;

pub async fn career(app: &App) -> Result<String> {
    let profile = require_profile(app)?;
    let clock = app.clock.as_ref();

    let records = queries::get_all_time_records(&app.pool).await?;
    let career = calculate_career_time_distribution(&profile, &records, clock);

    let schedules = queries::get_all_daily_schedules(&app.pool).await?;
    let analysis = match calculate_time_analysis(&schedules, &profile, clock) {
        Ok(analysis) => format_time_analysis(&analysis),
        Err(e) => {
            tracing::warn!("Failed to analyse stored schedules: {}", e);
            CALCULATION_ERROR.to_string()
        }
    };

    Ok(format!("{}\n\n{}", format_career_report(&career), analysis))
}
