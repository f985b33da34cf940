use super::require_profile;
use crate::cli::App;
use crate::database::models::UserProfile;
use crate::engine::countdown::{calculate_retirement_progress, format_time_until_retirement};
use crate::engine::policy::policy_explanation;
use crate::utils::format::{format_countdown_line, format_status, format_success_message};
use crate::utils::time::calculate_age;
use crate::widget::{update_widget_data, WidgetPayload};
use anyhow::Result;

pub async fn status(app: &App, unit: Option<&str>) -> Result<String> {
    let profile = require_profile(app)?;
    let unit = app.countdown_unit(unit).await?;
    let clock = app.clock.as_ref();

    let countdown = format_time_until_retirement(&profile, unit, clock);
    let progress = calculate_retirement_progress(&profile, clock);
    let explanation = policy_explanation(&profile, clock);
    let age = calculate_age(profile.birth_date, clock.today());

    Ok(format_status(&profile, age, &countdown, unit, progress, &explanation))
}

/// Re-renders the countdown on a timer sized to the display unit until Ctrl-C.
pub async fn watch(app: &App, unit: Option<&str>) -> Result<()> {
    let profile = require_profile(app)?;
    let unit = app.countdown_unit(unit).await?;
    let mut ticker = tokio::time::interval(unit.refresh_interval());
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    tracing::info!("Watching countdown in {} every {:?}", unit, unit.refresh_interval());

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let countdown = format_time_until_retirement(&profile, unit, app.clock.as_ref());
                println!("{}", format_countdown_line(&countdown, unit));
            }
            _ = &mut shutdown => {
                tracing::info!("Stopped watching countdown");
                return Ok(());
            }
        }
    }
}

pub(crate) async fn push_widget(app: &App, profile: &UserProfile) -> Result<bool> {
    let unit = app.countdown_unit(None).await?;
    let payload = WidgetPayload::from_profile(profile, app.config.widget_variant, unit, app.clock.as_ref());
    Ok(update_widget_data(&app.widget, &payload))
}

pub async fn widget(app: &App) -> Result<String> {
    let profile = require_profile(app)?;

    if push_widget(app, &profile).await? {
        Ok(format_success_message("Widget updated"))
    } else {
        Ok("Widget is not available, nothing was sent".to_string())
    }
}
