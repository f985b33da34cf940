use crate::cli::App;
use crate::database::queries;
use crate::engine::policy::policy_explanation;
use crate::profile_store::{NewProfile, ProfileUpdate};
use crate::utils::format::format_success_message;
use crate::utils::time::format_date;
use anyhow::Result;

use super::status::push_widget;

pub async fn onboard(app: &App, new: NewProfile) -> Result<String> {
    if app.profiles.profile().is_some() {
        anyhow::bail!("a profile already exists, use `edit` or `reset`");
    }

    let profile = app.profiles.create(new, app.clock.as_ref()).await?;
    tracing::info!("Onboarded profile {}", profile.id);
    push_widget(app, &profile).await?;

    Ok(format!(
        "{}\n{}",
        format_success_message(&format!(
            "Welcome {}! You retire on {} at age {}.",
            profile.name,
            format_date(profile.retirement_date()),
            profile.retirement_age()
        )),
        policy_explanation(&profile, app.clock.as_ref())
    ))
}

pub async fn edit(app: &App, update: ProfileUpdate) -> Result<String> {
    let profile = app.profiles.update(update, app.clock.as_ref()).await?;
    push_widget(app, &profile).await?;

    Ok(format_success_message(&format!(
        "Profile updated. Retirement on {} at age {}.",
        format_date(profile.retirement_date()),
        profile.retirement_age()
    )))
}

pub async fn reset(app: &App, confirmed: bool) -> Result<String> {
    if !confirmed {
        anyhow::bail!("this deletes all data, pass --yes to confirm");
    }

    queries::clear_all_data(&app.pool).await?;
    app.profiles.reset();

    Ok(format_success_message("All data cleared"))
}
