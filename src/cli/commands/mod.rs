pub mod profile;
pub mod records;
pub mod reports;
pub mod status;

use crate::cli::App;
use crate::database::models::UserProfile;
use anyhow::Result;

/// The onboarded profile, or an error telling the user to onboard.
pub(crate) fn require_profile(app: &App) -> Result<UserProfile> {
    app.profiles
        .profile()
        .ok_or_else(|| anyhow::anyhow!("no profile yet, run `onboard` first"))
}
