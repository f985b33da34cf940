//! One-way push of countdown data to the home-screen widget.

use crate::clock::Clock;
use crate::database::models::UserProfile;
use crate::engine::countdown::{calculate_retirement_progress, CountdownUnit};
use crate::utils::time::local_midnight_utc;
use anyhow::{Context, Result};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidgetVariant {
    /// Retirement date and background image only.
    #[default]
    Simple,
    /// Also carries name, display unit and career progress.
    Full,
}

impl WidgetVariant {
    pub fn parse_lossy(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => WidgetVariant::Full,
            _ => WidgetVariant::Simple,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetPayload {
    pub retirement_date: String,
    pub profile_image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_format: Option<CountdownUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
}

impl WidgetPayload {
    pub fn from_profile(
        profile: &UserProfile,
        variant: WidgetVariant,
        unit: CountdownUnit,
        clock: &dyn Clock,
    ) -> Self {
        let retirement_date =
            local_midnight_utc(profile.retirement_date()).to_rfc3339_opts(SecondsFormat::Millis, true);
        let profile_image = profile.profile_image.clone().unwrap_or_default();

        match variant {
            WidgetVariant::Simple => Self {
                retirement_date,
                profile_image,
                name: None,
                current_format: None,
                progress: None,
            },
            WidgetVariant::Full => Self {
                retirement_date,
                profile_image,
                name: Some(profile.name.clone()),
                current_format: Some(unit),
                // The widget expects a 0..1 fraction
                progress: Some(calculate_retirement_progress(profile, clock) / 100.0),
            },
        }
    }
}

pub trait WidgetBridge {
    fn is_available(&self) -> bool;
    fn push(&self, payload: &WidgetPayload) -> Result<()>;
}

/// Writes the payload as JSON to a file shared with the widget process.
#[derive(Debug, Clone)]
pub struct FileWidgetBridge {
    path: Option<PathBuf>,
}

impl FileWidgetBridge {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl WidgetBridge for FileWidgetBridge {
    fn is_available(&self) -> bool {
        self.path.is_some()
    }

    fn push(&self, payload: &WidgetPayload) -> Result<()> {
        let path = self
            .path
            .as_ref()
            .context("widget data path is not configured")?;
        let json = serde_json::to_string_pretty(payload)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write widget data to {}", path.display()))?;
        Ok(())
    }
}

/// Pushes the payload if the widget surface exists. Failures are logged, not returned.
pub fn update_widget_data(bridge: &dyn WidgetBridge, payload: &WidgetPayload) -> bool {
    if !bridge.is_available() {
        tracing::info!("Widget service not available, skipping update");
        return false;
    }

    tracing::debug!("Sending widget data: {:?}", payload);
    match bridge.push(payload) {
        Ok(()) => {
            tracing::info!("Widget data updated, retirement date {}", payload.retirement_date);
            true
        }
        Err(e) => {
            tracing::error!("Failed to update widget data: {:?}", e);
            false
        }
    }
}
