use crate::engine::countdown::CountdownUnit;
use crate::widget::WidgetVariant;
use anyhow::Result;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub countdown_unit: CountdownUnit,
    pub widget_data_path: Option<PathBuf>,
    pub widget_variant: WidgetVariant,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:retirement.db".to_string());

        let countdown_unit = env::var("COUNTDOWN_UNIT")
            .map(|unit| CountdownUnit::parse_lossy(&unit))
            .unwrap_or_default();

        let widget_data_path = env::var("WIDGET_DATA_PATH")
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        let widget_variant = env::var("WIDGET_VARIANT")
            .map(|variant| WidgetVariant::parse_lossy(&variant))
            .unwrap_or_default();

        Ok(Config {
            database_url,
            countdown_unit,
            widget_data_path,
            widget_variant,
        })
    }
}
