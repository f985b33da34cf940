pub mod commands;

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::database::models::{Gender, JobType};
use crate::database::{self, queries};
use crate::engine::countdown::CountdownUnit;
use crate::profile_store::{NewProfile, ProfileStore, ProfileUpdate};
use crate::utils::format::format_error_message;
use crate::utils::time::parse_date;
use crate::widget::FileWidgetBridge;
use anyhow::Result;
use chrono::NaiveDate;
use sqlx::SqlitePool;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "retirement-countdown",
    about = "Count down to retirement and see where the working years go"
)]
pub enum Command {
    /// Create the profile used for every calculation
    Onboard {
        #[structopt(long)]
        name: String,
        /// male or female
        #[structopt(long)]
        gender: Gender,
        /// YYYY-MM-DD
        #[structopt(long, parse(try_from_str = parse_date))]
        birth_date: NaiveDate,
        /// general, special, civil_servant, enterprise or flexible
        #[structopt(long, default_value = "general")]
        job_type: JobType,
        /// YYYY-MM-DD, defaults to the 22nd birthday when omitted
        #[structopt(long, parse(try_from_str = parse_date))]
        work_start_date: Option<NaiveDate>,
        /// Background image reference for the widget
        #[structopt(long)]
        image: Option<String>,
    },
    /// Change profile fields; the retirement date is recalculated
    Edit {
        #[structopt(long)]
        name: Option<String>,
        #[structopt(long)]
        gender: Option<Gender>,
        #[structopt(long)]
        job_type: Option<JobType>,
        #[structopt(long, parse(try_from_str = parse_date))]
        work_start_date: Option<NaiveDate>,
        #[structopt(long, conflicts_with = "work_start_date")]
        clear_work_start_date: bool,
        #[structopt(long)]
        image: Option<String>,
        #[structopt(long, conflicts_with = "image")]
        clear_image: bool,
    },
    /// Show the countdown, career progress and policy
    Status {
        /// years, months, days, hours, minutes, seconds or milliseconds
        #[structopt(long)]
        unit: Option<String>,
    },
    /// Keep printing the countdown until interrupted
    Watch {
        #[structopt(long)]
        unit: Option<String>,
    },
    /// Store a day's schedule
    Record {
        /// YYYY-MM-DD, defaults to today
        #[structopt(long, parse(try_from_str = parse_date))]
        date: Option<NaiveDate>,
        /// HH:MM
        #[structopt(long)]
        work_start: String,
        #[structopt(long)]
        work_end: String,
        #[structopt(long)]
        sleep: String,
        #[structopt(long)]
        wake: String,
        #[structopt(long)]
        notes: Option<String>,
    },
    /// Store hand-adjusted work and sleep hours for a day
    Adjust {
        /// YYYY-MM-DD, defaults to today
        #[structopt(long, parse(try_from_str = parse_date))]
        date: Option<NaiveDate>,
        #[structopt(long)]
        work_hours: f64,
        #[structopt(long)]
        sleep_hours: f64,
    },
    /// Show the work/sleep/free split of one day
    Today {
        #[structopt(long, parse(try_from_str = parse_date))]
        date: Option<NaiveDate>,
    },
    /// Project work, sleep and free time over the whole career
    Career,
    /// List recent daily records
    History {
        #[structopt(long, default_value = "30")]
        days: u64,
    },
    /// Push the current countdown to the home-screen widget
    Widget,
    /// Delete every stored record and the profile
    Reset {
        #[structopt(long)]
        yes: bool,
    },
}

pub struct App {
    pub pool: SqlitePool,
    pub config: Config,
    pub profiles: ProfileStore,
    pub widget: FileWidgetBridge,
    pub clock: Box<dyn Clock>,
}

impl App {
    pub async fn new(config: Config) -> Result<Self> {
        let pool = database::create_connection(&config.database_url).await?;
        Ok(Self::with_clock(pool, config, Box::new(SystemClock)))
    }

    pub fn with_clock(pool: SqlitePool, config: Config, clock: Box<dyn Clock>) -> Self {
        Self {
            profiles: ProfileStore::new(pool.clone()),
            widget: FileWidgetBridge::new(config.widget_data_path.clone()),
            pool,
            config,
            clock,
        }
    }

    /// Explicit `--unit` wins and is remembered; otherwise the stored
    /// preference, then the configured default.
    pub async fn countdown_unit(&self, requested: Option<&str>) -> Result<CountdownUnit> {
        if let Some(unit) = requested {
            let unit = CountdownUnit::parse_lossy(unit);
            queries::put_setting(&self.pool, queries::COUNTDOWN_UNIT_KEY, unit.as_str()).await?;
            return Ok(unit);
        }

        Ok(queries::get_setting(&self.pool, queries::COUNTDOWN_UNIT_KEY)
            .await?
            .map(|unit| CountdownUnit::parse_lossy(&unit))
            .unwrap_or(self.config.countdown_unit))
    }
}

pub async fn run(app: &App, command: Command) -> Result<()> {
    // Promote yesterday's pending data before anything reads the history
    queries::finalize_previous_day(&app.pool, app.clock.today(), app.clock.now()).await?;
    app.profiles.load().await?;

    let output = match command {
        Command::Onboard {
            name,
            gender,
            birth_date,
            job_type,
            work_start_date,
            image,
        } => {
            commands::profile::onboard(
                app,
                NewProfile {
                    name,
                    gender,
                    birth_date,
                    job_type,
                    work_start_date,
                    profile_image: image,
                },
            )
            .await
        }
        Command::Edit {
            name,
            gender,
            job_type,
            work_start_date,
            clear_work_start_date,
            image,
            clear_image,
        } => {
            let update = ProfileUpdate {
                name,
                gender,
                job_type,
                work_start_date: if clear_work_start_date {
                    Some(None)
                } else {
                    work_start_date.map(Some)
                },
                profile_image: if clear_image { Some(None) } else { image.map(Some) },
            };
            commands::profile::edit(app, update).await
        }
        Command::Status { unit } => commands::status::status(app, unit.as_deref()).await,
        Command::Watch { unit } => return commands::status::watch(app, unit.as_deref()).await,
        Command::Record {
            date,
            work_start,
            work_end,
            sleep,
            wake,
            notes,
        } => {
            commands::records::record(
                app,
                commands::records::ScheduleInput {
                    date,
                    work_start,
                    work_end,
                    sleep,
                    wake,
                    notes,
                },
            )
            .await
        }
        Command::Adjust {
            date,
            work_hours,
            sleep_hours,
        } => commands::records::adjust(app, date, work_hours, sleep_hours).await,
        Command::Today { date } => commands::records::today(app, date).await,
        Command::Career => commands::reports::career(app).await,
        Command::History { days } => commands::records::history(app, days).await,
        Command::Widget => commands::status::widget(app).await,
        Command::Reset { yes } => commands::profile::reset(app, yes).await,
    };

    match output {
        Ok(text) => {
            println!("{}", text);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", format_error_message(&format!("{:#}", e)));
            Err(e)
        }
    }
}
