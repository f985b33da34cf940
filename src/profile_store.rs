//! Cached copy of the single persisted profile, rebroadcast to every
//! subscriber whenever it is loaded or written.

use crate::clock::Clock;
use crate::database::models::{Gender, JobType, UserProfile};
use crate::database::queries;
use crate::engine::policy::calculate_retirement;
use crate::utils::validation::validate_profile_dates;
use anyhow::Result;
use chrono::NaiveDate;
use sqlx::SqlitePool;
use tokio::sync::watch;
use uuid::Uuid;

pub const LOAD_FAILED: &str = "failed to load profile";
pub const SAVE_FAILED: &str = "failed to save profile";

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileState {
    pub profile: Option<UserProfile>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for ProfileState {
    fn default() -> Self {
        Self {
            profile: None,
            loading: true,
            error: None,
        }
    }
}

/// Onboarding input.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub name: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub job_type: JobType,
    pub work_start_date: Option<NaiveDate>,
    pub profile_image: Option<String>,
}

/// Partial edit. Birth date and the derived retirement fields are not editable.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub gender: Option<Gender>,
    pub job_type: Option<JobType>,
    pub work_start_date: Option<Option<NaiveDate>>,
    pub profile_image: Option<Option<String>>,
}

impl ProfileUpdate {
    fn touches_policy(&self) -> bool {
        self.gender.is_some() || self.job_type.is_some() || self.work_start_date.is_some()
    }
}

pub struct ProfileStore {
    pool: SqlitePool,
    state: watch::Sender<ProfileState>,
}

impl ProfileStore {
    pub fn new(pool: SqlitePool) -> Self {
        let (state, _) = watch::channel(ProfileState::default());
        Self { pool, state }
    }

    pub fn subscribe(&self) -> watch::Receiver<ProfileState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> ProfileState {
        self.state.borrow().clone()
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.state.borrow().profile.clone()
    }

    fn publish(&self, profile: Option<UserProfile>, loading: bool, error: Option<String>) {
        self.state.send_replace(ProfileState {
            profile,
            loading,
            error,
        });
    }

    /// Reads the stored profile; `None` means the user has not onboarded yet.
    pub async fn load(&self) -> Result<Option<UserProfile>> {
        self.publish(None, true, None);

        match queries::get_profile(&self.pool).await {
            Ok(profile) => {
                self.publish(profile.clone(), false, None);
                Ok(profile)
            }
            Err(e) => {
                tracing::error!("Error loading profile: {:?}", e);
                self.publish(None, false, Some(LOAD_FAILED.to_string()));
                Err(e)
            }
        }
    }

    async fn save(&self, profile: UserProfile) -> Result<UserProfile> {
        let previous = self.profile();

        match queries::save_profile(&self.pool, &profile).await {
            Ok(()) => {
                tracing::info!("Saved profile {}", profile.id);
                self.publish(Some(profile.clone()), false, None);
                Ok(profile)
            }
            Err(e) => {
                tracing::error!("Error saving profile: {:?}", e);
                self.publish(previous, false, Some(SAVE_FAILED.to_string()));
                Err(e)
            }
        }
    }

    pub async fn create(&self, new: NewProfile, clock: &dyn Clock) -> Result<UserProfile> {
        validate_profile_dates(new.birth_date, new.work_start_date, clock.today())?;

        let outcome = calculate_retirement(
            new.gender,
            new.job_type,
            new.birth_date,
            new.work_start_date,
            clock,
        );
        let now = clock.now();

        let profile = UserProfile {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            gender: new.gender,
            birth_date: new.birth_date,
            job_type: new.job_type,
            work_start_date: new.work_start_date,
            retirement_age: outcome.retirement_age,
            retirement_date: outcome.retirement_date,
            profile_image: new.profile_image,
            created_at: now,
            updated_at: now,
        };

        self.save(profile).await
    }

    pub async fn update(&self, update: ProfileUpdate, clock: &dyn Clock) -> Result<UserProfile> {
        let Some(mut profile) = self.profile() else {
            anyhow::bail!("no profile to update, onboard first");
        };
        let recompute = update.touches_policy();

        if let Some(name) = update.name {
            profile.name = name;
        }
        if let Some(gender) = update.gender {
            profile.gender = gender;
        }
        if let Some(job_type) = update.job_type {
            profile.job_type = job_type;
        }
        if let Some(work_start_date) = update.work_start_date {
            profile.work_start_date = work_start_date;
        }
        if let Some(profile_image) = update.profile_image {
            profile.profile_image = profile_image;
        }

        if recompute {
            validate_profile_dates(profile.birth_date, profile.work_start_date, clock.today())?;
            let outcome = calculate_retirement(
                profile.gender,
                profile.job_type,
                profile.birth_date,
                profile.work_start_date,
                clock,
            );
            profile.retirement_age = outcome.retirement_age;
            profile.retirement_date = outcome.retirement_date;
        }
        profile.updated_at = clock.now();

        self.save(profile).await
    }

    /// Clears the cached profile after stored data was wiped.
    pub fn reset(&self) {
        self.publish(None, false, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::database::test_support::test_pool;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_profile() -> NewProfile {
        NewProfile {
            name: "Li".to_string(),
            gender: Gender::Male,
            birth_date: date(1990, 1, 1),
            job_type: JobType::General,
            work_start_date: Some(date(2012, 7, 1)),
            profile_image: None,
        }
    }

    #[tokio::test]
    async fn test_create_derives_retirement_and_notifies() {
        let (_dir, pool) = test_pool().await;
        let store = ProfileStore::new(pool.clone());
        let mut rx = store.subscribe();
        let clock = FixedClock::on(date(2024, 6, 1));

        assert_eq!(store.load().await.unwrap(), None);
        assert!(!store.current().loading);

        let profile = store.create(new_profile(), &clock).await.unwrap();
        assert_eq!(profile.retirement_age(), 65);
        assert_eq!(profile.retirement_date(), date(2055, 1, 1));
        assert_eq!(profile.created_at, clock.now());

        assert!(rx.has_changed().unwrap());
        let state = rx.borrow_and_update().clone();
        assert_eq!(state.profile, Some(profile.clone()));
        assert_eq!(state.error, None);

        // A second store sees the persisted profile
        let other = ProfileStore::new(pool);
        assert_eq!(other.load().await.unwrap(), Some(profile));
    }

    #[tokio::test]
    async fn test_update_recomputes_derived_fields() {
        let (_dir, pool) = test_pool().await;
        let store = ProfileStore::new(pool);
        let created = store
            .create(new_profile(), &FixedClock::on(date(2024, 6, 1)))
            .await
            .unwrap();

        let later = FixedClock::on(date(2024, 7, 1));
        let updated = store
            .update(
                ProfileUpdate {
                    gender: Some(Gender::Female),
                    job_type: Some(JobType::CivilServant),
                    ..Default::default()
                },
                &later,
            )
            .await
            .unwrap();

        // Female civil servant born 1990: 55 + 60 months
        assert_eq!(updated.retirement_age(), 60);
        assert_eq!(updated.retirement_date(), date(2050, 1, 1));
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.updated_at, later.now());
    }

    #[tokio::test]
    async fn test_update_without_policy_change_keeps_dates() {
        let (_dir, pool) = test_pool().await;
        let store = ProfileStore::new(pool);
        let created = store
            .create(new_profile(), &FixedClock::on(date(2024, 6, 1)))
            .await
            .unwrap();

        let updated = store
            .update(
                ProfileUpdate {
                    name: Some("Li Wei".to_string()),
                    profile_image: Some(Some("file:///bg.jpg".to_string())),
                    ..Default::default()
                },
                &FixedClock::on(date(2024, 6, 2)),
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Li Wei");
        assert_eq!(updated.retirement_date(), created.retirement_date());
        assert_eq!(updated.profile_image.as_deref(), Some("file:///bg.jpg"));
    }

    #[tokio::test]
    async fn test_inverted_dates_are_rejected() {
        let (_dir, pool) = test_pool().await;
        let store = ProfileStore::new(pool);
        let clock = FixedClock::on(date(2024, 6, 1));

        let mut input = new_profile();
        input.work_start_date = Some(date(1985, 1, 1));
        assert!(store.create(input, &clock).await.is_err());
        assert_eq!(store.load().await.unwrap(), None);

        store.create(new_profile(), &clock).await.unwrap();
        let result = store
            .update(
                ProfileUpdate {
                    work_start_date: Some(Some(date(1980, 1, 1))),
                    ..Default::default()
                },
                &clock,
            )
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_update_before_onboarding_fails() {
        let (_dir, pool) = test_pool().await;
        let store = ProfileStore::new(pool);
        store.load().await.unwrap();

        let result = store
            .update(ProfileUpdate::default(), &FixedClock::on(date(2024, 6, 1)))
            .await;
        assert!(result.is_err());
    }
}
