//! Create-or-update sync of generated routines against the remote service.
//!
//! Routines are matched to remote state by title. Each week gets its own
//! folder, created on demand. Rate-limited requests are retried with
//! exponential backoff; anything else aborts the sync.

use crate::client::RoutineService;
use crate::config::SyncConfig;
use crate::program::WEEKS;
use crate::retry::{exponential_backoff, retry, Sleeper};
use crate::routine::RoutinePayload;
use crate::{Error, Result};
use std::collections::HashMap;
use std::time::Duration;

/// Routines per week folder, in generation order
pub const ROUTINES_PER_WEEK: usize = 4;

/// Title of the folder holding a week's routines
pub fn week_folder_title(week: u32) -> String {
    format!("531 BBB Week {}", week)
}

/// Knobs for retrying and pacing requests
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SyncOptions {
    pub max_attempts: u32,
    pub backoff_base: Duration,
    pub pacing: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff_base: Duration::from_secs(10),
            pacing: Duration::from_millis(300),
        }
    }
}

impl From<&SyncConfig> for SyncOptions {
    fn from(config: &SyncConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            backoff_base: Duration::from_secs(config.backoff_base_secs),
            pacing: Duration::from_millis(config.pacing_ms),
        }
    }
}

/// How a routine ended up on the remote side
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncAction {
    Created,
    Updated,
}

/// Totals for a finished sync
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
}

/// Drives a sync pass against a [`RoutineService`]
pub struct RoutineSync<'a, S: ?Sized, Z: ?Sized> {
    service: &'a S,
    sleeper: &'a Z,
    options: SyncOptions,
}

impl<'a, S, Z> RoutineSync<'a, S, Z>
where
    S: RoutineService + ?Sized,
    Z: Sleeper + ?Sized,
{
    pub fn new(service: &'a S, sleeper: &'a Z, options: SyncOptions) -> Self {
        Self {
            service,
            sleeper,
            options,
        }
    }

    /// Sync routines grouped four per week, in week order
    pub fn sync(&self, routines: &[RoutinePayload]) -> Result<SyncReport> {
        tracing::info!("Fetching existing folders and routines");
        let folders_by_title: HashMap<String, i64> = self
            .service
            .folders()?
            .into_iter()
            .map(|f| (f.title, f.id))
            .collect();
        let routines_by_title: HashMap<String, String> = self
            .service
            .routines()?
            .into_iter()
            .map(|r| (r.title, r.id))
            .collect();

        let week_folders = self.ensure_week_folders(&folders_by_title)?;

        tracing::info!("Syncing {} routines", routines.len());
        let mut report = SyncReport::default();
        for (index, routine) in routines.iter().enumerate() {
            let week = (index / ROUTINES_PER_WEEK) as u32 + 1;
            let folder_id = week_folders.get(&week).copied().ok_or_else(|| {
                Error::RoutineSync {
                    title: routine.title.clone(),
                    source: Box::new(Error::Config(format!("no folder for week {}", week))),
                }
            })?;

            let existing = routines_by_title.get(&routine.title).map(String::as_str);
            let action = self
                .sync_routine(routine, folder_id, existing)
                .map_err(|e| Error::RoutineSync {
                    title: routine.title.clone(),
                    source: Box::new(e),
                })?;

            match action {
                SyncAction::Created => report.created += 1,
                SyncAction::Updated => report.updated += 1,
            }
            tracing::info!(
                "[{}/{}] {:?}: {}",
                index + 1,
                routines.len(),
                action,
                routine.title
            );

            self.sleeper.sleep(self.options.pacing);
        }

        tracing::info!(
            "Sync complete: created {}, updated {}",
            report.created,
            report.updated
        );
        Ok(report)
    }

    /// Week number -> folder ID, creating any missing week folders
    fn ensure_week_folders(&self, existing: &HashMap<String, i64>) -> Result<HashMap<u32, i64>> {
        let mut week_folders = HashMap::new();
        for week in 1..=WEEKS {
            let title = week_folder_title(week);
            let id = match existing.get(&title) {
                Some(&id) => {
                    tracing::info!("Found existing folder: {}", title);
                    id
                }
                None => {
                    let folder = self
                        .service
                        .create_folder(&title)
                        .map_err(|e| Error::FolderSync {
                            title: title.clone(),
                            source: Box::new(e),
                        })?;
                    tracing::info!("Created folder: {}", title);
                    folder.id
                }
            };
            week_folders.insert(week, id);
        }
        Ok(week_folders)
    }

    /// Create or update one routine, retrying while rate limited
    fn sync_routine(
        &self,
        routine: &RoutinePayload,
        folder_id: i64,
        existing_id: Option<&str>,
    ) -> Result<SyncAction> {
        let payload = match existing_id {
            Some(_) => routine.for_update(),
            None => routine.for_create(folder_id),
        };

        retry(
            self.options.max_attempts,
            exponential_backoff(self.options.backoff_base),
            Error::is_rate_limited,
            self.sleeper,
            |_| match existing_id {
                Some(id) => self
                    .service
                    .update_routine(id, &payload)
                    .map(|_| SyncAction::Updated),
                None => self
                    .service
                    .create_routine(&payload)
                    .map(|_| SyncAction::Created),
            },
        )
    }
}
