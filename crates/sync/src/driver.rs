use sheetsync_contracts::{AppRecord, Table, UserAppRecord};
use sheetsync_sheets::{Filtered, filter_apps, filter_user_apps, parse_csv};
use sheetsync_store::{StoreError, UpsertStore};

use crate::config::SyncConfig;
use crate::fetch::{FetchError, SheetFetcher};

#[derive(Debug)]
pub enum SyncError {
    Fetch(FetchError),
    Store(StoreError),
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::Fetch(err) => write!(f, "ERR_FETCH {}", err),
            SyncError::Store(err) => write!(f, "ERR_STORE {}", err),
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::Fetch(err) => Some(err),
            SyncError::Store(err) => Some(err),
        }
    }
}

impl From<FetchError> for SyncError {
    fn from(value: FetchError) -> Self {
        SyncError::Fetch(value)
    }
}

impl From<StoreError> for SyncError {
    fn from(value: StoreError) -> Self {
        SyncError::Store(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prepared {
    pub apps: Filtered<AppRecord>,
    pub user_apps: Filtered<UserAppRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub apps_upserted: usize,
    pub apps_rejected: usize,
    pub user_apps_upserted: usize,
    pub user_apps_rejected: usize,
}

pub fn prepare(users_csv: &str, apps_csv: &str) -> Prepared {
    let apps = filter_apps(&parse_csv(apps_csv));
    let user_apps = filter_user_apps(&parse_csv(users_csv));
    Prepared { apps, user_apps }
}

// apps goes first so user_apps rows can reference existing app_no values.
// A user_apps failure leaves the apps upsert in place.
pub async fn run<S>(
    config: &SyncConfig,
    fetcher: &SheetFetcher,
    store: &S,
) -> Result<SyncReport, SyncError>
where
    S: UpsertStore,
{
    tracing::info!(
        users_url = %config.users_sheet_url,
        apps_url = %config.apps_sheet_url,
        "fetching sheets"
    );
    let (users_csv, apps_csv) = tokio::try_join!(
        fetcher.fetch_csv(&config.users_sheet_url),
        fetcher.fetch_csv(&config.apps_sheet_url),
    )?;

    let prepared = prepare(&users_csv, &apps_csv);
    if prepared.apps.rejected > 0 || prepared.user_apps.rejected > 0 {
        tracing::warn!(
            apps_rejected = prepared.apps.rejected,
            user_apps_rejected = prepared.user_apps.rejected,
            "dropped incomplete sheet rows"
        );
    }

    tracing::info!(rows = prepared.apps.accepted.len(), "upserting apps");
    store
        .upsert(
            Table::Apps.as_str(),
            &prepared.apps.accepted,
            Table::Apps.conflict_columns(),
        )
        .await?;

    tracing::info!(
        rows = prepared.user_apps.accepted.len(),
        "upserting user_apps"
    );
    store
        .upsert(
            Table::UserApps.as_str(),
            &prepared.user_apps.accepted,
            Table::UserApps.conflict_columns(),
        )
        .await?;

    Ok(SyncReport {
        apps_upserted: prepared.apps.accepted.len(),
        apps_rejected: prepared.apps.rejected,
        user_apps_upserted: prepared.user_apps.accepted.len(),
        user_apps_rejected: prepared.user_apps.rejected,
    })
}
