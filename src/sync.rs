//! One-way synchronization with a remote customer directory.
//!
//! The remote API is reached in two steps: a token login (POST `{base}/auth`
//! with `login_id`/`password`, returning `access_token`) and a bearer-
//! authenticated list fetch (GET `{base}/customers`). Remote records are
//! merged into local storage insert/update only - local records are never
//! deleted by a sync.

use serde::Deserialize;
use url::Url;

use crate::db::{Customer, CustomerProfile, Database};

/// Remote directory endpoint and credentials, fixed at startup.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub base_url: Url,
    pub login_id: String,
    pub password: String,
}

/// A customer record as returned by the remote directory.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteCustomer {
    pub uuid: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
}

impl RemoteCustomer {
    fn profile(&self) -> CustomerProfile {
        CustomerProfile {
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone: self.phone.clone(),
            street: self.street.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
        }
    }
}

/// Errors from the sync path.
#[derive(Debug)]
pub enum SyncError {
    /// Transport-level failure talking to the remote directory
    Http(reqwest::Error),
    /// The remote directory answered, but not usefully
    Upstream(String),
    /// Local persistence failure while merging
    Database(sqlx::Error),
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::Http(e) => write!(f, "Remote directory request failed: {}", e),
            SyncError::Upstream(msg) => write!(f, "Remote directory error: {}", msg),
            SyncError::Database(e) => write!(f, "Database error during sync: {}", e),
        }
    }
}

impl std::error::Error for SyncError {}

#[derive(serde::Serialize)]
struct RemoteLoginRequest<'a> {
    login_id: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct RemoteLoginResponse {
    access_token: String,
}

/// HTTP client for the remote customer directory.
pub struct RemoteDirectory {
    http: reqwest::Client,
    config: RemoteConfig,
}

impl RemoteDirectory {
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, SyncError> {
        self.config
            .base_url
            .join(path)
            .map_err(|e| SyncError::Upstream(format!("Invalid remote URL: {}", e)))
    }

    /// Log in to the remote directory and return its access token.
    async fn fetch_access_token(&self) -> Result<String, SyncError> {
        let response = self
            .http
            .post(self.endpoint("auth")?)
            .json(&RemoteLoginRequest {
                login_id: &self.config.login_id,
                password: &self.config.password,
            })
            .send()
            .await
            .map_err(SyncError::Http)?;

        if !response.status().is_success() {
            return Err(SyncError::Upstream(format!(
                "Remote login failed with status {}",
                response.status()
            )));
        }

        let body: RemoteLoginResponse = response.json().await.map_err(SyncError::Http)?;
        Ok(body.access_token)
    }

    /// Fetch the full remote customer list.
    pub async fn fetch_customers(&self) -> Result<Vec<RemoteCustomer>, SyncError> {
        let token = self.fetch_access_token().await?;

        let response = self
            .http
            .get(self.endpoint("customers")?)
            .bearer_auth(token)
            .send()
            .await
            .map_err(SyncError::Http)?;

        if !response.status().is_success() {
            return Err(SyncError::Upstream(format!(
                "Customer list fetch failed with status {}",
                response.status()
            )));
        }

        let customers: Vec<RemoteCustomer> = response.json().await.map_err(SyncError::Http)?;
        tracing::info!(count = customers.len(), "Fetched remote customer list");
        Ok(customers)
    }
}

/// Field-by-field equality between a local record and a remote one.
/// Matching records are considered already synced.
fn profiles_match(local: &Customer, remote: &RemoteCustomer) -> bool {
    local.first_name == remote.first_name
        && local.last_name == remote.last_name
        && local.email == remote.email
        && local.phone == remote.phone
        && local.street == remote.street
        && local.address == remote.address
        && local.city == remote.city
        && local.state == remote.state
}

/// Merge remote records into local storage.
///
/// The logged-in customer (`current_uuid`) is excluded from matching so a
/// sync never treats the session account as remote data. A remote record
/// that field-matches an existing local record is skipped; otherwise it is
/// written under its remote UUID - updated if that UUID exists locally,
/// inserted with an empty password hash (not loginable) if not. A record
/// whose email is already owned by a different local UUID is skipped with a
/// warning, on the update path as well as the insert path. Returns the
/// records that were written.
pub async fn merge_customers(
    db: &Database,
    remote: &[RemoteCustomer],
    current_uuid: &str,
) -> Result<Vec<Customer>, SyncError> {
    let existing = db
        .customers()
        .list_all()
        .await
        .map_err(SyncError::Database)?;

    let mut written = Vec::new();

    for record in remote {
        let already_synced = existing
            .iter()
            .filter(|c| c.uuid != current_uuid)
            .any(|c| profiles_match(c, record));
        if already_synced {
            continue;
        }

        let store = db.customers();

        // A different local record may already own this email; writing
        // would trip the unique constraint and abort the whole sync
        let email_conflict = store
            .get_by_email(&record.email)
            .await
            .map_err(SyncError::Database)?
            .is_some_and(|owner| owner.uuid != record.uuid);
        if email_conflict {
            tracing::warn!(uuid = %record.uuid, email = %record.email,
                "Skipping remote record: email already in use locally");
            continue;
        }

        let updated = store
            .update(&record.uuid, &record.profile())
            .await
            .map_err(SyncError::Database)?;
        if !updated {
            store
                .create(&record.uuid, "", &record.profile())
                .await
                .map_err(SyncError::Database)?;
        }

        if let Some(saved) = store
            .get_by_uuid(&record.uuid)
            .await
            .map_err(SyncError::Database)?
        {
            written.push(saved);
        }
    }

    tracing::info!(written = written.len(), "Sync merge completed");
    Ok(written)
}
