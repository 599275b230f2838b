mod error;
mod lookup;

pub use error::CheckerError;
pub use lookup::LookupRecord;

use config::{Config as CConfig, ConfigError, Environment, File, FileFormat};
use lookup::{build_client, fetch_lookup, HttpsClient};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Maximum number of names the lookup endpoint accepts in one request.
pub const BATCH_SIZE: usize = 100;

pub const DEFAULT_ENDPOINT: &str = "https://api.twitter.com/1.1/users/lookup.json";

const ENV_PREFIX: &str = "TW_CHECKER";

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub bearer_token: String,
    pub endpoint: String,
}

impl Config {
    /// Loads the configuration from `TW_CHECKER_*` environment variables only.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None, Environment::with_prefix(ENV_PREFIX))
    }

    fn load(path: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = CConfig::builder().set_default("endpoint", DEFAULT_ENDPOINT)?;
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Json));
        }

        let config: Self = builder.add_source(env).build()?.try_deserialize()?;
        if config.bearer_token.trim().is_empty() {
            return Err(ConfigError::Message("bearer_token must not be empty".into()));
        }
        Ok(config)
    }
}

/// Reads a JSON config file; `TW_CHECKER_*` environment variables override it.
impl TryFrom<PathBuf> for Config {
    type Error = ConfigError;
    fn try_from(value: PathBuf) -> Result<Self, Self::Error> {
        Self::load(Some(&value), Environment::with_prefix(ENV_PREFIX))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckStatus {
    Active,
    NotFoundOrSuspended,
    Protected,
}

impl CheckStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CheckStatus::Active => "Active",
            CheckStatus::NotFoundOrSuspended => "Suspended or Not found",
            CheckStatus::Protected => "Protected",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl From<Option<&LookupRecord>> for CheckStatus {
    fn from(value: Option<&LookupRecord>) -> Self {
        match value {
            None => CheckStatus::NotFoundOrSuspended,
            Some(record) if record.protected => CheckStatus::Protected,
            Some(_) => CheckStatus::Active,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckResult<'a> {
    pub username: &'a str,
    pub status: CheckStatus,
}

/// Splits `usernames` into consecutive chunks of at most [`BATCH_SIZE`].
pub fn batches<T>(usernames: &[T]) -> std::slice::Chunks<'_, T> {
    usernames.chunks(BATCH_SIZE)
}

/// Assigns a status to every requested name, in request order.
///
/// Names are matched byte for byte against `screen_name`; when the
/// response repeats a name the first record wins.
pub fn classify<'a>(requested: &'a [String], records: &[LookupRecord]) -> Vec<CheckResult<'a>> {
    requested
        .iter()
        .map(|username| CheckResult {
            username,
            status: records
                .iter()
                .find(|record| record.screen_name == *username)
                .into(),
        })
        .collect()
}

pub struct StatusChecker {
    config: Config,
    client: HttpsClient,
}

impl StatusChecker {
    /// Looks up a single batch. Callers must keep it within [`BATCH_SIZE`].
    pub async fn check_batch<'a>(
        &self,
        usernames: &'a [String],
    ) -> Result<Vec<CheckResult<'a>>, CheckerError> {
        let records = fetch_lookup(
            &self.client,
            &self.config.endpoint,
            &self.config.bearer_token,
            usernames,
        )
        .await?;

        Ok(classify(usernames, &records))
    }

    /// Checks every name batch by batch, handing each result to `report`
    /// before the next batch is requested. Stops at the first error.
    pub async fn check_all<F>(&self, usernames: &[String], mut report: F) -> Result<(), CheckerError>
    where
        F: FnMut(&CheckResult<'_>) -> Result<(), CheckerError>,
    {
        for (index, batch) in batches(usernames).enumerate() {
            tracing::info!(batch = index, names = batch.len(), "checking batch");
            for result in self.check_batch(batch).await? {
                report(&result)?;
            }
        }
        Ok(())
    }
}

impl From<Config> for StatusChecker {
    fn from(value: Config) -> Self {
        Self {
            config: value,
            client: build_client(),
        }
    }
}

/// Reads one username per line. Blank lines are kept as empty names.
pub async fn read_usernames(path: &Path) -> Result<Vec<String>, CheckerError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CheckerError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(content
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_owned())
        .collect())
}
