//! Profile selection from configuration.
//!
//! One string-valued setting picks the active profile, by catalog key or by
//! stable profile id. Resolution is total: anything unrecognized degrades to
//! the documented default with a logged warning, so a bad deployment value
//! can never take the process down. Deployments that would rather fail boot
//! hard can call [`try_resolve`] instead.

use thiserror::Error;
use tracing::warn;

use super::catalog::{self, ProfileKey, DEFAULT_PROFILE_KEY};
use super::models::Profile;

/// Environment variable selecting the active profile by key or id.
pub const ENV_ACTIVE_PROFILE: &str = "AUTHFLOW_PROFILE";

/// Invalid-configuration class: recoverable, the caller decides whether to
/// substitute the default or abort.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("unknown authentication profile selector: {0:?}")]
    UnknownSelector(String),
}

/// Strict resolution by exact catalog key, then by stable profile id.
///
/// # Errors
/// Returns [`ResolveError::UnknownSelector`] when the value names neither a
/// catalog key nor a profile id. Matching is exact and case-sensitive.
pub fn try_resolve(value: &str) -> Result<&'static Profile, ResolveError> {
    if let Some(key) = ProfileKey::from_str(value) {
        return Ok(catalog::get(key));
    }
    catalog::find_by_id(value).ok_or_else(|| ResolveError::UnknownSelector(value.to_string()))
}

/// Total resolution: always returns a catalog profile.
///
/// Empty or absent values select the default. Unrecognized values log a
/// warning and select the default; they never fail.
#[must_use]
pub fn resolve(value: Option<&str>) -> &'static Profile {
    let Some(value) = value.filter(|value| !value.is_empty()) else {
        return catalog::get(DEFAULT_PROFILE_KEY);
    };
    match try_resolve(value) {
        Ok(profile) => profile,
        Err(err) => {
            warn!("{err}, using default profile");
            catalog::get(DEFAULT_PROFILE_KEY)
        }
    }
}

/// Resolve the active profile from the environment.
#[must_use]
pub fn from_env() -> &'static Profile {
    resolve(std::env::var(ENV_ACTIVE_PROFILE).ok().as_deref())
}
