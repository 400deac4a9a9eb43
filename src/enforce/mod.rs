//! Server-side path enforcement for authentication requests.
//!
//! Flow Overview:
//! 1) The identity boundary receives a request trying to complete an
//!    authentication step on some wire path.
//! 2) [`method_for_path`] maps the path back to the authentication method it
//!    belongs to, if any, using the active profile's pattern table.
//! 3) [`is_method_allowed`] checks that method against the profile. A method
//!    the shared identity layer supports can still be refused by the
//!    deployment's profile.
//! 4) An unmatched path identifies no method; callers must deny.
//!
//! Security boundaries:
//! - Matching is fail-closed: unmatched or oversized paths identify no
//!   method, and no predicate here ever errors or panics.
//! - Patterns are immutable values with no retained scan state, so a result
//!   never depends on call history or on concurrent callers.

use regex::Regex;

use crate::profile::models::{AuthMethod, Profile};

/// Maximum path length considered for matching. Longer input is rejected
/// before any pattern test, bounding worst-case matching cost.
pub const MAX_PATH_LEN: usize = 512;

/// Return legs of federated identity redirects.
const CALLBACK_PREFIXES: &[&str] = &["/api/auth/callback/", "/sso-callback"];

/// Exact paths that complete a primary sign-in outside the sign-in family.
const SIGN_IN_COMPLETION_PATHS: &[&str] = &["/magic-link/verify"];

/// Entry points for passkey authentication.
const PASSKEY_SIGN_IN_PREFIXES: &[&str] = &["/sign-in/passkey", "/webauthn/authenticate"];

const SIGN_IN_PREFIX: &str = "/sign-in";

/// One wire-path pattern of the enforcement table.
///
/// Patterns are plain values: [`PathPattern::test`] takes `&self` and keeps
/// nothing between calls. The regex variant stores the expression source and
/// compiles it per test, so there is no shared match cursor that one caller
/// could leave behind for another.
#[derive(Clone, Debug)]
pub enum PathPattern {
    /// Matches when the path equals the value exactly.
    Exact(&'static str),
    /// Regular-expression source. Compiled wrapped in `^(?:...)$`, so it
    /// matches only when the expression spans the whole candidate,
    /// regardless of anchors in the source.
    Pattern(&'static str),
}

impl PathPattern {
    /// Test a path against this pattern. Pure; oversized paths never match.
    #[must_use]
    pub fn test(&self, path: &str) -> bool {
        if path.len() > MAX_PATH_LEN {
            return false;
        }
        match self {
            Self::Exact(expected) => *expected == path,
            // Compiled anchored around the whole source, so every alternation
            // branch must span the full candidate.
            Self::Pattern(source) => {
                Regex::new(&format!("^(?:{source})$")).is_ok_and(|regex| regex.is_match(path))
            }
        }
    }
}

/// Identify which authentication method a request path belongs to.
///
/// Iterates the profile's pattern table in registration order and returns the
/// first method with a matching pattern. `None` means the path belongs to no
/// sanctioned method; callers must treat that as deny.
#[must_use]
pub fn method_for_path(profile: &Profile, path: &str) -> Option<AuthMethod> {
    if path.len() > MAX_PATH_LEN {
        return None;
    }
    profile
        .server
        .method_paths
        .iter()
        .find(|(_, patterns)| patterns.iter().any(|pattern| pattern.test(path)))
        .map(|(method, _)| *method)
}

/// Whether the path is the return leg of a federated identity redirect.
#[must_use]
pub fn is_callback_path(path: &str) -> bool {
    if path.len() > MAX_PATH_LEN {
        return false;
    }
    CALLBACK_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Whether the path belongs to the primary sign-in family: the sign-in
/// routes themselves, federated callbacks, the fixed completion paths
/// (magic-link verification), or passkey authentication entry points.
#[must_use]
pub fn is_primary_sign_in_path(path: &str) -> bool {
    if path.len() > MAX_PATH_LEN {
        return false;
    }
    path.starts_with(SIGN_IN_PREFIX)
        || is_callback_path(path)
        || SIGN_IN_COMPLETION_PATHS.contains(&path)
        || PASSKEY_SIGN_IN_PREFIXES
            .iter()
            .any(|prefix| path.starts_with(prefix))
}

/// The deployment-specific authorization gate: is this primary method
/// sanctioned by the profile?
#[must_use]
pub fn is_method_allowed(profile: &Profile, method: AuthMethod) -> bool {
    profile.server.allowed_primary_methods.contains(&method)
}
