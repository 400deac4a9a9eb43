//! # Authflow (Authentication-Flow Policy Engine)
//!
//! `authflow` is the declarative policy core that decides, per deployment,
//! which identifiers and authentication methods a sign-in flow offers and,
//! on the server side, which wire paths are allowed to complete an
//! authentication request.
//!
//! ## Profiles
//!
//! Flow variants are modeled as a fixed catalog of immutable [`Profile`]
//! values, one per flow shape × identifier combination. Profiles are built
//! once at first use and shared as `&'static` references; nothing in this
//! crate mutates them afterwards, so they are safe to read from any number
//! of concurrent request handlers without synchronization.
//!
//! - **Selection:** a single configuration value (catalog key or stable
//!   profile id) picks the active profile. Unknown values degrade to the
//!   documented default with a logged warning; [`resolve`] never fails.
//! - **Persistence:** only [`Profile::id`] is stable and safe to persist.
//!   Catalog keys are an internal detail and must not leak into storage.
//!
//! ## Enforcement
//!
//! The [`enforce`] module maps inbound request paths back to the
//! authentication method they belong to and checks that method against the
//! active profile. An unmatched path identifies no method and callers must
//! treat that as **deny**: absence of a match is never permission.
//!
//! Security boundaries:
//! - [`ClientProfile`] is the only shape handed to front-end collaborators;
//!   it withholds the server enforcement table so clients cannot learn which
//!   exact paths are accepted.
//! - Path matching is pure and length-guarded; pattern values carry no
//!   mutable scan state that one caller could leak into another.

pub mod enforce;
pub mod profile;

pub use enforce::{is_callback_path, is_method_allowed, is_primary_sign_in_path, method_for_path};
pub use profile::{
    catalog, client::ClientProfile, models::Profile, resolver::resolve, resolver::try_resolve,
    ProfileKey,
};
