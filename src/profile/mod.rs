//! Authentication-flow profiles: definition, catalog, resolution, projection.
//!
//! Flow Overview:
//! 1) [`resolver::resolve`] turns the deployment's configuration value into
//!    exactly one catalog profile, once per boot or per config read.
//! 2) [`client::ClientProfile::project`] derives the reduced view handed to
//!    front-end collaborators.
//! 3) The identity boundary consults [`crate::enforce`] with the same
//!    profile for every inbound authentication request.
//! 4) After a primary method succeeds, the session-issuance collaborator
//!    reads [`models::MfaPolicy`] to decide on a second factor.
//!
//! Security boundaries:
//! - Only [`models::Profile::id`] may be persisted; catalog keys are an
//!   internal detail.
//! - The server enforcement table never crosses the projection boundary.

pub mod catalog;
pub mod client;
pub mod models;
pub mod resolver;

pub use catalog::{ProfileKey, DEFAULT_PROFILE_KEY};
pub use client::ClientProfile;
pub use models::{AuthMethod, Identifier, MfaFactor, MfaMode, Profile, ProfileError};
pub use resolver::{resolve, try_resolve, ResolveError};
