//! Public, client-safe projection of a profile.
//!
//! Front-end collaborators get the flow shape they need to render the
//! sign-in experience and nothing that weakens enforcement: of the server
//! policy, only the base path and the callback flag survive projection. The
//! pattern table and the allowed-method list stay server-side, so a client
//! cannot learn exactly which wire paths would be accepted.
//!
//! This module is the single place to audit whenever [`Profile`] grows a
//! field.

use serde::Serialize;
use utoipa::ToSchema;

use super::models::{
    AuthenticatePolicy, BiometricStep, IdentifyPolicy, MfaPolicy, Pages, Profile, SmsDelivery,
};

/// The two server-policy fields safe to expose.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct ClientServerPolicy {
    pub base_path: String,
    pub allow_callbacks: bool,
}

/// Reduced profile view for UI collaborators.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct ClientProfile {
    pub id: String,
    pub label: String,
    pub pages: Pages,
    pub identify: IdentifyPolicy,
    pub authenticate: AuthenticatePolicy,
    pub mfa: MfaPolicy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biometric: Option<BiometricStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sms_delivery: Option<SmsDelivery>,
    pub server: ClientServerPolicy,
}

impl ClientProfile {
    /// Pure structural shrink of a profile into its public shape.
    #[must_use]
    pub fn project(profile: &Profile) -> Self {
        Self {
            id: profile.id.to_string(),
            label: profile.label.to_string(),
            pages: profile.pages.clone(),
            identify: profile.identify.clone(),
            authenticate: profile.authenticate.clone(),
            mfa: profile.mfa.clone(),
            biometric: profile.biometric,
            sms_delivery: profile.sms_delivery.clone(),
            server: ClientServerPolicy {
                base_path: profile.server.base_path.clone(),
                allow_callbacks: profile.server.allow_callbacks,
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::profile::catalog;
    use anyhow::{Context, Result};

    #[test]
    fn projection_keeps_only_safe_server_fields() -> Result<()> {
        for profile in catalog::all() {
            let value = serde_json::to_value(ClientProfile::project(profile))?;
            let server = value
                .get("server")
                .and_then(serde_json::Value::as_object)
                .context("missing server object")?;
            let mut keys: Vec<&str> = server.keys().map(String::as_str).collect();
            keys.sort_unstable();
            assert_eq!(keys, ["allow_callbacks", "base_path"], "{}", profile.id);
        }
        Ok(())
    }

    #[test]
    fn projection_never_mentions_the_enforcement_table() -> Result<()> {
        for profile in catalog::all() {
            let rendered = serde_json::to_string(&ClientProfile::project(profile))?;
            assert!(!rendered.contains("method_paths"), "{}", profile.id);
            assert!(
                !rendered.contains("allowed_primary_methods"),
                "{}",
                profile.id
            );
        }
        Ok(())
    }

    #[test]
    fn projection_preserves_the_flow_shape() {
        let profile = catalog::get(catalog::ProfileKey::BiometricsPhone);
        let client = ClientProfile::project(profile);
        assert_eq!(client.id, profile.id);
        assert_eq!(client.label, profile.label);
        assert_eq!(client.authenticate.methods, profile.authenticate.methods);
        assert!(client.biometric.is_some());
        assert!(client.sms_delivery.is_some());
        assert_eq!(client.server.base_path, profile.server.base_path);
        assert_eq!(
            client.server.allow_callbacks,
            profile.server.allow_callbacks
        );
    }
}
