//! Data model for authentication-flow profiles.
//!
//! A [`Profile`] is one complete, named configuration of a flow variant:
//! which identifiers look a user up, which methods may complete the first
//! factor, when a second factor is evaluated, and which wire paths the
//! server accepts for each method. Profiles are immutable once built.
//!
//! Security boundaries:
//! - [`ServerPolicy`] intentionally implements no serialization; the
//!   enforcement table must never reach a client. The client-safe shape is
//!   [`crate::profile::client::ClientProfile`].
//! - [`Profile::validate`] proves the invariants that keep the UI offer and
//!   the server gate in lockstep; a profile that offers a method the server
//!   does not gate (or the reverse) is a method-confusion bug.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::enforce::PathPattern;

/// How a user is looked up during the identify step.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Identifier {
    Email,
    Phone,
    Username,
}

impl Identifier {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Username => "username",
        }
    }
}

/// A method that can complete the first-factor authentication step.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    Password,
    Passkey,
    EmailOtp,
    SmsOtp,
    MagicLink,
    Social,
}

impl AuthMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::Passkey => "passkey",
            Self::EmailOtp => "email_otp",
            Self::SmsOtp => "sms_otp",
            Self::MagicLink => "magic_link",
            Self::Social => "social",
        }
    }
}

/// One concrete form of a required second authentication check.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MfaFactor {
    Totp,
    BackupCode,
    EmailOtp,
    SmsOtp,
}

/// When a second factor applies at all.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MfaMode {
    Disabled,
    IfUserEnabled,
    RequiredForOrg,
    Always,
}

/// Where federated sign-in buttons appear on the identify page.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SocialPlacement {
    Top,
    Bottom,
    Hidden,
}

/// Route map for the flow's UI steps.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Pages {
    pub identify: String,
    pub method: String,
    pub second_factor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biometric: Option<String>,
}

/// Identify-step policy.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct IdentifyPolicy {
    /// Identifiers accepted for lookup, in display order.
    pub identifiers: Vec<Identifier>,
    /// The identifier the form leads with.
    pub primary: Identifier,
    pub social_placement: SocialPlacement,
    /// Generic response returned whether or not an account exists, so the
    /// identify step cannot be used to enumerate accounts.
    pub generic_response: String,
}

/// Automatic passkey attempt before the user picks a method.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema)]
pub struct AutoPasskey {
    /// Attempt as soon as the identify step completes.
    pub immediate: bool,
    /// Let the user dismiss the attempt and fall back to the method chooser.
    pub allow_skip: bool,
}

/// Authenticate-step policy.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatePolicy {
    /// Methods enabled for this flow, in display order.
    pub methods: Vec<AuthMethod>,
    /// Method the UI leads with.
    pub preferred: AuthMethod,
    /// Methods that need an identifier before they can start.
    pub require_identifier_for: Vec<AuthMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_passkey: Option<AutoPasskey>,
}

/// Second-factor trigger policy. Data only; the session-issuance boundary
/// evaluates it after a primary method succeeds.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct MfaPolicy {
    pub mode: MfaMode,
    /// Acceptable second factors, in preference order.
    pub factors: Vec<MfaFactor>,
    /// Primary methods after which a second factor must be evaluated.
    pub trigger_on_primary: Vec<AuthMethod>,
    /// Primary methods exempt from a second factor because they already
    /// prove possession and inherence (a device-bound passkey, typically).
    pub skip_if_primary_in: Vec<AuthMethod>,
}

impl MfaPolicy {
    /// Whether a second factor must be evaluated after `primary` succeeded.
    ///
    /// Membership in `skip_if_primary_in` wins over membership in
    /// `trigger_on_primary` for the same method.
    #[must_use]
    pub fn second_factor_after(&self, primary: AuthMethod) -> bool {
        if self.skip_if_primary_in.contains(&primary) {
            return false;
        }
        match self.mode {
            MfaMode::Disabled => false,
            MfaMode::Always | MfaMode::RequiredForOrg => true,
            MfaMode::IfUserEnabled => self.trigger_on_primary.contains(&primary),
        }
    }
}

/// Dedicated device-bound step offered before the generic method chooser.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema)]
pub struct BiometricStep {
    pub offer_before_methods: bool,
    pub allow_skip: bool,
}

/// SMS one-time-code delivery descriptor. Transport itself is out of scope;
/// this only describes what the flow promises the user.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SmsDelivery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    pub resend_cooldown_seconds: u32,
    pub code_length: u8,
}

/// Server-side enforcement policy. Never serialized: the pattern table would
/// tell a client exactly which wire paths are accepted.
#[derive(Clone, Debug)]
pub struct ServerPolicy {
    pub base_path: String,
    /// Methods a completing request may finish through, same set as
    /// `AuthenticatePolicy::methods`.
    pub allowed_primary_methods: Vec<AuthMethod>,
    /// Pattern table, iterated in registration order.
    pub method_paths: Vec<(AuthMethod, Vec<PathPattern>)>,
    pub allow_callbacks: bool,
}

/// One complete, named configuration of an authentication-flow variant.
#[derive(Clone, Debug)]
pub struct Profile {
    /// Stable identifier, safe to persist. Catalog keys are not.
    pub id: &'static str,
    pub label: &'static str,
    pub pages: Pages,
    pub identify: IdentifyPolicy,
    pub authenticate: AuthenticatePolicy,
    pub mfa: MfaPolicy,
    pub biometric: Option<BiometricStep>,
    pub sms_delivery: Option<SmsDelivery>,
    pub server: ServerPolicy,
}

/// Invariant violations a profile definition can carry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("profile {0}: authenticate.methods and allowed_primary_methods differ")]
    MethodSetMismatch(&'static str),
    #[error("profile {0}: primary identifier {1} is not among accepted identifiers")]
    PrimaryIdentifierNotOffered(&'static str, &'static str),
    #[error("profile {0}: preferred method {1} is not enabled")]
    PreferredMethodNotOffered(&'static str, &'static str),
    #[error("profile {0}: require_identifier_for names disabled method {1}")]
    RequireIdentifierUnknownMethod(&'static str, &'static str),
    #[error("profile {0}: no path patterns registered for allowed method {1}")]
    MissingMethodPaths(&'static str, &'static str),
    #[error("profile {0}: mfa trigger and skip lists overlap on {1}")]
    MfaListsOverlap(&'static str, &'static str),
}

impl Profile {
    /// Check the definition invariants.
    ///
    /// Catalog profiles are covered by tests; this also guards hand-built
    /// profiles before they reach enforcement.
    ///
    /// # Errors
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ProfileError> {
        let offered = &self.authenticate.methods;
        let allowed = &self.server.allowed_primary_methods;
        if offered.iter().any(|method| !allowed.contains(method))
            || allowed.iter().any(|method| !offered.contains(method))
        {
            return Err(ProfileError::MethodSetMismatch(self.id));
        }

        if !self.identify.identifiers.contains(&self.identify.primary) {
            return Err(ProfileError::PrimaryIdentifierNotOffered(
                self.id,
                self.identify.primary.as_str(),
            ));
        }

        if !offered.contains(&self.authenticate.preferred) {
            return Err(ProfileError::PreferredMethodNotOffered(
                self.id,
                self.authenticate.preferred.as_str(),
            ));
        }

        for method in &self.authenticate.require_identifier_for {
            if !offered.contains(method) {
                return Err(ProfileError::RequireIdentifierUnknownMethod(
                    self.id,
                    method.as_str(),
                ));
            }
        }

        for method in allowed {
            let has_patterns = self
                .server
                .method_paths
                .iter()
                .any(|(candidate, patterns)| candidate == method && !patterns.is_empty());
            if !has_patterns {
                return Err(ProfileError::MissingMethodPaths(self.id, method.as_str()));
            }
        }

        for method in &self.mfa.trigger_on_primary {
            if self.mfa.skip_if_primary_in.contains(method) {
                return Err(ProfileError::MfaListsOverlap(self.id, method.as_str()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn base_profile() -> Profile {
        Profile {
            id: "test_profile",
            label: "Test",
            pages: Pages {
                identify: "/sign-in".to_string(),
                method: "/sign-in/continue".to_string(),
                second_factor: "/sign-in/factor-two".to_string(),
                biometric: None,
            },
            identify: IdentifyPolicy {
                identifiers: vec![Identifier::Email],
                primary: Identifier::Email,
                social_placement: SocialPlacement::Hidden,
                generic_response: "Check your inbox to continue.".to_string(),
            },
            authenticate: AuthenticatePolicy {
                methods: vec![AuthMethod::Password],
                preferred: AuthMethod::Password,
                require_identifier_for: vec![AuthMethod::Password],
                auto_passkey: None,
            },
            mfa: MfaPolicy {
                mode: MfaMode::IfUserEnabled,
                factors: vec![MfaFactor::Totp, MfaFactor::BackupCode],
                trigger_on_primary: vec![AuthMethod::Password],
                skip_if_primary_in: vec![],
            },
            biometric: None,
            sms_delivery: None,
            server: ServerPolicy {
                base_path: "/sign-in".to_string(),
                allowed_primary_methods: vec![AuthMethod::Password],
                method_paths: vec![(
                    AuthMethod::Password,
                    vec![PathPattern::Exact("/sign-in/email")],
                )],
                allow_callbacks: false,
            },
        }
    }

    #[test]
    fn auth_method_serializes_snake_case() {
        let value = serde_json::to_value(AuthMethod::EmailOtp).unwrap();
        assert_eq!(value, serde_json::json!("email_otp"));
        let decoded: AuthMethod = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, AuthMethod::EmailOtp);
        assert_eq!(AuthMethod::MagicLink.as_str(), "magic_link");
    }

    #[test]
    fn valid_profile_passes_validation() {
        assert_eq!(base_profile().validate(), Ok(()));
    }

    #[test]
    fn method_set_mismatch_is_rejected_both_ways() {
        let mut profile = base_profile();
        profile.authenticate.methods.push(AuthMethod::Passkey);
        assert_eq!(
            profile.validate(),
            Err(ProfileError::MethodSetMismatch("test_profile"))
        );

        let mut profile = base_profile();
        profile
            .server
            .allowed_primary_methods
            .push(AuthMethod::Passkey);
        assert_eq!(
            profile.validate(),
            Err(ProfileError::MethodSetMismatch("test_profile"))
        );
    }

    #[test]
    fn primary_identifier_must_be_offered() {
        let mut profile = base_profile();
        profile.identify.primary = Identifier::Phone;
        assert_eq!(
            profile.validate(),
            Err(ProfileError::PrimaryIdentifierNotOffered(
                "test_profile",
                "phone"
            ))
        );
    }

    #[test]
    fn require_identifier_for_must_name_enabled_methods() {
        let mut profile = base_profile();
        profile
            .authenticate
            .require_identifier_for
            .push(AuthMethod::SmsOtp);
        assert_eq!(
            profile.validate(),
            Err(ProfileError::RequireIdentifierUnknownMethod(
                "test_profile",
                "sms_otp"
            ))
        );
    }

    #[test]
    fn every_allowed_method_needs_patterns() {
        let mut profile = base_profile();
        profile.server.method_paths.clear();
        assert_eq!(
            profile.validate(),
            Err(ProfileError::MissingMethodPaths("test_profile", "password"))
        );

        // An entry with an empty pattern list does not count.
        let mut profile = base_profile();
        profile.server.method_paths = vec![(AuthMethod::Password, vec![])];
        assert_eq!(
            profile.validate(),
            Err(ProfileError::MissingMethodPaths("test_profile", "password"))
        );
    }

    #[test]
    fn overlapping_mfa_lists_are_rejected() {
        let mut profile = base_profile();
        profile.mfa.skip_if_primary_in.push(AuthMethod::Password);
        assert_eq!(
            profile.validate(),
            Err(ProfileError::MfaListsOverlap("test_profile", "password"))
        );
    }

    #[test]
    fn skip_wins_over_trigger() {
        let policy = MfaPolicy {
            mode: MfaMode::IfUserEnabled,
            factors: vec![MfaFactor::Totp],
            trigger_on_primary: vec![AuthMethod::Password, AuthMethod::Passkey],
            skip_if_primary_in: vec![AuthMethod::Passkey],
        };
        assert!(policy.second_factor_after(AuthMethod::Password));
        assert!(!policy.second_factor_after(AuthMethod::Passkey));
    }

    #[test]
    fn disabled_mode_never_triggers() {
        let policy = MfaPolicy {
            mode: MfaMode::Disabled,
            factors: vec![],
            trigger_on_primary: vec![AuthMethod::Password],
            skip_if_primary_in: vec![],
        };
        assert!(!policy.second_factor_after(AuthMethod::Password));
    }

    #[test]
    fn always_mode_triggers_unless_skipped() {
        let policy = MfaPolicy {
            mode: MfaMode::Always,
            factors: vec![MfaFactor::Totp],
            trigger_on_primary: vec![],
            skip_if_primary_in: vec![AuthMethod::Passkey],
        };
        assert!(policy.second_factor_after(AuthMethod::Password));
        assert!(policy.second_factor_after(AuthMethod::MagicLink));
        assert!(!policy.second_factor_after(AuthMethod::Passkey));
    }

    #[test]
    fn if_user_enabled_only_triggers_listed_methods() {
        let policy = MfaPolicy {
            mode: MfaMode::IfUserEnabled,
            factors: vec![MfaFactor::Totp],
            trigger_on_primary: vec![AuthMethod::Password],
            skip_if_primary_in: vec![],
        };
        assert!(policy.second_factor_after(AuthMethod::Password));
        assert!(!policy.second_factor_after(AuthMethod::MagicLink));
    }
}
