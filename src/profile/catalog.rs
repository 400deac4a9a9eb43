//! Fixed catalog of authentication-flow profiles.
//!
//! Nine profiles, varying along two independent axes: flow shape
//! (password-only, identifier-first, identifier-first with a biometric step)
//! × identifier (email, phone, username). Variants are composed from shared
//! fragments so near-identical profiles cannot drift apart.
//!
//! The catalog is the only source of truth for which flow variants exist.
//! It is built once into a process-wide static and handed out as
//! `&'static Profile`; nothing mutates it afterwards.

use std::sync::OnceLock;

use crate::enforce::PathPattern;

use super::models::{
    AuthMethod, AuthenticatePolicy, AutoPasskey, BiometricStep, IdentifyPolicy, Identifier,
    MfaFactor, MfaMode, MfaPolicy, Pages, Profile, ServerPolicy, SmsDelivery, SocialPlacement,
};

/// Catalog key for one profile. Keys are an internal detail: persist
/// [`Profile::id`] instead.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProfileKey {
    PasswordOnlyEmail,
    PasswordOnlyPhone,
    PasswordOnlyUsername,
    IdentifierFirstEmail,
    IdentifierFirstPhone,
    IdentifierFirstUsername,
    BiometricsEmail,
    BiometricsPhone,
    BiometricsUsername,
}

/// Profile used when no (or an unrecognized) selector is configured.
pub const DEFAULT_PROFILE_KEY: ProfileKey = ProfileKey::IdentifierFirstEmail;

impl ProfileKey {
    /// Every catalog key, in catalog order.
    pub const ALL: [Self; 9] = [
        Self::PasswordOnlyEmail,
        Self::PasswordOnlyPhone,
        Self::PasswordOnlyUsername,
        Self::IdentifierFirstEmail,
        Self::IdentifierFirstPhone,
        Self::IdentifierFirstUsername,
        Self::BiometricsEmail,
        Self::BiometricsPhone,
        Self::BiometricsUsername,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PasswordOnlyEmail => "password-only-email",
            Self::PasswordOnlyPhone => "password-only-phone",
            Self::PasswordOnlyUsername => "password-only-username",
            Self::IdentifierFirstEmail => "identifier-first-email",
            Self::IdentifierFirstPhone => "identifier-first-phone",
            Self::IdentifierFirstUsername => "identifier-first-username",
            Self::BiometricsEmail => "biometrics-email",
            Self::BiometricsPhone => "biometrics-phone",
            Self::BiometricsUsername => "biometrics-username",
        }
    }

    /// Exact, case-sensitive key lookup.
    pub(crate) fn from_str(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == value)
    }
}

static CATALOG: OnceLock<[Profile; 9]> = OnceLock::new();

/// All profiles, in [`ProfileKey::ALL`] order.
#[must_use]
pub fn all() -> &'static [Profile; 9] {
    CATALOG.get_or_init(build_catalog)
}

/// Look a profile up by catalog key.
#[must_use]
pub fn get(key: ProfileKey) -> &'static Profile {
    let [password_email, password_phone, password_username, multi_email, multi_phone, multi_username, biometric_email, biometric_phone, biometric_username] =
        all();
    match key {
        ProfileKey::PasswordOnlyEmail => password_email,
        ProfileKey::PasswordOnlyPhone => password_phone,
        ProfileKey::PasswordOnlyUsername => password_username,
        ProfileKey::IdentifierFirstEmail => multi_email,
        ProfileKey::IdentifierFirstPhone => multi_phone,
        ProfileKey::IdentifierFirstUsername => multi_username,
        ProfileKey::BiometricsEmail => biometric_email,
        ProfileKey::BiometricsPhone => biometric_phone,
        ProfileKey::BiometricsUsername => biometric_username,
    }
}

/// Look a profile up by its stable id.
#[must_use]
pub fn find_by_id(id: &str) -> Option<&'static Profile> {
    all().iter().find(|profile| profile.id == id)
}

fn build_catalog() -> [Profile; 9] {
    [
        password_only(Identifier::Email),
        password_only(Identifier::Phone),
        password_only(Identifier::Username),
        identifier_first(Identifier::Email, false),
        identifier_first(Identifier::Phone, false),
        identifier_first(Identifier::Username, false),
        biometrics(Identifier::Email),
        biometrics(Identifier::Phone),
        biometrics(Identifier::Username),
    ]
}

/// Response shown by the identify step regardless of whether an account
/// exists for the submitted identifier.
const GENERIC_IDENTIFY_RESPONSE: &str =
    "If the details match an account, you can continue signing in.";

const BASE_PATH: &str = "/sign-in";

fn identify_route(identifier: Identifier) -> &'static str {
    match identifier {
        Identifier::Email => "/sign-in/email",
        Identifier::Phone => "/sign-in/phone",
        Identifier::Username => "/sign-in/username",
    }
}

fn pages(with_biometric: bool) -> Pages {
    Pages {
        identify: BASE_PATH.to_string(),
        method: "/sign-in/continue".to_string(),
        second_factor: "/sign-in/factor-two".to_string(),
        biometric: with_biometric.then(|| "/sign-in/biometric".to_string()),
    }
}

fn mfa_factors(identifier: Identifier) -> Vec<MfaFactor> {
    let mut factors = vec![MfaFactor::Totp, MfaFactor::BackupCode];
    match identifier {
        Identifier::Email => factors.push(MfaFactor::EmailOtp),
        Identifier::Phone => factors.push(MfaFactor::SmsOtp),
        Identifier::Username => {}
    }
    factors
}

fn sms_delivery_defaults() -> SmsDelivery {
    SmsDelivery {
        sender_id: None,
        resend_cooldown_seconds: 30,
        code_length: 6,
    }
}

fn sms_delivery_for(identifier: Identifier) -> Option<SmsDelivery> {
    (identifier == Identifier::Phone).then(sms_delivery_defaults)
}

fn paths_for(method: AuthMethod, identifier: Identifier) -> Vec<PathPattern> {
    match method {
        AuthMethod::Password => vec![
            PathPattern::Exact(identify_route(identifier)),
            PathPattern::Exact("/sign-in/password"),
        ],
        AuthMethod::Passkey => vec![
            PathPattern::Pattern(r"^/sign-in/passkey(?:/.*)?$"),
            PathPattern::Exact("/webauthn/authenticate"),
        ],
        AuthMethod::EmailOtp => vec![
            PathPattern::Exact("/sign-in/email-otp"),
            PathPattern::Exact("/sign-in/email-otp/verify"),
        ],
        AuthMethod::SmsOtp => vec![
            PathPattern::Exact("/sign-in/phone-otp"),
            PathPattern::Exact("/sign-in/phone-otp/verify"),
        ],
        AuthMethod::MagicLink => vec![
            PathPattern::Exact("/sign-in/magic-link"),
            PathPattern::Exact("/magic-link/verify"),
        ],
        AuthMethod::Social => vec![
            PathPattern::Pattern(r"^/api/auth/callback/[a-z0-9-]+$"),
            PathPattern::Exact("/sso-callback"),
        ],
    }
}

fn server_policy(methods: &[AuthMethod], identifier: Identifier) -> ServerPolicy {
    ServerPolicy {
        base_path: BASE_PATH.to_string(),
        allowed_primary_methods: methods.to_vec(),
        method_paths: methods
            .iter()
            .map(|method| (*method, paths_for(*method, identifier)))
            .collect(),
        allow_callbacks: methods.contains(&AuthMethod::Social),
    }
}

fn password_only(identifier: Identifier) -> Profile {
    let (id, label) = match identifier {
        Identifier::Email => ("flow_password_email", "Password only (email)"),
        Identifier::Phone => ("flow_password_phone", "Password only (phone)"),
        Identifier::Username => ("flow_password_username", "Password only (username)"),
    };
    let methods = vec![AuthMethod::Password];
    Profile {
        id,
        label,
        pages: pages(false),
        identify: IdentifyPolicy {
            identifiers: vec![identifier],
            primary: identifier,
            social_placement: SocialPlacement::Hidden,
            generic_response: GENERIC_IDENTIFY_RESPONSE.to_string(),
        },
        authenticate: AuthenticatePolicy {
            preferred: AuthMethod::Password,
            require_identifier_for: methods.clone(),
            methods: methods.clone(),
            auto_passkey: None,
        },
        mfa: MfaPolicy {
            mode: MfaMode::IfUserEnabled,
            factors: mfa_factors(identifier),
            trigger_on_primary: vec![AuthMethod::Password],
            skip_if_primary_in: vec![],
        },
        biometric: None,
        sms_delivery: sms_delivery_for(identifier),
        server: server_policy(&methods, identifier),
    }
}

/// Shared core of the two identifier-first shapes.
fn identifier_first(identifier: Identifier, with_biometric: bool) -> Profile {
    let (id, label) = match (identifier, with_biometric) {
        (Identifier::Email, false) => ("flow_multi_email", "Identifier first (email)"),
        (Identifier::Phone, false) => ("flow_multi_phone", "Identifier first (phone)"),
        (Identifier::Username, false) => ("flow_multi_username", "Identifier first (username)"),
        (Identifier::Email, true) => ("flow_biometric_email", "Biometrics first (email)"),
        (Identifier::Phone, true) => ("flow_biometric_phone", "Biometrics first (phone)"),
        (Identifier::Username, true) => ("flow_biometric_username", "Biometrics first (username)"),
    };

    let methods = match identifier {
        Identifier::Email => vec![
            AuthMethod::Password,
            AuthMethod::Passkey,
            AuthMethod::EmailOtp,
            AuthMethod::MagicLink,
            AuthMethod::Social,
        ],
        Identifier::Phone => vec![AuthMethod::Password, AuthMethod::Passkey, AuthMethod::SmsOtp],
        Identifier::Username => vec![AuthMethod::Password, AuthMethod::Passkey],
    };

    let identifiers = match identifier {
        Identifier::Email => vec![Identifier::Email, Identifier::Username],
        Identifier::Phone => vec![Identifier::Phone],
        Identifier::Username => vec![Identifier::Username],
    };

    let require_identifier_for: Vec<AuthMethod> = methods
        .iter()
        .copied()
        .filter(|method| !matches!(method, AuthMethod::Passkey | AuthMethod::Social))
        .collect();

    let social_placement = if methods.contains(&AuthMethod::Social) {
        SocialPlacement::Bottom
    } else {
        SocialPlacement::Hidden
    };

    Profile {
        id,
        label,
        pages: pages(with_biometric),
        identify: IdentifyPolicy {
            identifiers,
            primary: identifier,
            social_placement,
            generic_response: GENERIC_IDENTIFY_RESPONSE.to_string(),
        },
        authenticate: AuthenticatePolicy {
            methods: methods.clone(),
            preferred: if with_biometric {
                AuthMethod::Passkey
            } else {
                AuthMethod::Password
            },
            require_identifier_for,
            auto_passkey: None,
        },
        mfa: MfaPolicy {
            mode: MfaMode::IfUserEnabled,
            factors: mfa_factors(identifier),
            trigger_on_primary: vec![AuthMethod::Password],
            skip_if_primary_in: vec![AuthMethod::Passkey],
        },
        biometric: None,
        sms_delivery: sms_delivery_for(identifier),
        server: server_policy(&methods, identifier),
    }
}

fn biometrics(identifier: Identifier) -> Profile {
    let mut profile = identifier_first(identifier, true);
    profile.biometric = Some(BiometricStep {
        offer_before_methods: true,
        allow_skip: true,
    });
    profile.authenticate.auto_passkey = Some(AutoPasskey {
        immediate: true,
        allow_skip: true,
    });
    profile
}
