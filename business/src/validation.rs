//! Field validation rules shared by the signup and profile forms.
//!
//! Every rule is a pure function of the field, its value and the live password, so the
//! form can call it on every keystroke.

use std::collections::{BTreeMap, BTreeSet};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MIN_NAME_LEN: usize = 2;

/// One named input of a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FullName,
    Email,
    Password,
    ConfirmPassword,
    DisplayName,
}

/// Field → message. A missing entry means valid.
pub type FieldErrors = BTreeMap<Field, String>;

/// Fields the user has interacted with.
pub type TouchedSet = BTreeSet<Field>;

impl Field {
    pub const SIGNUP: [Self; 4] = [
        Self::FullName,
        Self::Email,
        Self::Password,
        Self::ConfirmPassword,
    ];

    /// Form names as used by the signup and profile forms.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "fullName" => Some(Self::FullName),
            "email" => Some(Self::Email),
            "password" => Some(Self::Password),
            "confirmPassword" => Some(Self::ConfirmPassword),
            "displayName" => Some(Self::DisplayName),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::Email => "email",
            Self::Password => "password",
            Self::ConfirmPassword => "confirmPassword",
            Self::DisplayName => "displayName",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::FullName => "Full name",
            Self::Email => "Email",
            Self::Password => "Password",
            Self::ConfirmPassword => "Confirm password",
            Self::DisplayName => "Display name",
        }
    }
}

/// Error message for `value` in `field`, or `None` when valid.
///
/// `password` is the live password value, used by the confirmation check.
pub fn validate(field: Field, value: &str, password: &str) -> Option<String> {
    match field {
        Field::FullName | Field::DisplayName => validate_name(field, value),
        Field::Email => validate_email(value),
        Field::Password => validate_password(value),
        Field::ConfirmPassword => validate_confirm_password(value, password),
    }
}

/// Like [`validate`] but keyed by form name. Unknown names are always valid.
pub fn validate_named(name: &str, value: &str, password: &str) -> Option<String> {
    Field::from_name(name).and_then(|field| validate(field, value, password))
}

fn validate_name(field: Field, value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Some(format!("{} is required", field.label()))
    } else if trimmed.chars().count() < MIN_NAME_LEN {
        Some(format!(
            "{} must be at least {MIN_NAME_LEN} characters",
            field.label()
        ))
    } else {
        None
    }
}

fn validate_email(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        Some("Email is required".to_owned())
    } else if !is_email_shaped(value) {
        Some("Please enter a valid email address".to_owned())
    } else {
        None
    }
}

fn validate_password(value: &str) -> Option<String> {
    if value.is_empty() {
        Some("Password is required".to_owned())
    } else if value.chars().count() < MIN_PASSWORD_LEN {
        Some(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        ))
    } else {
        None
    }
}

fn validate_confirm_password(value: &str, password: &str) -> Option<String> {
    if value.is_empty() {
        Some("Please confirm your password".to_owned())
    } else if value != password {
        Some("Passwords do not match".to_owned())
    } else {
        None
    }
}

/// `local@domain.tld`: no whitespace, one `@`, and a dot inside the domain.
pub fn is_email_shaped(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}
