//! Administrator accounts and their form validation rules.

use std::str::FromStr;

use marketdesk_core::{AppError, AppResult, RecordId};
use serde::{Deserialize, Serialize};

use crate::resource::{MutationKind, Record, Resource, ResourceInput};
use crate::view::{FieldValue, Queryable};

/// Minimum administrator password length.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Maximum administrator password length.
pub const PASSWORD_MAX_LENGTH: usize = 128;

/// Number of digits in a local mobile number.
pub const PHONE_DIGITS: usize = 11;

/// Administrator privilege level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Regular administrator.
    #[default]
    Admin,
    /// Administrator allowed to manage other administrators.
    Superadmin,
}

impl AdminRole {
    /// Returns the stable wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Superadmin => "superadmin",
        }
    }
}

impl FromStr for AdminRole {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Self::Admin),
            "superadmin" => Ok(Self::Superadmin),
            _ => Err(AppError::Validation(format!("unknown admin role '{value}'"))),
        }
    }
}

/// Administrator record as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admin {
    /// Record identifier.
    pub id: RecordId,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Privilege level.
    #[serde(default)]
    pub role: AdminRole,
    /// Whether the account may sign in.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Searchable and sortable administrator fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminField {
    /// Display name.
    Name,
    /// Email address.
    Email,
    /// Phone number.
    Phone,
    /// Role facet.
    Role,
    /// Active flag.
    IsActive,
}

impl Queryable for Admin {
    type Field = AdminField;

    fn search_fields() -> &'static [AdminField] {
        &[AdminField::Name, AdminField::Email, AdminField::Phone]
    }

    fn field_value(&self, field: AdminField) -> FieldValue {
        match field {
            AdminField::Name => FieldValue::text(self.name.as_str()),
            AdminField::Email => FieldValue::text(self.email.as_str()),
            AdminField::Phone => FieldValue::optional_text(self.phone.as_deref()),
            AdminField::Role => FieldValue::text(self.role.as_str()),
            AdminField::IsActive => FieldValue::Bool(self.is_active),
        }
    }
}

impl Record for Admin {
    const LABEL: &'static str = "admin";

    fn id(&self) -> RecordId {
        self.id
    }
}

/// Administrator form payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminInput {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Password; required on create, optional on edit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Privilege level.
    pub role: AdminRole,
    /// Whether the account may sign in.
    pub is_active: bool,
}

impl ResourceInput for AdminInput {
    fn validate(&self, kind: MutationKind) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("name is required".to_owned()));
        }

        EmailAddress::new(self.email.as_str())?;
        validate_phone(self.phone.as_str())?;

        match (kind, self.password.as_deref()) {
            (MutationKind::Create, None) => {
                Err(AppError::Validation("password is required".to_owned()))
            }
            (_, Some(password)) => validate_password(password),
            (MutationKind::Update, None) => Ok(()),
        }
    }
}

impl Resource for Admin {
    type Input = AdminInput;

    fn provisional(id: RecordId, input: &AdminInput) -> Self {
        Self {
            id,
            name: input.name.trim().to_owned(),
            email: input.email.trim().to_lowercase(),
            phone: Some(input.phone.trim().to_owned()),
            role: input.role,
            is_active: input.is_active,
        }
    }

    fn merged(&self, input: &AdminInput) -> Self {
        Self::provisional(self.id, input)
    }
}

/// Validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// Performs basic structural validation: non-empty, contains exactly one `@`,
    /// local part and domain are non-empty, domain contains at least one `.`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim().to_lowercase();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "email address must not be empty".to_owned(),
            ));
        }

        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        };

        if domain.contains('@') {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        }

        if local.is_empty() {
            return Err(AppError::Validation(
                "email local part must not be empty".to_owned(),
            ));
        }

        if domain.is_empty() || !domain.contains('.') {
            return Err(AppError::Validation(
                "email domain must contain at least one '.'".to_owned(),
            ));
        }

        if trimmed.len() > 254 {
            return Err(AppError::Validation(
                "email address must not exceed 254 characters".to_owned(),
            ));
        }

        Ok(Self(trimmed))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Validates a local mobile number: exactly eleven digits.
pub fn validate_phone(phone: &str) -> AppResult<()> {
    let phone = phone.trim();
    if phone.len() != PHONE_DIGITS || !phone.chars().all(|character| character.is_ascii_digit()) {
        return Err(AppError::Validation(format!(
            "phone must contain exactly {PHONE_DIGITS} digits"
        )));
    }

    Ok(())
}

/// Validates an administrator password.
///
/// Requires 8 to 128 characters with at least one uppercase letter, one
/// lowercase letter, one digit and one symbol.
pub fn validate_password(password: &str) -> AppResult<()> {
    let char_count = password.chars().count();

    if char_count < PASSWORD_MIN_LENGTH {
        return Err(AppError::Validation(format!(
            "password must be at least {PASSWORD_MIN_LENGTH} characters"
        )));
    }

    if char_count > PASSWORD_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "password must not exceed {PASSWORD_MAX_LENGTH} characters"
        )));
    }

    let has_upper = password.chars().any(char::is_uppercase);
    let has_lower = password.chars().any(char::is_lowercase);
    let has_digit = password.chars().any(|character| character.is_ascii_digit());
    let has_symbol = password
        .chars()
        .any(|character| !character.is_alphanumeric() && !character.is_whitespace());

    if !(has_upper && has_lower && has_digit && has_symbol) {
        return Err(AppError::Validation(
            "password must mix upper and lower case letters, digits and symbols".to_owned(),
        ));
    }

    Ok(())
}
