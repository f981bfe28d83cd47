use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::user::validation;
use crate::user::errors::FieldError;
use crate::user::errors::UserIdError;
use crate::user::errors::ValidationError;

/// Legal form of an account holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserType {
    #[serde(rename = "LE")]
    LegalEntity,
    #[serde(rename = "NP")]
    NaturalPerson,
    #[serde(rename = "IE")]
    IndividualEntrepreneur,
    #[serde(rename = "SE")]
    SelfEmployed,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::LegalEntity => "LE",
            UserType::NaturalPerson => "NP",
            UserType::IndividualEntrepreneur => "IE",
            UserType::SelfEmployed => "SE",
        }
    }

    /// Whether a tax identification number is mandatory.
    pub fn requires_tin(&self) -> bool {
        matches!(
            self,
            UserType::LegalEntity | UserType::IndividualEntrepreneur | UserType::SelfEmployed
        )
    }

    /// Whether a state registration number is mandatory.
    pub fn requires_ogrn(&self) -> bool {
        matches!(
            self,
            UserType::LegalEntity | UserType::IndividualEntrepreneur
        )
    }

    /// Whether a registration reason code is mandatory.
    pub fn requires_kpp(&self) -> bool {
        matches!(self, UserType::LegalEntity)
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LE" => Ok(UserType::LegalEntity),
            "NP" => Ok(UserType::NaturalPerson),
            "IE" => Ok(UserType::IndividualEntrepreneur),
            "SE" => Ok(UserType::SelfEmployed),
            other => Err(format!("unknown user type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Manager,
    #[default]
    Employee,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Manager => "manager",
            UserRole::Employee => "employee",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manager" => Ok(UserRole::Manager),
            "employee" => Ok(UserRole::Employee),
            other => Err(format!("unknown user role: {}", other)),
        }
    }
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// User aggregate, read model.
///
/// The password hash is never part of this type; see [`UserCredentials`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub user_type: UserType,
    pub role: UserRole,
    pub name: String,
    pub shortname: Option<String>,
    pub tin: Option<String>,
    pub ogrn: Option<String>,
    pub kpp: Option<String>,
    pub brand: Option<String>,
    pub manager_name: Option<String>,
    pub manager_position: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Field presence and format rules for this user's type that are broken.
    pub(crate) fn violations(&self) -> Vec<FieldError> {
        let mut violations = Vec::new();

        if self.name.trim().is_empty() {
            violations.push(FieldError::Empty { field: "name" });
        }
        validation::max_chars(&mut violations, "name", &self.name, validation::TEXT_MAX);
        for (field, value) in [
            ("shortname", &self.shortname),
            ("brand", &self.brand),
            ("manager_name", &self.manager_name),
            ("manager_position", &self.manager_position),
        ] {
            if let Some(value) = value {
                validation::max_chars(&mut violations, field, value, validation::TEXT_MAX);
            }
        }

        let required = [
            ("tin", &self.tin, self.user_type.requires_tin()),
            ("ogrn", &self.ogrn, self.user_type.requires_ogrn()),
            ("kpp", &self.kpp, self.user_type.requires_kpp()),
        ];
        for (field, value, needed) in required {
            if needed && value.is_none() {
                violations.push(FieldError::Required {
                    field,
                    user_type: self.user_type,
                });
            }
        }

        if let Some(tin) = &self.tin {
            validation::exact_chars(&mut violations, "tin", tin, &[10, 12]);
        }
        if let Some(ogrn) = &self.ogrn {
            validation::exact_chars(&mut violations, "ogrn", ogrn, &[13, 15]);
        }
        if let Some(kpp) = &self.kpp {
            validation::max_chars(&mut violations, "kpp", kpp, 9);
        }

        violations
    }
}

/// Stored password hash for a user, used only to check a login attempt.
#[derive(Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

impl fmt::Debug for UserCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCredentials")
            .field("user", &self.user)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// Identity document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passport {
    pub date_of_birth: NaiveDate,
    pub series: String,
    pub number: String,
    pub issued_by: String,
    pub issue_date: NaiveDate,
    pub division_code: String,
}

impl Passport {
    fn collect_violations(&self, violations: &mut Vec<FieldError>) {
        for (field, value, max) in [
            ("passport.series", &self.series, 4),
            ("passport.number", &self.number, 6),
            ("passport.issued_by", &self.issued_by, validation::TEXT_MAX),
            ("passport.division_code", &self.division_code, 7),
        ] {
            validation::required_text(violations, field, value, max);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub legal_address: Option<String>,
    pub registration_address: String,
    pub actual_address: String,
}

impl Address {
    fn collect_violations(&self, violations: &mut Vec<FieldError>) {
        if let Some(legal) = &self.legal_address {
            validation::max_chars(violations, "address.legal_address", legal, validation::ADDRESS_MAX);
        }
        validation::required_text(
            violations,
            "address.registration_address",
            &self.registration_address,
            validation::ADDRESS_MAX,
        );
        validation::required_text(
            violations,
            "address.actual_address",
            &self.actual_address,
            validation::ADDRESS_MAX,
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankDetails {
    pub bic: String,
    pub bank_name: String,
    pub correspondent_account: String,
    pub current_account: String,
    pub comment: Option<String>,
}

impl BankDetails {
    fn collect_violations(&self, violations: &mut Vec<FieldError>) {
        for (field, value, max) in [
            ("bank_details.bic", &self.bic, 9),
            ("bank_details.bank_name", &self.bank_name, validation::TEXT_MAX),
            ("bank_details.correspondent_account", &self.correspondent_account, 20),
            ("bank_details.current_account", &self.current_account, 20),
        ] {
            validation::required_text(violations, field, value, max);
        }
        if let Some(comment) = &self.comment {
            validation::max_chars(violations, "bank_details.comment", comment, 256);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contacts {
    pub personal_phone: String,
    pub extra_phone: Option<String>,
    pub public_phone: Option<String>,
    pub email: String,
    pub whatsapp: Option<String>,
    pub telegram: Option<String>,
}

impl Contacts {
    fn collect_violations(&self, violations: &mut Vec<FieldError>) {
        validation::phone(violations, "contacts.personal_phone", &self.personal_phone);
        for (field, value) in [
            ("contacts.extra_phone", &self.extra_phone),
            ("contacts.public_phone", &self.public_phone),
            ("contacts.whatsapp", &self.whatsapp),
        ] {
            if let Some(value) = value {
                validation::phone(violations, field, value);
            }
        }
        validation::email(violations, "contacts.email", &self.email);
        if let Some(telegram) = &self.telegram {
            validation::max_chars(violations, "contacts.telegram", telegram, 50);
        }
    }
}

/// The four sub-records a user owns. Each is absent until first set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDetails {
    pub passport: Option<Passport>,
    pub address: Option<Address>,
    pub bank_details: Option<BankDetails>,
    pub contacts: Option<Contacts>,
}

impl UserDetails {
    pub fn is_empty(&self) -> bool {
        self.passport.is_none()
            && self.address.is_none()
            && self.bank_details.is_none()
            && self.contacts.is_none()
    }

    /// Check every supplied sub-record.
    ///
    /// # Errors
    /// * `ValidationError` - Every violated rule across all sub-records
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Vec::new();

        if let Some(passport) = &self.passport {
            passport.collect_violations(&mut violations);
        }
        if let Some(address) = &self.address {
            address.collect_violations(&mut violations);
        }
        if let Some(bank_details) = &self.bank_details {
            bank_details.collect_violations(&mut violations);
        }
        if let Some(contacts) = &self.contacts {
            contacts.collect_violations(&mut violations);
        }

        ValidationError::check(violations)
    }

    /// Overlay the sub-records present in `other`.
    pub fn merge(&mut self, other: UserDetails) {
        if other.passport.is_some() {
            self.passport = other.passport;
        }
        if other.address.is_some() {
            self.address = other.address;
        }
        if other.bank_details.is_some() {
            self.bank_details = other.bank_details;
        }
        if other.contacts.is_some() {
            self.contacts = other.contacts;
        }
    }
}

/// User together with its sub-records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub user: User,
    pub details: UserDetails,
}

/// Command to register a new user.
#[derive(Debug, Clone)]
pub struct CreateUserCommand {
    pub user_type: UserType,
    pub role: UserRole,
    pub name: String,
    pub shortname: Option<String>,
    pub tin: Option<String>,
    pub ogrn: Option<String>,
    pub kpp: Option<String>,
    pub brand: Option<String>,
    pub manager_name: Option<String>,
    pub manager_position: Option<String>,
    pub password: String,
}

/// A registration that passed validation, ready to be hashed and stored.
#[derive(Debug)]
pub struct NewUser {
    pub user: User,
    pub password: String,
}

impl CreateUserCommand {
    /// Minimal command for `name` and `user_type`, every optional field unset.
    pub fn new(user_type: UserType, name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user_type,
            role: UserRole::default(),
            name: name.into(),
            shortname: None,
            tin: None,
            ogrn: None,
            kpp: None,
            brand: None,
            manager_name: None,
            manager_position: None,
            password: password.into(),
        }
    }

    /// Build the user record and check it, together with the password.
    ///
    /// # Errors
    /// * `ValidationError` - Every violated rule, not only the first
    pub fn validate(self) -> Result<NewUser, ValidationError> {
        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            user_type: self.user_type,
            role: self.role,
            name: self.name,
            shortname: self.shortname,
            tin: self.tin,
            ogrn: self.ogrn,
            kpp: self.kpp,
            brand: self.brand,
            manager_name: self.manager_name,
            manager_position: self.manager_position,
            created_at: now,
            updated_at: now,
        };

        let mut violations = user.violations();
        validation::password(&mut violations, &self.password);
        ValidationError::check(violations)?;

        Ok(NewUser {
            user,
            password: self.password,
        })
    }
}

/// Partial update of a user.
///
/// Only fields that are `Some` are changed. Type and name are fixed at
/// registration.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserCommand {
    pub role: Option<UserRole>,
    pub shortname: Option<String>,
    pub tin: Option<String>,
    pub ogrn: Option<String>,
    pub kpp: Option<String>,
    pub brand: Option<String>,
    pub manager_name: Option<String>,
    pub manager_position: Option<String>,
    pub password: Option<String>,
}

impl UpdateUserCommand {
    pub fn is_empty(&self) -> bool {
        self.role.is_none()
            && self.shortname.is_none()
            && self.tin.is_none()
            && self.ogrn.is_none()
            && self.kpp.is_none()
            && self.brand.is_none()
            && self.manager_name.is_none()
            && self.manager_position.is_none()
            && self.password.is_none()
    }

    /// Check the supplied fields against `current` with them merged in.
    ///
    /// Type and name never change and present fields cannot be cleared, so a
    /// change that is valid against `current` stays valid against any later
    /// version of the same row.
    ///
    /// # Errors
    /// * `ValidationError` - The merged record or the new password is invalid
    pub fn validate(self, current: &User) -> Result<UserUpdate, ValidationError> {
        let changes = UserChanges {
            role: self.role,
            shortname: self.shortname,
            tin: self.tin,
            ogrn: self.ogrn,
            kpp: self.kpp,
            brand: self.brand,
            manager_name: self.manager_name,
            manager_position: self.manager_position,
        };

        let mut merged = current.clone();
        changes.apply_to(&mut merged);

        let mut violations = merged.violations();
        if let Some(password) = &self.password {
            validation::password(&mut violations, password);
        }
        ValidationError::check(violations)?;

        Ok(UserUpdate {
            changes,
            password: self.password,
        })
    }
}

/// Column changes of a partial update. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub role: Option<UserRole>,
    pub shortname: Option<String>,
    pub tin: Option<String>,
    pub ogrn: Option<String>,
    pub kpp: Option<String>,
    pub brand: Option<String>,
    pub manager_name: Option<String>,
    pub manager_position: Option<String>,
}

impl UserChanges {
    pub fn apply_to(&self, user: &mut User) {
        if let Some(role) = self.role {
            user.role = role;
        }
        let fields = [
            (&mut user.shortname, &self.shortname),
            (&mut user.tin, &self.tin),
            (&mut user.ogrn, &self.ogrn),
            (&mut user.kpp, &self.kpp),
            (&mut user.brand, &self.brand),
            (&mut user.manager_name, &self.manager_name),
            (&mut user.manager_position, &self.manager_position),
        ];
        for (slot, value) in fields {
            if value.is_some() {
                slot.clone_from(value);
            }
        }
    }
}

/// A partial update that passed validation.
#[derive(Debug)]
pub struct UserUpdate {
    pub changes: UserChanges,
    pub password: Option<String>,
}
