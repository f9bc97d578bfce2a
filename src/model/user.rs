use std::fmt;
use std::str::FromStr;
use derive_more::Display;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use crate::model::{password, reset_token};
use crate::utils::{self, errors::{AccountError, ErrorCode, FieldError}};

const REDACTED: &str = "[redacted]";

#[derive(Clone, Copy, Debug, Deserialize, Display, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    #[display(fmt = "user")]
    User,
    #[display(fmt = "guide")]
    Guide,
    #[display(fmt = "lead-guide")]
    LeadGuide,
    #[display(fmt = "admin")]
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl FromStr for Role {
    type Err = AccountError;

    fn from_str(input: &str) -> Result<Role, Self::Err> {
        match input {
            "user"       => Ok(Role::User),
            "guide"      => Ok(Role::Guide),
            "lead-guide" => Ok(Role::LeadGuide),
            "admin"      => Ok(Role::Admin),
            _ => Err(AccountError::invalid(ErrorCode::InvalidRole, vec!(
                FieldError::new("role", &format!("'{}' is not a valid role", input))))),
        }
    }
}

///
/// The details supplied when a user signs up.
///
#[derive(Clone, Default, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    pub password: String,
    pub password_confirm: String,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("photo", &self.photo)
            .field("role", &self.role)
            .field("password", &REDACTED)
            .field("password_confirm", &REDACTED)
            .finish()
    }
}

///
/// A user as stored in the Users collection.
///
/// The password field only ever holds a bcrypt hash once the record has been through the save
/// pipeline. A plain-text password and its confirmation are held transiently (never serialised)
/// between set_password and hashing.
///
/// Records loaded with the default projection have no password hash at all.
///
#[derive(Clone, Deserialize, Serialize)]
pub struct User {
    user_id: String,
    pub name: String,
    email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    password_changed_at: Option<bson::DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    password_reset_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    password_reset_expires: Option<bson::DateTime>,

    #[serde(skip)]
    plain_password: Option<String>,
    #[serde(skip)]
    password_confirm: Option<String>,
    #[serde(skip)]
    password_modified: bool,
    #[serde(skip)]
    is_new: bool,
}

impl From<NewUser> for User {
    fn from(new_user: NewUser) -> Self {
        let mut user = User {
            user_id: utils::generate_id(),
            name: new_user.name,
            email: String::new(),
            photo: new_user.photo,
            role: new_user.role.unwrap_or_default(),
            password: None,
            password_changed_at: None,
            password_reset_token: None,
            password_reset_expires: None,
            plain_password: None,
            password_confirm: None,
            password_modified: false,
            is_new: true,
        };

        user.set_email(&new_user.email);
        user.set_password(&new_user.password, &new_user.password_confirm);
        user
    }
}

impl User {
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    ///
    /// Emails are always stored lower-case.
    ///
    pub fn set_email(&mut self, email: &str) {
        self.email = email.to_lowercase();
    }

    ///
    /// The stored bcrypt hash - None unless the record was loaded with the password selected
    /// or has been saved since the password was set.
    ///
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn password_confirm(&self) -> Option<&str> {
        self.password_confirm.as_deref()
    }

    pub fn password_changed_at(&self) -> Option<DateTime<Utc>> {
        self.password_changed_at.map(|at| at.to_chrono())
    }

    pub fn password_reset_token(&self) -> Option<&str> {
        self.password_reset_token.as_deref()
    }

    pub fn password_reset_expires(&self) -> Option<DateTime<Utc>> {
        self.password_reset_expires.map(|at| at.to_chrono())
    }

    ///
    /// True until the record has been persisted for the first time.
    ///
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    ///
    /// True if set_password has been called since the record was loaded or last saved.
    ///
    pub fn is_password_modified(&self) -> bool {
        self.password_modified
    }

    ///
    /// Replace the password. It is validated, hashed and (for existing users) stamped when saved.
    ///
    pub fn set_password(&mut self, password: &str, password_confirm: &str) {
        self.plain_password = Some(password.to_string());
        self.password_confirm = Some(password_confirm.to_string());
        self.password_modified = true;
    }

    ///
    /// Check a candidate password against this user's stored hash.
    ///
    /// The user must have been loaded with the password selected.
    ///
    pub fn correct_password(&self, candidate_password: &str) -> Result<bool, AccountError> {
        match &self.password {
            Some(hash) => password::correct_password(candidate_password, hash),
            None => Err(ErrorCode::PasswordNotSelected
                .with_msg(&format!("User {} was loaded without its password", self.user_id))),
        }
    }

    ///
    /// Returns true if the password was changed after a token issued at issued_at (epoch seconds).
    ///
    /// Such a token should no longer be honoured.
    ///
    pub fn changed_password_after(&self, issued_at: i64) -> bool {
        match self.password_changed_at {
            Some(changed_at) => issued_at < changed_at.timestamp_millis() / 1000,
            None => false,
        }
    }

    ///
    /// Generate a reset token, store its SHA-256 hash on the user and return the plain token.
    ///
    /// The plain token must only be delivered to the user - it is never stored or logged. The
    /// caller is responsible for saving the user.
    ///
    pub fn create_password_reset_token(&mut self, now: DateTime<Utc>, valid_for: Duration)
        -> Result<String, AccountError> {

        let token = reset_token::generate()?;
        self.password_reset_token = Some(reset_token::hash(&token));
        self.password_reset_expires = Some(bson::DateTime::from_chrono(now + valid_for));
        Ok(token)
    }

    pub fn clear_password_reset(&mut self) {
        self.password_reset_token = None;
        self.password_reset_expires = None;
    }

    pub(crate) fn plain_password(&self) -> Option<&str> {
        self.plain_password.as_deref()
    }

    pub(crate) fn take_plain_password(&mut self) -> Option<String> {
        self.plain_password.take()
    }

    ///
    /// Store the hash of the pending password and drop the confirmation so it is never persisted.
    ///
    pub(crate) fn apply_password_hash(&mut self, hash: String) {
        self.password = Some(hash);
        self.plain_password = None;
        self.password_confirm = None;
    }

    pub(crate) fn stamp_password_changed(&mut self, at: DateTime<Utc>) {
        self.password_changed_at = Some(bson::DateTime::from_chrono(at));
    }

    ///
    /// Called once the record has been written - it is no longer new and nothing is pending.
    ///
    pub(crate) fn mark_saved(&mut self) {
        self.is_new = false;
        self.password_modified = false;
    }

    ///
    /// Drop the password hash, as a default read would.
    ///
    pub fn without_password(mut self) -> Self {
        self.password = None;
        self
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| REDACTED);

        f.debug_struct("User")
            .field("user_id", &self.user_id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("photo", &self.photo)
            .field("role", &self.role)
            .field("password", &redact(&self.password))
            .field("password_changed_at", &self.password_changed_at)
            .field("password_reset_token", &redact(&self.password_reset_token))
            .field("password_reset_expires", &self.password_reset_expires)
            .field("password_modified", &self.password_modified)
            .field("is_new", &self.is_new)
            .finish()
    }
}
