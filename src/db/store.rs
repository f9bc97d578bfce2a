use bson::Document;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crate::db::{mongo::Persistable, prelude::*};
use crate::model::user::User;
use crate::utils::errors::{AccountError, ErrorCode, FieldError};

///
/// Which fields a read returns. The password hash is only returned when asked for.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Fields {
    Default,
    WithPassword,
}

///
/// Persistence for users. Implementations enforce email uniqueness.
///
#[async_trait]
pub trait UserStore: Send + Sync {
    ///
    /// Write a new user. Fails with DuplicateEmail if the email is taken.
    ///
    async fn insert(&self, user: &User) -> Result<(), AccountError>;

    ///
    /// Overwrite an existing user's fields. A user loaded without its password keeps the stored hash.
    ///
    async fn update(&self, user: &User) -> Result<(), AccountError>;

    async fn load(&self, user_id: &str, fields: Fields) -> Result<User, AccountError>;

    async fn load_by_email(&self, email: &str, fields: Fields) -> Result<User, AccountError>;

    ///
    /// Find the user holding the hashed reset token - only while the token has not expired.
    ///
    async fn load_by_reset_token(&self, token_hash: &str, now: DateTime<Utc>) -> Result<User, AccountError>;
}

pub fn duplicate_email(email: &str) -> AccountError {
    AccountError::invalid(ErrorCode::DuplicateEmail, vec!(
        FieldError::new(EMAIL, &format!("Duplicate field value: {}. Please use another value!", email))))
}

pub fn user_not_found(by: &str) -> AccountError {
    ErrorCode::UserNotFound.with_msg(&format!("There is no user with {}", by))
}

pub fn reset_token_invalid() -> AccountError {
    ErrorCode::ResetTokenInvalid.with_msg("Token is invalid or has expired")
}

///
/// Split a user into the fields to $set and the absent optional fields to $unset.
///
pub fn update_documents(user: &User) -> Result<(Document, Document), AccountError> {
    let mut set = user.to_doc()?;
    set.remove(USER_ID);

    let mut unset = Document::new();
    for field in UNSETTABLE.iter() {
        if !set.contains_key(*field) {
            unset.insert(*field, "");
        }
    }

    Ok((set, unset))
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use crate::model::user::tests::new_user;

    #[test]
    fn test_update_documents_never_unset_the_password() -> Result<(), AccountError> {
        let user = new_user("pass1234", "pass1234");
        let (set, unset) = update_documents(&user)?;

        assert!(!set.contains_key(USER_ID));
        assert!(!set.contains_key(PASSWORD));
        assert!(!unset.contains_key(PASSWORD));
        assert!(unset.contains_key(PASSWORD_RESET_TOKEN));
        assert!(unset.contains_key(PASSWORD_RESET_EXPIRES));
        Ok(())
    }

    #[test]
    fn test_update_documents_set_reset_fields() -> Result<(), AccountError> {
        let mut user = new_user("pass1234", "pass1234");
        user.create_password_reset_token(Utc::now(), Duration::minutes(10))?;
        let (set, unset) = update_documents(&user)?;

        assert!(set.contains_key(PASSWORD_RESET_TOKEN));
        assert!(set.contains_key(PASSWORD_RESET_EXPIRES));
        assert!(!unset.contains_key(PASSWORD_RESET_TOKEN));
        Ok(())
    }

    #[test]
    fn test_duplicate_email_names_the_field() {
        let err = duplicate_email("jonas@example.com");
        assert_eq!(err.error_code(), ErrorCode::DuplicateEmail);
        assert!(err.has_field(EMAIL));
    }
}
