use validator::ValidateEmail;
use crate::db::prelude::*;
use crate::model::user::User;
use crate::utils::errors::{AccountError, ErrorCode, FieldError};

pub const MIN_PASSWORD_LENGTH: usize = 8;

pub const PASSWORD_CONFIRM: &str = "password_confirm";

///
/// Check a user is fit to be written. Every failing field is reported, not just the first.
///
/// Email uniqueness can only be checked by the store when the user is written.
///
pub fn validate(user: &User) -> Result<(), AccountError> {
    let mut errors = vec!();

    if user.name.is_empty() {
        errors.push(FieldError::new(NAME, "Please tell us your name!"));
    }

    if user.email().is_empty() {
        errors.push(FieldError::new(EMAIL, "Please provide your email"));
    } else if !user.email().validate_email() {
        errors.push(FieldError::new(EMAIL, "Please provide a valid email"));
    }

    match user.plain_password() {
        Some(plain_text_password) => {
            if plain_text_password.is_empty() {
                errors.push(FieldError::new(PASSWORD, "Please provide a password"));
            } else if plain_text_password.chars().count() < MIN_PASSWORD_LENGTH {
                errors.push(FieldError::new(PASSWORD,
                    &format!("A password must have at least {} characters", MIN_PASSWORD_LENGTH)));
            }

            // The confirmation is only required while a password is being set.
            match user.password_confirm() {
                None | Some("") => errors.push(FieldError::new(PASSWORD_CONFIRM, "Please confirm your password")),
                Some(confirm) if confirm != plain_text_password => {
                    errors.push(FieldError::new(PASSWORD_CONFIRM, "Passwords are not the same!"))
                },
                Some(_) => {},
            }
        },
        None => {
            if user.is_new() && user.password().is_none() {
                errors.push(FieldError::new(PASSWORD, "Please provide a password"));
            }
        },
    }

    match errors.is_empty() {
        true  => Ok(()),
        false => Err(AccountError::invalid(ErrorCode::ValidationFailed, errors)),
    }
}
