use std::fmt;
use bcrypt::BcryptError;
use mongodb::bson;
use config::ConfigError;
use derive_more::Display;
use tokio::task::JoinError;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Display, PartialEq)]
pub enum ErrorCode {
    HashThreadingIssue              = 0401,
    UnableToReadCredentials         = 0500,
    MongoDBError                    = 0503,
    InvalidBSON                     = 0504,
    InvalidJSON                     = 0505,
    HashingError                    = 0509,
    InvalidPasswordHash             = 0510,
    EntropyUnavailable              = 0512,
    InvalidConfiguration            = 0513,
    ValidationFailed                = 1000,
    DuplicateEmail                  = 1001,
    InvalidRole                     = 1002,
    UserNotFound                    = 2100,
    IncorrectCredentials            = 2103,
    PasswordNotSelected             = 2105,
    PasswordChanged                 = 2106,
    ResetTokenInvalid               = 2200,
}

impl ErrorCode {
    pub fn with_msg(&self, message: &str) -> AccountError {
        AccountError::new(*self, message)
    }
}

///
/// A single failing field from a validation pass, e.g. ("email", "Please provide a valid email").
///
#[derive(Clone, Debug, Deserialize, Display, PartialEq, Serialize)]
#[display(fmt = "{}: {}", field, message)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        FieldError { field: field.to_string(), message: message.to_string() }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AccountError {
    error_code: ErrorCode,
    message: String,
    fields: Vec<FieldError>,
}

impl AccountError {
    pub fn new(error_code: ErrorCode, message: &str) -> Self {
        AccountError { error_code, message: message.to_string(), fields: vec!() }
    }

    ///
    /// A validation failure listing every field that failed and why.
    ///
    pub fn invalid(error_code: ErrorCode, fields: Vec<FieldError>) -> Self {
        let detail = fields.iter()
            .map(|f| f.message.as_str())
            .collect::<Vec<&str>>()
            .join(". ");

        AccountError {
            error_code,
            message: format!("Invalid input data. {}", detail),
            fields,
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        self.error_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.fields
    }

    ///
    /// Returns true if one of the field errors relates to the field specified.
    ///
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.field == field)
    }
}

impl fmt::Display for AccountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.error_code, self.error_code as u32, self.message)
    }
}

impl std::error::Error for AccountError {}

impl From<serde_json::Error> for AccountError {
    fn from(error: serde_json::Error) -> Self {
        ErrorCode::InvalidJSON.with_msg(&format!("Unable to convert to json: {}", error))
    }
}

impl From<mongodb::error::Error> for AccountError {
    fn from(error: mongodb::error::Error) -> Self {
        ErrorCode::MongoDBError.with_msg(&format!("MongoDB error: {}", error))
    }
}

impl From<bson::ser::Error> for AccountError {
    fn from(error: bson::ser::Error) -> Self {
        ErrorCode::InvalidBSON.with_msg(&format!("Unable to serialise BSON: {}", error))
    }
}

impl From<bson::de::Error> for AccountError {
    fn from(error: bson::de::Error) -> Self {
        ErrorCode::InvalidBSON.with_msg(&format!("Unable to deserialise BSON: {}", error))
    }
}

impl From<JoinError> for AccountError {
    fn from(error: JoinError) -> Self {
        ErrorCode::HashThreadingIssue.with_msg(&format!("Unable to hash: {}", error))
    }
}

///
/// Verifying only fails for a malformed stored hash - a mismatched password is not an error.
/// Hashing failures are mapped to HashingError where they occur.
///
impl From<BcryptError> for AccountError {
    fn from(error: BcryptError) -> Self {
        ErrorCode::InvalidPasswordHash.with_msg(&format!("Unable to verify: {}", error))
    }
}

impl From<rand::Error> for AccountError {
    fn from(error: rand::Error) -> Self {
        ErrorCode::EntropyUnavailable.with_msg(&format!("Unable to generate a secure random value: {}", error))
    }
}

impl From<ConfigError> for AccountError {
    fn from(error: ConfigError) -> Self {
        ErrorCode::InvalidConfiguration.with_msg(&format!("The service configuration is not correct: {}", error))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_lists_every_field() {
        let err = AccountError::invalid(ErrorCode::ValidationFailed, vec!(
            FieldError::new("name", "Please tell us your name!"),
            FieldError::new("email", "Please provide a valid email")));

        assert_eq!(err.error_code(), ErrorCode::ValidationFailed);
        assert_eq!(err.fields().len(), 2);
        assert!(err.has_field("name"));
        assert!(err.has_field("email"));
        assert!(!err.has_field("password"));
        assert_eq!(err.message(), "Invalid input data. Please tell us your name!. Please provide a valid email");
    }

    #[test]
    fn test_display_includes_numeric_code() {
        let err = ErrorCode::UserNotFound.with_msg("nope");
        assert_eq!(format!("{}", err), "UserNotFound (2100): nope");
    }
}
