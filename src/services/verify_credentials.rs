use tracing::instrument;
use super::verify_in_background;
use crate::db::store::Fields;
use crate::model::user::User;
use crate::utils::{context::ServiceContext, errors::{AccountError, ErrorCode}};

///
/// Check an email and password pair. Returns the user (without its password) if they match.
///
/// An unknown email and a wrong password give the same error so callers can't tell them apart.
///
#[instrument(skip(ctx, password))]
pub async fn verify_credentials(ctx: &ServiceContext, email: &str, password: &str) -> Result<User, AccountError> {
    let user = match ctx.store().load_by_email(email, Fields::WithPassword).await {
        Ok(user) => user,
        Err(err) if err.error_code() == ErrorCode::UserNotFound => return Err(incorrect()),
        Err(err) => return Err(err),
    };

    match verify_in_background(password, &user).await? {
        true => Ok(user.without_password()),
        false => {
            tracing::debug!(user_id = user.user_id(), "Password did not match");
            Err(incorrect())
        },
    }
}

fn incorrect() -> AccountError {
    ErrorCode::IncorrectCredentials.with_msg("Incorrect email or password")
}
