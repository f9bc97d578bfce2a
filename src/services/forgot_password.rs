use tracing::instrument;
use super::{save_user, SaveOptions};
use crate::db::store::Fields;
use crate::model::user::User;
use crate::utils::{context::ServiceContext, errors::AccountError};

// Only the reset fields change, the rest of the user was valid when it was stored.
const RESET_SAVE: SaveOptions = SaveOptions { validate_before_save: false };

///
/// Issue a password reset token for the user with the email given.
///
/// Returns the user and the plain token. The token must be delivered to the user out-of-band and
/// never logged - only its hash is stored.
///
#[instrument(skip(ctx))]
pub async fn forgot_password(ctx: &ServiceContext, email: &str) -> Result<(User, String), AccountError> {
    let mut user = ctx.store().load_by_email(email, Fields::Default).await?;

    let valid_for = ctx.config().reset_token_expiry()?;
    let token = user.create_password_reset_token(ctx.now(), valid_for)?;
    let user = save_user(ctx, user, RESET_SAVE).await?;

    tracing::info!(user_id = user.user_id(), "Password reset token issued");
    Ok((user, token))
}

///
/// Withdraw an issued reset token, e.g. when it could not be delivered.
///
#[instrument(skip(ctx))]
pub async fn cancel_password_reset(ctx: &ServiceContext, user_id: &str) -> Result<User, AccountError> {
    let mut user = ctx.store().load(user_id, Fields::Default).await?;
    user.clear_password_reset();
    save_user(ctx, user, RESET_SAVE).await
}
