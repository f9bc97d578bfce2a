use tracing::instrument;
use super::{save_user, SaveOptions};
use crate::model::{reset_token, user::User};
use crate::utils::{context::ServiceContext, errors::AccountError};

///
/// Complete a reset: the plain token from forgot_password authorises setting a new password.
///
/// The token is single-use - it is cleared when the new password is saved. An unknown or expired
/// token is rejected with ResetTokenInvalid.
///
#[instrument(skip_all)]
pub async fn reset_password(ctx: &ServiceContext, token: &str, password: &str, password_confirm: &str)
    -> Result<User, AccountError> {

    let token_hash = reset_token::hash(token);
    let mut user = ctx.store().load_by_reset_token(&token_hash, ctx.now()).await?;

    user.set_password(password, password_confirm);
    user.clear_password_reset();
    let user = save_user(ctx, user, SaveOptions::default()).await?;

    tracing::info!(user_id = user.user_id(), "Password reset completed");
    Ok(user.without_password())
}
