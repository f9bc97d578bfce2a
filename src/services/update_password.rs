use tracing::instrument;
use super::{save_user, verify_in_background, SaveOptions};
use crate::db::store::Fields;
use crate::model::user::User;
use crate::utils::{context::ServiceContext, errors::{AccountError, ErrorCode}};

///
/// Change a logged-in user's password. The current password must be supplied and correct.
///
/// Saving stamps password_changed_at, so tokens issued before the change are no longer current.
///
#[instrument(skip(ctx, current_password, password, password_confirm))]
pub async fn update_password(
    ctx: &ServiceContext,
    user_id: &str,
    current_password: &str,
    password: &str,
    password_confirm: &str) -> Result<User, AccountError> {

    let mut user = ctx.store().load(user_id, Fields::WithPassword).await?;

    if !verify_in_background(current_password, &user).await? {
        tracing::warn!("Password change rejected, the current password did not match");
        return Err(ErrorCode::IncorrectCredentials.with_msg("Your current password is wrong"))
    }

    user.set_password(password, password_confirm);
    let user = save_user(ctx, user, SaveOptions::default()).await?;

    tracing::info!("Password changed");
    Ok(user.without_password())
}
