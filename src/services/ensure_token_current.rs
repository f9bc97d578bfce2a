use tracing::instrument;
use crate::db::store::Fields;
use crate::model::user::User;
use crate::utils::{context::ServiceContext, errors::{AccountError, ErrorCode}};

///
/// For a token consumer: reject a token issued (epoch seconds) before the user last changed their
/// password. Returns the user if the token is still current.
///
#[instrument(skip(ctx))]
pub async fn ensure_token_current(ctx: &ServiceContext, user_id: &str, issued_at: i64) -> Result<User, AccountError> {
    let user = ctx.store().load(user_id, Fields::Default).await?;

    if user.changed_password_after(issued_at) {
        return Err(ErrorCode::PasswordChanged.with_msg("User recently changed password! Please log in again."))
    }

    Ok(user)
}
