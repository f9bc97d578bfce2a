mod create_user;
mod ensure_token_current;
mod forgot_password;
mod reset_password;
mod update_details;
mod update_password;
mod verify_credentials;

pub use create_user::create_user;
pub use ensure_token_current::ensure_token_current;
pub use forgot_password::{cancel_password_reset, forgot_password};
pub use reset_password::reset_password;
pub use update_details::{update_details, UserDetails};
pub use update_password::update_password;
pub use verify_credentials::verify_credentials;

use crate::model::{password, user::User, validation};
use crate::utils::{context::ServiceContext, errors::AccountError};

#[derive(Clone, Copy, Debug)]
pub struct SaveOptions {
    // Skip validation when only bookkeeping fields (e.g. the reset token) have changed.
    pub validate_before_save: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        SaveOptions { validate_before_save: true }
    }
}

///
/// Validate, hash, stamp and write the user - in that order.
///
/// New users are inserted, existing users updated. The returned user is no longer new and has
/// no pending password.
///
pub async fn save_user(ctx: &ServiceContext, user: User, options: SaveOptions) -> Result<User, AccountError> {

    if options.validate_before_save {
        validation::validate(&user)?;
    }

    // Hashing is a highly CPU-bound activity so perform it in the blocking thread pool not on the
    // main event loop.
    let user = match user.is_password_modified() {
        true => {
            let cost = ctx.config().bcrypt_cost;
            tokio::task::spawn_blocking(move || password::hash_password_if_changed(user, cost))
                .await
                .map_err(AccountError::from)?
                ?
        },
        false => user,
    };

    let mut user = password::stamp_change_timestamp_if_changed(user, ctx.now());

    match user.is_new() {
        true  => ctx.store().insert(&user).await?,
        false => ctx.store().update(&user).await?,
    };

    user.mark_saved();
    Ok(user)
}

///
/// Check a candidate against a stored hash on the blocking thread pool.
///
async fn verify_in_background(candidate_password: &str, user: &User) -> Result<bool, AccountError> {
    let candidate_password = candidate_password.to_string();
    let user = user.clone();

    tokio::task::spawn_blocking(move || user.correct_password(&candidate_password))
        .await
        .map_err(AccountError::from)?
}
