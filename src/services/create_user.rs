use tracing::instrument;
use super::{save_user, SaveOptions};
use crate::model::user::{NewUser, User};
use crate::utils::{context::ServiceContext, errors::AccountError};

///
/// Sign a new user up. Their password is validated against its confirmation, hashed and stored.
///
#[instrument(skip(ctx, new_user), fields(email = %new_user.email))]
pub async fn create_user(ctx: &ServiceContext, new_user: NewUser) -> Result<User, AccountError> {
    let user = save_user(ctx, User::from(new_user), SaveOptions::default()).await?;

    tracing::info!(user_id = user.user_id(), "User created");
    Ok(user.without_password())
}
