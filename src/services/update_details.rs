use serde::Deserialize;
use tracing::instrument;
use super::{save_user, SaveOptions};
use crate::db::store::Fields;
use crate::model::user::User;
use crate::utils::{context::ServiceContext, errors::AccountError};

///
/// The profile fields a user may change themselves. Absent fields are left alone.
///
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UserDetails {
    pub name: Option<String>,
    pub email: Option<String>,
    pub photo: Option<String>,
}

///
/// Update a user's profile. Passwords are changed through update_password so the change is
/// verified and stamped.
///
#[instrument(skip(ctx, details))]
pub async fn update_details(ctx: &ServiceContext, user_id: &str, details: UserDetails) -> Result<User, AccountError> {
    let mut user = ctx.store().load(user_id, Fields::Default).await?;

    if let Some(name) = details.name {
        user.name = name;
    }

    if let Some(email) = details.email {
        user.set_email(&email);
    }

    if let Some(photo) = details.photo {
        user.photo = Some(photo);
    }

    save_user(ctx, user, SaveOptions::default()).await
}
