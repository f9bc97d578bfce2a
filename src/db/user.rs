use async_trait::async_trait;
use chrono::{DateTime, Utc};
use bson::{Document, doc};
use mongodb::{Collection, Database, options::FindOneOptions};
use crate::db::{mongo, prelude::*, store::{self, Fields, UserStore}};
use crate::model::user::User;
use crate::utils::errors::AccountError;

///
/// Users persisted in the MongoDB Users collection.
///
pub struct MongoUserStore {
    db: Database,
}

impl MongoUserStore {
    pub fn new(db: Database) -> Self {
        MongoUserStore { db }
    }

    fn users(&self) -> Collection<User> {
        self.db.collection::<User>(USERS)
    }

    async fn find_one(&self, filter: Document, fields: Fields) -> Result<Option<User>, AccountError> {
        let options = match fields {
            Fields::Default => Some(FindOneOptions::builder().projection(doc!{ PASSWORD: 0 }).build()),
            Fields::WithPassword => None,
        };

        Ok(self.users().find_one(filter, options).await?)
    }
}

///
/// Convert a write failure, surfacing a unique index violation as a duplicate email.
///
fn write_error(err: mongodb::error::Error, user: &User) -> AccountError {
    match mongo::is_duplicate_err(&err) {
        true  => store::duplicate_email(user.email()),
        false => AccountError::from(err),
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn insert(&self, user: &User) -> Result<(), AccountError> {
        self.users().insert_one(user, None)
            .await
            .map_err(|err| write_error(err, user))?;

        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), AccountError> {
        let filter = doc!{ USER_ID: user.user_id() };

        let (set, unset) = store::update_documents(user)?;
        let mut update = doc!{ "$set": set };
        if !unset.is_empty() {
            update.insert("$unset", unset);
        }

        let result = self.db.collection::<Document>(USERS).update_one(filter, update, None)
            .await
            .map_err(|err| write_error(err, user))?;

        match result.matched_count {
            0 => Err(store::user_not_found(&format!("id {}", user.user_id()))),
            _ => Ok(()),
        }
    }

    async fn load(&self, user_id: &str, fields: Fields) -> Result<User, AccountError> {
        match self.find_one(doc!{ USER_ID: user_id }, fields).await? {
            Some(user) => Ok(user),
            None => Err(store::user_not_found(&format!("id {}", user_id))),
        }
    }

    async fn load_by_email(&self, email: &str, fields: Fields) -> Result<User, AccountError> {
        match self.find_one(doc!{ EMAIL: email.to_lowercase() }, fields).await? {
            Some(user) => Ok(user),
            None => Err(store::user_not_found("that email address")),
        }
    }

    async fn load_by_reset_token(&self, token_hash: &str, now: DateTime<Utc>) -> Result<User, AccountError> {
        let filter = doc!{
            PASSWORD_RESET_TOKEN: token_hash,
            PASSWORD_RESET_EXPIRES: { "$gt": bson::DateTime::from_chrono(now) },
        };

        match self.find_one(filter, Fields::Default).await? {
            Some(user) => Ok(user),
            None => Err(store::reset_token_invalid()),
        }
    }
}
