use std::collections::HashMap;
use bson::Document;
use parking_lot::RwLock;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crate::db::{mongo::Persistable, prelude::*, store::{self, Fields, UserStore}};
use crate::model::user::User;
use crate::utils::errors::{AccountError, ErrorCode};

///
/// Users held in-process as BSON documents, keyed on user_id.
///
/// Behaves like the MongoDB store - the same documents are written and read back, email is
/// unique and the password is projected out of default reads. Used for tests and local runs.
///
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, Document>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }

    ///
    /// The raw stored document - lets tests see exactly what would be persisted.
    ///
    pub fn document(&self, user_id: &str) -> Option<Document> {
        self.users.read().get(user_id).cloned()
    }

    fn find<P>(&self, predicate: P, fields: Fields) -> Result<Option<User>, AccountError>
    where
        P: Fn(&Document) -> bool {

        let found = self.users.read()
            .values()
            .find(|doc| predicate(*doc))
            .cloned();

        match found {
            Some(mut doc) => {
                if fields == Fields::Default {
                    doc.remove(PASSWORD);
                }
                Ok(Some(bson::from_document(doc)?))
            },
            None => Ok(None),
        }
    }
}

fn email_taken(users: &HashMap<String, Document>, email: &str, user_id: &str) -> bool {
    users.iter().any(|(id, doc)| id != user_id && doc.get_str(EMAIL).ok() == Some(email))
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, user: &User) -> Result<(), AccountError> {
        let doc = user.to_doc()?;
        let mut users = self.users.write();

        if users.contains_key(user.user_id()) {
            return Err(ErrorCode::MongoDBError.with_msg(&format!("User {} already exists", user.user_id())))
        }

        if email_taken(&users, user.email(), user.user_id()) {
            return Err(store::duplicate_email(user.email()))
        }

        users.insert(user.user_id().to_string(), doc);
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), AccountError> {
        let (set, unset) = store::update_documents(user)?;
        let mut users = self.users.write();

        if email_taken(&users, user.email(), user.user_id()) {
            return Err(store::duplicate_email(user.email()))
        }

        let existing = users.get_mut(user.user_id())
            .ok_or_else(|| store::user_not_found(&format!("id {}", user.user_id())))?;

        for (field, value) in set {
            existing.insert(field, value);
        }

        for field in unset.keys() {
            existing.remove(field);
        }

        Ok(())
    }

    async fn load(&self, user_id: &str, fields: Fields) -> Result<User, AccountError> {
        match self.find(|doc| doc.get_str(USER_ID).ok() == Some(user_id), fields)? {
            Some(user) => Ok(user),
            None => Err(store::user_not_found(&format!("id {}", user_id))),
        }
    }

    async fn load_by_email(&self, email: &str, fields: Fields) -> Result<User, AccountError> {
        let email = email.to_lowercase();

        match self.find(|doc| doc.get_str(EMAIL).ok() == Some(email.as_str()), fields)? {
            Some(user) => Ok(user),
            None => Err(store::user_not_found("that email address")),
        }
    }

    async fn load_by_reset_token(&self, token_hash: &str, now: DateTime<Utc>) -> Result<User, AccountError> {
        let now = now.timestamp_millis();

        let matches = |doc: &Document| {
            let expires = doc.get_datetime(PASSWORD_RESET_EXPIRES).ok().map(|at| at.timestamp_millis());
            doc.get_str(PASSWORD_RESET_TOKEN).ok() == Some(token_hash)
                && expires.map(|at| at > now).unwrap_or(false)
        };

        match self.find(matches, Fields::Default)? {
            Some(user) => Ok(user),
            None => Err(store::reset_token_invalid()),
        }
    }
}
