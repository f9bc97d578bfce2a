use chrono::{DateTime, Duration, Utc};
use crate::model::user::User;
use crate::utils::errors::{AccountError, ErrorCode};

///
/// Work factor for interactive logins.
///
pub const DEFAULT_COST: u32 = 12;

///
/// The change stamp is backdated so a token issued in the same second as the change still counts
/// as issued after it.
///
pub const CHANGE_STAMP_BACKDATE_MS: i64 = 1000;

pub fn hash(plain_text_password: &str, cost: u32) -> Result<String, AccountError> {
    bcrypt::hash(plain_text_password, cost)
        .map_err(|e| ErrorCode::HashingError.with_msg(&format!("Unable to hash password: {}", e)))
}

///
/// Validate if the candidate password matches the stored bcrypt hash.
///
/// A mismatch is Ok(false). Only a malformed hash is an error.
///
pub fn correct_password(candidate_password: &str, stored_hash: &str) -> Result<bool, AccountError> {
    Ok(bcrypt::verify(candidate_password, stored_hash)?)
}

///
/// Pre-save stage: if the password was set, replace it with its hash and drop the confirmation.
///
/// This is a highly CPU-bound activity, callers on the async runtime should run it in the
/// blocking thread pool.
///
pub fn hash_password_if_changed(mut user: User, cost: u32) -> Result<User, AccountError> {
    if !user.is_password_modified() {
        return Ok(user)
    }

    if let Some(plain_text_password) = user.take_plain_password() {
        let phc = hash(&plain_text_password, cost)?;
        user.apply_password_hash(phc);
    }

    Ok(user)
}

///
/// Pre-save stage: stamp when an existing user's password was changed.
///
pub fn stamp_change_timestamp_if_changed(mut user: User, now: DateTime<Utc>) -> User {
    if !user.is_password_modified() || user.is_new() {
        return user
    }

    user.stamp_password_changed(now - Duration::milliseconds(CHANGE_STAMP_BACKDATE_MS));
    user
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::user::tests::new_user;

    // The minimum bcrypt allows - keeps the tests quick.
    const TEST_COST: u32 = 4;

    fn saved_user() -> User {
        let mut user = hash_password_if_changed(new_user("pass1234", "pass1234"), TEST_COST).unwrap();
        user.mark_saved();
        user
    }

    #[test]
    fn test_basic_hash_and_verify() -> Result<(), AccountError> {
        for plain in &["pass1234", "correct horse battery staple", "ünïcödé-pässwörd"] {
            let phc = hash(plain, TEST_COST)?;

            assert_ne!(&phc, plain);
            assert_eq!(correct_password(plain, &phc)?, true);
            assert_eq!(correct_password("wrong-password", &phc)?, false);
        }
        Ok(())
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        let err = correct_password("pass1234", "not-a-valid-hash").unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::InvalidPasswordHash);
    }

    #[test]
    fn test_invalid_cost_is_a_hashing_error() {
        let err = hash("pass1234", 99).unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::HashingError);
    }

    #[test]
    fn test_hashing_replaces_password_and_drops_confirm() -> Result<(), AccountError> {
        let user = hash_password_if_changed(new_user("pass1234", "pass1234"), TEST_COST)?;

        assert_eq!(user.password_confirm(), None);
        assert_eq!(user.plain_password(), None);
        assert_ne!(user.password(), Some("pass1234"));
        assert_eq!(user.correct_password("pass1234")?, true);
        assert_eq!(user.correct_password("pass12345")?, false);
        Ok(())
    }

    #[test]
    fn test_hashing_is_a_no_op_when_password_not_modified() -> Result<(), AccountError> {
        let user = saved_user();
        let before = user.password().map(str::to_string);

        let user = hash_password_if_changed(user, TEST_COST)?;
        assert_eq!(user.password().map(str::to_string), before);
        Ok(())
    }

    #[test]
    fn test_new_users_are_not_stamped() -> Result<(), AccountError> {
        let user = hash_password_if_changed(new_user("pass1234", "pass1234"), TEST_COST)?;
        let user = stamp_change_timestamp_if_changed(user, Utc::now());
        assert_eq!(user.password_changed_at(), None);
        Ok(())
    }

    #[test]
    fn test_unchanged_password_is_not_stamped() {
        let user = stamp_change_timestamp_if_changed(saved_user(), Utc::now());
        assert_eq!(user.password_changed_at(), None);
    }

    #[test]
    fn test_changed_password_is_stamped_one_second_early() -> Result<(), AccountError> {
        let now = DateTime::parse_from_rfc3339("2021-08-23T09:30:00Z").unwrap().with_timezone(&Utc);
        let mut user = saved_user();
        user.set_password("newpass123", "newpass123");

        let user = hash_password_if_changed(user, TEST_COST)?;
        let user = stamp_change_timestamp_if_changed(user, now);

        assert_eq!(user.password_changed_at(), Some(now - Duration::seconds(1)));
        assert!(user.changed_password_after(now.timestamp() - 2));
        assert!(!user.changed_password_after(now.timestamp()));
        Ok(())
    }
}
