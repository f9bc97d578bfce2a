pub mod memory;
pub mod mongo;
pub mod store;
pub mod user;

pub mod prelude {
    // Collection names.
    pub const USERS: &str = "Users";

    // Field names.
    pub const USER_ID:                &str = "user_id";
    pub const NAME:                   &str = "name";
    pub const EMAIL:                  &str = "email";
    pub const PHOTO:                  &str = "photo";
    pub const ROLE:                   &str = "role";
    pub const PASSWORD:               &str = "password";
    pub const PASSWORD_CHANGED_AT:    &str = "password_changed_at";
    pub const PASSWORD_RESET_TOKEN:   &str = "password_reset_token";
    pub const PASSWORD_RESET_EXPIRES: &str = "password_reset_expires";

    // Optional fields removed from the stored document when absent on the user. The password is
    // deliberately not here - a user loaded without it must not erase the stored hash.
    pub const UNSETTABLE: [&str; 4] = [PHOTO, PASSWORD_CHANGED_AT, PASSWORD_RESET_TOKEN, PASSWORD_RESET_EXPIRES];
}
