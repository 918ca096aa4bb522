//! User accounts, password hashing and cookie-based session authentication.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod register;
mod user;

pub(crate) use cookie::{
    DEFAULT_COOKIE_DURATION, get_user_id_from_auth_cookie, invalidate_auth_cookie, set_auth_cookie,
};
pub(crate) use log_in::{get_log_in_page, post_log_in};
pub(crate) use log_out::get_log_out;
pub(crate) use middleware::{auth_guard, auth_guard_hx};
pub use password::PasswordHash;
pub(crate) use register::{get_register_page, register_user};
pub use user::Username;
pub(crate) use user::{UserID, create_user, create_user_table, get_user_by_username};

#[cfg(test)]
pub(crate) use cookie::{COOKIE_EXPIRY, COOKIE_USER_ID};

#[cfg(test)]
pub(crate) use user::User;

#[cfg(test)]
pub(crate) use middleware::AuthState;
