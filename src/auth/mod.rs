//! User accounts, passwords and cookie based authentication.

mod cookie;
mod delete_user;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod register_user;
mod user;

pub use cookie::DEFAULT_COOKIE_DURATION;
pub use delete_user::delete_user_endpoint;
pub use log_in::post_log_in;
pub use log_out::get_log_out;
pub use middleware::auth_guard;
pub use password::{PasswordHash, ValidatedPassword};
pub use register_user::register_user;
pub use user::{
    User, UserID, UserProfile, count_users, create_user, create_user_table, delete_user,
    get_user_by_id, get_user_by_username,
};

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;
