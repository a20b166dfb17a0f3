/// HTTP request handlers
pub mod auth;
pub mod verification;

pub use auth::{auth_submit, change_password, login_form, logout, session_entry, set_new_password};
pub use verification::{
    check_phone, confirm_email, recover_password, registration_confirm, registration_start,
    send_recovery_codes,
};
