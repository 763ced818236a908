use crate::models::user::{SigninRequest, SignupRequest, UpdateRequest};
use regex::Regex;
use std::sync::OnceLock;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 30;
pub const NAME_MAX_LEN: usize = 50;
pub const PASSWORD_MIN_LEN: usize = 6;

/// Checks that a username looks like an email address.
///
/// Rules:
/// 1. Local part of letters, digits and `_ ' + - .`, not starting with a dot
/// 2. No consecutive dots anywhere
/// 3. Domain of dot-separated labels ending in an alphabetic TLD of 2+ chars
pub fn validate_email(username: &str) -> Result<(), String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
            .expect("email regex compiles")
    });

    if username.starts_with('.') || username.contains("..") || !re.is_match(username) {
        return Err("Username must be a valid email address".to_string());
    }
    Ok(())
}

/// Username rules for new accounts: email shape plus a 3–30 char length.
pub fn validate_username(username: &str) -> Result<(), String> {
    let len = username.chars().count();
    if len < USERNAME_MIN_LEN {
        return Err(format!("Username must be at least {USERNAME_MIN_LEN} characters long"));
    }
    if len > USERNAME_MAX_LEN {
        return Err(format!("Username must be at most {USERNAME_MAX_LEN} characters long"));
    }
    validate_email(username)
}

pub fn validate_name(field: &str, value: &str) -> Result<(), String> {
    if value.chars().count() > NAME_MAX_LEN {
        return Err(format!("{field} must be at most {NAME_MAX_LEN} characters long"));
    }
    Ok(())
}

/// Length is the only strength rule we enforce.
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(format!("Password must be at least {PASSWORD_MIN_LEN} characters long"));
    }
    Ok(())
}

pub fn validate_signup(req: &SignupRequest) -> Result<(), String> {
    validate_username(&req.username)?;
    validate_name("firstName", &req.first_name)?;
    validate_name("lastName", &req.last_name)?;
    validate_password(&req.password)
}

pub fn validate_signin(req: &SigninRequest) -> Result<(), String> {
    validate_email(&req.username)?;
    validate_password(&req.password)
}

/// Every field is optional; the ones that are present follow the signup rules.
pub fn validate_update(req: &UpdateRequest) -> Result<(), String> {
    if let Some(password) = &req.password {
        validate_password(password)?;
    }
    if let Some(first_name) = &req.first_name {
        validate_name("firstName", first_name)?;
    }
    if let Some(last_name) = &req.last_name {
        validate_name("lastName", last_name)?;
    }
    Ok(())
}
