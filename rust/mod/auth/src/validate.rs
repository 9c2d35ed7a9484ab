//! Credential shape checks, run on every keystroke and before any request.
//!
//! Each check returns the message shown next to the field.

pub const USERNAME_LEN: std::ops::RangeInclusive<usize> = 5..=30;
pub const PASSWORD_LEN: std::ops::RangeInclusive<usize> = 8..=16;

/// Symbols a password must draw at least one character from.
pub const PASSWORD_SYMBOLS: &str = "@$!%*?&";

const USERNAME_EDGE: [char; 3] = ['.', '_', '-'];

pub fn username(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err("Username is required".into());
    }
    let len = value.chars().count();
    if !USERNAME_LEN.contains(&len) {
        return Err(format!(
            "Username must be between {} and {} characters",
            USERNAME_LEN.start(),
            USERNAME_LEN.end()
        ));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || USERNAME_EDGE.contains(&c))
    {
        return Err("Username can only contain letters, numbers, '.', '_' and '-'".into());
    }
    if value.starts_with(USERNAME_EDGE) || value.ends_with(USERNAME_EDGE) {
        return Err("Username cannot start or end with '.', '_' or '-'".into());
    }
    Ok(())
}

pub fn password(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err("Password is required".into());
    }
    let len = value.chars().count();
    if !PASSWORD_LEN.contains(&len) {
        return Err(format!(
            "Password must be between {} and {} characters",
            PASSWORD_LEN.start(),
            PASSWORD_LEN.end()
        ));
    }
    let upper = value.chars().any(|c| c.is_ascii_uppercase());
    let lower = value.chars().any(|c| c.is_ascii_lowercase());
    let digit = value.chars().any(|c| c.is_ascii_digit());
    let symbol = value.chars().any(|c| PASSWORD_SYMBOLS.contains(c));
    if !(upper && lower && digit && symbol) {
        return Err(format!(
            "Password must include an uppercase letter, a lowercase letter, a number and one of {}",
            PASSWORD_SYMBOLS
        ));
    }
    Ok(())
}
