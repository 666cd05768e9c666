//! Context names conventionally read `<user>@<cluster>`.
//!
//! Nothing enforces the template: names that don't follow it pass through the
//! rename helpers untouched.

pub const SEPARATOR: char = '@';

pub fn compose(user: &str, cluster: &str) -> String {
    format!("{user}{SEPARATOR}{cluster}")
}

/// Splits at the first separator.
pub fn split(name: &str) -> Option<(&str, &str)> {
    name.split_once(SEPARATOR)
}

/// Replaces the first `@<old>` with `@<new>`.
pub fn rename_cluster(name: &str, old: &str, new: &str) -> String {
    name.replacen(
        &format!("{SEPARATOR}{old}"),
        &format!("{SEPARATOR}{new}"),
        1,
    )
}

/// Replaces the first `<old>@` with `<new>@`.
pub fn rename_user(name: &str, old: &str, new: &str) -> String {
    name.replacen(
        &format!("{old}{SEPARATOR}"),
        &format!("{new}{SEPARATOR}"),
        1,
    )
}
