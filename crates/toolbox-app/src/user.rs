//! Helpers for resolving the operating [`User`] from configuration or the environment.

use std::env;

use anyhow::{Context, Result};
use toolbox_core::{MemberRole, User};

use crate::config::ProfileConfig;

/// Environment variable checked first for the user name.
pub const ENV_USER_NAME: &str = "TOOLBOX_USER_NAME";
/// Environment variable checked first for the user email.
pub const ENV_USER_EMAIL: &str = "TOOLBOX_USER_EMAIL";
/// Fallback display name when nothing can be resolved.
pub const DEFAULT_USER_NAME: &str = "Toolbox";
/// Fallback email when nothing can be resolved.
pub const DEFAULT_USER_EMAIL: &str = "toolbox@example.invalid";

const USER_NAME_ENV: &str = "USER";

/// Resolve the user using the standard fallback order (profile → env → defaults).
#[must_use]
pub fn resolve_user(profile: Option<&ProfileConfig>) -> User {
    let mut fetch = |key: &'static str| env::var(key).ok();
    resolve_user_with_env(profile, &mut fetch)
}

fn resolve_user_with_env(
    profile: Option<&ProfileConfig>,
    fetch: &mut impl FnMut(&'static str) -> Option<String>,
) -> User {
    if let Some(profile) = profile {
        return User {
            name: profile.name.clone(),
            email: profile.email.clone(),
            department: profile.department.clone(),
            role: profile.role.unwrap_or_default(),
        };
    }
    user_from_env_with(fetch).unwrap_or_else(|_| User {
        name: DEFAULT_USER_NAME.to_owned(),
        email: DEFAULT_USER_EMAIL.to_owned(),
        department: None,
        role: MemberRole::default(),
    })
}

fn env_value_with(
    candidates: &[&'static str],
    fetch: &mut impl FnMut(&'static str) -> Option<String>,
) -> Option<String> {
    candidates
        .iter()
        .find_map(|key| fetch(key).filter(|value| !value.trim().is_empty()))
}

fn user_from_env_with(fetch: &mut impl FnMut(&'static str) -> Option<String>) -> Result<User> {
    let name = env_value_with(&[ENV_USER_NAME, USER_NAME_ENV], fetch)
        .context("environment does not include a user name")?;
    let email = env_value_with(&[ENV_USER_EMAIL], fetch).unwrap_or_else(|| DEFAULT_USER_EMAIL.to_owned());
    Ok(User {
        name,
        email,
        department: None,
        role: MemberRole::default(),
    })
}
