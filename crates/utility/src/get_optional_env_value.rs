use std::str::FromStr;

/// Reads `env_name` (honouring values loaded from `.env` files) and parses it.
///
/// Unset, blank, or unparsable values yield `None`, so callers can chain their
/// own fallbacks.
pub fn get_optional_env_value<T>(env_name: &str) -> Option<T>
where
    T: FromStr,
{
    let raw = dotenvy::var(env_name).ok()?;
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return None;
    }

    T::from_str(trimmed).ok()
}
