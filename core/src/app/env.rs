use std::env;

/// Loads a `.env` file from the working directory (or its parents) into the process environment.
///
/// Variables already set in the environment take precedence. A missing `.env` file is not an error.
pub fn load_dotenv_into_env() {
  match dotenvy::dotenv() {
    Ok(path) => tracing::debug!(path = %path.display(), "loaded .env file"),
    Err(e) if e.not_found() => {}
    Err(e) => tracing::warn!(%e, "failed to load .env file; continuing without it"),
  }
}

/// Gets the environment variable `key`, or `None` if it is not set or is not valid unicode.
#[inline]
pub fn var_opt(key: &str) -> Option<String> {
  env::var(key).ok()
}

/// Gets the environment variable `key` and parses it as a boolean flag: `1`, `true`, `yes` and `on` (in any case)
/// are `true`, anything else is `false`. An unset variable yields `default`.
pub fn flag(key: &str, default: bool) -> bool {
  var_opt(key)
    .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
    .unwrap_or(default)
}
