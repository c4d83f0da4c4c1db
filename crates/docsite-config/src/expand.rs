//! Environment variable expansion for configuration strings.

/// Expand `${VAR}` and `${VAR:-default}` references in a configuration value.
///
/// Values without a `$` are returned unchanged without touching the environment.
///
/// # Errors
///
/// Returns a message naming the variable when a referenced variable is unset
/// and has no default.
pub(crate) fn expand_env(value: &str) -> Result<String, String> {
    if !value.contains('$') {
        return Ok(value.to_owned());
    }
    shellexpand::env(value)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| format!("${{{}}} not set: {}", e.var_name, e.cause))
}
