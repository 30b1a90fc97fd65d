use kernel::KernelError;

use crate::error::ConvertError;

pub mod database;
pub mod error;

pub(crate) fn env(key: &str) -> error_stack::Result<String, KernelError> {
    dotenvy::var(key).convert_error()
}

/// Reads an optional variable, falling back to `default` when it is unset.
pub fn env_or<T>(key: &str, default: T) -> error_stack::Result<T, KernelError>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match dotenvy::var(key) {
        Ok(raw) => raw.parse::<T>().map_err(|error| {
            error_stack::Report::new(error)
                .change_context(KernelError::Internal)
                .attach_printable(format!("{key} has an invalid value: {raw}"))
        }),
        Err(dotenvy::Error::EnvVar(std::env::VarError::NotPresent)) => Ok(default),
        Err(error) => Err(error_stack::Report::from(error).change_context(KernelError::Internal)),
    }
}
