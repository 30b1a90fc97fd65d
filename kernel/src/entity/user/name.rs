use error_stack::Report;
use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::KernelError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct UserName(String);

impl UserName {
    pub const MIN_LENGTH: usize = 2;

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn parse(name: impl Into<String>) -> error_stack::Result<Self, KernelError> {
        let name = name.into();
        if name.chars().count() < Self::MIN_LENGTH {
            return Err(Report::new(KernelError::invalid_argument(format!(
                "\"name\" length must be at least {} characters long",
                Self::MIN_LENGTH
            ))));
        }
        Ok(Self(name))
    }
}

#[cfg(test)]
mod test {
    use super::UserName;

    #[test]
    fn rejects_short_names() {
        assert!(UserName::parse("M").is_err());
        assert!(UserName::parse("").is_err());
        assert!(UserName::parse("Mo").is_ok());
    }
}
