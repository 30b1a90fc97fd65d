use std::fmt::Display;

use error_stack::Context;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum KernelError {
    InvalidIdentifier { entity: &'static str },
    InvalidArgument(String),
    NotFound { entity: &'static str, id: String },
    AlreadyUsed { id: String },
    Conflict(&'static str),
    Unavailable,
    Internal,
}

impl KernelError {
    pub fn not_found(entity: &'static str, id: impl Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::InvalidIdentifier { entity } => write!(f, "invalid {entity} id"),
            KernelError::InvalidArgument(message) => write!(f, "{message}"),
            KernelError::NotFound { entity, id } => write!(f, "{entity}[id={id}] does not exist"),
            KernelError::AlreadyUsed { id } => write!(f, "voucher[id={id}] is already used"),
            KernelError::Conflict(message) => write!(f, "{message}"),
            KernelError::Unavailable => write!(f, "Store is unavailable"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}
