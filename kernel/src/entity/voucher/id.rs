use std::fmt::{Display, Formatter};

use error_stack::Report;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vodca::{AsRefln, Fromln};

use crate::KernelError;

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct VoucherId(Uuid);

impl VoucherId {
    pub const ENTITY: &'static str = "voucher";

    pub fn new(id: impl Into<Uuid>) -> Self {
        Self(id.into())
    }

    pub fn parse(id: &str) -> error_stack::Result<Self, KernelError> {
        Uuid::parse_str(id).map(Self).map_err(|error| {
            Report::new(error).change_context(KernelError::InvalidIdentifier {
                entity: Self::ENTITY,
            })
        })
    }
}

impl Display for VoucherId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}
