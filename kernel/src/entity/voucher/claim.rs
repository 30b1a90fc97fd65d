use destructure::Destructure;
use serde::{Deserialize, Serialize};
use vodca::References;

use crate::entity::{OrderId, UserId};

/// The `usedBy`/`usedOn` pair. Both halves always travel together.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, References, Destructure)]
pub struct VoucherClaim {
    used_by: UserId,
    used_on: OrderId,
}

impl VoucherClaim {
    pub fn new(used_by: UserId, used_on: OrderId) -> Self {
        Self { used_by, used_on }
    }
}
