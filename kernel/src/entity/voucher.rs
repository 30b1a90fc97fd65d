mod claim;
mod id;
mod kind;
mod value;

pub use self::{claim::*, id::*, kind::*, value::*};
use crate::entity::common::{CreatedAt, UpdatedAt};
use destructure::Destructure;
use vodca::References;

/// A discount voucher. Once `claim` is set the voucher is frozen:
/// its type and value never change and it cannot be deleted.
#[derive(Debug, Clone, PartialEq, References, Destructure)]
pub struct Voucher {
    id: VoucherId,
    voucher_type: VoucherType,
    value: VoucherValue,
    claim: Option<VoucherClaim>,
    created_at: CreatedAt<Voucher>,
    updated_at: UpdatedAt<Voucher>,
}

impl Voucher {
    pub fn new(
        id: VoucherId,
        voucher_type: VoucherType,
        value: VoucherValue,
        claim: Option<VoucherClaim>,
        created_at: CreatedAt<Voucher>,
        updated_at: UpdatedAt<Voucher>,
    ) -> Self {
        Self {
            id,
            voucher_type,
            value,
            claim,
            created_at,
            updated_at,
        }
    }

    pub fn is_claimed(&self) -> bool {
        self.claim.is_some()
    }
}
