mod id;

pub use self::id::*;
use crate::entity::common::{CreatedAt, UpdatedAt};
use crate::entity::{UserId, VoucherId};
use destructure::Destructure;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Order {
    id: OrderId,
    user_id: UserId,
    voucher_id: Option<VoucherId>,
    created_at: CreatedAt<Order>,
    updated_at: UpdatedAt<Order>,
}

impl Order {
    pub fn new(
        id: OrderId,
        user_id: UserId,
        voucher_id: Option<VoucherId>,
        created_at: CreatedAt<Order>,
        updated_at: UpdatedAt<Order>,
    ) -> Self {
        Self {
            id,
            user_id,
            voucher_id,
            created_at,
            updated_at,
        }
    }
}
