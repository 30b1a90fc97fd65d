use error_stack::Report;

use kernel::interface::query::OrderQuery;
use kernel::interface::update::OrderModifier;
use kernel::prelude::entity::{Order, OrderId};
use kernel::KernelError;

use crate::database::memory::InMemoryTransaction;

pub struct InMemoryOrderRepository;

#[async_trait::async_trait]
impl OrderQuery for InMemoryOrderRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &OrderId,
    ) -> error_stack::Result<Option<Order>, KernelError> {
        Ok(con.store.orders.iter().find(|order| order.id() == id).cloned())
    }

    async fn find_all(
        &self,
        con: &mut InMemoryTransaction,
    ) -> error_stack::Result<Vec<Order>, KernelError> {
        Ok(con.store.orders.clone())
    }
}

#[async_trait::async_trait]
impl OrderModifier for InMemoryOrderRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        order: &Order,
    ) -> error_stack::Result<(), KernelError> {
        // mirrors the unique index on orders.voucher_id
        if let Some(voucher_id) = order.voucher_id() {
            let taken = con
                .store
                .orders
                .iter()
                .any(|existing| existing.voucher_id().as_ref() == Some(voucher_id));
            if taken {
                return Err(Report::new(KernelError::Internal)
                    .attach_printable(format!("voucher {voucher_id} already has an order")));
            }
        }
        con.store.orders.push(order.clone());
        Ok(())
    }
}
