use kernel::interface::query::VoucherQuery;
use kernel::interface::update::VoucherModifier;
use kernel::prelude::entity::{UpdatedAt, Voucher, VoucherClaim, VoucherId};
use kernel::KernelError;

use crate::database::memory::InMemoryTransaction;

pub struct InMemoryVoucherRepository;

#[async_trait::async_trait]
impl VoucherQuery for InMemoryVoucherRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &VoucherId,
    ) -> error_stack::Result<Option<Voucher>, KernelError> {
        Ok(con
            .store
            .vouchers
            .iter()
            .find(|voucher| voucher.id() == id)
            .cloned())
    }

    async fn find_all(
        &self,
        con: &mut InMemoryTransaction,
    ) -> error_stack::Result<Vec<Voucher>, KernelError> {
        Ok(con.store.vouchers.clone())
    }
}

impl InMemoryVoucherRepository {
    fn unclaimed<'a>(con: &'a mut InMemoryTransaction, id: &VoucherId) -> Option<&'a mut Voucher> {
        con.store
            .vouchers
            .iter_mut()
            .find(|voucher| voucher.id() == id && !voucher.is_claimed())
    }
}

#[async_trait::async_trait]
impl VoucherModifier for InMemoryVoucherRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        voucher: &Voucher,
    ) -> error_stack::Result<(), KernelError> {
        con.store.vouchers.push(voucher.clone());
        Ok(())
    }

    async fn update(
        &self,
        con: &mut InMemoryTransaction,
        voucher: &Voucher,
    ) -> error_stack::Result<bool, KernelError> {
        let Some(stored) = Self::unclaimed(con, voucher.id()) else {
            return Ok(false);
        };
        *stored = stored.clone().reconstruct(|stored| {
            stored.voucher_type = *voucher.voucher_type();
            stored.value = *voucher.value();
            stored.updated_at = voucher.updated_at().clone();
        });
        Ok(true)
    }

    async fn delete(
        &self,
        con: &mut InMemoryTransaction,
        voucher_id: &VoucherId,
    ) -> error_stack::Result<bool, KernelError> {
        let vouchers = &mut con.store.vouchers;
        let Some(index) = vouchers
            .iter()
            .position(|voucher| voucher.id() == voucher_id && !voucher.is_claimed())
        else {
            return Ok(false);
        };
        vouchers.remove(index);
        Ok(true)
    }

    async fn claim(
        &self,
        con: &mut InMemoryTransaction,
        voucher_id: &VoucherId,
        claim: &VoucherClaim,
    ) -> error_stack::Result<bool, KernelError> {
        let Some(stored) = Self::unclaimed(con, voucher_id) else {
            return Ok(false);
        };
        *stored = stored.clone().reconstruct(|stored| {
            stored.claim = Some(*claim);
            stored.updated_at = UpdatedAt::now();
        });
        Ok(true)
    }
}
