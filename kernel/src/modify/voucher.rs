use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Voucher, VoucherClaim, VoucherId};
use crate::KernelError;

/// Writes to the voucher table.
///
/// `update`, `delete` and `claim` are guarded by the claim pair: each one is a single
/// conditional write that only applies while `used_by` and `used_on` are both unset.
/// They return `false` when nothing was written, either because the voucher is
/// already claimed or because it does not exist.
#[async_trait::async_trait]
pub trait VoucherModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn create(
        &self,
        con: &mut Self::Transaction,
        voucher: &Voucher,
    ) -> error_stack::Result<(), KernelError>;
    /// Overwrites type, value and `updated_at` of an unclaimed voucher.
    async fn update(
        &self,
        con: &mut Self::Transaction,
        voucher: &Voucher,
    ) -> error_stack::Result<bool, KernelError>;
    async fn delete(
        &self,
        con: &mut Self::Transaction,
        voucher_id: &VoucherId,
    ) -> error_stack::Result<bool, KernelError>;
    /// Sets both halves of the claim pair at once.
    async fn claim(
        &self,
        con: &mut Self::Transaction,
        voucher_id: &VoucherId,
        claim: &VoucherClaim,
    ) -> error_stack::Result<bool, KernelError>;
}

pub trait DependOnVoucherModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type VoucherModifier: VoucherModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn voucher_modifier(&self) -> &Self::VoucherModifier;
}
