use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Voucher, VoucherId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait VoucherQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &VoucherId,
    ) -> error_stack::Result<Option<Voucher>, KernelError>;
    /// Every voucher, oldest first.
    async fn find_all(
        &self,
        con: &mut Self::Transaction,
    ) -> error_stack::Result<Vec<Voucher>, KernelError>;
}

pub trait DependOnVoucherQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type VoucherQuery: VoucherQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn voucher_query(&self) -> &Self::VoucherQuery;
}
