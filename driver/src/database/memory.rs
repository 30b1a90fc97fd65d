use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OwnedMutexGuard};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{DependOnOrderQuery, DependOnUserQuery, DependOnVoucherQuery};
use kernel::interface::update::{
    DependOnOrderModifier, DependOnUserModifier, DependOnVoucherModifier,
};
use kernel::prelude::entity::{Order, User, Voucher};
use kernel::KernelError;

use crate::error::ConvertError;

pub use self::{order::*, user::*, voucher::*};

mod order;
mod user;
mod voucher;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Default)]
struct Store {
    users: Vec<User>,
    vouchers: Vec<Voucher>,
    orders: Vec<Order>,
}

/// Process-local store for tests and single-node runs.
///
/// A transaction holds the whole store exclusively until it commits or is dropped,
/// so every transaction is serializable and the claim guard cannot race.
#[derive(Clone)]
pub struct InMemoryDatabase {
    store: Arc<Mutex<Store>>,
    timeout: Duration,
}

impl InMemoryDatabase {
    pub fn new(timeout: Duration) -> Self {
        Self {
            store: Arc::new(Mutex::new(Store::default())),
            timeout,
        }
    }
}

impl Default for InMemoryDatabase {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

pub struct InMemoryTransaction {
    store: OwnedMutexGuard<Store>,
    rollback: Option<Store>,
}

#[async_trait::async_trait]
impl DatabaseConnection for InMemoryDatabase {
    type Transaction = InMemoryTransaction;

    async fn transact(&self) -> error_stack::Result<InMemoryTransaction, KernelError> {
        let store = tokio::time::timeout(self.timeout, Arc::clone(&self.store).lock_owned())
            .await
            .convert_error()?;
        let rollback = Some(Store::clone(&store));
        Ok(InMemoryTransaction { store, rollback })
    }
}

#[async_trait::async_trait]
impl Transaction for InMemoryTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        let mut transaction = self;
        transaction.rollback = None;
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        drop(self);
        Ok(())
    }
}

impl Drop for InMemoryTransaction {
    fn drop(&mut self) {
        if let Some(rollback) = self.rollback.take() {
            *self.store = rollback;
        }
    }
}

impl DependOnUserQuery for InMemoryDatabase {
    type UserQuery = InMemoryUserRepository;
    fn user_query(&self) -> &Self::UserQuery {
        &InMemoryUserRepository
    }
}

impl DependOnUserModifier for InMemoryDatabase {
    type UserModifier = InMemoryUserRepository;
    fn user_modifier(&self) -> &Self::UserModifier {
        &InMemoryUserRepository
    }
}

impl DependOnVoucherQuery for InMemoryDatabase {
    type VoucherQuery = InMemoryVoucherRepository;
    fn voucher_query(&self) -> &Self::VoucherQuery {
        &InMemoryVoucherRepository
    }
}

impl DependOnVoucherModifier for InMemoryDatabase {
    type VoucherModifier = InMemoryVoucherRepository;
    fn voucher_modifier(&self) -> &Self::VoucherModifier {
        &InMemoryVoucherRepository
    }
}

impl DependOnOrderQuery for InMemoryDatabase {
    type OrderQuery = InMemoryOrderRepository;
    fn order_query(&self) -> &Self::OrderQuery {
        &InMemoryOrderRepository
    }
}

impl DependOnOrderModifier for InMemoryDatabase {
    type OrderModifier = InMemoryOrderRepository;
    fn order_modifier(&self) -> &Self::OrderModifier {
        &InMemoryOrderRepository
    }
}
