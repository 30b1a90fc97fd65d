use std::str::FromStr;
use std::time::Duration;

use error_stack::{Report, ResultExt};
use sqlx::pool::PoolOptions;
use sqlx::postgres::PgConnectOptions;
use sqlx::{Error, PgConnection, Pool, Postgres};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{DependOnOrderQuery, DependOnUserQuery, DependOnVoucherQuery};
use kernel::interface::update::{
    DependOnOrderModifier, DependOnUserModifier, DependOnVoucherModifier,
};
use kernel::KernelError;

use crate::error::ConvertError;
use crate::{env, env_or};

pub use self::{order::*, user::*, voucher::*};

mod order;
mod user;
mod voucher;

static POSTGRES_URL: &str = "POSTGRES_URL";
static POSTGRES_MAX_CONNECTIONS: &str = "POSTGRES_MAX_CONNECTIONS";
static POSTGRES_TIMEOUT_MS: &str = "POSTGRES_TIMEOUT_MS";

// query_canceled, raised when statement_timeout fires
const QUERY_CANCELED: &str = "57014";

#[derive(Clone)]
pub struct PostgresDatabase {
    pool: Pool<Postgres>,
}

impl PostgresDatabase {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        let url = env(POSTGRES_URL)?;
        let max_connections = env_or(POSTGRES_MAX_CONNECTIONS, 10u32)?;
        let timeout = Duration::from_millis(env_or(POSTGRES_TIMEOUT_MS, 5000u64)?);

        let options = PgConnectOptions::from_str(&url)
            .convert_error()?
            .options([("statement_timeout", timeout.as_millis().to_string())]);
        let pool = PoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(timeout)
            .connect_with(options)
            .await
            .convert_error()?;

        sqlx::migrate!("../migrations")
            .run(&pool)
            .await
            .change_context_lazy(|| KernelError::Internal)
            .attach_printable_lazy(|| "Failed to apply migrations")?;
        tracing::info!(max_connections, ?timeout, "connected to postgres");

        Ok(Self { pool })
    }
}

pub struct PostgresConnection(sqlx::Transaction<'static, Postgres>);

impl std::ops::Deref for PostgresConnection {
    type Target = PgConnection;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::DerefMut for PostgresConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for PostgresDatabase {
    type Transaction = PostgresConnection;

    async fn transact(&self) -> error_stack::Result<PostgresConnection, KernelError> {
        let con = self.pool.begin().await.convert_error()?;
        Ok(PostgresConnection(con))
    }
}

#[async_trait::async_trait]
impl Transaction for PostgresConnection {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        self.0.commit().await.convert_error()
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        self.0.rollback().await.convert_error()
    }
}

impl DependOnUserQuery for PostgresDatabase {
    type UserQuery = PostgresUserRepository;
    fn user_query(&self) -> &Self::UserQuery {
        &PostgresUserRepository
    }
}

impl DependOnUserModifier for PostgresDatabase {
    type UserModifier = PostgresUserRepository;
    fn user_modifier(&self) -> &Self::UserModifier {
        &PostgresUserRepository
    }
}

impl DependOnVoucherQuery for PostgresDatabase {
    type VoucherQuery = PostgresVoucherRepository;
    fn voucher_query(&self) -> &Self::VoucherQuery {
        &PostgresVoucherRepository
    }
}

impl DependOnVoucherModifier for PostgresDatabase {
    type VoucherModifier = PostgresVoucherRepository;
    fn voucher_modifier(&self) -> &Self::VoucherModifier {
        &PostgresVoucherRepository
    }
}

impl DependOnOrderQuery for PostgresDatabase {
    type OrderQuery = PostgresOrderRepository;
    fn order_query(&self) -> &Self::OrderQuery {
        &PostgresOrderRepository
    }
}

impl DependOnOrderModifier for PostgresDatabase {
    type OrderModifier = PostgresOrderRepository;
    fn order_modifier(&self) -> &Self::OrderModifier {
        &PostgresOrderRepository
    }
}

impl<T: 'static + Sync + Send> ConvertError for Result<T, Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| {
            let unavailable = match &error {
                Error::PoolTimedOut | Error::PoolClosed | Error::Io(_) => true,
                Error::Database(database) => database.code().as_deref() == Some(QUERY_CANCELED),
                _ => false,
            };
            if unavailable {
                Report::from(error).change_context(KernelError::Unavailable)
            } else {
                Report::from(error).change_context(KernelError::Internal)
            }
        })
    }
}
