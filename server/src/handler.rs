use std::ops::Deref;
use std::sync::Arc;

use driver::database::PostgresDatabase;
use kernel::interface::query::{DependOnOrderQuery, DependOnUserQuery, DependOnVoucherQuery};
use kernel::interface::update::{
    DependOnOrderModifier, DependOnUserModifier, DependOnVoucherModifier,
};
use kernel::KernelError;

/// Every store capability the routes need.
pub trait Database:
    DependOnUserQuery
    + DependOnUserModifier
    + DependOnVoucherQuery
    + DependOnVoucherModifier
    + DependOnOrderQuery
    + DependOnOrderModifier
{
}

impl<T> Database for T where
    T: DependOnUserQuery
        + DependOnUserModifier
        + DependOnVoucherQuery
        + DependOnVoucherModifier
        + DependOnOrderQuery
        + DependOnOrderModifier
{
}

pub struct AppModule<D>(Arc<Handler<D>>);

impl AppModule<PostgresDatabase> {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        Ok(Self::with_database(PostgresDatabase::new().await?))
    }
}

impl<D: Database> AppModule<D> {
    pub fn with_database(database: D) -> Self {
        Self(Arc::new(Handler { database }))
    }
}

impl<D> Clone for AppModule<D> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<D> Deref for AppModule<D> {
    type Target = Handler<D>;
    fn deref(&self) -> &Self::Target {
        Deref::deref(&self.0)
    }
}

pub struct Handler<D> {
    database: D,
}

impl<D> Handler<D> {
    pub fn database(&self) -> &D {
        &self.database
    }
}
