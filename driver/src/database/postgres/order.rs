use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::OrderQuery;
use kernel::interface::update::OrderModifier;
use kernel::prelude::entity::{CreatedAt, Order, OrderId, UpdatedAt, UserId, VoucherId};
use kernel::KernelError;

use crate::database::postgres::PostgresConnection;
use crate::error::ConvertError;

pub struct PostgresOrderRepository;

#[async_trait::async_trait]
impl OrderQuery for PostgresOrderRepository {
    type Transaction = PostgresConnection;

    async fn find_by_id(
        &self,
        con: &mut PostgresConnection,
        id: &OrderId,
    ) -> error_stack::Result<Option<Order>, KernelError> {
        PgOrderInternal::find_by_id(con, id).await
    }

    async fn find_all(
        &self,
        con: &mut PostgresConnection,
    ) -> error_stack::Result<Vec<Order>, KernelError> {
        PgOrderInternal::find_all(con).await
    }
}

#[async_trait::async_trait]
impl OrderModifier for PostgresOrderRepository {
    type Transaction = PostgresConnection;

    async fn create(
        &self,
        con: &mut PostgresConnection,
        order: &Order,
    ) -> error_stack::Result<(), KernelError> {
        PgOrderInternal::create(con, order).await
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    user_id: Uuid,
    voucher_id: Option<Uuid>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Order::new(
            OrderId::new(row.id),
            UserId::new(row.user_id),
            row.voucher_id.map(VoucherId::new),
            CreatedAt::new(row.created_at),
            UpdatedAt::new(row.updated_at),
        )
    }
}

pub(in crate::database) struct PgOrderInternal;

impl PgOrderInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &OrderId,
    ) -> error_stack::Result<Option<Order>, KernelError> {
        let row = sqlx::query_as::<_, OrderRow>(
            // language=postgresql
            r#"
            SELECT id, user_id, voucher_id, created_at, updated_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Order::from))
    }

    async fn find_all(con: &mut PgConnection) -> error_stack::Result<Vec<Order>, KernelError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            // language=postgresql
            r#"
            SELECT id, user_id, voucher_id, created_at, updated_at
            FROM orders
            ORDER BY seq
            "#,
        )
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Order::from).collect())
    }

    async fn create(con: &mut PgConnection, order: &Order) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO orders (id, user_id, voucher_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(order.id().as_ref())
        .bind(order.user_id().as_ref())
        .bind(order.voucher_id().as_ref().map(|id| *id.as_ref()))
        .bind(order.created_at().as_ref())
        .bind(order.updated_at().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::{OrderQuery, VoucherQuery};
    use kernel::interface::update::{OrderModifier, UserModifier, VoucherModifier};
    use kernel::prelude::entity::{
        CreatedAt, Order, OrderId, UpdatedAt, User, UserId, UserName, Voucher, VoucherClaim,
        VoucherId, VoucherType, VoucherValue,
    };
    use kernel::KernelError;

    use crate::database::postgres::{
        PostgresDatabase, PostgresOrderRepository, PostgresUserRepository,
        PostgresVoucherRepository,
    };

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn claim_and_order_commit_together() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;

        let created_at = CreatedAt::now();
        let updated_at = UpdatedAt::from_created(&created_at);
        let user = User::new(
            UserId::new(Uuid::new_v4()),
            UserName::new("name"),
            created_at,
            updated_at,
        );
        let created_at = CreatedAt::now();
        let updated_at = UpdatedAt::from_created(&created_at);
        let voucher = Voucher::new(
            VoucherId::new(Uuid::new_v4()),
            VoucherType::Fixed,
            VoucherValue::new(70),
            None,
            created_at,
            updated_at,
        );
        let mut con = db.transact().await?;
        PostgresUserRepository.create(&mut con, &user).await?;
        PostgresVoucherRepository.create(&mut con, &voucher).await?;
        con.commit().await?;

        let order_id = OrderId::new(Uuid::new_v4());
        let created_at = CreatedAt::now();
        let updated_at = UpdatedAt::from_created(&created_at);
        let order = Order::new(order_id, *user.id(), Some(*voucher.id()), created_at, updated_at);

        let mut con = db.transact().await?;
        let claim = VoucherClaim::new(*user.id(), order_id);
        assert!(PostgresVoucherRepository.claim(&mut con, voucher.id(), &claim).await?);
        PostgresOrderRepository.create(&mut con, &order).await?;
        con.commit().await?;

        let mut con = db.transact().await?;
        let found = PostgresOrderRepository.find_by_id(&mut con, &order_id).await?;
        assert_eq!(found, Some(order));
        let claimed = PostgresVoucherRepository
            .find_by_id(&mut con, voucher.id())
            .await?
            .and_then(|voucher| *voucher.claim());
        assert_eq!(claimed, Some(claim));
        Ok(())
    }
}
