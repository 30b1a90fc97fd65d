use error_stack::Report;
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{
    DependOnOrderQuery, DependOnUserQuery, DependOnVoucherQuery, OrderQuery, UserQuery,
    VoucherQuery,
};
use kernel::interface::update::{
    DependOnOrderModifier, DependOnVoucherModifier, OrderModifier, VoucherModifier,
};
use kernel::prelude::entity::{
    CreatedAt, Order, OrderId, UpdatedAt, UserId, VoucherClaim, VoucherId,
};
use kernel::KernelError;

use crate::service::voucher::reject_guarded_write;
use crate::transfer::{CreateOrderDto, GetOrderDto, OrderDetail};

#[async_trait::async_trait]
pub trait GetOrderService:
    'static + Sync + Send + DependOnOrderQuery + DependOnUserQuery + DependOnVoucherQuery
{
    async fn get_order(&self, dto: GetOrderDto) -> error_stack::Result<OrderDetail, KernelError> {
        let id = OrderId::parse(&dto.id)?;
        let mut connection = self.database_connection().transact().await?;

        let order = self
            .order_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found(OrderId::ENTITY, &dto.id)))?;
        let detail = resolve_order(self, &mut connection, order).await?;
        connection.commit().await?;

        tracing::info!(%id, "order retrieved");
        Ok(detail)
    }

    async fn get_all_orders(&self) -> error_stack::Result<Vec<OrderDetail>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let orders = self.order_query().find_all(&mut connection).await?;
        let mut details = Vec::with_capacity(orders.len());
        for order in orders {
            details.push(resolve_order(self, &mut connection, order).await?);
        }
        connection.commit().await?;

        tracing::info!(count = details.len(), "orders retrieved");
        Ok(details)
    }
}

impl<T> GetOrderService for T where
    T: DependOnOrderQuery + DependOnUserQuery + DependOnVoucherQuery
{
}

async fn resolve_order<T>(
    module: &T,
    connection: &mut <T::DatabaseConnection as DatabaseConnection>::Transaction,
    order: Order,
) -> error_stack::Result<OrderDetail, KernelError>
where
    T: DependOnUserQuery + DependOnVoucherQuery + ?Sized,
{
    let user = module
        .user_query()
        .find_by_id(connection, order.user_id())
        .await?
        .ok_or_else(|| {
            Report::new(KernelError::Internal)
                .attach_printable(format!("order {} references a missing user", order.id()))
        })?;
    let voucher = match order.voucher_id() {
        Some(voucher_id) => {
            module
                .voucher_query()
                .find_by_id(connection, voucher_id)
                .await?
        }
        None => None,
    };
    Ok(OrderDetail {
        order,
        user,
        voucher,
    })
}

/// Order creation, including redemption of an optional voucher.
///
/// The order identifier is minted up front so the voucher can be claimed on it, and the
/// claim and the order insert share one transaction: either both are committed or neither is.
#[async_trait::async_trait]
pub trait CreateOrderService:
    'static
    + Sync
    + Send
    + DependOnUserQuery
    + DependOnVoucherQuery
    + DependOnVoucherModifier
    + DependOnOrderModifier
{
    async fn create_order(&self, dto: CreateOrderDto) -> error_stack::Result<Order, KernelError> {
        let user_id = UserId::parse(&dto.user_id)?;
        let mut connection = self.database_connection().transact().await?;

        let user = self
            .user_query()
            .find_by_id(&mut connection, &user_id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found(UserId::ENTITY, &dto.user_id)))?;

        let voucher = match dto.voucher_id.as_deref() {
            Some(requested) => {
                let voucher_id = VoucherId::parse(requested)?;
                let voucher = self
                    .voucher_query()
                    .find_by_id(&mut connection, &voucher_id)
                    .await?
                    .ok_or_else(|| {
                        Report::new(KernelError::not_found(VoucherId::ENTITY, requested))
                    })?;
                Some((voucher, requested))
            }
            None => None,
        };

        let order_id = OrderId::new(Uuid::new_v4());
        if let Some((voucher, requested)) = &voucher {
            let claim = VoucherClaim::new(*user.id(), order_id);
            let claimed = self
                .voucher_modifier()
                .claim(&mut connection, voucher.id(), &claim)
                .await?;
            if !claimed {
                let report = reject_guarded_write(
                    self.voucher_query(),
                    &mut connection,
                    voucher.id(),
                    requested,
                    KernelError::AlreadyUsed {
                        id: voucher.id().to_string(),
                    },
                )
                .await;
                return Err(report);
            }
        }

        let voucher_id = voucher.map(|(voucher, _)| *voucher.id());
        let created_at = CreatedAt::now();
        let updated_at = UpdatedAt::from_created(&created_at);
        let order = Order::new(order_id, user_id, voucher_id, created_at, updated_at);

        if let Err(report) = self.order_modifier().create(&mut connection, &order).await {
            if let Some(voucher_id) = voucher_id {
                tracing::error!(
                    %order_id,
                    %voucher_id,
                    "order could not be persisted after its voucher was claimed, rolling back the claim: {report:?}"
                );
            }
            if let Err(rollback) = connection.roll_back().await {
                tracing::error!(%order_id, "roll back failed: {rollback:?}");
            }
            return Err(report);
        }
        if let Err(report) = connection.commit().await {
            if let Some(voucher_id) = voucher_id {
                tracing::error!(
                    %order_id,
                    %voucher_id,
                    "commit of claimed voucher and its order failed: {report:?}"
                );
            }
            return Err(report);
        }

        tracing::info!(id = %order_id, voucher = ?voucher_id, "order created");
        Ok(order)
    }
}

impl<T> CreateOrderService for T where
    T: DependOnUserQuery + DependOnVoucherQuery + DependOnVoucherModifier + DependOnOrderModifier
{
}
