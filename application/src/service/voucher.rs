use error_stack::Report;
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{
    DependOnOrderQuery, DependOnUserQuery, DependOnVoucherQuery, OrderQuery, UserQuery,
    VoucherQuery,
};
use kernel::interface::update::{DependOnVoucherModifier, VoucherModifier};
use kernel::prelude::entity::{
    CreatedAt, UpdatedAt, ValueBound, Voucher, VoucherId, VoucherType,
    VoucherValue,
};
use kernel::KernelError;

use crate::transfer::{
    CreateVoucherDto, DeleteVoucherDto, GetVoucherDto, UpdateVoucherDto, VoucherDetail,
};

const UPDATE_USED: &str = "updating used voucher is not allowed";
const DELETE_USED: &str = "deleting used voucher is not allowed";
const MINIMUM_MESSAGE: &str = "\"value\" must be greater than or equal to 1";

#[async_trait::async_trait]
pub trait GetVoucherService:
    'static + Sync + Send + DependOnVoucherQuery + DependOnUserQuery + DependOnOrderQuery
{
    async fn get_voucher(
        &self,
        dto: GetVoucherDto,
    ) -> error_stack::Result<VoucherDetail, KernelError> {
        let id = VoucherId::parse(&dto.id)?;
        let mut connection = self.database_connection().transact().await?;

        let voucher = self
            .voucher_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found(VoucherId::ENTITY, &dto.id)))?;
        let detail = resolve_voucher(self, &mut connection, voucher).await?;
        connection.commit().await?;

        tracing::info!(%id, "voucher retrieved");
        Ok(detail)
    }

    async fn get_all_vouchers(&self) -> error_stack::Result<Vec<VoucherDetail>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let vouchers = self.voucher_query().find_all(&mut connection).await?;
        let mut details = Vec::with_capacity(vouchers.len());
        for voucher in vouchers {
            details.push(resolve_voucher(self, &mut connection, voucher).await?);
        }
        connection.commit().await?;

        tracing::info!(count = details.len(), "vouchers retrieved");
        Ok(details)
    }
}

impl<T> GetVoucherService for T where
    T: DependOnVoucherQuery + DependOnUserQuery + DependOnOrderQuery
{
}

async fn resolve_voucher<T>(
    module: &T,
    connection: &mut <T::DatabaseConnection as DatabaseConnection>::Transaction,
    voucher: Voucher,
) -> error_stack::Result<VoucherDetail, KernelError>
where
    T: DependOnUserQuery + DependOnOrderQuery + ?Sized,
{
    let Some(claim) = *voucher.claim() else {
        return Ok(VoucherDetail {
            voucher,
            used_by: None,
            used_on: None,
        });
    };
    let used_by = module
        .user_query()
        .find_by_id(connection, claim.used_by())
        .await?;
    let used_on = module
        .order_query()
        .find_by_id(connection, claim.used_on())
        .await?;
    Ok(VoucherDetail {
        voucher,
        used_by,
        used_on,
    })
}

#[async_trait::async_trait]
pub trait CreateVoucherService: 'static + Sync + Send + DependOnVoucherModifier {
    async fn create_voucher(
        &self,
        dto: CreateVoucherDto,
    ) -> error_stack::Result<Voucher, KernelError> {
        let voucher_type = dto.voucher_type.unwrap_or_default();
        let value = VoucherValue::new(dto.value);
        if let Some(bound) = value.violated_bound(&voucher_type) {
            let message = match bound {
                ValueBound::Minimum => MINIMUM_MESSAGE,
                ValueBound::PercentageMaximum => "\"value\" must be less than or equal to 100",
            };
            return Err(Report::new(KernelError::invalid_argument(message)));
        }

        let mut connection = self.database_connection().transact().await?;
        let created_at = CreatedAt::now();
        let updated_at = UpdatedAt::from_created(&created_at);
        let voucher = Voucher::new(
            VoucherId::new(Uuid::new_v4()),
            voucher_type,
            value,
            None,
            created_at,
            updated_at,
        );
        self.voucher_modifier()
            .create(&mut connection, &voucher)
            .await?;
        connection.commit().await?;

        tracing::info!(id = %voucher.id(), "voucher created");
        Ok(voucher)
    }
}

impl<T> CreateVoucherService for T where T: DependOnVoucherModifier {}

#[async_trait::async_trait]
pub trait UpdateVoucherService:
    'static + Sync + Send + DependOnVoucherQuery + DependOnVoucherModifier
{
    async fn update_voucher(
        &self,
        dto: UpdateVoucherDto,
    ) -> error_stack::Result<Voucher, KernelError> {
        let id = VoucherId::parse(&dto.id)?;
        let mut connection = self.database_connection().transact().await?;

        let voucher = self
            .voucher_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found(VoucherId::ENTITY, &dto.id)))?;
        if voucher.is_claimed() {
            return Err(Report::new(KernelError::Conflict(UPDATE_USED)));
        }

        let voucher_type: VoucherType = dto.voucher_type.unwrap_or(*voucher.voucher_type());
        let value = dto.value.map(VoucherValue::new).unwrap_or(*voucher.value());
        if let Some(bound) = value.violated_bound(&voucher_type) {
            let message = match bound {
                ValueBound::Minimum => MINIMUM_MESSAGE,
                ValueBound::PercentageMaximum => "percentage voucher's value can't exceed 100%",
            };
            return Err(Report::new(KernelError::invalid_argument(message)));
        }

        let updated = voucher.reconstruct(|voucher| {
            voucher.voucher_type = voucher_type;
            voucher.value = value;
            voucher.updated_at = UpdatedAt::now();
        });
        let applied = self
            .voucher_modifier()
            .update(&mut connection, &updated)
            .await?;
        if !applied {
            let report = reject_guarded_write(
                self.voucher_query(),
                &mut connection,
                &id,
                &dto.id,
                KernelError::Conflict(UPDATE_USED),
            )
            .await;
            return Err(report);
        }
        connection.commit().await?;

        tracing::info!(%id, "voucher updated");
        Ok(updated)
    }
}

impl<T> UpdateVoucherService for T where T: DependOnVoucherQuery + DependOnVoucherModifier {}

#[async_trait::async_trait]
pub trait DeleteVoucherService:
    'static + Sync + Send + DependOnVoucherQuery + DependOnVoucherModifier
{
    async fn delete_voucher(&self, dto: DeleteVoucherDto) -> error_stack::Result<(), KernelError> {
        let id = VoucherId::parse(&dto.id)?;
        let mut connection = self.database_connection().transact().await?;

        let voucher = self
            .voucher_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found(VoucherId::ENTITY, &dto.id)))?;
        if voucher.is_claimed() {
            return Err(Report::new(KernelError::Conflict(DELETE_USED)));
        }

        let applied = self.voucher_modifier().delete(&mut connection, &id).await?;
        if !applied {
            let report = reject_guarded_write(
                self.voucher_query(),
                &mut connection,
                &id,
                &dto.id,
                KernelError::Conflict(DELETE_USED),
            )
            .await;
            return Err(report);
        }
        connection.commit().await?;

        tracing::info!(%id, "voucher deleted");
        Ok(())
    }
}

impl<T> DeleteVoucherService for T where T: DependOnVoucherQuery + DependOnVoucherModifier {}

/// Explains why a claim-guarded write wrote nothing: the voucher is either gone
/// or has been claimed since it was read.
pub(crate) async fn reject_guarded_write<Q: VoucherQuery>(
    query: &Q,
    connection: &mut Q::Transaction,
    id: &VoucherId,
    requested: &str,
    claimed: KernelError,
) -> Report<KernelError> {
    match query.find_by_id(connection, id).await {
        Ok(Some(_)) => Report::new(claimed),
        Ok(None) => Report::new(KernelError::not_found(VoucherId::ENTITY, requested)),
        Err(report) => report,
    }
}
