use error_stack::Report;
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::VoucherQuery;
use kernel::interface::update::VoucherModifier;
use kernel::prelude::entity::{
    CreatedAt, OrderId, UpdatedAt, UserId, Voucher, VoucherClaim, VoucherId, VoucherType,
    VoucherValue,
};
use kernel::KernelError;

use crate::database::postgres::PostgresConnection;
use crate::error::ConvertError;

pub struct PostgresVoucherRepository;

#[async_trait::async_trait]
impl VoucherQuery for PostgresVoucherRepository {
    type Transaction = PostgresConnection;

    async fn find_by_id(
        &self,
        con: &mut PostgresConnection,
        id: &VoucherId,
    ) -> error_stack::Result<Option<Voucher>, KernelError> {
        PgVoucherInternal::find_by_id(con, id).await
    }

    async fn find_all(
        &self,
        con: &mut PostgresConnection,
    ) -> error_stack::Result<Vec<Voucher>, KernelError> {
        PgVoucherInternal::find_all(con).await
    }
}

#[async_trait::async_trait]
impl VoucherModifier for PostgresVoucherRepository {
    type Transaction = PostgresConnection;

    async fn create(
        &self,
        con: &mut PostgresConnection,
        voucher: &Voucher,
    ) -> error_stack::Result<(), KernelError> {
        PgVoucherInternal::create(con, voucher).await
    }

    async fn update(
        &self,
        con: &mut PostgresConnection,
        voucher: &Voucher,
    ) -> error_stack::Result<bool, KernelError> {
        PgVoucherInternal::update(con, voucher).await
    }

    async fn delete(
        &self,
        con: &mut PostgresConnection,
        voucher_id: &VoucherId,
    ) -> error_stack::Result<bool, KernelError> {
        PgVoucherInternal::delete(con, voucher_id).await
    }

    async fn claim(
        &self,
        con: &mut PostgresConnection,
        voucher_id: &VoucherId,
        claim: &VoucherClaim,
    ) -> error_stack::Result<bool, KernelError> {
        PgVoucherInternal::claim(con, voucher_id, claim).await
    }
}

#[derive(sqlx::FromRow)]
struct VoucherRow {
    id: Uuid,
    voucher_type: String,
    value: f64,
    used_by: Option<Uuid>,
    used_on: Option<Uuid>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TryFrom<VoucherRow> for Voucher {
    type Error = Report<KernelError>;
    fn try_from(row: VoucherRow) -> Result<Self, Self::Error> {
        let voucher_type = VoucherType::parse(&row.voucher_type).ok_or_else(|| {
            Report::new(KernelError::Internal)
                .attach_printable(format!("unknown voucher type: {}", row.voucher_type))
        })?;
        let claim = match (row.used_by, row.used_on) {
            (Some(used_by), Some(used_on)) => Some(VoucherClaim::new(
                UserId::new(used_by),
                OrderId::new(used_on),
            )),
            (None, None) => None,
            _ => {
                return Err(Report::new(KernelError::Internal)
                    .attach_printable(format!("voucher {} has half a claim pair", row.id)))
            }
        };
        Ok(Voucher::new(
            VoucherId::new(row.id),
            voucher_type,
            VoucherValue::new(row.value),
            claim,
            CreatedAt::new(row.created_at),
            UpdatedAt::new(row.updated_at),
        ))
    }
}

pub(in crate::database) struct PgVoucherInternal;

impl PgVoucherInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &VoucherId,
    ) -> error_stack::Result<Option<Voucher>, KernelError> {
        let row = sqlx::query_as::<_, VoucherRow>(
            // language=postgresql
            r#"
            SELECT id, voucher_type, value, used_by, used_on, created_at, updated_at
            FROM vouchers
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(Voucher::try_from).transpose()
    }

    async fn find_all(con: &mut PgConnection) -> error_stack::Result<Vec<Voucher>, KernelError> {
        let rows = sqlx::query_as::<_, VoucherRow>(
            // language=postgresql
            r#"
            SELECT id, voucher_type, value, used_by, used_on, created_at, updated_at
            FROM vouchers
            ORDER BY seq
            "#,
        )
        .fetch_all(con)
        .await
        .convert_error()?;
        rows.into_iter().map(Voucher::try_from).collect()
    }

    async fn create(
        con: &mut PgConnection,
        voucher: &Voucher,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO vouchers (id, voucher_type, value, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(voucher.id().as_ref())
        .bind(voucher.voucher_type().as_str())
        .bind(voucher.value().as_ref())
        .bind(voucher.created_at().as_ref())
        .bind(voucher.updated_at().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update(
        con: &mut PgConnection,
        voucher: &Voucher,
    ) -> error_stack::Result<bool, KernelError> {
        let result = sqlx::query(
            // language=postgresql
            r#"
            UPDATE vouchers
            SET voucher_type = $2, value = $3, updated_at = $4
            WHERE id = $1 AND used_by IS NULL AND used_on IS NULL
            "#,
        )
        .bind(voucher.id().as_ref())
        .bind(voucher.voucher_type().as_str())
        .bind(voucher.value().as_ref())
        .bind(voucher.updated_at().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(result.rows_affected() == 1)
    }

    async fn delete(
        con: &mut PgConnection,
        voucher_id: &VoucherId,
    ) -> error_stack::Result<bool, KernelError> {
        let result = sqlx::query(
            // language=postgresql
            r#"
            DELETE FROM vouchers
            WHERE id = $1 AND used_by IS NULL AND used_on IS NULL
            "#,
        )
        .bind(voucher_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(result.rows_affected() == 1)
    }

    async fn claim(
        con: &mut PgConnection,
        voucher_id: &VoucherId,
        claim: &VoucherClaim,
    ) -> error_stack::Result<bool, KernelError> {
        // A concurrent claimer blocks on the row lock, then re-evaluates the
        // predicate against the committed row and matches nothing.
        let result = sqlx::query(
            // language=postgresql
            r#"
            UPDATE vouchers
            SET used_by = $2, used_on = $3, updated_at = now()
            WHERE id = $1 AND used_by IS NULL AND used_on IS NULL
            "#,
        )
        .bind(voucher_id.as_ref())
        .bind(claim.used_by().as_ref())
        .bind(claim.used_on().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::VoucherQuery;
    use kernel::interface::update::{UserModifier, VoucherModifier};
    use kernel::prelude::entity::{
        CreatedAt, OrderId, UpdatedAt, User, UserId, UserName, Voucher, VoucherClaim, VoucherId,
        VoucherType, VoucherValue,
    };
    use kernel::KernelError;

    use crate::database::postgres::{
        PostgresDatabase, PostgresUserRepository, PostgresVoucherRepository,
    };

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn guarded_writes() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;

        let created_at = CreatedAt::now();
        let updated_at = UpdatedAt::from_created(&created_at);
        let user = User::new(
            UserId::new(Uuid::new_v4()),
            UserName::new("name"),
            created_at,
            updated_at,
        );
        PostgresUserRepository.create(&mut con, &user).await?;

        let created_at = CreatedAt::now();
        let updated_at = UpdatedAt::from_created(&created_at);
        let voucher = Voucher::new(
            VoucherId::new(Uuid::new_v4()),
            VoucherType::Percentage,
            VoucherValue::new(20),
            None,
            created_at,
            updated_at,
        );
        PostgresVoucherRepository.create(&mut con, &voucher).await?;

        let changed = voucher.clone().reconstruct(|v| v.value = VoucherValue::new(30));
        assert!(PostgresVoucherRepository.update(&mut con, &changed).await?);

        // used_on is a deferred foreign key, so the order may follow within the transaction
        let claim = VoucherClaim::new(*user.id(), OrderId::new(Uuid::new_v4()));
        assert!(PostgresVoucherRepository.claim(&mut con, voucher.id(), &claim).await?);
        assert!(!PostgresVoucherRepository.claim(&mut con, voucher.id(), &claim).await?);
        assert!(!PostgresVoucherRepository.update(&mut con, &changed).await?);
        assert!(!PostgresVoucherRepository.delete(&mut con, voucher.id()).await?);

        let found = PostgresVoucherRepository
            .find_by_id(&mut con, voucher.id())
            .await?
            .map(|voucher| (*voucher.value(), *voucher.claim()));
        assert_eq!(found, Some((VoucherValue::new(30), Some(claim))));
        Ok(())
    }
}
