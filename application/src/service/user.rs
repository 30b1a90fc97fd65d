use error_stack::Report;
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{DependOnUserQuery, UserQuery};
use kernel::interface::update::{DependOnUserModifier, UserModifier};
use kernel::prelude::entity::{CreatedAt, UpdatedAt, User, UserId, UserName};
use kernel::KernelError;

use crate::transfer::{CreateUserDto, GetUserDto};

#[async_trait::async_trait]
pub trait GetUserService: 'static + Sync + Send + DependOnUserQuery {
    async fn get_user(&self, dto: GetUserDto) -> error_stack::Result<User, KernelError> {
        let id = UserId::parse(&dto.id)?;
        let mut connection = self.database_connection().transact().await?;

        let user = self
            .user_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found(UserId::ENTITY, &dto.id)))?;
        connection.commit().await?;

        tracing::info!(%id, "user retrieved");
        Ok(user)
    }

    async fn get_all_users(&self) -> error_stack::Result<Vec<User>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let users = self.user_query().find_all(&mut connection).await?;
        connection.commit().await?;

        tracing::info!(count = users.len(), "users retrieved");
        Ok(users)
    }
}

impl<T> GetUserService for T where T: DependOnUserQuery {}

#[async_trait::async_trait]
pub trait CreateUserService: 'static + Sync + Send + DependOnUserModifier {
    async fn create_user(&self, dto: CreateUserDto) -> error_stack::Result<User, KernelError> {
        let name = UserName::parse(dto.name)?;
        let mut connection = self.database_connection().transact().await?;

        let created_at = CreatedAt::now();
        let updated_at = UpdatedAt::from_created(&created_at);
        let user = User::new(UserId::new(Uuid::new_v4()), name, created_at, updated_at);
        self.user_modifier().create(&mut connection, &user).await?;
        connection.commit().await?;

        tracing::info!(id = %user.id(), "user created");
        Ok(user)
    }
}

impl<T> CreateUserService for T where T: DependOnUserModifier {}
