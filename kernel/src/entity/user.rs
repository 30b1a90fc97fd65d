mod id;
mod name;

pub use self::{id::*, name::*};
use crate::entity::common::{CreatedAt, UpdatedAt};
use destructure::Destructure;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, Destructure, References)]
pub struct User {
    id: UserId,
    name: UserName,
    created_at: CreatedAt<User>,
    updated_at: UpdatedAt<User>,
}

impl User {
    pub fn new(
        id: UserId,
        name: UserName,
        created_at: CreatedAt<User>,
        updated_at: UpdatedAt<User>,
    ) -> Self {
        Self {
            id,
            name,
            created_at,
            updated_at,
        }
    }
}
