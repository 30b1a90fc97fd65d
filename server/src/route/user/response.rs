use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::prelude::entity::{DestructUser, User};

use crate::controller::Exhaust;
use crate::response::Envelope;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    id: Uuid,
    name: String,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let DestructUser {
            id,
            name,
            created_at,
            updated_at,
        } = user.into_destruct();
        Self {
            id: id.into(),
            name: name.into(),
            created_at: created_at.into_inner(),
            updated_at: updated_at.into_inner(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserData {
    user: UserResponse,
}

pub struct Presenter;

impl Exhaust<User> for Presenter {
    type To = Envelope<UserData>;
    fn emit(&self, input: User) -> Self::To {
        Envelope::ok(
            "user retrieved successfully",
            UserData { user: input.into() },
        )
    }
}

impl Exhaust<Vec<User>> for Presenter {
    type To = Envelope<Vec<UserResponse>>;
    fn emit(&self, input: Vec<User>) -> Self::To {
        Envelope::ok(
            "users retrieved successfully",
            input.into_iter().map(UserResponse::from).collect(),
        )
    }
}

pub struct CreatedPresenter;

impl Exhaust<User> for CreatedPresenter {
    type To = Envelope<UserData>;
    fn emit(&self, input: User) -> Self::To {
        Envelope::created("user created successfully", UserData { user: input.into() })
    }
}
