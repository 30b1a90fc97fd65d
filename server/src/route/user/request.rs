use application::transfer::{CreateUserDto, GetUserDto};
use kernel::prelude::entity::UserName;
use kernel::KernelError;

use crate::controller::{Intake, TryIntake};
use crate::extract::{reject, JsonBody};

pub struct Transformer;

impl Intake<String> for Transformer {
    type To = GetUserDto;
    fn emit(&self, id: String) -> Self::To {
        GetUserDto { id }
    }
}

impl TryIntake<JsonBody> for Transformer {
    type To = CreateUserDto;
    type Error = error_stack::Report<KernelError>;
    fn emit(&self, body: JsonBody) -> Result<Self::To, Self::Error> {
        let name = body.required_str("name")?;
        if name.chars().count() < UserName::MIN_LENGTH {
            return Err(reject(
                "name",
                format!(
                    "length must be at least {} characters long",
                    UserName::MIN_LENGTH
                ),
            ));
        }
        body.allow_only(&["name"])?;
        Ok(CreateUserDto { name })
    }
}
