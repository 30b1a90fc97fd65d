use application::transfer::{CreateOrderDto, GetOrderDto};
use kernel::KernelError;

use crate::controller::{Intake, TryIntake};
use crate::extract::JsonBody;

pub struct Transformer;

impl Intake<String> for Transformer {
    type To = GetOrderDto;
    fn emit(&self, id: String) -> Self::To {
        GetOrderDto { id }
    }
}

impl TryIntake<JsonBody> for Transformer {
    type To = CreateOrderDto;
    type Error = error_stack::Report<KernelError>;
    fn emit(&self, body: JsonBody) -> Result<Self::To, Self::Error> {
        let user_id = body.required_str("userId")?;
        let voucher_id = body.optional_str("voucherId")?;
        body.allow_only(&["userId", "voucherId"])?;
        Ok(CreateOrderDto {
            user_id,
            voucher_id,
        })
    }
}
