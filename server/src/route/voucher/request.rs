use application::transfer::{CreateVoucherDto, DeleteVoucherDto, GetVoucherDto, UpdateVoucherDto};
use kernel::prelude::entity::{ValueBound, VoucherType, VoucherValue};
use kernel::KernelError;

use crate::controller::{Intake, TryIntake};
use crate::extract::{reject, JsonBody};

const FIELDS: [&str; 2] = ["type", "value"];

#[derive(Debug)]
pub struct GetRequest {
    id: String,
}

impl GetRequest {
    pub fn new(id: String) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct DeleteRequest {
    id: String,
}

impl DeleteRequest {
    pub fn new(id: String) -> Self {
        Self { id }
    }
}

fn voucher_type(body: &JsonBody) -> error_stack::Result<Option<VoucherType>, KernelError> {
    let valid = VoucherType::ALL.map(|kind| kind.as_str());
    Ok(body
        .optional_choice("type", &valid)?
        .and_then(VoucherType::parse))
}

fn check_bound(value: f64, voucher_type: &VoucherType) -> error_stack::Result<(), KernelError> {
    match VoucherValue::new(value).violated_bound(voucher_type) {
        None => Ok(()),
        Some(ValueBound::Minimum) => Err(reject(
            "value",
            format!("must be greater than or equal to {}", VoucherValue::MIN),
        )),
        Some(ValueBound::PercentageMaximum) => Err(reject(
            "value",
            format!(
                "must be less than or equal to {}",
                VoucherValue::PERCENTAGE_MAX
            ),
        )),
    }
}

pub struct Transformer;

impl Intake<GetRequest> for Transformer {
    type To = GetVoucherDto;
    fn emit(&self, input: GetRequest) -> Self::To {
        GetVoucherDto { id: input.id }
    }
}

impl Intake<DeleteRequest> for Transformer {
    type To = DeleteVoucherDto;
    fn emit(&self, input: DeleteRequest) -> Self::To {
        DeleteVoucherDto { id: input.id }
    }
}

impl TryIntake<JsonBody> for Transformer {
    type To = CreateVoucherDto;
    type Error = error_stack::Report<KernelError>;
    fn emit(&self, body: JsonBody) -> Result<Self::To, Self::Error> {
        let voucher_type = voucher_type(&body)?;
        let value = body.required_number("value")?;
        check_bound(value, &voucher_type.unwrap_or_default())?;
        body.allow_only(&FIELDS)?;
        Ok(CreateVoucherDto {
            voucher_type,
            value,
        })
    }
}

impl TryIntake<(String, JsonBody)> for Transformer {
    type To = UpdateVoucherDto;
    type Error = error_stack::Report<KernelError>;
    fn emit(&self, (id, body): (String, JsonBody)) -> Result<Self::To, Self::Error> {
        let voucher_type = voucher_type(&body)?;
        let value = body.optional_number("value")?;
        // only the floor here; the percentage cap depends on the stored type
        if let Some(value) = value {
            check_bound(value, &VoucherType::Fixed)?;
        }
        body.allow_only(&FIELDS)?;
        Ok(UpdateVoucherDto {
            id,
            voucher_type,
            value,
        })
    }
}
