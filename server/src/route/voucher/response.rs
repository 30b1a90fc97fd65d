use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use application::transfer::VoucherDetail;
use kernel::prelude::entity::{DestructVoucher, Voucher, VoucherType};

use crate::controller::Exhaust;
use crate::response::Envelope;
use crate::route::order::response::OrderResponse;
use crate::route::user::response::UserResponse;

/// `usedBy`/`usedOn` are either raw identifiers or the resolved records.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoucherResponse<U, O> {
    id: Uuid,
    #[serde(rename = "type")]
    voucher_type: VoucherType,
    value: f64,
    used_by: Option<U>,
    used_on: Option<O>,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

impl<U, O> VoucherResponse<U, O> {
    fn assemble(voucher: Voucher, used_by: Option<U>, used_on: Option<O>) -> Self {
        let DestructVoucher {
            id,
            voucher_type,
            value,
            created_at,
            updated_at,
            ..
        } = voucher.into_destruct();
        Self {
            id: id.into(),
            voucher_type,
            value: value.into(),
            used_by,
            used_on,
            created_at: created_at.into_inner(),
            updated_at: updated_at.into_inner(),
        }
    }
}

impl From<Voucher> for VoucherResponse<Uuid, Uuid> {
    fn from(voucher: Voucher) -> Self {
        let claim = *voucher.claim();
        Self::assemble(
            voucher,
            claim.map(|claim| Uuid::from(*claim.used_by())),
            claim.map(|claim| Uuid::from(*claim.used_on())),
        )
    }
}

impl From<VoucherDetail> for VoucherResponse<UserResponse, OrderResponse<Uuid, Uuid>> {
    fn from(detail: VoucherDetail) -> Self {
        Self::assemble(
            detail.voucher,
            detail.used_by.map(UserResponse::from),
            detail.used_on.map(OrderResponse::from),
        )
    }
}

#[derive(Debug, Serialize)]
pub struct VoucherData<V> {
    voucher: V,
}

pub struct Presenter;

impl Exhaust<VoucherDetail> for Presenter {
    type To = Envelope<VoucherData<VoucherResponse<UserResponse, OrderResponse<Uuid, Uuid>>>>;
    fn emit(&self, input: VoucherDetail) -> Self::To {
        Envelope::ok(
            "voucher retrieved successfully",
            VoucherData {
                voucher: input.into(),
            },
        )
    }
}

impl Exhaust<Vec<VoucherDetail>> for Presenter {
    type To = Envelope<Vec<VoucherResponse<UserResponse, OrderResponse<Uuid, Uuid>>>>;
    fn emit(&self, input: Vec<VoucherDetail>) -> Self::To {
        Envelope::ok(
            "vouchers retrieved successfully",
            input.into_iter().map(VoucherResponse::from).collect(),
        )
    }
}

pub struct CreatedPresenter;

impl Exhaust<Voucher> for CreatedPresenter {
    type To = Envelope<VoucherData<VoucherResponse<Uuid, Uuid>>>;
    fn emit(&self, input: Voucher) -> Self::To {
        Envelope::created(
            "voucher created successfully",
            VoucherData {
                voucher: input.into(),
            },
        )
    }
}

pub struct UpdatedPresenter;

impl Exhaust<Voucher> for UpdatedPresenter {
    type To = Envelope<VoucherData<VoucherResponse<Uuid, Uuid>>>;
    fn emit(&self, input: Voucher) -> Self::To {
        Envelope::ok(
            "voucher updated successfully",
            VoucherData {
                voucher: input.into(),
            },
        )
    }
}

pub struct DeletedPresenter;

impl Exhaust<()> for DeletedPresenter {
    type To = Envelope<()>;
    fn emit(&self, _: ()) -> Self::To {
        Envelope::message("voucher deleted successfully")
    }
}
