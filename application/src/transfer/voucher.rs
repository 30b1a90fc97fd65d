use kernel::prelude::entity::{Order, User, Voucher, VoucherType};

/// A voucher with its claim pair resolved to the records it points at.
#[derive(Debug, Clone)]
pub struct VoucherDetail {
    pub voucher: Voucher,
    pub used_by: Option<User>,
    pub used_on: Option<Order>,
}

pub struct GetVoucherDto {
    pub id: String,
}

pub struct CreateVoucherDto {
    pub voucher_type: Option<VoucherType>,
    pub value: f64,
}

pub struct UpdateVoucherDto {
    pub id: String,
    pub voucher_type: Option<VoucherType>,
    pub value: Option<f64>,
}

pub struct DeleteVoucherDto {
    pub id: String,
}
