use kernel::prelude::entity::{Order, User, Voucher};

#[derive(Debug, Clone)]
pub struct OrderDetail {
    pub order: Order,
    pub user: User,
    pub voucher: Option<Voucher>,
}

pub struct GetOrderDto {
    pub id: String,
}

pub struct CreateOrderDto {
    pub user_id: String,
    pub voucher_id: Option<String>,
}
