use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use application::transfer::OrderDetail;
use kernel::prelude::entity::{DestructOrder, Order};

use crate::controller::Exhaust;
use crate::response::Envelope;
use crate::route::user::response::UserResponse;
use crate::route::voucher::response::VoucherResponse;

/// `user`/`voucher` are either raw identifiers or the resolved records.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse<U, V> {
    id: Uuid,
    user: U,
    voucher: Option<V>,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

impl<U, V> OrderResponse<U, V> {
    fn assemble(order: Order, user: U, voucher: Option<V>) -> Self {
        let DestructOrder {
            id,
            created_at,
            updated_at,
            ..
        } = order.into_destruct();
        Self {
            id: id.into(),
            user,
            voucher,
            created_at: created_at.into_inner(),
            updated_at: updated_at.into_inner(),
        }
    }
}

impl From<Order> for OrderResponse<Uuid, Uuid> {
    fn from(order: Order) -> Self {
        let user = Uuid::from(*order.user_id());
        let voucher = order.voucher_id().map(Uuid::from);
        Self::assemble(order, user, voucher)
    }
}

type ResolvedOrder = OrderResponse<UserResponse, VoucherResponse<Uuid, Uuid>>;

impl From<OrderDetail> for ResolvedOrder {
    fn from(detail: OrderDetail) -> Self {
        Self::assemble(
            detail.order,
            detail.user.into(),
            detail.voucher.map(VoucherResponse::from),
        )
    }
}

#[derive(Debug, Serialize)]
pub struct OrderData<O> {
    order: O,
}

pub struct Presenter;

impl Exhaust<OrderDetail> for Presenter {
    type To = Envelope<OrderData<ResolvedOrder>>;
    fn emit(&self, input: OrderDetail) -> Self::To {
        Envelope::ok(
            "order retrieved successfully",
            OrderData {
                order: input.into(),
            },
        )
    }
}

impl Exhaust<Vec<OrderDetail>> for Presenter {
    type To = Envelope<Vec<ResolvedOrder>>;
    fn emit(&self, input: Vec<OrderDetail>) -> Self::To {
        Envelope::ok(
            "orders retrieved successfully",
            input.into_iter().map(ResolvedOrder::from).collect(),
        )
    }
}

pub struct CreatedPresenter;

impl Exhaust<Order> for CreatedPresenter {
    type To = Envelope<OrderData<OrderResponse<Uuid, Uuid>>>;
    fn emit(&self, input: Order) -> Self::To {
        Envelope::created(
            "order created successfully",
            OrderData {
                order: input.into(),
            },
        )
    }
}
