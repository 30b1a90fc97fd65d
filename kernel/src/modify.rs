mod order;
mod user;
mod voucher;

pub use self::{order::*, user::*, voucher::*};
