mod common;
mod order;
mod user;
mod voucher;

pub use self::{common::*, order::*, user::*, voucher::*};
