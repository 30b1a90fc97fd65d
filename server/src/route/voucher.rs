use axum::extract::{Path, State};
use axum::routing::get;
use axum::Router;

use application::service::{
    CreateVoucherService, DeleteVoucherService, GetVoucherService, UpdateVoucherService,
};

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::extract::JsonBody;
use crate::handler::{AppModule, Database};

pub(crate) mod request;
pub(crate) mod response;

use self::request::{DeleteRequest, GetRequest, Transformer};
use self::response::{CreatedPresenter, DeletedPresenter, Presenter, UpdatedPresenter};

pub trait VoucherRouter {
    fn route_voucher(self) -> Self;
}

impl<D: Database> VoucherRouter for Router<AppModule<D>> {
    fn route_voucher(self) -> Self {
        self.route(
            "/vouchers",
            get(|State(module): State<AppModule<D>>| async move {
                Controller::new((), Presenter)
                    .bypass(|| module.database().get_all_vouchers())
                    .await
                    .map_err(ErrorStatus::from)
            })
            .post(
                |State(module): State<AppModule<D>>, body: JsonBody| async move {
                    Controller::new(Transformer, CreatedPresenter)
                        .try_intake(body)?
                        .handle(|dto| module.database().create_voucher(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/vouchers/:id",
            get(
                |State(module): State<AppModule<D>>, Path(id): Path<String>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(GetRequest::new(id))
                        .handle(|dto| module.database().get_voucher(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .put(
                |State(module): State<AppModule<D>>,
                 Path(id): Path<String>,
                 body: JsonBody| async move {
                    Controller::new(Transformer, UpdatedPresenter)
                        .try_intake((id, body))?
                        .handle(|dto| module.database().update_voucher(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(module): State<AppModule<D>>, Path(id): Path<String>| async move {
                    Controller::new(Transformer, DeletedPresenter)
                        .intake(DeleteRequest::new(id))
                        .handle(|dto| module.database().delete_voucher(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
