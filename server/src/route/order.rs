use axum::extract::{Path, State};
use axum::routing::get;
use axum::Router;

use application::service::{CreateOrderService, GetOrderService};

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::extract::JsonBody;
use crate::handler::{AppModule, Database};

pub(crate) mod request;
pub(crate) mod response;

use self::request::Transformer;
use self::response::{CreatedPresenter, Presenter};

pub trait OrderRouter {
    fn route_order(self) -> Self;
}

impl<D: Database> OrderRouter for Router<AppModule<D>> {
    fn route_order(self) -> Self {
        self.route(
            "/orders",
            get(|State(module): State<AppModule<D>>| async move {
                Controller::new((), Presenter)
                    .bypass(|| module.database().get_all_orders())
                    .await
                    .map_err(ErrorStatus::from)
            })
            .post(
                |State(module): State<AppModule<D>>, body: JsonBody| async move {
                    Controller::new(Transformer, CreatedPresenter)
                        .try_intake(body)?
                        .handle(|dto| module.database().create_order(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/orders/:id",
            get(
                |State(module): State<AppModule<D>>, Path(id): Path<String>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(id)
                        .handle(|dto| module.database().get_order(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
