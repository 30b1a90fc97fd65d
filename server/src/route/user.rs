use axum::extract::{Path, State};
use axum::routing::get;
use axum::Router;

use application::service::{CreateUserService, GetUserService};

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::extract::JsonBody;
use crate::handler::{AppModule, Database};

pub(crate) mod request;
pub(crate) mod response;

use self::request::Transformer;
use self::response::{CreatedPresenter, Presenter};

pub trait UserRouter {
    fn route_user(self) -> Self;
}

impl<D: Database> UserRouter for Router<AppModule<D>> {
    fn route_user(self) -> Self {
        self.route(
            "/users",
            get(|State(module): State<AppModule<D>>| async move {
                Controller::new((), Presenter)
                    .bypass(|| module.database().get_all_users())
                    .await
                    .map_err(ErrorStatus::from)
            })
            .post(
                |State(module): State<AppModule<D>>, body: JsonBody| async move {
                    Controller::new(Transformer, CreatedPresenter)
                        .try_intake(body)?
                        .handle(|dto| module.database().create_user(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/users/:id",
            get(
                |State(module): State<AppModule<D>>, Path(id): Path<String>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(id)
                        .handle(|dto| module.database().get_user(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
