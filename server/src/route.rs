use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handler::{AppModule, Database};

mod order;
mod user;
mod voucher;

use self::{order::OrderRouter, user::UserRouter, voucher::VoucherRouter};

async fn healthcheck() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}

/// Resource routes under `/api`, plus `/healthcheck`.
pub fn router<D: Database>(module: AppModule<D>) -> Router {
    let api = Router::<AppModule<D>>::new().route_user().route_voucher().route_order();
    Router::new()
        .route("/healthcheck", get(healthcheck))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new())
        .with_state(module)
}

#[cfg(test)]
mod test {
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use driver::database::InMemoryDatabase;

    use crate::handler::AppModule;

    fn app() -> Router {
        super::router(AppModule::with_database(InMemoryDatabase::default()))
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn create(app: &Router, uri: &str, body: Value, key: &str) -> String {
        let (status, response) = call(app, Method::POST, uri, Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "{response}");
        response["data"][key]["id"].as_str().unwrap().to_string()
    }

    fn assert_error(response: &Value, status: StatusCode, error_type: &str, message: &str) {
        assert_eq!(response["status"], json!(status.as_u16()));
        assert_eq!(response["errorType"], json!(error_type));
        assert_eq!(response["message"], json!(message));
    }

    #[tokio::test]
    async fn healthcheck() {
        let (status, body) = call(&app(), Method::GET, "/healthcheck", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "OK" }));
    }

    #[tokio::test]
    async fn voucher_redeems_once() {
        let app = app();
        let voucher = create(
            &app,
            "/api/vouchers",
            json!({ "type": "fixed", "value": 70 }),
            "voucher",
        )
        .await;
        let user = create(&app, "/api/users", json!({ "name": "Mahmoud" }), "user").await;

        let order = json!({ "userId": user, "voucherId": voucher });
        let (status, body) = call(&app, Method::POST, "/api/orders", Some(order.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], json!("order created successfully"));
        assert_eq!(body["data"]["order"]["user"], json!(user));
        assert_eq!(body["data"]["order"]["voucher"], json!(voucher));
        let order_id = body["data"]["order"]["id"].as_str().unwrap().to_string();

        let (status, body) = call(&app, Method::POST, "/api/orders", Some(order)).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_error(
            &body,
            status,
            "MethodNotAllowedError",
            &format!("voucher[id={voucher}] is already used"),
        );

        let (status, body) = call(&app, Method::GET, &format!("/api/vouchers/{voucher}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], json!("voucher retrieved successfully"));
        assert_eq!(body["data"]["voucher"]["usedBy"]["name"], json!("Mahmoud"));
        assert_eq!(body["data"]["voucher"]["usedOn"]["id"], json!(order_id));

        let (status, body) = call(&app, Method::GET, "/api/orders", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], json!("orders retrieved successfully"));
        let orders = body["data"].as_array().unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0]["user"]["name"], json!("Mahmoud"));
        assert_eq!(orders[0]["voucher"]["id"], json!(voucher));
        assert_eq!(orders[0]["voucher"]["usedOn"], json!(order_id));
    }

    #[tokio::test]
    async fn voucher_bounds_are_enforced() {
        let app = app();
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/vouchers",
            Some(json!({ "type": "percentage", "value": 120 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_error(
            &body,
            status,
            "BadRequestError",
            "body: \"value\" must be less than or equal to 100",
        );

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/vouchers",
            Some(json!({ "type": "voucher", "value": 10 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_error(
            &body,
            status,
            "BadRequestError",
            "body: \"type\" must be one of [fixed, percentage]",
        );

        let (_, body) = call(&app, Method::GET, "/api/vouchers", None).await;
        assert_eq!(body["message"], json!("vouchers retrieved successfully"));
        assert_eq!(body["data"], json!([]));

        let voucher = create(
            &app,
            "/api/vouchers",
            json!({ "type": "percentage", "value": 20 }),
            "voucher",
        )
        .await;
        let (status, body) = call(
            &app,
            Method::PUT,
            &format!("/api/vouchers/{voucher}"),
            Some(json!({ "value": 150 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_error(
            &body,
            status,
            "BadRequestError",
            "percentage voucher's value can't exceed 100%",
        );
    }

    #[tokio::test]
    async fn claimed_voucher_is_frozen() {
        let app = app();
        let voucher = create(
            &app,
            "/api/vouchers",
            json!({ "type": "fixed", "value": 10 }),
            "voucher",
        )
        .await;
        let uri = format!("/api/vouchers/{voucher}");

        let (status, body) = call(&app, Method::PUT, &uri, Some(json!({ "value": 40 }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], json!("voucher updated successfully"));
        assert_eq!(body["data"]["voucher"]["value"].as_f64(), Some(40.0));
        assert_eq!(body["data"]["voucher"]["usedBy"], Value::Null);

        let user = create(&app, "/api/users", json!({ "name": "Mahmoud" }), "user").await;
        create(
            &app,
            "/api/orders",
            json!({ "userId": user, "voucherId": voucher }),
            "order",
        )
        .await;

        let (status, body) = call(&app, Method::PUT, &uri, Some(json!({ "value": 40 }))).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_error(
            &body,
            status,
            "MethodNotAllowedError",
            "updating used voucher is not allowed",
        );

        let (status, body) = call(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_error(
            &body,
            status,
            "MethodNotAllowedError",
            "deleting used voucher is not allowed",
        );
    }

    #[tokio::test]
    async fn unclaimed_voucher_is_deleted() {
        let app = app();
        let voucher = create(&app, "/api/vouchers", json!({ "value": 5 }), "voucher").await;
        let uri = format!("/api/vouchers/{voucher}");

        let (status, body) = call(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "status": 200, "message": "voucher deleted successfully" })
        );

        let (status, body) = call(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_error(
            &body,
            status,
            "NotFoundError",
            &format!("voucher[id={voucher}] does not exist"),
        );
    }

    #[tokio::test]
    async fn voucher_targets_must_exist() {
        let app = app();
        let missing = Uuid::new_v4();
        let uri = format!("/api/vouchers/{missing}");
        let message = format!("voucher[id={missing}] does not exist");

        let (status, body) = call(&app, Method::PUT, &uri, Some(json!({ "value": 40 }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_error(&body, status, "NotFoundError", &message);

        let (status, body) = call(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_error(&body, status, "NotFoundError", &message);

        let (status, body) = call(
            &app,
            Method::PUT,
            "/api/vouchers/not-an-id",
            Some(json!({ "value": 40 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_error(&body, status, "BadRequestError", "invalid voucher id");

        let (status, body) = call(&app, Method::DELETE, "/api/vouchers/not-an-id", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_error(&body, status, "BadRequestError", "invalid voucher id");
    }

    #[tokio::test]
    async fn order_lookups_and_body_checks() {
        let app = app();

        let (status, body) = call(&app, Method::GET, "/api/orders/not-an-id", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_error(&body, status, "BadRequestError", "invalid order id");

        let missing = Uuid::new_v4();
        let (status, body) = call(&app, Method::GET, &format!("/api/orders/{missing}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_error(
            &body,
            status,
            "NotFoundError",
            &format!("order[id={missing}] does not exist"),
        );

        let (status, body) = call(&app, Method::POST, "/api/orders", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_error(&body, status, "BadRequestError", "body: \"userId\" is required");

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/orders",
            Some(json!({ "userId": missing.to_string() })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_error(
            &body,
            status,
            "NotFoundError",
            &format!("user[id={missing}] does not exist"),
        );

        let user = create(&app, "/api/users", json!({ "name": "Mahmoud" }), "user").await;
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/orders",
            Some(json!({ "userId": user, "voucherId": missing.to_string() })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_error(
            &body,
            status,
            "NotFoundError",
            &format!("voucher[id={missing}] does not exist"),
        );

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/orders",
            Some(json!({ "userId": user })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["order"]["voucher"], Value::Null);
    }

    #[tokio::test]
    async fn users() {
        let app = app();

        let (status, body) = call(&app, Method::POST, "/api/users", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_error(&body, status, "BadRequestError", "body: \"name\" is required");

        let (status, body) = call(&app, Method::POST, "/api/users", Some(json!({ "name": "M" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_error(
            &body,
            status,
            "BadRequestError",
            "body: \"name\" length must be at least 2 characters long",
        );

        let first = create(&app, "/api/users", json!({ "name": "Mahmoud" }), "user").await;
        create(&app, "/api/users", json!({ "name": "Ali" }), "user").await;

        let (status, body) = call(&app, Method::GET, "/api/users", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], json!("users retrieved successfully"));
        let names = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|user| user["name"].clone())
            .collect::<Vec<_>>();
        assert_eq!(names, vec![json!("Mahmoud"), json!("Ali")]);

        let (status, body) = call(&app, Method::GET, &format!("/api/users/{first}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], json!("user retrieved successfully"));
        assert_eq!(body["data"]["user"]["name"], json!("Mahmoud"));
        assert!(body["data"]["user"]["createdAt"].is_string());

        let (status, body) = call(&app, Method::GET, "/api/users/42", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_error(&body, status, "BadRequestError", "invalid user id");
    }
}
