#![allow(dead_code)]

use std::path::PathBuf;

use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use rango::{
    db::{self, DbPool},
    models::category::Category,
    routes::create_app,
    AppState, Config,
};
use tower::ServiceExt;

pub struct TestApp {
    pub pool: DbPool,
    pub config: Config,
}

impl TestApp {
    pub async fn new() -> Self {
        let config = Config {
            static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static"),
            jwt_secret: "test-secret".to_string(),
            ..Config::in_memory()
        };
        let pool = db::init_db(&config.database_url).await.unwrap();
        Self { pool, config }
    }

    pub fn router(&self) -> Router {
        create_app(AppState::new(self.pool.clone(), self.config.clone()))
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let location = headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        Response {
            status,
            location,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&self, uri: &str, form: &str) -> Response {
        self.send(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn create_category(&self, name: &str, views: i64, likes: i64) -> Category {
        db::category::create(&self.pool, name, views, likes).await.unwrap()
    }
}

pub struct Response {
    pub status: StatusCode,
    pub location: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}
