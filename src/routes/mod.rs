use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{admin, auth, category, page, site},
    state::AppState,
    utils::jwt::admin_middleware,
};

/// The served application: every route plus request tracing. Pages and the
/// admin API are same-origin only, so no CORS layer is installed.
pub fn create_app(state: AppState) -> Router {
    create_routes(state).layer(TraceLayer::new_for_http())
}

pub fn create_routes(state: AppState) -> Router {
    // Public site
    let site_routes = Router::new()
        .route("/", get(site::root_handler))
        .route("/rango/", get(site::index_handler))
        .route("/rango/about/", get(site::about_handler))
        .route(
            "/rango/add_category/",
            get(category::add_category_form_handler).post(category::add_category_handler),
        )
        .route("/rango/category/{slug}/", get(category::show_category_handler))
        .route("/rango/category/{slug}/like/", post(category::like_category_handler))
        .route(
            "/rango/category/{slug}/add_page/",
            get(page::add_page_form_handler).post(page::add_page_handler),
        )
        .route("/rango/goto/", get(page::goto_handler))
        .route("/admin/login", post(auth::login_handler))
        .nest_service("/static", ServeDir::new(&state.config.static_dir));

    // Admin CRUD, admin role only
    let admin_routes = Router::new()
        .route(
            "/admin/rango/category/",
            get(admin::list_categories_handler).post(admin::create_category_handler),
        )
        .route(
            "/admin/rango/category/{id}/",
            put(admin::update_category_handler).delete(admin::delete_category_handler),
        )
        .route(
            "/admin/rango/page/",
            get(admin::list_pages_handler).post(admin::create_page_handler),
        )
        .route(
            "/admin/rango/page/{id}/",
            put(admin::update_page_handler).delete(admin::delete_page_handler),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), admin_middleware));

    Router::new()
        .merge(site_routes)
        .merge(admin_routes)
        .with_state(state)
}
