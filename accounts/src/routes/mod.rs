use crate::handlers::{
    health::health_check,
    user::{bulk_search, signin, signup, update_profile},
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn create_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // signup/signin are public; `/` and `/bulk` need a bearer token, which the
    // handlers demand through the `AuthenticatedUser` extractor.
    let user_routes = Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
        .route("/", put(update_profile))
        .route("/bulk", get(bulk_search));

    Router::new()
        .route("/health", get(health_check))
        .merge(user_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
