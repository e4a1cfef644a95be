// src/routes.rs

use std::time::Duration;

use axum::{
    Router, http::Method, middleware,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, comments, engagement, feed, friends, sessions, users},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (users, friends, sessions).
/// * Applies global middleware (Trace, CORS, per-request timeout).
/// * Injects global state (Database Pool + Config).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let timeout = TimeoutLayer::new(Duration::from_secs(state.config.request_timeout));

    let user_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        // Protected user routes
        .merge(
            Router::new()
                .route("/authenticate", get(auth::authenticate))
                .route("/all", get(users::list_users))
                .route("/latest", get(users::latest_users))
                .route(
                    "/profile/{user_id}",
                    get(users::profile).put(users::update_profile),
                )
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                )),
        );

    // POST addresses a user (create request towards them); PUT/DELETE address
    // an existing request by its id (accept/decline).
    let friend_routes = Router::new()
        .route(
            "/request/{id}",
            post(friends::create_request)
                .put(friends::accept_request)
                .delete(friends::decline_request),
        )
        .route("/requests", get(friends::list_pending))
        .route("/recent", get(friends::list_recent))
        .route("/{user_id}/all", get(friends::list_friends))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let session_routes = Router::new()
        .route("/", post(sessions::create_session))
        .route("/feed/{user_id}", get(feed::feed))
        .route("/user/{user_id}", get(feed::overviews))
        .route(
            "/{id}",
            get(sessions::session_detail)
                .put(sessions::update_session)
                .delete(sessions::delete_session),
        )
        .route(
            "/{id}/like",
            put(engagement::like_session).delete(engagement::unlike_session),
        )
        .route(
            "/{id}/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/{id}/comments/{cid}",
            axum::routing::delete(comments::delete_comment),
        )
        .route(
            "/{id}/comments/{cid}/like",
            put(engagement::like_comment).delete(engagement::unlike_comment),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .nest("/users", user_routes)
        .nest("/friends", friend_routes)
        .nest("/sessions", session_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(timeout)
        .with_state(state)
}
