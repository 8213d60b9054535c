use std::collections::BTreeMap;

use axum::{
    middleware,
    routing::{on, MethodFilter, MethodRouter},
    Json, Router,
};
use tower::Layer;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::method_override::override_method;
use crate::state::AppState;
use table::{RouteDef, RouteName, Verb};

pub mod table;
pub mod users;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

fn method_filter(verb: Verb) -> MethodFilter {
    match verb {
        Verb::Get => MethodFilter::GET,
        Verb::Post => MethodFilter::POST,
        Verb::Patch => MethodFilter::PATCH,
        Verb::Put => MethodFilter::PUT,
        Verb::Delete => MethodFilter::DELETE,
    }
}

fn endpoint(route: &RouteDef) -> MethodRouter<AppState> {
    let filter = method_filter(route.method);
    match route.name {
        RouteName::UsersIndex => on(filter, users::index),
        RouteName::UsersNew => on(filter, users::new_form),
        RouteName::UsersShow => on(filter, users::show),
        RouteName::UsersCreate => on(filter, users::create),
        RouteName::UsersEdit => on(filter, users::edit),
        RouteName::UsersUpdate | RouteName::UsersReplace => on(filter, users::update),
        RouteName::UsersDelete => on(filter, users::destroy),
        RouteName::Health => on(filter, health),
    }
}

/// Directory routes only, without method override or outer layers.
/// Registered from [`table::ROUTES`], one method router per path.
pub fn user_routes(state: AppState) -> Router {
    let mut by_path: BTreeMap<&'static str, MethodRouter<AppState>> = BTreeMap::new();
    for route in table::ROUTES {
        let handler = endpoint(route);
        let merged = match by_path.remove(route.path) {
            Some(existing) => existing.merge(handler),
            None => handler,
        };
        by_path.insert(route.path, merged);
    }
    by_path
        .into_iter()
        .fold(Router::new(), |router, (path, methods)| router.route(path, methods))
        .with_state(state)
}

/// Build the full application: method override around the directory routes,
/// then CORS and request tracing.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let overridden = middleware::from_fn(override_method).layer(user_routes(state));

    Router::new()
        .fallback_service(overridden)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
