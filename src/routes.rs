use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{on, MethodFilter, MethodRouter},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::database::NewReview;
use crate::handlers::{self, reviews};
use crate::middleware::{access_token_middleware, decode_payload, validate_path_ids};
use crate::services::ACCESS_TOKEN_HEADER;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Requires a valid `X-Access-Token`
    Token,
}

/// Body schema decoded before the handler runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    NewReview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Status,
    ListOwn,
    GetById,
    GetByUser,
    GetByAuction,
    Create,
    Delete,
}

#[derive(Debug, Clone, Copy)]
pub struct Route {
    pub verb: Verb,
    pub path: &'static str,
    pub access: Access,
    pub payload: Option<Payload>,
    pub endpoint: Endpoint,
}

/// Every operation the service answers. Anything else is 404.
///
/// Each `:param` segment must be a UUID; malformed ids are rejected with 400
/// before the token check, payload decoding or the handler.
pub const ROUTES: &[Route] = &[
    Route { verb: Verb::Get, path: "/reviews/status", access: Access::Public, payload: None, endpoint: Endpoint::Status },
    Route { verb: Verb::Get, path: "/reviews", access: Access::Token, payload: None, endpoint: Endpoint::ListOwn },
    Route { verb: Verb::Post, path: "/reviews", access: Access::Token, payload: Some(Payload::NewReview), endpoint: Endpoint::Create },
    Route { verb: Verb::Get, path: "/reviews/:review_id", access: Access::Public, payload: None, endpoint: Endpoint::GetById },
    Route { verb: Verb::Delete, path: "/reviews/:review_id", access: Access::Token, payload: None, endpoint: Endpoint::Delete },
    Route { verb: Verb::Get, path: "/reviews/user/:public_id", access: Access::Public, payload: None, endpoint: Endpoint::GetByUser },
    Route { verb: Verb::Get, path: "/reviews/auction/:auction_id", access: Access::Public, payload: None, endpoint: Endpoint::GetByAuction },
];

impl Verb {
    fn filter(self) -> MethodFilter {
        match self {
            Verb::Get => MethodFilter::GET,
            Verb::Post => MethodFilter::POST,
            Verb::Delete => MethodFilter::DELETE,
        }
    }
}

impl Route {
    pub fn has_path_params(&self) -> bool {
        self.path.split('/').any(|segment| segment.starts_with(':'))
    }

    fn handler(&self) -> MethodRouter<AppState> {
        let filter = self.verb.filter();
        match self.endpoint {
            Endpoint::Status => on(filter, handlers::status),
            Endpoint::ListOwn => on(filter, reviews::list_own),
            Endpoint::GetById => on(filter, reviews::get_by_id),
            Endpoint::GetByUser => on(filter, reviews::get_by_user),
            Endpoint::GetByAuction => on(filter, reviews::get_by_auction),
            Endpoint::Create => on(filter, reviews::create),
            Endpoint::Delete => on(filter, reviews::delete),
        }
    }

    /// Handler wrapped so requests pass: path ids, then payload, then token.
    fn method_router(&self, state: &AppState) -> MethodRouter<AppState> {
        // Layers added later run earlier.
        let mut method_router = self.handler();

        if self.access == Access::Token {
            method_router =
                method_router.route_layer(from_fn_with_state(state.clone(), access_token_middleware));
        }

        if let Some(payload) = self.payload {
            method_router = match payload {
                Payload::NewReview => method_router
                    .route_layer(from_fn_with_state(state.clone(), decode_payload::<NewReview>)),
            };
        }

        if self.has_path_params() {
            method_router = method_router.route_layer(from_fn(validate_path_ids));
        }

        method_router
    }
}

/// Core router built from `ROUTES`; no logging or CORS layers.
pub fn router(state: AppState) -> Router {
    let router = ROUTES
        .iter()
        .fold(Router::new(), |router, route| {
            // Routes sharing a path merge into one method router.
            router.route(route.path, route.method_router(&state))
        });

    router.fallback(handlers::not_found).with_state(state)
}

/// Full application: core router plus the configured ambient layers.
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut app = router(state);

    if config.security.enable_cors {
        app = app.layer(cors_layer(&config.security.cors_origins));
    }

    if config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    app
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(ACCESS_TOKEN_HEADER)])
}
