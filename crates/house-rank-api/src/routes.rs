use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::{Extension, State},
    middleware,
    response::{Html, IntoResponse},
    routing::post,
    Router,
};
use tower_http::trace::TraceLayer;

use crate::auth::{auth_middleware, RequestContext};
use crate::cors::cors_middleware;
use crate::schema::{create_schema, HouseRankSchema};
use crate::AppState;

/// One endpoint; layers from the outside in: trace, CORS (answers
/// preflight), auth (401s before GraphQL runs).
pub fn create_router(state: AppState) -> Router {
    let schema = create_schema(state.clone());
    Router::new()
        .route("/graphql", post(graphql_handler).get(graphiql))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
        .layer(middleware::from_fn(cors_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(schema)
}

async fn graphql_handler(
    State(schema): State<HouseRankSchema>,
    Extension(request): Extension<RequestContext>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    schema.execute(req.into_inner().data(request)).await.into()
}

async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}
