//! Model listing handler.

use axum::Json;
use axum::extract::State;

use crate::dto::ModelList;
use crate::state::AppState;

/// `GET /v1/models` returns the static catalog of advertised models.
///
/// Serves the snapshot built at bootstrap, so the `created` stamps do not
/// drift between requests.
pub async fn list(State(state): State<AppState>) -> Json<ModelList> {
    Json(state.model_list.clone())
}
