use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::ServiceResult,
    service::IdeaService,
    storage::IdeaStore,
    types::PickedIdeas,
};

#[derive(Debug, Deserialize)]
pub struct IdeaBody {
    #[serde(default)]
    pub idea: String,
}

/// Routes under `/api/ideas`.
pub fn ideas_router<S>(service: Arc<IdeaService<S>>) -> Router
where
    S: IdeaStore + Sync + 'static,
{
    Router::new()
        .route("/", get(list_ideas::<S>).post(create_idea::<S>))
        .route("/pick", get(pick_ideas::<S>))
        .route("/reset", post(reset_ideas::<S>))
        .route("/{id}", put(update_idea::<S>).delete(delete_idea::<S>))
        .route("/{id}/select", post(select_idea::<S>))
        .with_state(service)
}

pub async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_ideas<S: IdeaStore + Sync>(
    State(service): State<Arc<IdeaService<S>>>,
) -> ServiceResult<impl IntoResponse> {
    let ideas = service.list().await?;
    Ok(Json(ideas))
}

async fn pick_ideas<S: IdeaStore + Sync>(
    State(service): State<Arc<IdeaService<S>>>,
) -> ServiceResult<impl IntoResponse> {
    let ideas = service.pick_three().await?;
    Ok(Json(PickedIdeas { ideas }))
}

async fn select_idea<S: IdeaStore + Sync>(
    State(service): State<Arc<IdeaService<S>>>,
    Path(id): Path<String>,
) -> ServiceResult<impl IntoResponse> {
    let idea = service.select(&id).await?;
    Ok(Json(idea))
}

async fn create_idea<S: IdeaStore + Sync>(
    State(service): State<Arc<IdeaService<S>>>,
    Json(body): Json<IdeaBody>,
) -> ServiceResult<impl IntoResponse> {
    let idea = service.create(&body.idea).await?;
    Ok((StatusCode::CREATED, Json(idea)))
}

async fn update_idea<S: IdeaStore + Sync>(
    State(service): State<Arc<IdeaService<S>>>,
    Path(id): Path<String>,
    Json(body): Json<IdeaBody>,
) -> ServiceResult<impl IntoResponse> {
    let idea = service.update(&id, &body.idea).await?;
    Ok(Json(idea))
}

async fn delete_idea<S: IdeaStore + Sync>(
    State(service): State<Arc<IdeaService<S>>>,
    Path(id): Path<String>,
) -> ServiceResult<impl IntoResponse> {
    service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn reset_ideas<S: IdeaStore + Sync>(
    State(service): State<Arc<IdeaService<S>>>,
) -> ServiceResult<impl IntoResponse> {
    service.reset().await?;
    Ok(Json(json!({ "message": "Reset successful" })))
}
