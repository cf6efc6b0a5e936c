use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use crate::experiment::{ApplyOutcome, ExperimentId, ExperimentRef, ParameterSet};
use crate::repository::ExperimentRepository;
use crate::Result;

pub(crate) async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": "DVC Experiments API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "GET /experiments": "Get list of all experiments",
            "GET /experiments/{experiment_id}/params": "Get parameters for a specific experiment",
            "POST /experiments/{experiment_id}/apply": "Apply a specific experiment",
        }
    }))
}

pub(crate) async fn healthz_handler() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

pub(crate) async fn list_experiments_handler<R: ExperimentRepository>(
    State(repo): State<Arc<R>>,
) -> Result<Json<Vec<ExperimentRef>>> {
    Ok(Json(repo.list().await?))
}

pub(crate) async fn experiment_params_handler<R: ExperimentRepository>(
    State(repo): State<Arc<R>>,
    Path(experiment_id): Path<String>,
) -> Result<Json<ParameterSet>> {
    // Validation happens before the repository sees the identifier.
    let id = ExperimentId::parse(&experiment_id)?;
    Ok(Json(repo.params(&id).await?))
}

pub(crate) async fn apply_experiment_handler<R: ExperimentRepository>(
    State(repo): State<Arc<R>>,
    Path(experiment_id): Path<String>,
) -> Result<Json<ApplyOutcome>> {
    let id = ExperimentId::parse(&experiment_id)?;
    Ok(Json(repo.apply(&id).await?))
}
