use axum::{
    extract::rejection::JsonRejection,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use arkitek_common::boot_script::{self, parse_server_count};
use arkitek_common::{BenchmarkRequest, BootScriptError, BootScriptRequest, NewClusterLink, TestRunRequest};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn healthz() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

pub async fn list_links(State(st): State<AppState>) -> impl IntoResponse {
    Json(st.registry.list().await)
}

pub async fn create_link(
    State(st): State<AppState>,
    payload: Result<Json<NewClusterLink>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(new) = payload.map_err(|e| ApiError::InvalidBody(e.body_text()))?;
    let link = st.registry.create(new).await?;
    Ok((StatusCode::CREATED, Json(link)).into_response())
}

pub async fn delete_link(
    State(st): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let removed = st.registry.delete(&id).await?;
    Ok(Json(json!({
        "message": "Cluster link deleted successfully",
        "id": removed.id,
    }))
    .into_response())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBootScriptBody {
    #[serde(default)]
    pub cluster_name: Option<String>,
    /// Number or numeric string; forms post strings.
    #[serde(default)]
    pub server_count: Option<Value>,
    #[serde(default)]
    pub boot_image: Option<String>,
    #[serde(default)]
    pub kernel_params: Option<String>,
}

impl GenerateBootScriptBody {
    fn into_request(self) -> Result<BootScriptRequest, BootScriptError> {
        let cluster_name = self.cluster_name.unwrap_or_default();
        if cluster_name.is_empty() {
            return Err(BootScriptError::MissingClusterName);
        }
        let server_count = match self.server_count {
            None | Some(Value::Null) => return Err(BootScriptError::MissingServerCount),
            Some(Value::String(s)) => parse_server_count(&s)?,
            Some(Value::Number(n)) => parse_server_count(&n.to_string())?,
            Some(other) => return Err(BootScriptError::InvalidServerCount(other.to_string())),
        };

        let mut req = BootScriptRequest::new(cluster_name, server_count)?;
        req.boot_image = self.boot_image;
        req.kernel_params = self.kernel_params;
        req.validate()?;
        Ok(req)
    }
}

/// Keeps the download name usable inside a quoted header parameter.
fn attachment_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c == '"' || c == '\\' || c.is_control() { '_' } else { c })
        .collect()
}

pub async fn generate_boot_script(
    State(st): State<AppState>,
    payload: Result<Json<GenerateBootScriptBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = payload.map_err(|e| ApiError::InvalidBody(e.body_text()))?;
    let req = body.into_request()?;
    let script = boot_script::generate(&req, &st.boot_defaults);

    tracing::info!(
        cluster = %req.cluster_name,
        servers = req.server_count.get(),
        "boot script generated"
    );

    let disposition = format!(
        "attachment; filename=\"{}\"",
        attachment_filename(&req.suggested_filename())
    );
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        script,
    )
        .into_response())
}

pub async fn run_benchmark(
    payload: Result<Json<BenchmarkRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::InvalidBody(e.body_text()))?;
    let run = req.start(Utc::now()).ok_or(ApiError::MissingField("endpoint"))?;
    tracing::info!(endpoint = %run.endpoint, test_type = %run.test_type, "benchmark run accepted");
    Ok(Json(run).into_response())
}

pub async fn run_until_fail(
    payload: Result<Json<TestRunRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::InvalidBody(e.body_text()))?;
    let run = req.start(Utc::now()).ok_or(ApiError::MissingField("clusterName"))?;
    tracing::info!(cluster = %run.cluster_name, test_type = %run.test_type, "continuous test run accepted");
    Ok(Json(run).into_response())
}
