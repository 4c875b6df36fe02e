//! HTTP surface: request validation, dispatch to [`StudentStore`], response shaping.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::{info, Level};

use roster_core::{error::DocumentStoreError, id::RecordId};

use crate::{
    error::ApiError,
    model::{Student, StudentPatch},
    students::{StudentFilter, StudentStore},
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub students: StudentStore,
}

#[derive(Debug, Serialize)]
pub struct Created {
    pub id: RecordId,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub country: Option<String>,
    pub age: Option<i64>,
}

impl TryFrom<ListParams> for StudentFilter {
    type Error = ApiError;

    fn try_from(params: ListParams) -> Result<Self, Self::Error> {
        let min_age = match params.age {
            None => None,
            Some(age) if age > 0 => Some(
                u32::try_from(age)
                    .map_err(|_| ApiError::Validation(format!("age {age} is out of range")))?,
            ),
            Some(age) => {
                return Err(ApiError::Validation(format!("age must be greater than 0, got {age}")));
            }
        };

        Ok(StudentFilter {
            country: params.country.filter(|country| !country.is_empty()),
            min_age,
        })
    }
}

/// Removes `null` members from every object in `value`, recursively.
pub fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_nulls).collect()),
        other => other,
    }
}

fn not_found() -> ApiError {
    ApiError::NotFound("Student not found".into())
}

async fn welcome() -> Json<Value> {
    Json(json!({ "message": "It is running" }))
}

async fn create_student(
    State(state): State<AppState>,
    payload: Result<Json<Student>, JsonRejection>,
) -> Result<(StatusCode, Json<Created>), ApiError> {
    let Json(student) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;

    match state.students.create(&student).await {
        Ok(id) => Ok((StatusCode::CREATED, Json(Created { id }))),
        Err(DocumentStoreError::Unavailable(msg)) => Err(ApiError::Unavailable(msg)),
        Err(e) => {
            info!(error = %e, "student create rejected");
            Err(ApiError::WriteFailure("Error creating student".into()))
        }
    }
}

async fn list_students(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::Validation(e.body_text()))?;
    let filter = StudentFilter::try_from(params)?;

    let students = state.students.list(&filter).await?;
    let data =
        serde_json::to_value(&students).map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(json!({ "data": strip_nulls(data) })))
}

async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Student>, ApiError> {
    state
        .students
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StudentPatch>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(patch) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;

    if state.students.update(&id, &patch).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Student not found or no update made".into()))
    }
}

async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.students.delete(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found())
    }
}

/// Builds the application router with request tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/students", get(list_students).post(create_student))
        .route(
            "/students/:id",
            get(get_student).patch(update_student).delete(delete_student),
        )
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::INFO))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_nulls_recursively() {
        let value = json!({
            "data": [
                { "name": "Ana", "age": 21, "address": null },
                { "name": null, "age": null, "address": { "city": null, "country": "PE" } },
            ]
        });

        assert_eq!(
            strip_nulls(value),
            json!({ "data": [ { "name": "Ana", "age": 21 }, { "address": { "country": "PE" } } ] })
        );
    }

    #[test]
    fn age_must_be_positive() {
        for age in [0, -1, i64::MIN] {
            let params = ListParams { country: None, age: Some(age) };
            assert!(matches!(StudentFilter::try_from(params), Err(ApiError::Validation(_))));
        }

        let params = ListParams { country: None, age: Some(i64::from(u32::MAX) + 1) };
        assert!(matches!(StudentFilter::try_from(params), Err(ApiError::Validation(_))));
    }

    #[test]
    fn empty_country_is_ignored() {
        let params = ListParams { country: Some(String::new()), age: Some(5) };
        assert_eq!(
            StudentFilter::try_from(params).unwrap(),
            StudentFilter { country: None, min_age: Some(5) }
        );
    }
}
