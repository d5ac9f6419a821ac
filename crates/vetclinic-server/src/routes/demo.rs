//! `/api/alumnos` and `/api/animales`, the unrelated demo collections.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use vetclinic_core::models::{Animal, AnimalInput, Student, StudentInput};

use crate::error::{message, parse_id, ApiJson, ApiResult, MessageBody};
use crate::state::AppState;

pub async fn list_students(State(state): State<AppState>) -> ApiResult<Json<Vec<Student>>> {
    Ok(Json(state.db(|db| db.list_students()).await?))
}

pub async fn create_student(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<StudentInput>,
) -> ApiResult<(StatusCode, Json<Student>)> {
    let new = input.into_new()?;
    let created = state.db(move |db| db.create_student(&new)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn show_student(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Student>> {
    let id = parse_id(&id)?;
    Ok(Json(state.db(move |db| db.get_student(id)).await?))
}

pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<StudentInput>,
) -> ApiResult<Json<Student>> {
    let id = parse_id(&id)?;
    let patch = input.into_patch()?;
    Ok(Json(state.db(move |db| db.update_student(id, patch)).await?))
}

pub async fn destroy_student(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<MessageBody>> {
    let id = parse_id(&id)?;
    state.db(move |db| db.delete_student(id)).await?;
    Ok(message("Alumno eliminado"))
}

pub async fn list_animals(State(state): State<AppState>) -> ApiResult<Json<Vec<Animal>>> {
    Ok(Json(state.db(|db| db.list_animals()).await?))
}

pub async fn create_animal(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<AnimalInput>,
) -> ApiResult<(StatusCode, Json<Animal>)> {
    let name = input.into_name()?;
    let created = state.db(move |db| db.create_animal(&name)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn show_animal(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Animal>> {
    let id = parse_id(&id)?;
    Ok(Json(state.db(move |db| db.get_animal(id)).await?))
}

pub async fn update_animal(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<AnimalInput>,
) -> ApiResult<Json<Animal>> {
    let id = parse_id(&id)?;
    let name = input.into_name()?;
    Ok(Json(state.db(move |db| db.rename_animal(id, &name)).await?))
}

pub async fn destroy_animal(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<MessageBody>> {
    let id = parse_id(&id)?;
    state.db(move |db| db.delete_animal(id)).await?;
    Ok(message("Animal eliminado"))
}
