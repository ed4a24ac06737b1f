//! Handlers for the `/document` resource.
//!
//! Uploads arrive as multipart forms. The file is written under a random
//! stored name first and the row inserted second; if the insert fails the
//! new file is removed again. On replace the previous file is deleted only
//! after the row points at the new one.

use axum::body::{Body, Bytes};
use axum::extract::{Multipart, State};
use axum::http::header;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use sitebook_core::documents::{
    content_disposition, content_type_for_extension, file_extension, generate_stored_name,
    validate_upload,
};
use sitebook_core::types::DbId;
use sitebook_core::validation::validate_input;
use sitebook_db::models::document::{
    CreateDocument, Document, DocumentFilter, ReplaceDocumentFile, UpdateDocument,
};
use sitebook_db::repositories::{ConstructionRepo, DocumentRepo, ProjectRepo};
use tokio_util::io::ReaderStream;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::handlers::access::{ensure_project_visible, visibility_scope};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAuth, RequireManager, RequireNotTrial};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Multipart parsing
// ---------------------------------------------------------------------------

/// Fields collected from an upload or replace form.
#[derive(Debug, Default)]
struct DocumentForm {
    file: Option<(String, Bytes)>,
    project_id: Option<DbId>,
    construction_id: Option<DbId>,
    name: Option<String>,
}

fn parse_id_field(field: &str, value: &str) -> AppResult<DbId> {
    value
        .trim()
        .parse::<DbId>()
        .map_err(|_| AppError::BadRequest(format!("'{field}' must be an integer id")))
}

async fn read_form(mut multipart: Multipart) -> AppResult<DocumentForm> {
    let mut form = DocumentForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                form.file = Some((filename, data));
            }
            "project_id" | "construction_id" | "name" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if text.trim().is_empty() {
                    continue;
                }
                match name.as_str() {
                    "project_id" => form.project_id = Some(parse_id_field(&name, &text)?),
                    "construction_id" => {
                        form.construction_id = Some(parse_id_field(&name, &text)?)
                    }
                    _ => form.name = Some(text.trim().to_string()),
                }
            }
            _ => {} // ignore unknown fields
        }
    }

    Ok(form)
}

/// Check the construction exists and belongs to `project_id`.
async fn ensure_construction_in_project(
    pool: &sqlx::PgPool,
    construction_id: DbId,
    project_id: DbId,
) -> AppResult<()> {
    let construction = ConstructionRepo::find_by_id(pool, construction_id)
        .await?
        .ok_or(AppError::not_found("Construction", construction_id))?;
    if construction.project_id != project_id {
        return Err(AppError::BadRequest(format!(
            "Construction {construction_id} does not belong to project {project_id}"
        )));
    }
    Ok(())
}

/// Load a document whose project the caller may see.
async fn ensure_document_visible(
    pool: &sqlx::PgPool,
    user: &AuthUser,
    id: DbId,
) -> AppResult<Document> {
    let document = DocumentRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::not_found("Document", id))?;
    if let Some(user_id) = visibility_scope(user) {
        if !ProjectRepo::is_visible_to(pool, document.project_id, user_id).await? {
            return Err(AppError::not_found("Document", id));
        }
    }
    Ok(document)
}

/// Validate and write an uploaded file. Returns `(stored_name, mime_type, size)`.
async fn store_file(
    state: &AppState,
    filename: &str,
    data: &Bytes,
) -> AppResult<(String, String, i64)> {
    let ext = validate_upload(filename, data.len() as u64, state.config.upload.max_bytes)?;
    let stored_name = generate_stored_name(&ext);
    state
        .documents
        .save(&stored_name, data)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store file: {e}")))?;
    Ok((
        stored_name,
        content_type_for_extension(&ext).to_string(),
        data.len() as i64,
    ))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/document/upload
///
/// Multipart fields: `file` (required), `project_id` (required),
/// `construction_id`, `name` (defaults to the file name).
pub async fn upload(
    State(state): State<AppState>,
    RequireNotTrial(user): RequireNotTrial,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Document>>)> {
    let form = read_form(multipart).await?;

    let project_id = form
        .project_id
        .ok_or_else(|| AppError::BadRequest("Missing required 'project_id' field".into()))?;
    let (filename, data) = form
        .file
        .ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;

    ensure_project_visible(&state.pool, &user, project_id).await?;
    if let Some(construction_id) = form.construction_id {
        ensure_construction_in_project(&state.pool, construction_id, project_id).await?;
    }

    let (stored_name, mime_type, size_bytes) = store_file(&state, &filename, &data).await?;

    let input = CreateDocument {
        project_id,
        construction_id: form.construction_id,
        name: form.name.unwrap_or_else(|| filename.clone()),
        original_name: filename,
        stored_name: stored_name.clone(),
        mime_type,
        size_bytes,
        uploaded_by: Some(user.user_id),
    };

    let document = match DocumentRepo::create(&state.pool, &input).await {
        Ok(document) => document,
        Err(e) => {
            state.documents.remove_logged(&stored_name).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        document_id = document.id,
        project_id,
        size_bytes,
        uploaded_by = user.user_id,
        "Document uploaded",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: document })))
}

/// GET /api/v1/document?project_id=&construction_id=
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    AppQuery(filter): AppQuery<DocumentFilter>,
) -> AppResult<Json<DataResponse<Vec<Document>>>> {
    ensure_project_visible(&state.pool, &user, filter.project_id).await?;
    let documents =
        DocumentRepo::list(&state.pool, filter.project_id, filter.construction_id).await?;
    Ok(Json(DataResponse { data: documents }))
}

/// GET /api/v1/document/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<Document>>> {
    let document = ensure_document_visible(&state.pool, &user, id).await?;
    Ok(Json(DataResponse { data: document }))
}

/// GET /api/v1/document/{id}/download
///
/// Streams the stored file as an attachment under its original name.
pub async fn download(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Response> {
    let document = ensure_document_visible(&state.pool, &user, id).await?;

    let (file, len) = match state.documents.open(&document.stored_name).await {
        Ok(opened) => opened,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(
                document_id = id,
                stored_name = %document.stored_name,
                "Document file missing on disk",
            );
            return Err(AppError::not_found("DocumentFile", id));
        }
        Err(e) => return Err(AppError::InternalError(e.to_string())),
    };

    let content_type = file_extension(&document.stored_name)
        .map(|ext| content_type_for_extension(&ext))
        .unwrap_or("application/octet-stream");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, len.to_string())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(&document.original_name),
        )
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|e| AppError::InternalError(e.to_string()))
}

/// POST /api/v1/document/{id}/replace
///
/// Multipart field `file`. Bumps the version by one and deletes the
/// previous file; a failed delete is only logged.
pub async fn replace(
    State(state): State<AppState>,
    RequireNotTrial(user): RequireNotTrial,
    AppPath(id): AppPath<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<Document>>> {
    ensure_document_visible(&state.pool, &user, id).await?;

    let form = read_form(multipart).await?;
    let (filename, data) = form
        .file
        .ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;

    let (stored_name, mime_type, size_bytes) = store_file(&state, &filename, &data).await?;

    let input = ReplaceDocumentFile {
        original_name: filename,
        stored_name: stored_name.clone(),
        mime_type,
        size_bytes,
        uploaded_by: Some(user.user_id),
    };

    let replaced = match DocumentRepo::replace_file(&state.pool, id, &input).await {
        Ok(replaced) => replaced,
        Err(e) => {
            state.documents.remove_logged(&stored_name).await;
            return Err(e.into());
        }
    };
    let Some((document, previous_stored_name)) = replaced else {
        state.documents.remove_logged(&stored_name).await;
        return Err(AppError::not_found("Document", id));
    };

    state.documents.remove_logged(&previous_stored_name).await;

    tracing::info!(
        document_id = id,
        version = document.version,
        replaced_by = user.user_id,
        "Document replaced",
    );
    Ok(Json(DataResponse { data: document }))
}

/// PATCH /api/v1/document/{id}
///
/// Rename, or move to another construction of the same project.
pub async fn update(
    State(state): State<AppState>,
    RequireNotTrial(user): RequireNotTrial,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateDocument>,
) -> AppResult<Json<DataResponse<Document>>> {
    validate_input(&input)?;
    let existing = ensure_document_visible(&state.pool, &user, id).await?;
    if let Some(construction_id) = input.construction_id {
        ensure_construction_in_project(&state.pool, construction_id, existing.project_id).await?;
    }

    let document = DocumentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("Document", id))?;
    Ok(Json(DataResponse { data: document }))
}

/// DELETE /api/v1/document/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    let document = DocumentRepo::delete(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Document", id))?;
    state.documents.remove_logged(&document.stored_name).await;

    tracing::info!(document_id = id, deleted_by = user.user_id, "Document deleted");
    Ok(StatusCode::NO_CONTENT)
}
