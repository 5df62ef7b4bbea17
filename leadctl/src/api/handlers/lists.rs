//! List upload and list-item read handlers.
//!
//! The upload endpoint accepts a multipart spreadsheet (CSV, XLSX or XLS),
//! validates its columns, partitions the rows across the agent directory and
//! persists the result as one batch. Reads expose the stored items per batch
//! and per agent.

use crate::AppState;
use crate::api::models::lists::{AgentItemsResponse, BatchItemsResponse, ListItemView, UploadResponse};
use crate::db::errors::DbError;
use crate::db::models::{BatchCreateDBRequest, ListItemCreateDBRequest};
use crate::errors::{Error, Result};
use crate::ingest::{FileKind, distribute, parse_file, validate_records};
use crate::types::{AgentId, BatchId};
use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use std::io::Write;

#[utoipa::path(
    post,
    path = "/lists/upload",
    tag = "lists",
    summary = "Upload and distribute a lead list",
    description = "Upload a CSV, XLSX or XLS file with FirstName, Phone and Notes columns. \
                   The rows are split evenly across 5 agents and stored as one batch.",
    request_body(
        content_type = "multipart/form-data",
        description = "Spreadsheet upload under the `file` field"
    ),
    responses(
        (status = 200, description = "List uploaded and distributed", body = UploadResponse),
        (status = 400, description = "Invalid file, columns or agent directory"),
        (status = 413, description = "File exceeds the configured size limit"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn upload_list(State(state): State<AppState>, mut multipart: Multipart) -> Result<Json<UploadResponse>> {
    let max_file_size = state.config.uploads.max_file_size;

    // Spool the upload to disk so workbook parsing can seek; the temp file
    // is removed when this handle drops, on every exit path
    let mut spooled: Option<(tempfile::NamedTempFile, FileKind, String)> = None;

    while let Some(mut field) = multipart.next_field().await.map_err(|e| Error::BadRequest {
        message: format!("Failed to parse multipart data: {}", e),
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .ok_or_else(|| Error::BadRequest {
                message: "Uploaded file has no filename".to_string(),
            })?;

        let kind = FileKind::from_filename(&filename).ok_or_else(|| Error::BadRequest {
            message: "Invalid file type. Only CSV and Excel files are allowed".to_string(),
        })?;

        tracing::info!(filename = %filename, ?kind, "Starting list upload stream processing");

        let mut file = tempfile::NamedTempFile::new().map_err(|e| Error::Other(e.into()))?;
        let mut total_size = 0u64;

        while let Some(chunk) = field.chunk().await.map_err(|e| Error::BadRequest {
            message: format!("Failed to read file chunk: {}", e),
        })? {
            total_size += chunk.len() as u64;

            // Check the limit incrementally to fail fast on oversized uploads
            if total_size > max_file_size {
                tracing::warn!(
                    filename = %filename,
                    total_size,
                    max_file_size,
                    "File size limit exceeded, aborting upload"
                );
                return Err(Error::PayloadTooLarge {
                    message: format!(
                        "File size exceeds maximum allowed size of {} bytes ({} MB)",
                        max_file_size,
                        max_file_size / (1024 * 1024)
                    ),
                });
            }

            file.write_all(&chunk).map_err(|e| Error::Other(e.into()))?;
        }

        file.flush().map_err(|e| Error::Other(e.into()))?;
        spooled = Some((file, kind, filename));
    }

    let Some((file, kind, filename)) = spooled else {
        return Err(Error::BadRequest {
            message: "No file uploaded. Please upload a file".to_string(),
        });
    };

    // Parsing is CPU- and IO-bound, keep it off the async workers
    let path = file.path().to_path_buf();
    let records = tokio::task::spawn_blocking(move || parse_file(&path, kind))
        .await
        .map_err(|e| Error::Other(e.into()))??;
    drop(file);

    let leads = validate_records(records)?;

    let agents = state.store.list_agents().await?;
    let plan = distribute(leads, &agents)?;

    let items: Vec<ListItemCreateDBRequest> = plan
        .assignments
        .iter()
        .map(|assignment| ListItemCreateDBRequest {
            first_name: assignment.record.first_name.clone(),
            phone: assignment.record.phone.clone(),
            notes: assignment.record.notes.clone(),
            agent_id: assignment.agent_id,
            batch_id: plan.batch_id,
        })
        .collect();

    let inserted = state.store.insert_many_list_items(&items).await?;

    let batch_request = BatchCreateDBRequest {
        batch_id: plan.batch_id,
        filename,
        item_count: inserted as i64,
        agents_used: plan.shares.len() as i32,
        base_items_per_agent: plan.base_items_per_agent as i64,
        agents_with_extra_item: plan.agents_with_extra_item as i32,
    };

    if let Err(err) = state.store.insert_batch(&batch_request).await {
        // Items are already committed under this batch id; a failure here
        // leaves them without an aggregate record
        tracing::error!(
            batch_id = %plan.batch_id,
            inserted,
            "Batch record creation failed after items were inserted: {}",
            err
        );
        return Err(match err {
            DbError::UniqueViolation { .. } => Error::DuplicateBatch { id: plan.batch_id },
            other => Error::Database(other),
        });
    }

    tracing::info!(
        batch_id = %plan.batch_id,
        total_items = plan.total_items(),
        agents_used = plan.shares.len(),
        "List distributed"
    );

    Ok(Json(UploadResponse::from_plan(&plan)))
}

#[utoipa::path(
    get,
    path = "/lists/batch/{batch_id}",
    tag = "lists",
    summary = "Get the items of a batch",
    params(("batch_id" = Uuid, Path, description = "Batch identifier")),
    responses(
        (status = 200, description = "Items of the batch", body = BatchItemsResponse),
        (status = 404, description = "Batch not found")
    )
)]
pub async fn get_batch_items(State(state): State<AppState>, Path(batch_id): Path<BatchId>) -> Result<Json<BatchItemsResponse>> {
    let items = state.store.find_list_items_by_batch(batch_id).await?;
    if items.is_empty() {
        return Err(Error::NotFound {
            resource: "Batch".to_string(),
            id: batch_id.to_string(),
        });
    }

    let list_items: Vec<ListItemView> = items.iter().map(ListItemView::from).collect();
    Ok(Json(BatchItemsResponse {
        success: true,
        count: list_items.len(),
        batch_id,
        list_items,
    }))
}

#[utoipa::path(
    get,
    path = "/lists/agent/{agent_id}",
    tag = "lists",
    summary = "Get the items assigned to an agent",
    params(("agent_id" = Uuid, Path, description = "Agent identifier")),
    responses(
        (status = 200, description = "Items assigned to the agent", body = AgentItemsResponse),
        (status = 404, description = "Agent not found")
    )
)]
pub async fn get_agent_items(State(state): State<AppState>, Path(agent_id): Path<AgentId>) -> Result<Json<AgentItemsResponse>> {
    if state.store.find_agent_by_id(agent_id).await?.is_none() {
        return Err(Error::NotFound {
            resource: "Agent".to_string(),
            id: agent_id.to_string(),
        });
    }

    let items = state.store.find_list_items_by_agent(agent_id).await?;
    let lists: Vec<ListItemView> = items.iter().map(ListItemView::from).collect();
    Ok(Json(AgentItemsResponse {
        success: true,
        count: lists.len(),
        lists,
    }))
}
