//! Batch lifecycle handlers: listing, status updates and deletion.

use crate::AppState;
use crate::api::models::batches::{
    BatchView, DeleteBatchResponse, ListBatchesQuery, ListBatchesResponse, UpdateBatchStatusRequest, UpdateBatchStatusResponse,
};
use crate::db::errors::DbError;
use crate::db::models::{BatchStatus, ListItemStatus};
use crate::errors::{Error, Result};
use crate::types::{BatchId, abbrev_uuid};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;

#[utoipa::path(
    get,
    path = "/lists/batches",
    tag = "batches",
    summary = "List all batches",
    params(ListBatchesQuery),
    responses(
        (status = 200, description = "Batches, newest first", body = ListBatchesResponse)
    )
)]
pub async fn list_batches(State(state): State<AppState>, Query(query): Query<ListBatchesQuery>) -> Result<Json<ListBatchesResponse>> {
    // An unrecognized filter value matches nothing the enum names, so it is
    // ignored rather than rejected
    let filter: Option<BatchStatus> = query.status.as_deref().and_then(|s| s.parse().ok());

    let batches = state.store.list_batches(filter).await?;
    let batches: Vec<BatchView> = batches.iter().map(BatchView::from).collect();

    Ok(Json(ListBatchesResponse {
        success: true,
        count: batches.len(),
        batches,
    }))
}

#[utoipa::path(
    put,
    path = "/lists/batch/{batch_id}/status",
    tag = "batches",
    summary = "Update a batch's status",
    description = "Move a batch between active, completed and archived. Entering completed or \
                   archived stamps the completion time; returning to active clears it.",
    params(("batch_id" = Uuid, Path, description = "Batch identifier")),
    request_body = UpdateBatchStatusRequest,
    responses(
        (status = 200, description = "Batch updated", body = UpdateBatchStatusResponse),
        (status = 400, description = "Invalid status value"),
        (status = 404, description = "Batch not found")
    )
)]
pub async fn update_batch_status(
    State(state): State<AppState>,
    Path(batch_id): Path<BatchId>,
    Json(request): Json<UpdateBatchStatusRequest>,
) -> Result<Json<UpdateBatchStatusResponse>> {
    let status: BatchStatus = request.status.parse().map_err(|_| Error::InvalidStatus {
        value: request.status.clone(),
    })?;

    let completed_at = status.is_terminal().then(Utc::now);

    let batch = state.store.update_batch(batch_id, status, completed_at).await.map_err(|err| match err {
        DbError::NotFound => Error::NotFound {
            resource: "Batch".to_string(),
            id: batch_id.to_string(),
        },
        other => Error::Database(other),
    })?;

    tracing::info!(batch_id = %abbrev_uuid(&batch_id), %status, "Batch status updated");

    Ok(Json(UpdateBatchStatusResponse {
        success: true,
        message: format!("Batch status updated to {status}"),
        batch: BatchView::from(&batch),
    }))
}

#[utoipa::path(
    delete,
    path = "/lists/batch/{batch_id}",
    tag = "batches",
    summary = "Delete a batch and its items",
    description = "Refused while the batch still has items in a non-completed status.",
    params(("batch_id" = Uuid, Path, description = "Batch identifier")),
    responses(
        (status = 200, description = "Batch deleted", body = DeleteBatchResponse),
        (status = 400, description = "Batch still has active items"),
        (status = 404, description = "Batch not found")
    )
)]
pub async fn delete_batch(State(state): State<AppState>, Path(batch_id): Path<BatchId>) -> Result<Json<DeleteBatchResponse>> {
    if state.store.find_batch_by_id(batch_id).await?.is_none() {
        return Err(Error::NotFound {
            resource: "Batch".to_string(),
            id: batch_id.to_string(),
        });
    }

    let remaining = state
        .store
        .count_list_items_by_batch_excluding_status(batch_id, ListItemStatus::Completed)
        .await?;
    if remaining > 0 {
        return Err(Error::BatchNotEmpty { remaining });
    }

    let deleted_items = state.store.delete_list_items_by_batch(batch_id).await?;
    state.store.delete_batch_record(batch_id).await?;

    tracing::info!(batch_id = %abbrev_uuid(&batch_id), deleted_items, "Batch deleted");

    Ok(Json(DeleteBatchResponse {
        success: true,
        message: format!("Batch and {deleted_items} associated list items deleted successfully"),
    }))
}

#[cfg(test)]
mod tests {
    use crate::db::models::ListItemStatus;
    use crate::test_utils::*;
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use serde_json::{Value, json};
    use uuid::Uuid;

    async fn upload_batch(server: &axum_test::TestServer, rows: usize) -> String {
        let mut csv = String::from("FirstName,Phone,Notes\n");
        for i in 0..rows {
            csv.push_str(&format!("Lead{i},555{i:04},\n"));
        }
        let part = Part::bytes(csv.into_bytes()).file_name("leads.csv");
        let response = server
            .post("/api/lists/upload")
            .multipart(MultipartForm::new().add_part("file", part))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        body["batchId"].as_str().unwrap().to_string()
    }

    #[test_log::test(tokio::test)]
    async fn batches_list_newest_first_with_filter() {
        let (server, store) = create_test_app().await;
        seed_agents(&store, 5).await;

        let first = upload_batch(&server, 5).await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = upload_batch(&server, 6).await;

        let body: Value = server.get("/api/lists/batches").await.json();
        assert_eq!(body["count"], 2);
        assert_eq!(body["batches"][0]["batchId"], second.as_str());
        assert_eq!(body["batches"][1]["batchId"], first.as_str());
        assert_eq!(body["batches"][0]["status"], "active");
        assert_eq!(body["batches"][0]["distribution"]["agentsUsed"], 5);

        // Complete one and filter on each status
        server
            .put(&format!("/api/lists/batch/{first}/status"))
            .json(&json!({"status": "completed"}))
            .await
            .assert_status_ok();

        let completed: Value = server.get("/api/lists/batches?status=completed").await.json();
        assert_eq!(completed["count"], 1);
        assert_eq!(completed["batches"][0]["batchId"], first.as_str());

        let active: Value = server.get("/api/lists/batches?status=active").await.json();
        assert_eq!(active["count"], 1);
        assert_eq!(active["batches"][0]["batchId"], second.as_str());
    }

    #[test_log::test(tokio::test)]
    async fn unknown_status_filter_is_ignored() {
        let (server, store) = create_test_app().await;
        seed_agents(&store, 5).await;
        upload_batch(&server, 5).await;

        let body: Value = server.get("/api/lists/batches?status=bogus").await.json();
        assert_eq!(body["count"], 1);
    }

    #[test_log::test(tokio::test)]
    async fn status_update_stamps_and_clears_completed_at() {
        let (server, store) = create_test_app().await;
        seed_agents(&store, 5).await;
        let batch_id = upload_batch(&server, 5).await;

        let response = server
            .put(&format!("/api/lists/batch/{batch_id}/status"))
            .json(&json!({"status": "completed"}))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["batch"]["status"], "completed");
        assert!(body["batch"]["completedAt"].is_string());

        // Archived also counts as terminal
        let body: Value = server
            .put(&format!("/api/lists/batch/{batch_id}/status"))
            .json(&json!({"status": "archived"}))
            .await
            .json();
        assert_eq!(body["batch"]["status"], "archived");
        assert!(body["batch"]["completedAt"].is_string());

        // Re-opening clears the stamp; the field is omitted when null
        let body: Value = server
            .put(&format!("/api/lists/batch/{batch_id}/status"))
            .json(&json!({"status": "active"}))
            .await
            .json();
        assert_eq!(body["batch"]["status"], "active");
        assert!(body["batch"].get("completedAt").is_none());
    }

    #[test_log::test(tokio::test)]
    async fn invalid_status_value_is_rejected() {
        let (server, store) = create_test_app().await;
        seed_agents(&store, 5).await;
        let batch_id = upload_batch(&server, 5).await;

        let response = server
            .put(&format!("/api/lists/batch/{batch_id}/status"))
            .json(&json!({"status": "paused"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert!(body["message"].as_str().unwrap().contains("active, completed, archived"));
    }

    #[test_log::test(tokio::test)]
    async fn status_update_for_unknown_batch_is_not_found() {
        let (server, _store) = create_test_app().await;

        let response = server
            .put(&format!("/api/lists/batch/{}/status", Uuid::new_v4()))
            .json(&json!({"status": "completed"}))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[test_log::test(tokio::test)]
    async fn delete_is_blocked_while_items_are_pending() {
        let (server, store) = create_test_app().await;
        seed_agents(&store, 5).await;
        let batch_id = upload_batch(&server, 7).await;

        let response = server.delete(&format!("/api/lists/batch/{batch_id}")).await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert!(body["message"].as_str().unwrap().contains("7 active items"));
    }

    #[test_log::test(tokio::test)]
    async fn delete_succeeds_once_all_items_are_completed() {
        let (server, store) = create_test_app().await;
        seed_agents(&store, 5).await;
        let batch_id = upload_batch(&server, 7).await;

        let items = store.find_list_items_by_batch(batch_id.parse().unwrap()).await.unwrap();
        for item in &items {
            store.set_list_item_status(item.id, ListItemStatus::Completed).await.unwrap();
        }

        let response = server.delete(&format!("/api/lists/batch/{batch_id}")).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert!(body["message"].as_str().unwrap().contains("7 associated list items"));

        // Both the record and its items are gone
        server
            .get(&format!("/api/lists/batch/{batch_id}"))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        let remaining: Value = server.get("/api/lists/batches").await.json();
        assert_eq!(remaining["count"], 0);
    }

    #[test_log::test(tokio::test)]
    async fn delete_unknown_batch_is_not_found() {
        let (server, _store) = create_test_app().await;

        let response = server.delete(&format!("/api/lists/batch/{}", Uuid::new_v4())).await;
        response.assert_status(StatusCode::NOT_FOUND);
    }
}
