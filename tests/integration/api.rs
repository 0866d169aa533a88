//! Integration tests for the REST API.
//!
//! Each test starts an in-process server on an OS-assigned port, seeded with
//! the demo board unless noted, and drives it over HTTP.
//!
//! Demo board layout (column id: task ids by position):
//!   1 To Do:          1, 2
//!   2 In Development: 4, 5
//!   3 In Testing:     3
//!   4 Done:           6, 7, 8, 9
//!
//! Verification command: `cargo test --test api`

use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{Value, json};
use zenban_core::Board;
use zenban_core::seed::demo_board;
use zenban_server::server::start_server_with_state;
use zenban_server::state::AppState;

// =============================================================================
// Helpers
// =============================================================================

struct TestApi {
    base: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl Drop for TestApi {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl TestApi {
    async fn start(board: Board) -> Self {
        let (addr, handle) = start_server_with_state("127.0.0.1:0", Arc::new(AppState::new(board)))
            .await
            .expect("failed to start test server");
        Self {
            base: format!("http://{addr}"),
            client: reqwest::Client::new(),
            handle,
        }
    }

    async fn demo() -> Self {
        Self::start(demo_board()).await
    }

    async fn empty() -> Self {
        Self::start(Board::new()).await
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let response = self.client.get(self.url(path)).send().await.unwrap();
        decode(response).await
    }

    async fn post(&self, path: &str, body: &Value) -> (StatusCode, Value) {
        let response = self.client.post(self.url(path)).json(body).send().await.unwrap();
        decode(response).await
    }

    async fn put(&self, path: &str, body: &Value) -> (StatusCode, Value) {
        let response = self.client.put(self.url(path)).json(body).send().await.unwrap();
        decode(response).await
    }

    async fn put_raw(&self, path: &str, body: &'static str) -> (StatusCode, Value) {
        let response = self
            .client
            .put(self.url(path))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .unwrap();
        decode(response).await
    }

    async fn delete(&self, path: &str) -> (StatusCode, Value) {
        let response = self.client.delete(self.url(path)).send().await.unwrap();
        decode(response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    /// `(id, position)` of every column, in listing order.
    async fn column_layout(&self) -> Vec<(u64, u64)> {
        let (_, columns) = self.get("/api/columns").await;
        columns
            .as_array()
            .unwrap()
            .iter()
            .map(|c| (c["id"].as_u64().unwrap(), c["position"].as_u64().unwrap()))
            .collect()
    }

    /// Task ids of one column, in listing order, after checking that their
    /// positions run 0, 1, 2, ...
    async fn task_ids_in(&self, column: u64) -> Vec<u64> {
        let (status, tasks) = self.get(&format!("/api/tasks/column/{column}")).await;
        assert_eq!(status, StatusCode::OK);
        let tasks = tasks.as_array().unwrap();
        for (index, task) in tasks.iter().enumerate() {
            assert_eq!(task["columnId"], column);
            assert_eq!(task["position"], index as u64, "gap in column {column}: {tasks:?}");
        }
        tasks.iter().map(|t| t["id"].as_u64().unwrap()).collect()
    }
}

async fn decode(response: reqwest::Response) -> (StatusCode, Value) {
    let status = response.status();
    let text = response.text().await.unwrap();
    let body = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap()
    };
    (status, body)
}

// =============================================================================
// Status
// =============================================================================

#[tokio::test]
async fn status_endpoint_reports_running() {
    let api = TestApi::empty().await;
    let (status, body) = api.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Kanban API is running");
}

// =============================================================================
// Columns
// =============================================================================

#[tokio::test]
async fn list_columns_sorted_by_position() {
    let api = TestApi::demo().await;
    let (status, columns) = api.get("/api/columns").await;
    assert_eq!(status, StatusCode::OK);

    let titles: Vec<&str> = columns
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["To Do", "In Development", "In Testing", "Done"]);
    assert_eq!(api.column_layout().await, [(1, 0), (2, 1), (3, 2), (4, 3)]);
}

#[tokio::test]
async fn create_column_appends_whatever_position_is_sent() {
    let api = TestApi::demo().await;
    for (title, position) in [("Backlog", json!(10)), ("Code Review", json!(1)), ("QA", json!(-1))] {
        let (status, column) = api
            .post(
                "/api/columns",
                &json!({ "title": title, "color": "purple", "position": position, "showSlider": true }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(column["title"], title);
    }

    let (_, columns) = api.get("/api/columns").await;
    let columns = columns.as_array().unwrap();
    assert_eq!(columns.len(), 7);
    for (index, column) in columns.iter().enumerate() {
        assert_eq!(column["position"], index as u64);
    }
    let tail: Vec<&str> = columns[4..].iter().map(|c| c["title"].as_str().unwrap()).collect();
    assert_eq!(tail, ["Backlog", "Code Review", "QA"]);
    // Ids continue after the seeded columns.
    assert_eq!(columns[4]["id"], 5);
}

#[tokio::test]
async fn create_column_defaults() {
    let api = TestApi::demo().await;
    let (status, column) = api
        .post("/api/columns", &json!({ "title": "  Minimal  ", "position": 0 }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(column["title"], "Minimal");
    assert_eq!(column["color"], "blue");
    assert_eq!(column["showSlider"], false);
    assert_eq!(column["position"], 4);
}

#[tokio::test]
async fn create_column_accepts_integer_slider_flag() {
    let api = TestApi::empty().await;
    let (status, column) = api
        .post("/api/columns", &json!({ "title": "Flags", "showSlider": 1 }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(column["showSlider"], true);
}

#[tokio::test]
async fn create_column_rejects_invalid_input() {
    let api = TestApi::demo().await;
    let long_title = "x".repeat(51);
    let bad_bodies = [
        json!({ "color": "blue", "showSlider": true }),
        json!({ "title": "Test", "color": "invalid-color" }),
        json!({ "title": "   " }),
        json!({ "title": long_title }),
        json!({ "title": "Test", "showSlider": 2 }),
        json!({ "title": 42 }),
    ];
    for body in &bad_bodies {
        let (status, error) = api.post("/api/columns", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(error["message"], "Invalid column data");
        assert!(!error["errors"].as_array().unwrap().is_empty());
    }
    assert_eq!(api.column_layout().await.len(), 4);
}

#[tokio::test]
async fn update_column_changes_content_only() {
    let api = TestApi::demo().await;
    let (status, column) = api
        .put(
            "/api/columns/1",
            &json!({ "title": "Updated Title", "color": "red", "position": 3, "id": 9 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(column["id"], 1);
    assert_eq!(column["title"], "Updated Title");
    assert_eq!(column["color"], "red");
    assert_eq!(column["position"], 0);
    assert_eq!(column["showSlider"], true);
    assert_eq!(api.column_layout().await, [(1, 0), (2, 1), (3, 2), (4, 3)]);
}

#[tokio::test]
async fn update_column_errors() {
    let api = TestApi::demo().await;
    let (status, _) = api.put("/api/columns/999", &json!({ "title": "Test" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = api.put("/api/columns/1", &json!({ "title": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, error) = api.put("/api/columns/abc", &json!({ "title": "Test" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["message"], "Invalid id");
}

#[tokio::test]
async fn delete_column_moves_tasks_to_lowest_surviving_column() {
    let api = TestApi::demo().await;
    assert_eq!(api.task_ids_in(2).await, [4, 5]);

    let (status, body) = api.delete("/api/columns/2").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    assert_eq!(api.column_layout().await, [(1, 0), (3, 1), (4, 2)]);
    assert_eq!(api.task_ids_in(1).await, [1, 2, 4, 5]);
    assert!(api.task_ids_in(2).await.is_empty());

    let (_, tasks) = api.get("/api/tasks").await;
    let tasks = tasks.as_array().unwrap();
    assert_eq!(tasks.len(), 9);
    assert!(tasks.iter().all(|t| t["columnId"] != 2));
}

#[tokio::test]
async fn delete_unknown_column_is_not_found() {
    let api = TestApi::demo().await;
    let (status, error) = api.delete("/api/columns/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["message"], "column not found: 999");
    assert_eq!(api.column_layout().await.len(), 4);
}

#[tokio::test]
async fn delete_last_column_with_tasks_conflicts() {
    let api = TestApi::empty().await;
    let (_, column) = api.post("/api/columns", &json!({ "title": "Only" })).await;
    let id = column["id"].as_u64().unwrap();
    let (status, _) = api
        .post("/api/tasks", &json!({ "title": "Stuck", "columnId": id }))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = api.delete(&format!("/api/columns/{id}")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(api.task_ids_in(id).await.len(), 1);

    let (_, task) = api.get(&format!("/api/tasks/column/{id}")).await;
    let task_id = task[0]["id"].as_u64().unwrap();
    assert_eq!(api.delete(&format!("/api/tasks/{task_id}")).await.0, StatusCode::NO_CONTENT);
    assert_eq!(api.delete(&format!("/api/columns/{id}")).await.0, StatusCode::NO_CONTENT);
    assert!(api.column_layout().await.is_empty());
}

#[tokio::test]
async fn move_column_shifts_neighbours() {
    let api = TestApi::demo().await;
    let (status, column) = api.put("/api/columns/1/move", &json!({ "position": 2 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(column["id"], 1);
    assert_eq!(column["position"], 2);
    assert_eq!(api.column_layout().await, [(2, 0), (3, 1), (1, 2), (4, 3)]);

    let (status, _) = api.put("/api/columns/1/move", &json!({ "position": 0 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(api.column_layout().await, [(1, 0), (2, 1), (3, 2), (4, 3)]);
}

#[tokio::test]
async fn move_column_rejects_bad_positions() {
    let api = TestApi::demo().await;
    for body in [json!({ "position": "invalid" }), json!({}), json!({ "position": 1.5 })] {
        let (status, error) = api.put("/api/columns/1/move", &body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(error["message"], "Invalid position");
    }
    for position in [-1, 4, 100] {
        let (status, _) = api
            .put("/api/columns/1/move", &json!({ "position": position }))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "position {position}");
    }
    let (status, _) = api.put_raw("/api/columns/1/move", "{ not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = api.put("/api/columns/999/move", &json!({ "position": 0 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(api.column_layout().await, [(1, 0), (2, 1), (3, 2), (4, 3)]);
}

// =============================================================================
// Tasks
// =============================================================================

#[tokio::test]
async fn list_tasks_in_board_order() {
    let api = TestApi::demo().await;
    let (status, tasks) = api.get("/api/tasks").await;
    assert_eq!(status, StatusCode::OK);

    let tasks = tasks.as_array().unwrap();
    let ids: Vec<u64> = tasks.iter().map(|t| t["id"].as_u64().unwrap()).collect();
    assert_eq!(ids, [1, 2, 4, 5, 3, 6, 7, 8, 9]);
    for task in tasks {
        assert!(task["title"].is_string());
        assert!(task["createdAt"].is_string());
        assert!(task["columnId"].is_u64());
    }
}

#[tokio::test]
async fn list_tasks_by_column() {
    let api = TestApi::demo().await;
    assert_eq!(api.task_ids_in(1).await, [1, 2]);
    assert_eq!(api.task_ids_in(4).await, [6, 7, 8, 9]);

    let (_, column) = api
        .post("/api/columns", &json!({ "title": "Empty Column", "color": "gray" }))
        .await;
    assert!(api.task_ids_in(column["id"].as_u64().unwrap()).await.is_empty());

    let (status, tasks) = api.get("/api/tasks/column/999").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tasks, json!([]));

    let (status, _) = api.get("/api/tasks/column/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_task_appends_to_column() {
    let api = TestApi::demo().await;
    let (status, task) = api
        .post(
            "/api/tasks",
            &json!({
                "title": "New Test Task",
                "description": "Test description",
                "priority": "high",
                "columnId": 1,
                "position": 0,
                "progress": 0,
                "assignees": "Evan P,  Sam ",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["id"], 10);
    assert_eq!(task["title"], "New Test Task");
    assert_eq!(task["columnId"], 1);
    assert_eq!(task["position"], 2);
    assert_eq!(task["priority"], "high");
    assert_eq!(task["assignees"], "Evan P, Sam");
    assert!(task["createdAt"].is_string());
    assert_eq!(api.task_ids_in(1).await, [1, 2, 10]);
}

#[tokio::test]
async fn create_task_defaults() {
    let api = TestApi::demo().await;
    let (status, task) = api
        .post("/api/tasks", &json!({ "title": "Minimal Task", "columnId": 3, "position": 0 }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["priority"], "medium");
    assert_eq!(task["progress"], 0);
    assert_eq!(task["description"], Value::Null);
    assert_eq!(task["assignees"], Value::Null);
    assert_eq!(task["position"], 1);
}

#[tokio::test]
async fn create_task_rejects_invalid_input() {
    let api = TestApi::demo().await;
    let long_title = "x".repeat(101);
    let bad_bodies = [
        json!({ "description": "Missing title and columnId", "priority": "medium" }),
        json!({ "title": "No column" }),
        json!({ "title": "Bad priority", "columnId": 1, "priority": "urgent" }),
        json!({ "title": "Too far", "columnId": 1, "progress": 6 }),
        json!({ "title": "Backwards", "columnId": 1, "progress": -1 }),
        json!({ "title": long_title, "columnId": 1 }),
        json!({ "title": "Ghost column", "columnId": 999 }),
    ];
    for body in &bad_bodies {
        let (status, _) = api.post("/api/tasks", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    }
    let (_, tasks) = api.get("/api/tasks").await;
    assert_eq!(tasks.as_array().unwrap().len(), 9);
}

#[tokio::test]
async fn update_task_changes_content_only() {
    let api = TestApi::demo().await;
    let (status, task) = api
        .put(
            "/api/tasks/1",
            &json!({
                "title": "Updated Task Title",
                "priority": "high",
                "progress": 3,
                "position": 1,
                "columnId": 4,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["title"], "Updated Task Title");
    assert_eq!(task["priority"], "high");
    assert_eq!(task["progress"], 3);
    assert_eq!(task["columnId"], 1);
    assert_eq!(task["position"], 0);
    assert_eq!(api.task_ids_in(1).await, [1, 2]);
}

#[tokio::test]
async fn update_task_clears_optional_fields() {
    let api = TestApi::demo().await;
    let (status, task) = api
        .put("/api/tasks/3", &json!({ "description": "", "assignees": " , " }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["description"], Value::Null);
    assert_eq!(task["assignees"], Value::Null);
    assert_eq!(task["title"], "Setup testing environment");
}

#[tokio::test]
async fn update_task_errors() {
    let api = TestApi::demo().await;
    let (status, _) = api.put("/api/tasks/999", &json!({ "title": "Test" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, error) = api.put("/api/tasks/1", &json!({ "progress": 9 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["message"], "Invalid task data");
}

#[tokio::test]
async fn delete_task_compacts_column() {
    let api = TestApi::demo().await;
    let (status, _) = api.delete("/api/tasks/6").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(api.task_ids_in(4).await, [7, 8, 9]);

    let (status, _) = api.delete("/api/tasks/6").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn move_task_across_columns() {
    let api = TestApi::demo().await;
    let (status, task) = api
        .put("/api/tasks/1/move", &json!({ "columnId": 2, "position": 0 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["columnId"], 2);
    assert_eq!(task["position"], 0);

    assert_eq!(api.task_ids_in(1).await, [2]);
    assert_eq!(api.task_ids_in(2).await, [1, 4, 5]);

    // One past the end of the destination appends.
    let (status, task) = api
        .put("/api/tasks/2/move", &json!({ "columnId": 3, "position": 1 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["position"], 1);
    assert!(api.task_ids_in(1).await.is_empty());
    assert_eq!(api.task_ids_in(3).await, [3, 2]);
}

#[tokio::test]
async fn move_task_within_column() {
    let api = TestApi::demo().await;
    let (status, task) = api
        .put("/api/tasks/6/move", &json!({ "columnId": 4, "position": 3 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["position"], 3);
    assert_eq!(api.task_ids_in(4).await, [7, 8, 9, 6]);

    let (status, _) = api
        .put("/api/tasks/9/move", &json!({ "columnId": 4, "position": 0 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(api.task_ids_in(4).await, [9, 7, 8, 6]);
}

#[tokio::test]
async fn move_task_rejects_bad_input() {
    let api = TestApi::demo().await;
    for body in [
        json!({ "columnId": "invalid", "position": 0 }),
        json!({ "columnId": 2, "position": "invalid" }),
        json!({ "position": 0 }),
    ] {
        let (status, error) = api.put("/api/tasks/1/move", &body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(error["message"], "Invalid columnId or position");
    }

    // Within a column the last slot is len - 1; across, it is len.
    let (status, _) = api
        .put("/api/tasks/1/move", &json!({ "columnId": 1, "position": 2 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = api
        .put("/api/tasks/1/move", &json!({ "columnId": 3, "position": 2 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = api
        .put("/api/tasks/1/move", &json!({ "columnId": 3, "position": -1 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = api
        .put("/api/tasks/999/move", &json!({ "columnId": 2, "position": 0 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = api
        .put("/api/tasks/1/move", &json!({ "columnId": 999, "position": 0 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(api.task_ids_in(1).await, [1, 2]);
    assert_eq!(api.task_ids_in(3).await, [3]);
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_keep_positions_contiguous() {
    let api = Arc::new(TestApi::demo().await);
    let mut handles = Vec::new();
    for i in 0..20 {
        let api = Arc::clone(&api);
        handles.push(tokio::spawn(async move {
            api.post("/api/tasks", &json!({ "title": format!("task {i}"), "columnId": 3 }))
                .await
                .0
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::CREATED);
    }
    assert_eq!(api.task_ids_in(3).await.len(), 21);
}
