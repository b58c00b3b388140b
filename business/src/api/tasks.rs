use super::{CreateTaskRequest, Task, TaskStats, UpdateTaskRequest, send, send_json};
use crate::ApiResult;
use crate::http::ApiClient;

pub async fn list_my_tasks(client: &ApiClient) -> ApiResult<Vec<Task>> {
    send_json(client.get("/tasks/my-tasks")).await
}

pub async fn my_task_stats(client: &ApiClient) -> ApiResult<TaskStats> {
    send_json(client.get("/tasks/my-stats")).await
}

pub async fn get_task(client: &ApiClient, id: &str) -> ApiResult<Task> {
    send_json(client.get(&format!("/tasks/{id}"))).await
}

pub async fn list_project_tasks(client: &ApiClient, project_id: &str) -> ApiResult<Vec<Task>> {
    send_json(client.get(&format!("/tasks/project/{project_id}"))).await
}

pub async fn create_task(client: &ApiClient, request: &CreateTaskRequest) -> ApiResult<Task> {
    send_json(client.post("/tasks").json(request)?).await
}

pub async fn update_task(
    client: &ApiClient,
    id: &str,
    request: &UpdateTaskRequest,
) -> ApiResult<Task> {
    send_json(client.put(&format!("/tasks/{id}")).json(request)?).await
}

/// Any 2xx counts as deleted; the body is ignored.
pub async fn delete_task(client: &ApiClient, id: &str) -> ApiResult<()> {
    send(client.delete(&format!("/tasks/{id}"))).await.map(|_| ())
}
