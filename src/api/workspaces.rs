//! Workspace Endpoints

use super::segment;
use crate::error::ApiResult;
use crate::http::{ApiClient, HttpRequest};
use crate::models::{MemberRole, MemberRoleUpdate, Workspace, WorkspaceCreate, WorkspaceMember, WorkspaceUpdate};

pub async fn list_workspaces(api: &ApiClient) -> ApiResult<Vec<Workspace>> {
    api.fetch(HttpRequest::get("/workspaces")).await
}

pub async fn get_workspace(api: &ApiClient, id: &str) -> ApiResult<Workspace> {
    api.fetch(HttpRequest::get(format!("/workspaces/{}", segment(id)))).await
}

pub async fn create_workspace(api: &ApiClient, workspace: &WorkspaceCreate) -> ApiResult<Workspace> {
    api.fetch(HttpRequest::post("/workspaces").json(workspace)?).await
}

pub async fn update_workspace(api: &ApiClient, id: &str, update: &WorkspaceUpdate) -> ApiResult<Workspace> {
    api.fetch(HttpRequest::put(format!("/workspaces/{}", segment(id))).json(update)?).await
}

pub async fn delete_workspace(api: &ApiClient, id: &str) -> ApiResult<()> {
    api.execute(HttpRequest::delete(format!("/workspaces/{}", segment(id)))).await
}

pub async fn list_workspace_members(api: &ApiClient, id: &str) -> ApiResult<Vec<WorkspaceMember>> {
    api.fetch(HttpRequest::get(format!("/workspaces/{}/members", segment(id)))).await
}

pub async fn add_workspace_member(api: &ApiClient, id: &str, user_id: &str, role: MemberRole) -> ApiResult<WorkspaceMember> {
    let request = HttpRequest::post(format!("/workspaces/{}/members/{}", segment(id), segment(user_id)))
        .json(&MemberRoleUpdate { role })?;
    api.fetch(request).await
}

pub async fn update_workspace_member(api: &ApiClient, id: &str, user_id: &str, role: MemberRole) -> ApiResult<WorkspaceMember> {
    let request = HttpRequest::put(format!("/workspaces/{}/members/{}", segment(id), segment(user_id)))
        .json(&MemberRoleUpdate { role })?;
    api.fetch(request).await
}

pub async fn remove_workspace_member(api: &ApiClient, id: &str, user_id: &str) -> ApiResult<()> {
    api.execute(HttpRequest::delete(format!("/workspaces/{}/members/{}", segment(id), segment(user_id)))).await
}
