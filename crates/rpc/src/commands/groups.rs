use anyhow::anyhow;
use api::common::groups;
use serde::Deserialize;
use web::AppState;

use super::RpcResponse;

#[derive(Deserialize, Debug)]
pub(crate) struct RpcCreateGroupData {
    title: String,
    slug: String,
    #[serde(default)]
    description: String,
}

pub(crate) struct RpcCreateGroup;

impl RpcCreateGroup {
    pub(crate) async fn call(request: RpcCreateGroupData, state: &AppState) -> RpcResponse {
        let result = groups::create(
            request.title,
            request.slug,
            request.description,
            state.store.as_ref(),
        )
        .await;

        RpcResponse::from_result("CreateGroup", result)
    }
}

pub(crate) struct RpcDeleteGroup;

impl RpcDeleteGroup {
    pub(crate) async fn call(slug: String, state: &AppState) -> RpcResponse {
        let result = match groups::delete(&slug, state.store.as_ref()).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(anyhow!("no group with slug {slug}")),
            Err(err) => Err(err),
        };

        RpcResponse::from_result("DeleteGroup", result)
    }
}
