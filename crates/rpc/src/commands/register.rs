use anyhow::anyhow;
use api::common::users;
use serde::Deserialize;
use web::AppState;

use super::RpcResponse;

#[derive(Deserialize, Debug)]
pub(crate) struct RpcRegisterUserData {
    name: String,
    password: String,
    display_name: Option<String>,
}

pub(crate) struct RpcRegisterUser;

impl RpcRegisterUser {
    pub(crate) async fn call(request: RpcRegisterUserData, state: &AppState) -> RpcResponse {
        let result = users::register(
            request.name,
            request.password,
            request.display_name,
            state.store.as_ref(),
        )
        .await;

        RpcResponse::from_result("RegisterUser", result)
    }
}

pub(crate) struct RpcDeleteUser;

impl RpcDeleteUser {
    pub(crate) async fn call(name: String, state: &AppState) -> RpcResponse {
        let result = match users::delete(&name, state.store.as_ref()).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(anyhow!("no user named {name}")),
            Err(err) => Err(err),
        };

        RpcResponse::from_result("DeleteUser", result)
    }
}
