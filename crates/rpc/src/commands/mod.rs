pub(crate) mod groups;
pub(crate) mod register;

use serde::{Deserialize, Serialize};
use web::AppState;

use crate::commands::{
    groups::{RpcCreateGroup, RpcCreateGroupData, RpcDeleteGroup},
    register::{RpcDeleteUser, RpcRegisterUser, RpcRegisterUserData},
};

#[derive(Deserialize, Debug)]
#[serde(tag = "type", content = "content")]
pub(crate) enum RpcCommandData {
    RegisterUser(RpcRegisterUserData),
    /// Name of the user
    DeleteUser(String),
    CreateGroup(RpcCreateGroupData),
    /// Slug of the group
    DeleteGroup(String),
}

#[derive(Serialize, Debug, PartialEq, Eq)]
pub(crate) struct RpcResponse {
    pub(crate) ok: bool,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
#[serde(tag = "type", content = "content")]
pub(crate) enum RpcCommandResponse {
    RegisterUser(RpcResponse),
    DeleteUser(RpcResponse),
    CreateGroup(RpcResponse),
    DeleteGroup(RpcResponse),
    /// Reply to a message that is not a known command
    Invalid(RpcResponse),
}

impl RpcResponse {
    pub(crate) fn from_result<T>(command: &str, result: anyhow::Result<T>) -> Self {
        match result {
            Ok(_) => Self { ok: true },
            Err(err) => {
                log::error!("Error from RPC command {}, {:#}", command, err);
                Self { ok: false }
            }
        }
    }
}

pub(crate) async fn dispatch(request: RpcCommandData, state: &AppState) -> RpcCommandResponse {
    match request {
        RpcCommandData::RegisterUser(request) => {
            RpcCommandResponse::RegisterUser(RpcRegisterUser::call(request, state).await)
        }
        RpcCommandData::DeleteUser(name) => {
            RpcCommandResponse::DeleteUser(RpcDeleteUser::call(name, state).await)
        }
        RpcCommandData::CreateGroup(request) => {
            RpcCommandResponse::CreateGroup(RpcCreateGroup::call(request, state).await)
        }
        RpcCommandData::DeleteGroup(slug) => {
            RpcCommandResponse::DeleteGroup(RpcDeleteGroup::call(slug, state).await)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use db::{models::Post, MemoryStore, Store};
    use web::{AppState, Config};

    use super::*;

    fn state() -> (Arc<MemoryStore>, AppState) {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), Config::local());
        (store, state)
    }

    async fn run(json: &str, state: &AppState) -> RpcCommandResponse {
        dispatch(serde_json::from_str(json).unwrap(), state).await
    }

    #[tokio::test]
    async fn registers_users() {
        let (store, state) = state();

        let response = run(
            r#"{"type": "RegisterUser", "content": {"name": "leo", "password": "secret"}}"#,
            &state,
        )
        .await;
        assert_eq!(
            response,
            RpcCommandResponse::RegisterUser(RpcResponse { ok: true })
        );
        assert!(store.user_by_name("leo").await.unwrap().is_some());

        let response = run(
            r#"{"type": "RegisterUser", "content": {"name": "leo", "password": "again"}}"#,
            &state,
        )
        .await;
        assert_eq!(
            response,
            RpcCommandResponse::RegisterUser(RpcResponse { ok: false })
        );

        let response = run(
            r#"{"type": "RegisterUser", "content": {"name": "Not Valid", "password": "x"}}"#,
            &state,
        )
        .await;
        assert_eq!(
            response,
            RpcCommandResponse::RegisterUser(RpcResponse { ok: false })
        );
    }

    #[tokio::test]
    async fn creates_and_deletes_groups() {
        let (store, state) = state();

        let response = run(
            r#"{"type": "CreateGroup", "content": {"title": "Cats", "slug": "cats", "description": "Meow"}}"#,
            &state,
        )
        .await;
        assert_eq!(
            response,
            RpcCommandResponse::CreateGroup(RpcResponse { ok: true })
        );
        let group = store.group_by_slug("cats").await.unwrap().unwrap();

        run(
            r#"{"type": "RegisterUser", "content": {"name": "leo", "password": "secret"}}"#,
            &state,
        )
        .await;
        let author = store.user_by_name("leo").await.unwrap().unwrap();
        let post = store
            .create_post(Post::new(
                author.id.clone(),
                Some(group.id.clone()),
                "Meow".to_string(),
                None,
            ))
            .await
            .unwrap();

        let response = run(r#"{"type": "DeleteGroup", "content": "cats"}"#, &state).await;
        assert_eq!(
            response,
            RpcCommandResponse::DeleteGroup(RpcResponse { ok: true })
        );
        assert!(store.group_by_slug("cats").await.unwrap().is_none());
        let post = store.post_by_id(&post.id).await.unwrap().unwrap();
        assert_eq!(post.group_id, None);

        let response = run(r#"{"type": "DeleteGroup", "content": "cats"}"#, &state).await;
        assert_eq!(
            response,
            RpcCommandResponse::DeleteGroup(RpcResponse { ok: false })
        );
    }

    #[tokio::test]
    async fn deletes_users_with_their_posts() {
        let (store, state) = state();
        run(
            r#"{"type": "RegisterUser", "content": {"name": "leo", "password": "secret"}}"#,
            &state,
        )
        .await;
        let user = store.user_by_name("leo").await.unwrap().unwrap();
        let post = store
            .create_post(Post::new(user.id.clone(), None, "Bye".to_string(), None))
            .await
            .unwrap();

        let response = run(r#"{"type": "DeleteUser", "content": "leo"}"#, &state).await;
        assert_eq!(
            response,
            RpcCommandResponse::DeleteUser(RpcResponse { ok: true })
        );
        assert!(store.user_by_name("leo").await.unwrap().is_none());
        assert!(store.post_by_id(&post.id).await.unwrap().is_none());

        let response = run(r#"{"type": "DeleteUser", "content": "leo"}"#, &state).await;
        assert_eq!(
            response,
            RpcCommandResponse::DeleteUser(RpcResponse { ok: false })
        );
    }

    #[test]
    fn responses_are_tagged() {
        let response = RpcCommandResponse::CreateGroup(RpcResponse { ok: true });
        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"type":"CreateGroup","content":{"ok":true}}"#
        );
    }
}
