mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn admin_creates_and_deletes_accounts() -> Result<()> {
    let app = common::spawn_app_with_admin().await?;
    let token = app.admin_token().await?;

    let reply = app
        .post(
            "/v1/account",
            Some(&token),
            json!({ "name": "alice", "password": "secret", "type": "user" }),
        )
        .await?;
    assert_eq!(reply.code(), 0, "{}", reply.body);
    assert_eq!(reply.data()["name"], "alice");
    assert_eq!(reply.data()["type"], "user");
    let id = reply.data()["id"].as_i64().expect("id");

    // The new account can log in
    app.login("alice", "secret").await?;

    let reply = app.delete("/v1/account", Some(&token), json!({ "id": id })).await?;
    assert_eq!(reply.code(), 0);
    assert_eq!(app.account_store.len().await, 1);

    let reply = app.get(&format!("/v1/account?id={}", id), Some(&token)).await?;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.code(), 5);

    Ok(())
}

#[tokio::test]
async fn non_admin_cannot_create_accounts() -> Result<()> {
    let app = common::spawn_app_with_admin().await?;
    let (_, token) = app.user_session("bob").await?;
    let before = app.account_store.len().await;

    let reply = app
        .post(
            "/v1/account",
            Some(&token),
            json!({ "name": "mallory", "password": "x", "type": "admin" }),
        )
        .await?;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);
    assert_eq!(reply.code(), 4);
    assert_eq!(reply.body["message"], "No access");

    assert_eq!(app.account_store.len().await, before);
    assert!(app.state.accounts.get_account_by_name("mallory").await?.is_none());

    Ok(())
}

#[tokio::test]
async fn non_admin_cannot_delete_accounts() -> Result<()> {
    let app = common::spawn_app_with_admin().await?;
    let (bob_id, token) = app.user_session("bob").await?;
    let admin = app.state.accounts.get_account_by_name(common::ADMIN_NAME).await?.expect("admin");

    for id in [admin.id, bob_id] {
        let reply = app.delete("/v1/account", Some(&token), json!({ "id": id })).await?;
        assert_eq!(reply.code(), 4);
    }

    assert_eq!(app.account_store.len().await, 2);
    Ok(())
}

#[tokio::test]
async fn admin_check_precedes_body_validation() -> Result<()> {
    let app = common::spawn_app_with_admin().await?;
    let (_, token) = app.user_session("bob").await?;

    let reply = app.post("/v1/account", Some(&token), json!({ "bogus": true })).await?;
    assert_eq!(reply.code(), 4);

    let reply = app.delete("/v1/account", Some(&token), json!({ "id": -1 })).await?;
    assert_eq!(reply.code(), 4);

    Ok(())
}

#[tokio::test]
async fn admin_gets_validation_errors() -> Result<()> {
    let app = common::spawn_app_with_admin().await?;
    let token = app.admin_token().await?;

    let cases = [
        json!({ "name": "", "password": "x", "type": "user" }),
        json!({ "name": "a", "password": " ", "type": "user" }),
        json!({ "name": "a", "password": "x", "type": "superuser" }),
        json!({ "name": "a", "password": "x" }),
    ];
    for body in cases {
        let reply = app.post("/v1/account", Some(&token), body.clone()).await?;
        assert_eq!(reply.code(), 1, "{} -> {}", body, reply.body);
    }

    let reply = app.delete("/v1/account", Some(&token), json!({ "id": 0 })).await?;
    assert_eq!(reply.code(), 1);

    assert_eq!(app.account_store.len().await, 1);
    Ok(())
}

#[tokio::test]
async fn duplicate_name_is_reported_as_store_failure() -> Result<()> {
    let app = common::spawn_app_with_admin().await?;
    let token = app.admin_token().await?;

    let reply = app
        .post(
            "/v1/account",
            Some(&token),
            json!({ "name": common::ADMIN_NAME, "password": "x", "type": "user" }),
        )
        .await?;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.code(), 2);

    Ok(())
}

#[tokio::test]
async fn any_session_may_read_accounts() -> Result<()> {
    let app = common::spawn_app_with_admin().await?;
    let (bob_id, token) = app.user_session("bob").await?;

    let reply = app.get("/v1/accounts", Some(&token)).await?;
    assert_eq!(reply.code(), 0);
    let names: Vec<&str> = reply
        .data()
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|a| a["name"].as_str())
        .collect();
    assert_eq!(names, vec![common::ADMIN_NAME, "bob"]);

    let reply = app.get(&format!("/v1/account?id={}", bob_id), Some(&token)).await?;
    assert_eq!(reply.data()["name"], "bob");

    let reply = app.get("/v1/account?id=abc", Some(&token)).await?;
    assert_eq!(reply.code(), 1);

    Ok(())
}
