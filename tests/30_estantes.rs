mod common;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn create_unit(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    name: &str,
) -> Result<(StatusCode, Value)> {
    let res = client
        .post(format!("{}/estantes", base_url))
        .bearer_auth(token)
        .json(&json!({ "name": name }))
        .send()
        .await?;
    let status = res.status();
    let body = res.json::<Value>().await?;
    Ok((status, body))
}

async fn list_units(client: &reqwest::Client, base_url: &str, token: &str) -> Result<Value> {
    let res = client
        .get(format!("{}/estantes", base_url))
        .bearer_auth(token)
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "list failed: {}", res.status());
    Ok(res.json::<Value>().await?)
}

fn unit_names(list_body: &Value) -> Vec<String> {
    list_body["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|i| i["name"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn create_and_list_shelving_units() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_available(server).await? {
        return Ok(());
    }
    let client = reqwest::Client::new();
    let user = common::register_and_login(&client, &server.base_url, "estantes").await?;

    let (status, body) = create_unit(&client, &server.base_url, &user.token, "Romances").await?;
    assert_eq!(status, StatusCode::CREATED, "body: {}", body);
    assert_eq!(body["status"], "sucesso", "body: {}", body);
    assert_eq!(body["mensagem"], "Estante criada com sucesso.", "body: {}", body);
    assert_eq!(body["name"], "Romances", "body: {}", body);
    assert!(body["id"].as_i64().is_some(), "body: {}", body);

    let (status, _) = create_unit(&client, &server.base_url, &user.token, "Técnicos").await?;
    assert_eq!(status, StatusCode::CREATED);

    let list = list_units(&client, &server.base_url, &user.token).await?;
    assert_eq!(list["status"], "sucesso", "body: {}", list);
    assert_eq!(list["total"], 2, "body: {}", list);
    assert_eq!(unit_names(&list), vec!["Romances", "Técnicos"]);

    Ok(())
}

#[tokio::test]
async fn create_rejects_blank_name_without_writing() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_available(server).await? {
        return Ok(());
    }
    let client = reqwest::Client::new();
    let user = common::register_and_login(&client, &server.base_url, "branco").await?;

    let (status, body) = create_unit(&client, &server.base_url, &user.token, "").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
    assert_eq!(body["mensagem"], "Nome da estante é obrigatório.", "body: {}", body);

    let (status, _) = create_unit(&client, &server.base_url, &user.token, "   ").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Missing body entirely
    let res = client
        .post(format!("{}/estantes", server.base_url))
        .bearer_auth(&user.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // None of the rejected requests may have created anything
    let list = list_units(&client, &server.base_url, &user.token).await?;
    assert_eq!(list["total"], 0, "body: {}", list);

    Ok(())
}

#[tokio::test]
async fn duplicate_unit_name_conflicts_per_owner() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_available(server).await? {
        return Ok(());
    }
    let client = reqwest::Client::new();
    let alice = common::register_and_login(&client, &server.base_url, "alice").await?;
    let bruna = common::register_and_login(&client, &server.base_url, "bruna").await?;

    let (status, _) = create_unit(&client, &server.base_url, &alice.token, "Ficção").await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = create_unit(&client, &server.base_url, &alice.token, "Ficção").await?;
    assert_eq!(status, StatusCode::CONFLICT, "body: {}", body);
    assert_eq!(body["status"], "erro", "body: {}", body);
    assert!(
        body["mensagem"]
            .as_str()
            .map(|m| m.contains("já existe"))
            .unwrap_or(false),
        "body: {}",
        body
    );

    // The uniqueness rule is per user, not global
    let (status, _) = create_unit(&client, &server.base_url, &bruna.token, "Ficção").await?;
    assert_eq!(status, StatusCode::CREATED);

    Ok(())
}

#[tokio::test]
async fn update_renames_only_for_the_owner() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_available(server).await? {
        return Ok(());
    }
    let client = reqwest::Client::new();
    let owner = common::register_and_login(&client, &server.base_url, "dona").await?;
    let intruder = common::register_and_login(&client, &server.base_url, "intrusa").await?;

    let (_, body) = create_unit(&client, &server.base_url, &owner.token, "Antiga").await?;
    let id = body["id"].as_i64().context("missing id")?;

    let res = client
        .put(format!("{}/estantes/{}", server.base_url, id))
        .bearer_auth(&owner.token)
        .json(&json!({ "name": "Renovada" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(
        body["mensagem"],
        format!("Estante com ID {} atualizada com sucesso.", id),
        "body: {}",
        body
    );

    // Someone else updating the same id sees it as nonexistent
    let res = client
        .put(format!("{}/estantes/{}", server.base_url, id))
        .bearer_auth(&intruder.token)
        .json(&json!({ "name": "Invadida" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let list = list_units(&client, &server.base_url, &owner.token).await?;
    assert_eq!(unit_names(&list), vec!["Renovada"]);

    // Blank replacement name is refused
    let res = client
        .put(format!("{}/estantes/{}", server.base_url, id))
        .bearer_auth(&owner.token)
        .json(&json!({ "name": " " }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(
        body["mensagem"],
        "Nome da estante é obrigatório para atualização.",
        "body: {}",
        body
    );

    Ok(())
}

#[tokio::test]
async fn update_rejects_rename_onto_existing_name() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_available(server).await? {
        return Ok(());
    }
    let client = reqwest::Client::new();
    let user = common::register_and_login(&client, &server.base_url, "renome").await?;

    let (_, _) = create_unit(&client, &server.base_url, &user.token, "Quadrinhos").await?;
    let (_, body) = create_unit(&client, &server.base_url, &user.token, "Mangás").await?;
    let id = body["id"].as_i64().context("missing id")?;

    let res = client
        .put(format!("{}/estantes/{}", server.base_url, id))
        .bearer_auth(&user.token)
        .json(&json!({ "name": "Quadrinhos" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    Ok(())
}

#[tokio::test]
async fn update_missing_unit_returns_not_found() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_available(server).await? {
        return Ok(());
    }
    let client = reqwest::Client::new();
    let user = common::register_and_login(&client, &server.base_url, "nada").await?;

    let res = client
        .put(format!("{}/estantes/999999999", server.base_url))
        .bearer_auth(&user.token)
        .json(&json!({ "name": "Qualquer" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = res.json::<Value>().await?;
    assert!(
        body["mensagem"]
            .as_str()
            .map(|m| m.contains("não encontrada"))
            .unwrap_or(false),
        "body: {}",
        body
    );

    Ok(())
}

#[tokio::test]
async fn delete_removes_only_for_the_owner() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_available(server).await? {
        return Ok(());
    }
    let client = reqwest::Client::new();
    let owner = common::register_and_login(&client, &server.base_url, "limpa").await?;
    let intruder = common::register_and_login(&client, &server.base_url, "curiosa").await?;

    let (_, body) = create_unit(&client, &server.base_url, &owner.token, "Descartável").await?;
    let id = body["id"].as_i64().context("missing id")?;
    let (_, _) = create_unit(&client, &server.base_url, &owner.token, "Permanente").await?;

    // Foreign delete does nothing
    let res = client
        .delete(format!("{}/estantes/{}", server.base_url, id))
        .bearer_auth(&intruder.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let list = list_units(&client, &server.base_url, &owner.token).await?;
    assert_eq!(list["total"], 2, "body: {}", list);

    let res = client
        .delete(format!("{}/estantes/{}", server.base_url, id))
        .bearer_auth(&owner.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(
        body["mensagem"],
        format!("Estante com ID {} excluída com sucesso.", id),
        "body: {}",
        body
    );

    let list = list_units(&client, &server.base_url, &owner.token).await?;
    assert_eq!(unit_names(&list), vec!["Permanente"]);

    // Double delete behaves like a miss
    let res = client
        .delete(format!("{}/estantes/{}", server.base_url, id))
        .bearer_auth(&owner.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}
