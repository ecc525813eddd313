//! Axum route handlers for account management.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::{
    AppState,
    api::models::accounts::{Account, AccountQuery, ListAccountsQuery, PublicAccount},
    errors::Error,
    types::Parameters,
};

// GET /api/v1/accounts - List accounts
#[utoipa::path(
    get,
    path = "/api/v1/accounts",
    tag = "accounts",
    summary = "List accounts",
    description = "List accounts, as redacted projections or metadata-only entries",
    params(ListAccountsQuery),
    responses(
        (status = 200, description = "List of accounts", body = [PublicAccount]),
        (status = 501, description = "Raw listing requested - not implemented"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn list_accounts(
    State(state): State<AppState>,
    Query(query): Query<ListAccountsQuery>,
) -> Result<Response, Error> {
    let parameters = Parameters::default();
    let filter = AccountQuery::from(&query);

    // The wire query picks the listing shape; the service decides what each
    // shape returns.
    let response = if query.raw && query.metadata_only {
        Json(state.accounts.raw_metadata_list(&filter, &parameters).await?).into_response()
    } else if query.metadata_only {
        Json(state.accounts.metadata_list(&filter, &parameters).await?).into_response()
    } else if query.raw {
        Json(state.accounts.raw_list(&filter, &parameters).await?).into_response()
    } else {
        Json(state.accounts.list(&filter, &parameters).await?).into_response()
    };
    Ok(response)
}

// POST /api/v1/accounts - Create account
#[utoipa::path(
    post,
    path = "/api/v1/accounts",
    tag = "accounts",
    summary = "Create account",
    description = "Create a new account with a non-empty plaintext password",
    request_body = Account,
    responses(
        (status = 201, description = "Account created successfully", body = PublicAccount),
        (status = 400, description = "Bad request - empty password"),
        (status = 409, description = "Conflict - account name already taken"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn create_account(
    State(state): State<AppState>,
    Json(entity): Json<Account>,
) -> Result<(StatusCode, Json<PublicAccount>), Error> {
    let created = state.accounts.create(&entity).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

// GET /api/v1/accounts/{name} - Get account
#[utoipa::path(
    get,
    path = "/api/v1/accounts/{name}",
    tag = "accounts",
    summary = "Get account",
    description = "Get a specific account by name",
    params(
        ("name" = String, Path, description = "Account name"),
    ),
    responses(
        (status = 200, description = "Account information", body = PublicAccount),
        (status = 404, description = "Account not found"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn get_account(State(state): State<AppState>, Path(name): Path<String>) -> Result<Json<PublicAccount>, Error> {
    let account = state.accounts.get(&Parameters::new(name)).await?;
    Ok(Json(account))
}

// PUT /api/v1/accounts/{name} - Update account
#[utoipa::path(
    put,
    path = "/api/v1/accounts/{name}",
    tag = "accounts",
    summary = "Update account",
    description = "Update an existing account; unspecified fields keep their previous values",
    params(
        ("name" = String, Path, description = "Account name"),
    ),
    request_body = Account,
    responses(
        (status = 200, description = "Account updated successfully", body = PublicAccount),
        (status = 400, description = "Bad request - body name and path name don't match"),
        (status = 404, description = "Account not found"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn update_account(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(entity): Json<Account>,
) -> Result<Json<PublicAccount>, Error> {
    let updated = state.accounts.update(&entity, &Parameters::new(name)).await?;
    Ok(Json(updated))
}

// DELETE /api/v1/accounts/{name} - Delete account
#[utoipa::path(
    delete,
    path = "/api/v1/accounts/{name}",
    tag = "accounts",
    summary = "Delete account",
    description = "Delete an account by name",
    params(
        ("name" = String, Path, description = "Account name"),
    ),
    responses(
        (status = 204, description = "Account deleted successfully"),
        (status = 404, description = "Account not found"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn delete_account(State(state): State<AppState>, Path(name): Path<String>) -> Result<StatusCode, Error> {
    state.accounts.delete(&Parameters::new(name)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use crate::api::models::accounts::PublicAccount;
    use crate::test_utils::create_test_app;

    #[test_log::test(tokio::test)]
    async fn test_create_account_returns_created_and_redacts_password() {
        let app = create_test_app();

        let response = app
            .post("/api/v1/accounts")
            .json(&json!({
                "metadata": {"name": "alice"},
                "spec": {
                    "first_name": "Alice",
                    "last_name": "Doe",
                    "native_provider": {"password": "s3cret"}
                }
            }))
            .await;

        response.assert_status(axum::http::StatusCode::CREATED);
        let created: PublicAccount = response.json();
        assert_eq!(created.metadata.name, "alice");
        assert_eq!(created.spec.first_name, "Alice");

        let body: Value = response.json();
        assert!(!body.to_string().contains("password"));
        assert!(!body.to_string().contains("s3cret"));
    }

    #[test_log::test(tokio::test)]
    async fn test_create_account_with_empty_password_is_bad_request() {
        let app = create_test_app();

        let response = app
            .post("/api/v1/accounts")
            .json(&json!({
                "metadata": {"name": "alice"},
                "spec": {"first_name": "Alice"}
            }))
            .await;

        response.assert_status_bad_request();
    }

    #[test_log::test(tokio::test)]
    async fn test_get_account_roundtrip() {
        let app = create_test_app();
        seed_account(&app, "alice").await;

        let response = app.get("/api/v1/accounts/alice").await;
        response.assert_status_ok();
        let fetched: PublicAccount = response.json();
        assert_eq!(fetched.metadata.name, "alice");
    }

    #[test_log::test(tokio::test)]
    async fn test_get_missing_account_is_not_found() {
        let app = create_test_app();

        let response = app.get("/api/v1/accounts/ghost").await;
        response.assert_status_not_found();
    }

    #[test_log::test(tokio::test)]
    async fn test_update_account_name_mismatch_is_bad_request() {
        let app = create_test_app();
        seed_account(&app, "alice").await;

        let response = app
            .put("/api/v1/accounts/alice")
            .json(&json!({
                "metadata": {"name": "bob"},
                "spec": {"first_name": "Bob"}
            }))
            .await;

        response.assert_status_bad_request();
    }

    #[test_log::test(tokio::test)]
    async fn test_update_account_sparse_overlay() {
        let app = create_test_app();
        seed_account(&app, "alice").await;

        let response = app
            .put("/api/v1/accounts/alice")
            .json(&json!({
                "metadata": {"name": "alice"},
                "spec": {"last_name": "Smith"}
            }))
            .await;

        response.assert_status_ok();
        let updated: PublicAccount = response.json();
        assert_eq!(updated.spec.first_name, "Alice");
        assert_eq!(updated.spec.last_name, "Smith");
    }

    #[test_log::test(tokio::test)]
    async fn test_delete_account_then_get_is_not_found() {
        let app = create_test_app();
        seed_account(&app, "alice").await;

        let response = app.delete("/api/v1/accounts/alice").await;
        response.assert_status(axum::http::StatusCode::NO_CONTENT);

        let response = app.get("/api/v1/accounts/alice").await;
        response.assert_status_not_found();
    }

    #[test_log::test(tokio::test)]
    async fn test_list_accounts_is_ordered_and_redacted() {
        let app = create_test_app();
        for name in ["carol", "alice", "bob"] {
            seed_account(&app, name).await;
        }

        let response = app.get("/api/v1/accounts").await;
        response.assert_status_ok();
        let listed: Vec<PublicAccount> = response.json();
        let names: Vec<_> = listed.iter().map(|a| a.metadata.name.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob", "carol"]);

        let body: Value = response.json();
        assert!(!body.to_string().contains("password"));
    }

    #[test_log::test(tokio::test)]
    async fn test_list_accounts_with_pagination_and_prefix() {
        let app = create_test_app();
        for name in ["team-a", "team-b", "team-c", "other"] {
            seed_account(&app, name).await;
        }

        let response = app.get("/api/v1/accounts?prefix=team-&skip=1&limit=1").await;
        response.assert_status_ok();
        let listed: Vec<PublicAccount> = response.json();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].metadata.name, "team-b");
    }

    #[test_log::test(tokio::test)]
    async fn test_metadata_only_listing() {
        let app = create_test_app();
        seed_account(&app, "alice").await;

        let response = app.get("/api/v1/accounts?metadata_only=true").await;
        response.assert_status_ok();
        let entries: Vec<Value> = response.json();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["name"], "alice");
        assert!(entries[0].get("spec").is_none());
    }

    #[test_log::test(tokio::test)]
    async fn test_raw_listing_is_not_implemented() {
        let app = create_test_app();
        seed_account(&app, "alice").await;

        let response = app.get("/api/v1/accounts?raw=true").await;
        response.assert_status(axum::http::StatusCode::NOT_IMPLEMENTED);

        // The raw metadata variant stays available
        let response = app.get("/api/v1/accounts?raw=true&metadata_only=true").await;
        response.assert_status_ok();
    }

    async fn seed_account(app: &TestServer, name: &str) {
        let response = app
            .post("/api/v1/accounts")
            .json(&json!({
                "metadata": {"name": name},
                "spec": {
                    "first_name": "Alice",
                    "last_name": "Doe",
                    "native_provider": {"password": "s3cret"}
                }
            }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
    }
}
