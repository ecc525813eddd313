//! OpenAPI documentation for the account management API.

use utoipa::OpenApi;

use crate::api::models::accounts::{Account, AccountSpec, Metadata, NativeProvider, PublicAccount, PublicAccountSpec};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "accountd",
        description = "Account management API with hashed credential storage"
    ),
    paths(
        crate::api::handlers::accounts::list_accounts,
        crate::api::handlers::accounts::create_account,
        crate::api::handlers::accounts::get_account,
        crate::api::handlers::accounts::update_account,
        crate::api::handlers::accounts::delete_account,
    ),
    components(schemas(
        Account,
        AccountSpec,
        NativeProvider,
        Metadata,
        PublicAccount,
        PublicAccountSpec,
    )),
    tags(
        (name = "accounts", description = "Account lifecycle management")
    )
)]
pub struct ApiDoc;
