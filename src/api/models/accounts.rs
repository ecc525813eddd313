//! API request/response models for accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Default page size for account listings
pub const DEFAULT_LIST_LIMIT: usize = 100;
/// Hard cap on account listing page size
pub const MAX_LIST_LIMIT: usize = 1000;

/// Identity and lifecycle timestamps carried by every account record.
///
/// The name is the primary key and never changes across updates. Timestamps
/// are always stamped by the service; client-supplied values are overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Metadata {
    pub name: String,
    #[serde(default = "Metadata::unix_epoch")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Metadata::unix_epoch")]
    pub updated_at: DateTime<Utc>,
}

impl Metadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            created_at: Self::unix_epoch(),
            updated_at: Self::unix_epoch(),
        }
    }

    fn unix_epoch() -> DateTime<Utc> {
        DateTime::UNIX_EPOCH
    }

    /// Stamp creation time. Called exactly once, when the record is created.
    pub fn stamp_created(&mut self) {
        let now = Utc::now();
        self.created_at = now;
        self.updated_at = now;
    }

    /// Carry immutable fields over from the previous record and advance the
    /// update timestamp. The name is left alone - identity consistency is
    /// checked before any merge happens.
    pub fn merge(&mut self, previous: &Metadata) {
        self.created_at = previous.created_at;
        self.updated_at = Utc::now();
    }
}

/// Credential block of an account.
///
/// Past the validation boundary of a single create/update call, `password`
/// always holds an Argon2 PHC string, never plaintext.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NativeProvider {
    #[serde(default)]
    pub password: String,
}

/// Mutable account attributes. Empty strings mean "unspecified" for the
/// sparse-overlay merge applied on update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AccountSpec {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub native_provider: NativeProvider,
}

/// Full internal account record, including the hashed credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Account {
    pub metadata: Metadata,
    pub spec: AccountSpec,
}

impl Account {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            metadata: Metadata::new(name),
            spec: AccountSpec::default(),
        }
    }
}

/// Spec half of the public projection. Structurally has no credential block,
/// so a password can never leak through serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PublicAccountSpec {
    pub first_name: String,
    pub last_name: String,
}

/// Redacted projection of [`Account`] - the only representation ever
/// returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PublicAccount {
    pub metadata: Metadata,
    pub spec: PublicAccountSpec,
}

impl From<&Account> for PublicAccount {
    fn from(account: &Account) -> Self {
        Self {
            metadata: account.metadata.clone(),
            spec: PublicAccountSpec {
                first_name: account.spec.first_name.clone(),
                last_name: account.spec.last_name.clone(),
            },
        }
    }
}

/// Filter and pagination descriptor for account listings.
///
/// Passed through to the storage backend unchanged; the service never
/// interprets it.
#[derive(Debug, Clone, Default)]
pub struct AccountQuery {
    /// Only return accounts whose name starts with this prefix
    pub prefix: Option<String>,
    /// Number of matching accounts to skip
    pub skip: usize,
    /// Maximum number of accounts to return; `None` means unbounded
    pub limit: Option<usize>,
}

/// Query parameters for listing accounts
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ListAccountsQuery {
    /// Number of accounts to skip
    pub skip: Option<usize>,
    /// Maximum number of accounts to return (capped at 1000)
    pub limit: Option<usize>,
    /// Only return accounts whose name starts with this prefix
    pub prefix: Option<String>,
    /// Return lightweight metadata entries instead of full projections
    #[serde(default)]
    pub metadata_only: bool,
    /// Return raw serialized entities instead of typed projections
    #[serde(default)]
    pub raw: bool,
}

impl From<&ListAccountsQuery> for AccountQuery {
    fn from(query: &ListAccountsQuery) -> Self {
        Self {
            prefix: query.prefix.clone(),
            skip: query.skip.unwrap_or(0),
            limit: Some(query.limit.unwrap_or(DEFAULT_LIST_LIMIT).min(MAX_LIST_LIMIT)),
        }
    }
}
