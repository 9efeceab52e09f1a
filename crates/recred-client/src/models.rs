//! Typed wire records for resolution and bulk patching.

use serde::{Deserialize, Deserializer, Serialize};

/// A username resolved to the remote system's internal identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub guid: String,
}

/// SCIM schema URN attached to every patch operation.
pub const USER_SCHEMA: &str = "urn:scim:schemas:core:2.0:User";

/// The single batched request body sent to the bulk endpoint.
#[derive(Debug, Serialize)]
pub struct BulkRequest {
    #[serde(rename = "Operations")]
    pub operations: Vec<PatchOperation>,
}

/// One per-user credential update inside the batch.
#[derive(Debug, Clone, Serialize)]
pub struct PatchOperation {
    pub method: String,
    pub path: String,
    /// Correlation key echoed back in the response.
    #[serde(rename = "bulkId")]
    pub bulk_id: String,
    pub data: PatchData,
}

#[derive(Clone, Serialize)]
pub struct PatchData {
    pub schemas: Vec<String>,
    pub password: String,
}

impl PatchOperation {
    /// Build the update operation for one resolved user.
    #[must_use]
    pub fn update(record: &UserRecord, secret: String) -> Self {
        Self {
            method: "PATCH".to_string(),
            path: format!("/Users/{}", record.guid),
            bulk_id: record.username.clone(),
            data: PatchData {
                schemas: vec![USER_SCHEMA.to_string()],
                password: secret,
            },
        }
    }
}

impl std::fmt::Debug for PatchData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatchData")
            .field("schemas", &self.schemas)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Response envelope from the bulk endpoint.
#[derive(Debug, Deserialize)]
pub struct BulkResponse {
    #[serde(rename = "Operations", default)]
    pub operations: Vec<BulkOperationStatus>,
}

/// Per-operation result as returned by the remote.
#[derive(Debug, Deserialize)]
pub struct BulkOperationStatus {
    #[serde(rename = "bulkId", default)]
    pub bulk_id: String,
    pub status: OperationStatus,
}

/// Status envelope; the remote encodes the code as a string or a number.
#[derive(Debug, Deserialize)]
pub struct OperationStatus {
    #[serde(deserialize_with = "code_from_string_or_number")]
    pub code: u16,
}

fn code_from_string_or_number<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u16),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(code) => Ok(code),
        Raw::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid status code {text:?}"))),
    }
}

/// Result of one update within an accepted batch.
///
/// Created after the batch response is received and consumed only by the
/// outcome reporter; never persisted beyond the invocation.
#[derive(Debug, Clone, Serialize)]
pub struct OperationOutcome {
    pub username: String,
    pub status_code: u16,
    /// The assigned secret, present only when the update succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

impl OperationOutcome {
    /// Whether the remote accepted this individual update.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}
