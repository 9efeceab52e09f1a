//! Single-batch credential updates against the bulk patch endpoint.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::connection::Connection;
use crate::error::{ClientError, ClientResult, PolicyError};
use crate::models::{BulkRequest, BulkResponse, OperationOutcome, PatchOperation, UserRecord};
use crate::password::PasswordAssignment;

/// Environment-relative path of the bulk patch endpoint.
const BULK_PATH: &str = "/hcmRestApi/scim/Bulk";

/// Emit one update operation per record, preserving record order.
///
/// Secrets are resolved lazily from the assignment, so a per-user run
/// draws a fresh value for every record.
pub fn build_operations(
    records: &[UserRecord],
    assignment: &PasswordAssignment,
) -> Result<Vec<PatchOperation>, PolicyError> {
    records
        .iter()
        .map(|record| Ok(PatchOperation::update(record, assignment.next_secret()?)))
        .collect()
}

/// Accepted-batch result: the HTTP status and per-operation outcomes.
#[derive(Debug)]
pub struct BatchReport {
    pub status_code: u16,
    pub outcomes: Vec<OperationOutcome>,
    /// Raw response body, kept for the optional diagnostic view.
    pub raw_body: String,
}

/// Submits one batched set of credential updates.
///
/// The call mutates live credentials in the remote system: it is not
/// idempotent, and resubmitting a per-user run assigns new secret values.
#[derive(Debug, Clone)]
pub struct BulkPatchOrchestrator {
    connection: Connection,
}

impl BulkPatchOrchestrator {
    #[must_use]
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    /// Build and submit the batch for `records` under `assignment`.
    ///
    /// HTTP 200/201 means the batch was accepted; any other status is a
    /// batch-level failure classified by code and no outcome table is
    /// produced. Inside an accepted batch, an individual operation may
    /// still fail; that is reported per outcome and never escalates.
    pub async fn submit(
        &self,
        records: &[UserRecord],
        assignment: &PasswordAssignment,
    ) -> ClientResult<BatchReport> {
        let operations = build_operations(records, assignment)?;
        let secrets: HashMap<String, String> = operations
            .iter()
            .map(|op| (op.bulk_id.clone(), op.data.password.clone()))
            .collect();

        let url = format!("{}{}", self.connection.base_url(), BULK_PATH);
        debug!(operations = operations.len(), "submitting credential update batch");

        let request = self
            .connection
            .http()
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&BulkRequest { operations });
        let response = self.connection.credentials().apply(request).send().await?;

        let status = response.status().as_u16();
        if status != 200 && status != 201 {
            warn!(status, "bulk endpoint rejected the batch");
            return Err(ClientError::Batch {
                status,
                message: batch_failure_message(status).to_string(),
            });
        }

        let raw_body = response.text().await?;
        let parsed: BulkResponse = serde_json::from_str(&raw_body).map_err(|e| {
            ClientError::Batch {
                status,
                message: format!("unparseable batch response: {e}"),
            }
        })?;

        let outcomes = parsed
            .operations
            .into_iter()
            .map(|op| {
                let succeeded = (200..300).contains(&op.status.code);
                OperationOutcome {
                    secret: if succeeded {
                        secrets.get(&op.bulk_id).cloned()
                    } else {
                        None
                    },
                    username: op.bulk_id,
                    status_code: op.status.code,
                }
            })
            .collect();

        Ok(BatchReport {
            status_code: status,
            outcomes,
            raw_body,
        })
    }
}

/// Operator-facing classification of a batch-level rejection.
#[must_use]
pub fn batch_failure_message(status: u16) -> &'static str {
    match status {
        401 => "authentication failed: check the admin username and password",
        403 => "permission denied: the admin account lacks the required role",
        404 => "bulk endpoint not found: check the environment URL",
        500..=599 => "the identity service reported an internal fault",
        _ => "the bulk request was rejected",
    }
}
