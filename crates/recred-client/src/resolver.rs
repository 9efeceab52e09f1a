//! Identifier resolution through the report-execution RPC.
//!
//! Runs a predefined lookup report with the requested usernames as its
//! single parameter, then decodes the base64 CSV payload embedded in the
//! response envelope into [`UserRecord`]s.

use base64::{engine::general_purpose::STANDARD, Engine};
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use crate::connection::Connection;
use crate::error::{ClientError, ClientResult};
use crate::models::UserRecord;

/// Environment-relative path of the report execution service.
const REPORT_SERVICE_PATH: &str = "/xmlpserver/services/ExternalReportWSSService";

/// Catalog path of the username-to-GUID lookup report.
const REPORT_PATH: &str = "/Custom/Human Capital Management/Reports/UserGuidLookup.xdo";

/// Report parameter carrying the comma-joined username list.
const USERNAME_PARAM: &str = "p_usernames";

/// Normalized header of the column holding the internal identifier.
const GUID_COLUMN: &str = "USER_GUID";

/// Normalized header of the column holding the username.
const USERNAME_COLUMN: &str = "USERNAME";

/// Split a comma-separated operator input into the ordered username list.
///
/// Entries are trimmed and empties dropped; order is preserved and
/// duplicates pass through unchanged (the remote report collapses them if
/// it chooses to).
#[must_use]
pub fn normalize_usernames(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Resolves usernames to internal identifiers.
#[derive(Debug, Clone)]
pub struct IdentifierResolver {
    connection: Connection,
}

impl IdentifierResolver {
    #[must_use]
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    /// Run the lookup report for `usernames`.
    ///
    /// Unresolved usernames are simply absent from the result, so the
    /// output never exceeds the input. A report without the identifier
    /// column matched nothing and yields an empty set. Transport failures,
    /// non-200 statuses and undecodable payloads abort resolution with no
    /// partial results.
    pub async fn resolve(&self, usernames: &[String]) -> ClientResult<Vec<UserRecord>> {
        let url = format!("{}{}", self.connection.base_url(), REPORT_SERVICE_PATH);
        debug!(count = usernames.len(), "running identifier lookup report");

        let request = self
            .connection
            .http()
            .post(&url)
            .header("Content-Type", "application/soap+xml; charset=utf-8")
            .body(report_request_envelope(usernames));
        let response = self.connection.credentials().apply(request).send().await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(ClientError::ReportService {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let payload = decode_report_payload(&body)?;
        parse_report_csv(&payload)
    }
}

/// Build the report-execution envelope naming the fixed report path and
/// the single username parameter, requesting CSV output.
fn report_request_envelope(usernames: &[String]) -> String {
    let joined = usernames.join(",");
    let escaped = quick_xml::escape::escape(joined.as_str());
    format!(
        r#"<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope" xmlns:pub="http://xmlns.oracle.com/oxp/service/PublicReportService">
  <soap:Body>
    <pub:runReport>
      <pub:reportRequest>
        <pub:attributeFormat>csv</pub:attributeFormat>
        <pub:reportAbsolutePath>{REPORT_PATH}</pub:reportAbsolutePath>
        <pub:sizeOfDataChunkDownload>-1</pub:sizeOfDataChunkDownload>
        <pub:parameterNameValues>
          <pub:item>
            <pub:name>{USERNAME_PARAM}</pub:name>
            <pub:values>
              <pub:item>{escaped}</pub:item>
            </pub:values>
          </pub:item>
        </pub:parameterNameValues>
      </pub:reportRequest>
    </pub:runReport>
  </soap:Body>
</soap:Envelope>"#
    )
}

/// Extract and decode the base64 `reportBytes` payload from the response
/// envelope.
fn decode_report_payload(xml: &str) -> ClientResult<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut in_report_bytes = false;
    let mut encoded: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"reportBytes" {
                    in_report_bytes = true;
                }
            }
            Ok(Event::Text(e)) if in_report_bytes => {
                encoded = Some(e.unescape().unwrap_or_default().to_string());
            }
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"reportBytes" {
                    in_report_bytes = false;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ClientError::ReportPayload(format!("XML parse error: {e}")));
            }
            _ => {}
        }
    }

    let encoded = encoded.ok_or_else(|| {
        ClientError::ReportPayload("response has no reportBytes element".to_string())
    })?;
    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|e| ClientError::ReportPayload(format!("base64 decode failed: {e}")))?;
    String::from_utf8(decoded)
        .map_err(|e| ClientError::ReportPayload(format!("payload is not UTF-8: {e}")))
}

/// Parse the decoded report CSV into records.
///
/// Headers are trimmed and upper-cased before lookup. A payload without
/// the identifier column (or without the username column needed to
/// correlate rows) yields zero records rather than an error.
fn parse_report_csv(text: &str) -> ClientResult<Vec<UserRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| ClientError::ReportPayload(format!("CSV header error: {e}")))?;
    let normalized: Vec<String> = headers.iter().map(|h| h.trim().to_uppercase()).collect();

    let Some(guid_idx) = normalized.iter().position(|h| h == GUID_COLUMN) else {
        return Ok(Vec::new());
    };
    let Some(username_idx) = normalized.iter().position(|h| h == USERNAME_COLUMN) else {
        return Ok(Vec::new());
    };

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| ClientError::ReportPayload(format!("CSV row error: {e}")))?;
        let username = row.get(username_idx).unwrap_or("").trim();
        let guid = row.get(guid_idx).unwrap_or("").trim();
        if username.is_empty() || guid.is_empty() {
            continue;
        }
        records.push(UserRecord {
            username: username.to_string(),
            guid: guid.to_string(),
        });
    }

    Ok(records)
}
