use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

use crate::errors::{ErrorCode, RpcError, SyncError};
use crate::managers::HttpToolManager;
use crate::model::HttpToolConfig;
use crate::rpc::protocol::{JsonRpcNotification, JsonRpcRequest, JsonRpcResponse};
use crate::services::logger::Logger;
use crate::sync::{PassReport, SyncSettings};

const SERVER_NAME: &str = "urlsync";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

async fn write_message<W, T>(writer: &mut W, message: &T) -> Result<(), SyncError>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let payload = serde_json::to_string(message)
        .map_err(|err| SyncError::internal(format!("Failed to encode message: {}", err)))?;
    writer.write_all(payload.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending::<()>().await,
    }
}

fn failure_from(id: Value, err: SyncError) -> JsonRpcResponse {
    let err = RpcError::from(err);
    JsonRpcResponse::failure(id, err.code.as_i32(), err.message)
}

/// Line-delimited JSON-RPC front end for one editing session.
pub struct RpcServer {
    logger: Logger,
    manager: HttpToolManager,
}

impl RpcServer {
    pub fn new(logger: Logger, settings: SyncSettings) -> Self {
        let manager = HttpToolManager::new(logger.clone(), settings, HttpToolConfig::default());
        Self {
            logger: logger.child("rpc"),
            manager,
        }
    }

    pub fn manager(&self) -> &HttpToolManager {
        &self.manager
    }

    fn handle_initialize(&mut self, params: &Value) -> Result<Value, SyncError> {
        if let Some(config) = params.get("config").filter(|config| !config.is_null()) {
            let config: HttpToolConfig = serde_json::from_value(config.clone())?;
            self.manager.load(config, Instant::now());
        }
        Ok(serde_json::json!({
            "serverInfo": { "name": SERVER_NAME, "version": SERVER_VERSION },
            "state": self.manager.state(),
        }))
    }

    pub fn handle_request(&mut self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let outcome = match request.method.as_str() {
            "initialize" => self.handle_initialize(&request.params),
            "session/action" => self.manager.handle_action(request.params),
            "session/state" => Ok(self.manager.state()),
            _ if request.method.starts_with("notifications/") => Ok(Value::Null),
            _ => {
                return request.id.map(|id| {
                    JsonRpcResponse::failure(
                        id,
                        ErrorCode::MethodNotFound.as_i32(),
                        format!("Method not found: {}", request.method),
                    )
                });
            }
        };
        match (request.id, outcome) {
            (Some(id), Ok(result)) => Some(JsonRpcResponse::success(id, result)),
            (Some(id), Err(err)) => Some(failure_from(id, err)),
            (None, Ok(_)) => None,
            (None, Err(err)) => {
                self.logger.warn(
                    "notification failed",
                    Some(&serde_json::json!({"method": request.method, "error": err.message})),
                );
                None
            }
        }
    }

    pub fn handle_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        let parsed: Value = match serde_json::from_str(trimmed) {
            Ok(value) => value,
            Err(_) => {
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    ErrorCode::ParseError.as_i32(),
                    "Parse error".to_string(),
                ))
            }
        };
        match serde_json::from_value::<JsonRpcRequest>(parsed) {
            Ok(request) => self.handle_request(request),
            Err(_) => Some(JsonRpcResponse::failure(
                Value::Null,
                ErrorCode::InvalidRequest.as_i32(),
                "Invalid request".to_string(),
            )),
        }
    }

    fn synced_notification(
        &self,
        outcome: Result<Vec<PassReport>, SyncError>,
    ) -> Option<JsonRpcNotification> {
        match outcome {
            Ok(reports) if reports.is_empty() => None,
            Ok(reports) => Some(JsonRpcNotification::new(
                "session/synced",
                serde_json::json!({"reports": reports, "state": self.manager.state()}),
            )),
            Err(err) => Some(JsonRpcNotification::new(
                "session/error",
                serde_json::json!({"error": err}),
            )),
        }
    }

    /// Settles a snapshot whose quiet window has elapsed.
    pub fn settle_due(&mut self, now: Instant) -> Option<JsonRpcNotification> {
        let outcome = self.manager.tick(now);
        self.synced_notification(outcome)
    }

    pub async fn run<R, W>(&mut self, reader: R, writer: W) -> Result<(), SyncError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        let mut writer = writer;
        loop {
            let deadline = self.manager.next_deadline();
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    if let Some(response) = self.handle_line(&line) {
                        write_message(&mut writer, &response).await?;
                    }
                }
                _ = sleep_until_deadline(deadline) => {
                    if let Some(notification) = self.settle_due(Instant::now()) {
                        write_message(&mut writer, &notification).await?;
                    }
                }
            }
        }

        let outcome = self.manager.settle_all(Instant::now());
        if let Some(notification) = self.synced_notification(outcome) {
            write_message(&mut writer, &notification).await?;
        }
        self.logger.debug("input closed", Some(&self.manager.state()));
        Ok(())
    }

    pub async fn run_stdio(&mut self) -> Result<(), SyncError> {
        let reader = BufReader::new(tokio::io::stdin());
        let writer = BufWriter::new(tokio::io::stdout());
        self.run(reader, writer).await
    }
}

pub async fn run_stdio() -> Result<(), SyncError> {
    let logger = Logger::new(SERVER_NAME);
    let settings = SyncSettings::from_env();
    logger.info(
        "starting",
        Some(&serde_json::json!({"debounce_ms": settings.debounce.as_millis() as u64})),
    );
    let mut server = RpcServer::new(logger, settings);
    server.run_stdio().await
}
