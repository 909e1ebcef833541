mod common;
use common::quiet_logger;

use serde_json::{json, Value};
use urlsync::rpc::RpcServer;
use urlsync::sync::SyncSettings;

fn server() -> RpcServer {
    RpcServer::new(quiet_logger(), SyncSettings::default())
}

async fn run_lines(server: &mut RpcServer, lines: &[Value]) -> Vec<Value> {
    let input = lines
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join("\n");
    let mut output: Vec<u8> = Vec::new();
    server
        .run(tokio::io::BufReader::new(input.as_bytes()), &mut output)
        .await
        .expect("run");
    String::from_utf8(output)
        .expect("utf8")
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect()
}

#[test]
fn malformed_lines_get_protocol_errors() {
    let mut server = server();

    let parse = server.handle_line("{not json").expect("response");
    assert_eq!(parse.error.map(|e| e.code), Some(-32700));

    let unknown = server
        .handle_line(r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#)
        .expect("response");
    assert_eq!(unknown.error.map(|e| e.code), Some(-32601));

    assert!(server
        .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
        .is_none());
}

#[test]
fn action_errors_map_to_invalid_params() {
    let mut server = server();

    let response = server
        .handle_line(r#"{"jsonrpc":"2.0","id":7,"method":"session/action","params":{"action":"remove_field","list":"queryParameters","index":2}}"#)
        .expect("response");

    assert_eq!(response.id, json!(7));
    assert_eq!(response.error.map(|e| e.code), Some(-32602));
}

#[tokio::test]
async fn stdio_loop_answers_and_reports_settled_passes() {
    let mut server = server();
    let messages = run_lines(
        &mut server,
        &[
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "initialize",
                "params": {"config": {"name": "Weather", "url": "https://api.example.com"}}
            }),
            json!({
                "jsonrpc": "2.0",
                "id": 2,
                "method": "session/action",
                "params": {"action": "set_url", "url": "https://api.example.com/weather/:city?units=metric"}
            }),
        ],
    )
    .await;

    assert_eq!(messages[0]["id"], 1);
    assert_eq!(messages[0]["result"]["serverInfo"]["name"], "urlsync");
    assert_eq!(messages[0]["result"]["state"]["config"]["method"], "GET");
    assert_eq!(messages[1]["id"], 2);

    let synced: Vec<&Value> = messages
        .iter()
        .filter(|message| message["method"] == "session/synced")
        .collect();
    assert!(!synced.is_empty());
    let config = server.manager().session().config();
    assert_eq!(config.path_variables[0].key, "city");
    assert_eq!(config.query_parameters[0].key, "units");
    assert_eq!(config.name, "Weather");
}
