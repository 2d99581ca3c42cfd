use std::io::{BufRead, BufReader, Write};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use serde_json::Value;

const SERVER_TIMEOUT: Duration = Duration::from_secs(5);
const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_millis(200);

type ServerReader = BufReader<std::process::ChildStdout>;

#[test]
fn initialize_smoke() {
    let mut server = spawn_server();
    let mut reader = take_reader(&mut server);

    send_lsp_message(&mut server, &create_initialize_request());

    let response = read_lsp_message(&mut reader);
    validate_initialize_response(&response);

    shutdown_server(server);
}

#[test]
fn did_open_publishes_diagnostics() {
    let mut server = spawn_server();
    let mut reader = take_reader(&mut server);

    send_lsp_message(&mut server, &create_initialize_request());
    read_lsp_message(&mut reader);

    send_lsp_message(
        &mut server,
        &serde_json::json!({ "jsonrpc": "2.0", "method": "initialized", "params": {} }),
    );
    send_lsp_message(
        &mut server,
        &serde_json::json!({
            "jsonrpc": "2.0",
            "method": "textDocument/didOpen",
            "params": {
                "textDocument": {
                    "uri": "file:///tmp/diagram.md",
                    "languageId": "markdown",
                    "version": 1,
                    "text": "```mermaid\nflowchart LR\n// note\n```\n"
                }
            }
        }),
    );

    let params = (0..10)
        .map(|_| read_lsp_message(&mut reader))
        .find(|msg| msg["method"] == "textDocument/publishDiagnostics")
        .map(|msg| msg["params"].clone())
        .expect("Server should publish diagnostics after didOpen");

    assert_eq!(params["uri"], "file:///tmp/diagram.md");
    let diagnostics = params["diagnostics"]
        .as_array()
        .expect("diagnostics array");
    let comment = diagnostics
        .iter()
        .find(|d| d["code"] == "INVALID_COMMENT")
        .expect("comment diagnostic");
    assert_eq!(comment["severity"], 1);
    assert_eq!(comment["range"]["start"]["line"], 2);
    assert_eq!(comment["source"], "mermaid-check");

    shutdown_server(server);
}

fn spawn_server() -> std::process::Child {
    let bin_path = std::env::var("CARGO_BIN_EXE_mermaid-ls")
        .unwrap_or_else(|_| "target/debug/mermaid-ls".to_string());

    Command::new(bin_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .env("MERMAID_LS_TEST_EXIT", "1")
        .spawn()
        .expect("Failed to spawn language server")
}

fn create_initialize_request() -> Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {
            "processId": null,
            "rootUri": null,
            "capabilities": {
                "textDocument": {
                    "hover": { "dynamicRegistration": false },
                    "completion": { "dynamicRegistration": false }
                }
            },
            "clientInfo": { "name": "test-client", "version": "1.0" }
        }
    })
}

fn send_lsp_message(child: &mut std::process::Child, message: &Value) {
    let body = message.to_string();
    let request = format!("Content-Length: {}\r\n\r\n{}", body.len(), body);

    let stdin = child
        .stdin
        .as_mut()
        .expect("Child stdin should be available");
    stdin
        .write_all(request.as_bytes())
        .expect("Failed to write request");
    stdin.flush().expect("Failed to flush stdin");
}

fn take_reader(child: &mut std::process::Child) -> ServerReader {
    let stdout = child
        .stdout
        .take()
        .expect("Child stdout should be available");
    BufReader::new(stdout)
}

fn read_lsp_message(reader: &mut ServerReader) -> Value {
    let content_length = read_content_length_header(reader);
    let body = read_message_body(reader, content_length);

    serde_json::from_str(&body)
        .unwrap_or_else(|e| panic!("Invalid JSON response: {}\nBody: {}", e, body))
}

fn read_content_length_header(reader: &mut ServerReader) -> usize {
    let start_time = Instant::now();
    let mut content_length = None;

    loop {
        if start_time.elapsed() > SERVER_TIMEOUT {
            panic!("Timeout waiting for response headers");
        }

        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => panic!("Unexpected EOF while reading headers"),
            Ok(_) => {
                if line.trim().is_empty() {
                    // End of headers - we've consumed the empty line
                    break;
                }

                if let Some(length_str) = line.strip_prefix("Content-Length:") {
                    content_length = Some(
                        length_str
                            .trim()
                            .parse::<usize>()
                            .expect("Invalid Content-Length header"),
                    );
                }
            }
            Err(e) => panic!("Error reading headers: {}", e),
        }
    }

    content_length.expect("Missing Content-Length header")
}

fn read_message_body(reader: &mut ServerReader, content_length: usize) -> String {
    let mut body_bytes = vec![0u8; content_length];
    std::io::Read::read_exact(reader, &mut body_bytes).expect("Failed to read response body");

    String::from_utf8(body_bytes).expect("Response body should be valid UTF-8")
}

fn validate_initialize_response(response: &Value) {
    // Validate JSON-RPC structure
    assert_eq!(
        response.get("jsonrpc").and_then(|v| v.as_str()),
        Some("2.0"),
        "Response should have jsonrpc: '2.0'"
    );

    assert_eq!(
        response.get("id").and_then(|v| v.as_i64()),
        Some(1),
        "Response should have matching request id"
    );

    // Validate LSP initialize response structure
    let result = response
        .get("result")
        .expect("Response should contain 'result' field");

    let capabilities = result
        .get("capabilities")
        .expect("Result should contain server capabilities");

    assert!(capabilities.is_object(), "Capabilities should be an object");
    assert_eq!(
        capabilities.get("hoverProvider").and_then(|v| v.as_bool()),
        Some(true),
        "Should support hover"
    );
    assert!(
        capabilities.get("completionProvider").is_some(),
        "Should support completion"
    );
    // Full document sync
    assert_eq!(
        capabilities.get("textDocumentSync").and_then(|v| v.as_i64()),
        Some(1)
    );

    assert_eq!(
        result
            .pointer("/serverInfo/name")
            .and_then(|v| v.as_str()),
        Some("mermaid-ls")
    );
}

fn shutdown_server(mut child: std::process::Child) {
    // Close stdin to signal we're done
    drop(child.stdin.take());

    // Give the server a moment to exit gracefully
    std::thread::sleep(SHUTDOWN_GRACE_PERIOD);

    match child.try_wait() {
        Ok(Some(status)) => {
            if !status.success() {
                eprintln!("Server exited with non-zero status: {:?}", status);
            }
        }
        Ok(None) => {
            // Still running, force termination
            eprintln!("Server didn't exit gracefully, forcing termination");
            let _ = child.kill();
            let _ = child.wait();
        }
        Err(e) => panic!("Error checking server status: {}", e),
    }
}
