use serde_json::{json, Value};
use tokio::runtime::Runtime;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use reporag_core::traits::ResourceFetcher;
use reporag_core::types::{FileDescriptor, RepoTarget};
use reporag_mcp::{McpFetcher, RpcError};

/// Mock server on its own runtime; the blocking client runs on the test thread.
struct Harness {
    server: MockServer,
    rt: Runtime,
}

impl Harness {
    fn start() -> Self {
        let rt = Runtime::new().expect("runtime");
        let server = rt.block_on(MockServer::start());
        Self { server, rt }
    }

    fn url(&self) -> String { format!("{}/rpc", self.server.uri()) }

    fn reply(&self, rpc_method: &str, body: Value) {
        self.rt.block_on(
            Mock::given(method("POST"))
                .and(path("/rpc"))
                .and(body_partial_json(json!({ "method": rpc_method })))
                .respond_with(ResponseTemplate::new(200).set_body_json(body))
                .mount(&self.server),
        );
    }

    fn bodies(&self) -> Vec<Value> {
        self.rt
            .block_on(self.server.received_requests())
            .unwrap_or_default()
            .iter()
            .map(|r| r.body_json::<Value>().expect("json body"))
            .collect()
    }
}

#[test]
fn initialize_list_fetch_round() {
    let h = Harness::start();
    h.reply("initialize", json!({"jsonrpc": "2.0", "id": 1, "result": {"protocolVersion": "2024-11-05"}}));
    h.reply("resources/list", json!({"jsonrpc": "2.0", "id": 2, "result": [
        {"uri": "github://octo/widgets/app.py", "name": "app.py"},
        {"uri": "github://octo/widgets/README.md", "name": "README.md"}
    ]}));
    h.reply("resources/fetch", json!({"jsonrpc": "2.0", "id": 3, "result": {
        "uri": "github://octo/widgets/app.py", "mimeType": "text/plain", "content": "print('hi')"
    }}));

    let fetcher = McpFetcher::new(h.url());
    fetcher.initialize(&RepoTarget::new("octo", "widgets", "main")).expect("initialize");
    let files = fetcher.list().expect("list");
    assert_eq!(files, vec![
        FileDescriptor { uri: "github://octo/widgets/app.py".into(), name: "app.py".into() },
        FileDescriptor { uri: "github://octo/widgets/README.md".into(), name: "README.md".into() },
    ]);
    assert_eq!(fetcher.fetch("github://octo/widgets/app.py").expect("fetch"), "print('hi')");

    let bodies = h.bodies();
    assert_eq!(bodies.len(), 3);
    let ids: Vec<u64> = bodies.iter().map(|b| b["id"].as_u64().expect("id")).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert!(bodies.iter().all(|b| b["jsonrpc"] == "2.0"));
    assert_eq!(bodies[0]["params"], json!({"owner": "octo", "repo": "widgets", "branch": "main"}));
    assert!(bodies[1].get("params").is_none(), "list sends no params");
    assert_eq!(bodies[2]["params"], json!({"uri": "github://octo/widgets/app.py"}));
}

#[test]
fn missing_list_result_means_no_files() {
    let h = Harness::start();
    h.reply("resources/list", json!({"jsonrpc": "2.0", "id": 1}));
    let fetcher = McpFetcher::new(h.url());
    assert!(fetcher.list_resources().expect("list").is_empty());
}

#[test]
fn rpc_error_object_is_reported() {
    let h = Harness::start();
    h.reply("resources/fetch", json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32603, "message": "boom"}}));
    let fetcher = McpFetcher::new(h.url());
    let err = fetcher.fetch_content("github://octo/widgets/a.py").unwrap_err();
    match err {
        RpcError::Server { code, message } => { assert_eq!(code, -32603); assert_eq!(message, "boom"); }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn non_success_status_is_reported() {
    let h = Harness::start();
    h.rt.block_on(
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&h.server),
    );
    let fetcher = McpFetcher::new(h.url());
    let err = fetcher.list_resources().unwrap_err();
    assert!(matches!(err, RpcError::Status { status: 502, .. }), "{err:?}");
}

#[test]
fn fetch_without_result_is_malformed() {
    let h = Harness::start();
    h.reply("resources/fetch", json!({"jsonrpc": "2.0", "id": 1}));
    let fetcher = McpFetcher::new(h.url());
    assert!(matches!(fetcher.fetch_content("github://x/y/z.py"), Err(RpcError::Malformed { .. })));
}
