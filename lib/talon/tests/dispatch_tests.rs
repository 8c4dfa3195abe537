//! Dispatcher tests against in-memory transports that record what the
//! engine actually assembles.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use talon::{
    ArgValue, Client, ClientConfig, Error, Form, Headers, Method, MethodDescriptor, ParamRole,
    Request, Response, Result, Transport, TransportFuture,
};

/// Transport double that records every submitted request and answers
/// with a canned status.
#[derive(Default)]
struct RecordingTransport {
    requests: Mutex<Vec<Request>>,
}

impl RecordingTransport {
    fn recorded(&self) -> Vec<Request> {
        self.requests.lock().expect("lock").clone()
    }

    fn last(&self) -> Request {
        self.recorded().last().expect("at least one request").clone()
    }
}

impl Transport for RecordingTransport {
    fn submit(&self, request: Request) -> TransportFuture<'_> {
        self.requests.lock().expect("lock").push(request);
        Box::pin(async { Ok(Response::new(200, Headers::new(), Bytes::from_static(b"Ok"))) })
    }
}

/// Transport double that always reports a connection failure.
struct RefusingTransport;

impl Transport for RefusingTransport {
    fn submit(&self, _request: Request) -> TransportFuture<'_> {
        Box::pin(async { Err(Error::connection("connection refused")) })
    }
}

/// Transport double whose responses never arrive.
struct StalledTransport;

impl Transport for StalledTransport {
    fn submit(&self, _request: Request) -> TransportFuture<'_> {
        Box::pin(std::future::pending::<talon::Result<Response>>())
    }
}

fn url_api() -> Vec<MethodDescriptor> {
    vec![
        MethodDescriptor::builder("get", Method::Get)
            .param(ParamRole::UrlOverride)
            .build()
            .expect("get"),
        MethodDescriptor::builder("post", Method::Post)
            .param(ParamRole::UrlOverride)
            .param(ParamRole::Body)
            .build()
            .expect("post"),
    ]
}

fn client_with(
    base: &str,
    metadata: Vec<MethodDescriptor>,
    transport: Arc<dyn Transport>,
) -> Client {
    let config = ClientConfig::builder(base)
        .transport(transport)
        .build()
        .expect("config");
    let provider = move || -> Result<Vec<MethodDescriptor>> { Ok(metadata.clone()) };
    Client::new(config, &provider).expect("client")
}

#[tokio::test]
async fn absolute_url_override_replaces_base_entirely() {
    let transport = Arc::new(RecordingTransport::default());
    let client = client_with("http://bar", url_api(), transport.clone());

    client
        .invoke("get", vec![ArgValue::from("http://foo")])
        .await
        .expect("response");

    let request = transport.last();
    assert_eq!(request.method(), Method::Get);
    // Verbatim: no trailing slash invented.
    assert_eq!(request.url().as_str(), "http://foo");
}

#[tokio::test]
async fn post_with_url_override_and_raw_text_body() {
    let transport = Arc::new(RecordingTransport::default());
    let client = client_with("http://bar", url_api(), transport.clone());

    client
        .invoke(
            "post",
            vec![
                ArgValue::from("http://httpbin.org/foo"),
                ArgValue::from("raw string"),
            ],
        )
        .await
        .expect("response");

    let request = transport.last();
    assert_eq!(request.method(), Method::Post);
    assert_eq!(request.url().as_str(), "http://httpbin.org/foo");
    assert_eq!(request.body().expect("body").as_ref(), b"raw string");
    assert_eq!(request.header("Content-Type"), Some("text/plain"));
}

#[tokio::test]
async fn relative_override_joins_base_authority() {
    let transport = Arc::new(RecordingTransport::default());
    let client = client_with("http://foo", url_api(), transport.clone());

    client
        .invoke("get", vec![ArgValue::from("/bar")])
        .await
        .expect("response");

    assert_eq!(transport.last().url().as_str(), "http://foo/bar");
}

#[test]
fn two_body_roles_fail_at_descriptor_construction() {
    // Never a silently-dropped body: the descriptor itself is rejected.
    let err = MethodDescriptor::builder("post", Method::Post)
        .param(ParamRole::Body)
        .param(ParamRole::Body)
        .build()
        .expect_err("duplicate body");
    assert!(err.is_binding());
}

#[tokio::test]
async fn transport_failure_surfaces_and_client_stays_usable() {
    let client = client_with("http://bar", url_api(), Arc::new(RefusingTransport));

    let err = client
        .invoke("get", vec![ArgValue::from("http://foo")])
        .await
        .expect_err("refused");
    assert!(err.is_connection());
    assert!(err.is_transport());

    // A manual retry assembles a fresh request; nothing leaks between
    // attempts.
    let err = client
        .invoke("get", vec![ArgValue::from("http://foo")])
        .await
        .expect_err("refused again");
    assert!(err.is_connection());
}

#[tokio::test]
async fn path_query_and_header_roles_land_in_place() {
    let metadata = vec![
        MethodDescriptor::builder("search_user_repos", Method::Get)
            .template("/users/{user}/repos")
            .param(ParamRole::Path("user".to_string()))
            .param(ParamRole::Query("page".to_string()))
            .param(ParamRole::Query("sort".to_string()))
            .param(ParamRole::Header("X-Request-Id".to_string()))
            .header("Accept", "application/json")
            .build()
            .expect("descriptor"),
    ];
    let transport = Arc::new(RecordingTransport::default());
    let client = client_with("http://api.example.com", metadata, transport.clone());

    client
        .invoke(
            "search_user_repos",
            vec![
                ArgValue::from("alice"),
                ArgValue::from(2_u32),
                ArgValue::from(None::<String>),
                ArgValue::from("req-77"),
            ],
        )
        .await
        .expect("response");

    let request = transport.last();
    // Absent optional query omitted, not sent empty.
    assert_eq!(
        request.url().as_str(),
        "http://api.example.com/users/alice/repos?page=2"
    );
    assert_eq!(request.header("accept"), Some("application/json"));
    assert_eq!(request.header("x-request-id"), Some("req-77"));
}

#[tokio::test]
async fn structured_body_uses_configured_codec() {
    #[derive(serde::Serialize)]
    struct NewUser {
        name: String,
    }

    let metadata = vec![
        MethodDescriptor::builder("create_user", Method::Post)
            .template("/users")
            .param(ParamRole::Body)
            .build()
            .expect("descriptor"),
    ];
    let transport = Arc::new(RecordingTransport::default());
    let client = client_with("http://api.example.com", metadata, transport.clone());

    client
        .invoke(
            "create_user",
            vec![
                ArgValue::json(&NewUser {
                    name: "Alice".to_string(),
                })
                .expect("arg"),
            ],
        )
        .await
        .expect("response");

    let request = transport.last();
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert_eq!(request.body().expect("body").as_ref(), br#"{"name":"Alice"}"#);
}

#[tokio::test]
async fn multipart_body_keeps_its_boundary_content_type() {
    let metadata = vec![
        MethodDescriptor::builder("upload", Method::Post)
            .template("/files")
            .param(ParamRole::Body)
            .build()
            .expect("descriptor"),
    ];
    let transport = Arc::new(RecordingTransport::default());
    let client = client_with("http://api.example.com", metadata, transport.clone());

    let form = Form::with_boundary("fixed").text("name", "report.txt");
    client
        .invoke("upload", vec![ArgValue::from(form)])
        .await
        .expect("response");

    let request = transport.last();
    assert_eq!(
        request.header("content-type"),
        Some("multipart/form-data; boundary=fixed")
    );
}

#[tokio::test]
async fn get_with_body_is_rejected_unless_configured() {
    let metadata = vec![
        MethodDescriptor::builder("probe", Method::Get)
            .template("/probe")
            .param(ParamRole::Body)
            .build()
            .expect("descriptor"),
    ];

    let transport: Arc<dyn Transport> = Arc::new(RecordingTransport::default());
    let client = client_with("http://bar", metadata.clone(), transport);
    let err = client
        .invoke("probe", vec![ArgValue::from("payload")])
        .await
        .expect_err("GET with body");
    assert!(err.is_binding());

    let recording = Arc::new(RecordingTransport::default());
    let config = ClientConfig::builder("http://bar")
        .transport(recording.clone())
        .allow_body_on_safe_methods(true)
        .build()
        .expect("config");
    let provider = move || -> Result<Vec<MethodDescriptor>> { Ok(metadata.clone()) };
    let permissive = Client::new(config, &provider).expect("client");

    permissive
        .invoke("probe", vec![ArgValue::from("payload")])
        .await
        .expect("allowed");
    assert!(recording.last().body().is_some());
}

#[tokio::test]
async fn override_query_replaces_template_query() {
    // Assumption flagged here: a relative override carrying a query
    // string fully replaces the template's query, because an override
    // bypasses the template altogether.
    let metadata = vec![
        MethodDescriptor::builder("list", Method::Get)
            .template("/widgets?filter=all")
            .param(ParamRole::UrlOverride)
            .build()
            .expect("descriptor"),
    ];
    let transport = Arc::new(RecordingTransport::default());
    let client = client_with("http://bar", metadata, transport.clone());

    client
        .invoke("list", vec![ArgValue::from(None::<String>)])
        .await
        .expect("no override");
    assert_eq!(
        transport.last().url().as_str(),
        "http://bar/widgets?filter=all"
    );

    client
        .invoke("list", vec![ArgValue::from("/widgets?filter=mine")])
        .await
        .expect("override");
    assert_eq!(
        transport.last().url().as_str(),
        "http://bar/widgets?filter=mine"
    );
}

#[tokio::test]
async fn bound_query_appends_after_override_query() {
    let metadata = vec![
        MethodDescriptor::builder("list", Method::Get)
            .param(ParamRole::UrlOverride)
            .param(ParamRole::Query("page".to_string()))
            .build()
            .expect("descriptor"),
    ];
    let transport = Arc::new(RecordingTransport::default());
    let client = client_with("http://bar", metadata, transport.clone());

    client
        .invoke(
            "list",
            vec![ArgValue::from("/items?filter=new"), ArgValue::from(3_u32)],
        )
        .await
        .expect("response");

    assert_eq!(
        transport.last().url().as_str(),
        "http://bar/items?filter=new&page=3"
    );
}

#[tokio::test]
async fn concurrent_calls_are_independent() {
    let metadata = vec![
        MethodDescriptor::builder("get_item", Method::Get)
            .template("/items/{id}")
            .param(ParamRole::Path("id".to_string()))
            .build()
            .expect("descriptor"),
    ];
    let transport = Arc::new(RecordingTransport::default());
    let client = client_with("http://bar", metadata, transport.clone());

    let (first, second) = tokio::join!(
        client.invoke("get_item", vec![ArgValue::from(1_u32)]),
        client.invoke("get_item", vec![ArgValue::from(2_u32)]),
    );
    first.expect("first");
    second.expect("second");

    let mut urls: Vec<String> = transport
        .recorded()
        .iter()
        .map(|request| request.url().as_str().to_string())
        .collect();
    urls.sort();
    assert_eq!(urls, ["http://bar/items/1", "http://bar/items/2"]);
}

#[tokio::test]
async fn cancellation_before_response_is_clean() {
    let client = client_with("http://bar", url_api(), Arc::new(StalledTransport));

    let result = tokio::time::timeout(
        Duration::from_millis(20),
        client.invoke("get", vec![ArgValue::from("http://foo")]),
    )
    .await;
    // The call future is dropped here; the abandoned transport
    // operation must not poison later use of the client.
    assert!(result.is_err());

    let err = client
        .invoke("get", vec![ArgValue::Multipart(Form::new())])
        .await
        .expect_err("role mismatch still detected");
    assert!(err.is_binding());
}
