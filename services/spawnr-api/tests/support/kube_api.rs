use std::{sync::Arc, time::Duration};

use http::{Method, Request, Response, StatusCode, header};
use kube::{Client, client::Body};
use serde_json::{Value, json};
use spawnr_api::services::{client_resolver::ClientHandle, resource_service::ResourceService};
use spawnr_core::models::TrustPolicy;
use tower_test::mock::{self, Handle, SendResponse};

pub const SERVER: &str = "https://mock.example.test";

/// A kube client wired to an in-process API server the test answers by hand.
pub fn mock_client() -> (Client, ApiServer) {
    let (service, handle) = mock::pair::<Request<Body>, Response<Body>>();

    (Client::new(service, "default"), ApiServer { handle })
}

pub fn mock_handle(identity: &str) -> (ClientHandle, ApiServer) {
    let (client, server) = mock_client();

    (
        ClientHandle::new(identity, SERVER, TrustPolicy::Verified, client),
        server,
    )
}

pub fn mock_resources(timeout: Duration) -> (ResourceService, ApiServer) {
    let (handle, server) = mock_handle("mock");

    (ResourceService::new(Arc::new(handle), timeout), server)
}

pub struct ApiServer {
    handle: Handle<Request<Body>, Response<Body>>,
}

impl ApiServer {
    pub async fn next(&mut self) -> (Request<Body>, SendResponse<Response<Body>>) {
        self.handle
            .next_request()
            .await
            .expect("client went away before sending the expected request")
    }

    /// Answers the next request, which must be `method` on `path`, and
    /// returns the full request URI.
    pub async fn answer(&mut self, method: Method, path: &str, response: Response<Body>) -> String {
        let (request, send) = self.next().await;

        assert_eq!(*request.method(), method, "{}", request.uri());
        assert_eq!(request.uri().path(), path);

        let uri = request.uri().to_string();
        send.send_response(response);
        uri
    }
}

fn respond(status: StatusCode, content_type: &str, body: Vec<u8>) -> Response<Body> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap()
}

pub fn ok(body: Value) -> Response<Body> {
    respond(StatusCode::OK, "application/json", body.to_string().into_bytes())
}

pub fn text(body: &str) -> Response<Body> {
    respond(StatusCode::OK, "text/plain", body.as_bytes().to_vec())
}

pub fn failure(code: u16, reason: &str, message: &str) -> Response<Body> {
    let status = json!({
        "apiVersion": "v1",
        "kind": "Status",
        "metadata": {},
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code,
    });

    respond(
        StatusCode::from_u16(code).unwrap(),
        "application/json",
        status.to_string().into_bytes(),
    )
}

/// A watch response carrying `events` as newline-delimited JSON.
pub fn watch_events(events: &[(&str, Value)]) -> Response<Body> {
    let body: String = events
        .iter()
        .map(|(kind, object)| format!("{}\n", json!({ "type": kind, "object": object })))
        .collect();

    respond(StatusCode::OK, "application/json", body.into_bytes())
}

pub fn job(namespace: &str, name: &str, status: Value) -> Value {
    json!({
        "apiVersion": "batch/v1",
        "kind": "Job",
        "metadata": { "name": name, "namespace": namespace, "resourceVersion": "1" },
        "spec": { "template": { "spec": { "containers": [{ "name": "app", "image": "app:1" }] } } },
        "status": status,
    })
}

pub fn deployment(namespace: &str, name: &str) -> Value {
    json!({
        "apiVersion": "apps/v1",
        "kind": "Deployment",
        "metadata": { "name": name, "namespace": namespace },
        "spec": {
            "selector": { "matchLabels": { "app": name } },
            "template": {
                "metadata": { "labels": { "app": name } },
                "spec": { "containers": [{ "name": "app", "image": "app:1" }] }
            }
        }
    })
}

pub fn pod(name: &str) -> Value {
    json!({ "apiVersion": "v1", "kind": "Pod", "metadata": { "name": name } })
}

pub fn namespace(name: &str) -> Value {
    json!({ "apiVersion": "v1", "kind": "Namespace", "metadata": { "name": name } })
}

pub fn list(api_version: &str, kind: &str, items: Vec<Value>) -> Value {
    json!({
        "apiVersion": api_version,
        "kind": kind,
        "metadata": { "resourceVersion": "10" },
        "items": items,
    })
}
