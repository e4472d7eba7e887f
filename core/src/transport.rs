//! Blocking `Transport` on top of ureq, for hosts that don't bring their own.
//!
//! Request headers are forwarded exactly as the client built them. Non-2xx
//! statuses come back as data so the core decides what they mean.

use ureq::http::Response;
use ureq::typestate::WithBody;
use ureq::{Body, RequestBuilder};

use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::view::Transport;

pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    type Error = ureq::Error;

    fn execute(&mut self, req: HttpRequest) -> Result<HttpResponse, ureq::Error> {
        tracing::debug!(method = req.method.as_str(), path = %req.path, "sending request");

        let HttpRequest {
            method,
            path,
            headers,
            body,
        } = req;
        let agent = &self.agent;
        let mut response = match method {
            HttpMethod::Get => with_headers(agent.get(&path), &headers).call(),
            HttpMethod::Delete => with_headers(agent.delete(&path), &headers).call(),
            HttpMethod::Post => send(with_headers(agent.post(&path), &headers), body),
            HttpMethod::Patch => send(with_headers(agent.patch(&path), &headers), body),
        }?;

        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;

        Ok(HttpResponse { status, body })
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (key, value) in headers {
        builder = builder.header(key.as_str(), value.as_str());
    }
    builder
}

fn send(builder: RequestBuilder<WithBody>, body: Option<String>) -> Result<Response<Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}
