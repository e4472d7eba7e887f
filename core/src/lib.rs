//! Synchronous API client core for the todo service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, making the core fully deterministic and testable.
//!
//! # Design
//! - `TodoClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - `TodoView` layers the list UI state (cache, filter, drafts) on top of
//!   the client, still without doing any I/O itself.
//! - `UreqTransport` (default `ureq` feature) is a ready-made blocking host;
//!   build with `default-features = false` to keep the crate I/O-free.
//! - DTOs are defined independently from the server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
#[cfg(feature = "ureq")]
pub mod transport;
pub mod types;
pub mod view;

pub use client::TodoClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{CreateTodo, Message, Todo, TodoCount, UpdateTodo};
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use view::{Action, Editing, Filter, Outgoing, Row, TodoView, Transport};
