//! # API Module
//!
//! HTTP interface for the todo service.
//!
//! ## Endpoints Overview
//!
//! ### Todo Operations
//! - `POST /todos` - Create todo (id assigned by the server)
//! - `GET /todos` - List todos; query parameters filter by field equality
//! - `GET /todos/{id}` - Get todo by id
//! - `PUT /todos/{id}`, `PATCH /todos/{id}` - Partial update
//! - `DELETE /todos/{id}` - Delete todo
//! - `DELETE /todos` - Delete all todos, or those matching the query
//!
//! ### System Essentials
//! - `GET /health` - Health check
//! - `GET /info` - Service info and capabilities
//! - `GET /metrics` - Prometheus metrics (when enabled)

pub mod extract;
pub mod handlers;
pub mod response;
pub mod server;

// Re-export commonly used items
pub use response::{ApiResponse, ErrorResponse};
pub use server::{create_app, start_api_server};
