//! Middleware stack para el servidor HTTP.
//!
//! - `MakeRequestUuidV7`: genera X-Request-Id cuando el cliente no envia uno
//! - `make_request_span`: span de tracing por request, con el request id

mod request_id;

pub use request_id::{MakeRequestUuidV7, REQUEST_ID_HEADER, make_request_span};
