//! Cross-cutting HTTP middleware: CORS, CSRF, and security headers.

pub mod cors;
pub mod csrf;
pub mod security;
