/// Middleware modules for the API server
///
/// - `security`: response hardening headers

pub mod security;
