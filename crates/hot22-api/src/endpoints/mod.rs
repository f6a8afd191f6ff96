// Per-domain endpoint mappings.
//
// Each module adds methods to `ApiClient` for one resource family. They
// map typed arguments onto a verb and path and nothing else; payloads
// pass through untouched apart from envelope unwrapping in the client.

mod analytics;
mod error_logs;
mod files;
mod health;
mod offices;
mod passengers;
mod search;
