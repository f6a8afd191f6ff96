// ── Feature stores ──
//
// One state type per dashboard domain, each with its action enum and
// reducer. Cross-store writes do not exist; the `Dashboard` coordinates.

pub mod analytics;
pub mod error_logs;
pub mod files;
pub mod offices;
pub mod overview;
pub mod passengers;
pub mod search;
pub mod ui;
