/// Router Module Index
///
/// Splits the routing table by who may reach it. The edge gate wraps all of them; the
/// privileged module is the only one it runs an authorization check for.

/// Routes open to everyone: pages, sign-in and health probes.
pub mod public;

/// Routes under `/super-admin`. Guarded by the configured `AdminGate`.
pub mod admin;

/// Static assets and the favicon. Skipped by the edge gate's route filter.
pub mod assets;
