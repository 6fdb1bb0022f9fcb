// =============================================================================
// GOOGLE DRIVE MODULE
// =============================================================================
//
// Implements the core `RemoteStore` trait on top of the Drive v3 REST API.
// This lives in infra because it does network I/O; the sync workflow only
// sees names, ids and bytes.

pub mod drive_client;
pub mod google_auth;

pub use drive_client::DriveClient;
