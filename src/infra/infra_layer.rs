// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

#[path = "google_drive/mod.rs"]
pub mod google_drive;

#[path = "output/mod.rs"]
pub mod output;
