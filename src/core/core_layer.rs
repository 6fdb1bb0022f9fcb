// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "flashcards/mod.rs"]
pub mod flashcards;

#[path = "remote_store/mod.rs"]
pub mod remote_store;

#[path = "sync/mod.rs"]
pub mod sync;
