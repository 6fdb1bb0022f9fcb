pub mod lookup;
pub mod pagination;
pub mod store;

pub use lookup::{exact_match, LookupError};
pub use pagination::{Page, PageSource, Paginator};
pub use store::{RemoteFile, RemoteKind, RemoteStore, RemoteStoreError};
