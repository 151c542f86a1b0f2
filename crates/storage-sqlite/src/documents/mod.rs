//! Local filesystem implementation of the document object store.

mod store;

pub use store::FsDocumentStore;
