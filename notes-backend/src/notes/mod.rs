//! Notes system — id-keyed note records mirrored to a JSON snapshot file
//!
//! `NoteStore` owns every note in the process; `file_ops` reads and writes
//! the on-disk snapshot.

pub mod file_ops;
pub mod store;

pub use store::{NoteStore, StorageError};
