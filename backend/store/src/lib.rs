//! Storage adapters implementing [`patente_core::RecordStore`].

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreRecordStore;
pub use memory::InMemoryRecordStore;
