//! Graph data model and synchronization
//!
//! - [`triple`]: immutable triple values with typed literals
//! - [`ntriples`]: the wire serialization spoken to the remote store
//! - [`store`]: the remote graph store contract and its implementations
//! - [`sync`]: load/merge/save of named graphs
//! - [`writer`]: export serializations (Turtle, RDF/XML)

pub mod ntriples;
pub mod store;
pub mod sync;
pub mod triple;
pub mod writer;

pub use store::{GraphStore, MemoryGraphStore, SparqlStore, SparqlStoreConfig};
pub use sync::{GraphSynchronizer, MergeOutcome};
pub use triple::{Literal, Term, Triple};
pub use writer::ExportFormat;
