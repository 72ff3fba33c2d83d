//! Indexer layer tests
//!
//! Chunking scenarios, UTF-8 safety with multi-byte text, chunker
//! properties, and the loading pipeline against the in-memory index.

mod test_chunker;
mod test_loading;
