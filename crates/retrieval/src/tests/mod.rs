//! Crate-level integration tests exercising the store write path and the
//! full ingest/ask pipeline against in-memory doubles.

mod end_to_end;
mod support;
