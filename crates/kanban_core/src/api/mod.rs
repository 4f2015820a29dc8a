//! Request payload decoding for the board operations.
//!
//! # Responsibility
//! - Turn client JSON into typed service inputs.
//! - Map every malformed payload to `KanbanError::BadRequest`.

pub mod payload;
