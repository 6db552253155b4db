//! Sources of quotes for the sender:
//! - `prompt` — asks an operator for each quote on a terminal.
//! - `generator` — synthetic random-walk quotes for demos and load.
pub mod generator;
pub mod prompt;
