//! Statement synthesis for form write-backs.
//!
//! Turns the text of a previously executed SELECT plus a column-role
//! mapping into a parameterized UPDATE, then binds submitted values to it.
//! Pure functions only; nothing here touches a database.

mod bind;
mod lexical;
mod rewrite;

pub use bind::bind;
pub use rewrite::synthesize;
