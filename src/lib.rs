// Crate root library declaration and module exports.
pub mod cli;
pub mod convert;
pub mod docx;
pub mod model;
