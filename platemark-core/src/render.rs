pub mod compose;
pub mod document;
