//! Pen-plotter SVG export: a physical page model and a writer that lays a
//! traced scene out on it.

mod page;
mod style;
mod writer;

pub use page::Page;
pub use style::Style;
pub use writer::{render, write_file};
