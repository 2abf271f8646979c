//! Human-readable forms of a variable tree: declarations, flat ASCII
//! values and brace-nested values.
pub mod ascii;
pub mod declaration;
pub mod value;

pub use ascii::{flat_name, render};
pub use declaration::{INDENT, declaration};
pub use value::print_value;
