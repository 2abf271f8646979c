//! C-style declarations of a variable's shape.
//!
//! ```text
//! Structure {
//!     Int32 x;
//!     Float64 sst[time = 12][lat = 90];
//! } s;
//! ```
//!
//! Declarations depend on shape only, never on decoded values.
use std::fmt;

use crate::variable::{VarKind, Variable, array::ArrayData};

/// One level of nesting.
pub const INDENT: &str = "    ";

/// Declaration of `var`, each line prefixed by `indent`. With `semicolon`
/// the declaration is closed by `;` and a newline.
pub fn declaration(var: &Variable, indent: &str, semicolon: bool) -> String {
    let mut out = String::new();
    write_declaration(&mut out, var, var.name(), indent, semicolon);
    out
}

fn write_declaration(out: &mut String, var: &Variable, name: &str, indent: &str, semicolon: bool) {
    match var.kind() {
        VarKind::Scalar(value) => {
            out.push_str(indent);
            out.push_str(value.scalar_type().name());
            out.push(' ');
            out.push_str(name);
        }
        VarKind::Array(array) => {
            match array.data() {
                ArrayData::Primitive(buf) => {
                    out.push_str(indent);
                    out.push_str(buf.scalar_type().name());
                    out.push(' ');
                    out.push_str(name);
                }
                // Elements are declared under the array's own name.
                ArrayData::Containers { template, .. } => {
                    write_declaration(out, template, name, indent, false)
                }
            }
            for dim in array.dimensions() {
                match &dim.name {
                    Some(dim_name) => out.push_str(&format!("[{dim_name} = {}]", dim.size)),
                    None => out.push_str(&format!("[{}]", dim.size)),
                }
            }
        }
        VarKind::Structure(_) | VarKind::Sequence(_) | VarKind::Grid(_) => {
            out.push_str(indent);
            out.push_str(var.type_name());
            out.push_str(" {\n");

            let nested = format!("{indent}{INDENT}");
            for child in var.children().unwrap_or_default() {
                write_declaration(out, child, child.name(), &nested, true);
            }

            out.push_str(indent);
            out.push_str("} ");
            out.push_str(name);
        }
    }

    if semicolon {
        out.push_str(";\n");
    }
}

/// Formats the full, semicolon-terminated declaration.
impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&declaration(self, "", true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::{
        array::Dimension,
        scalar::{ScalarType, ScalarValue},
    };

    fn s() -> Variable {
        Variable::structure("s")
            .with_variable(Variable::with_value("x", ScalarValue::Int32(5)))
            .unwrap()
            .with_variable(Variable::with_value("y", ScalarValue::Float64(2.5)))
            .unwrap()
    }

    #[test]
    fn structure_declaration() {
        assert_eq!(
            declaration(&s(), "", true),
            "Structure {\n    Int32 x;\n    Float64 y;\n} s;\n"
        );
        assert_eq!(
            declaration(&s(), "", false),
            "Structure {\n    Int32 x;\n    Float64 y;\n} s"
        );
    }

    #[test]
    fn scalar_declaration() {
        let u = Variable::scalar("link", ScalarType::Url);
        assert_eq!(declaration(&u, "  ", true), "  Url link;\n");
        assert_eq!(declaration(&u, "", false), "Url link");
    }

    #[test]
    fn array_dimensions() {
        let sst = Variable::array(
            "sst",
            ScalarType::Float64,
            vec![Dimension::named("time", 12), Dimension::new(1)],
        )
        .unwrap();
        assert_eq!(sst.to_string(), "Float64 sst[time = 12][1];\n");
    }

    #[test]
    fn array_of_structures() {
        let pts = Variable::array_of("pts", s(), vec![Dimension::new(3)]).unwrap();
        let root = Variable::structure("root").with_variable(pts).unwrap();

        assert_eq!(
            root.to_string(),
            "Structure {\n    Structure {\n        Int32 x;\n        Float64 y;\n    } pts[3];\n} root;\n"
        );
    }

    #[test]
    fn grid_and_sequence() {
        let data = Variable::array(
            "sst",
            ScalarType::Float32,
            vec![Dimension::named("lat", 2)],
        )
        .unwrap();
        let lat = Variable::array("lat", ScalarType::Float64, vec![Dimension::named("lat", 2)])
            .unwrap();
        let grid = Variable::grid("sst", data)
            .unwrap()
            .with_variable(lat)
            .unwrap();
        assert_eq!(
            grid.to_string(),
            "Grid {\n    Float32 sst[lat = 2];\n    Float64 lat[lat = 2];\n} sst;\n"
        );

        let seq = Variable::sequence("obs")
            .with_variable(Variable::scalar("t", ScalarType::Int64))
            .unwrap();
        assert_eq!(seq.to_string(), "Sequence {\n    Int64 t;\n} obs;\n");
    }

    #[test]
    fn declaration_ignores_values() {
        let mut populated = s();
        populated
            .lookup_mut("x")
            .unwrap()
            .set_value(ScalarValue::Int32(99))
            .unwrap();
        let empty = Variable::structure("s")
            .with_variable(Variable::scalar("x", ScalarType::Int32))
            .unwrap()
            .with_variable(Variable::scalar("y", ScalarType::Float64))
            .unwrap();

        assert_eq!(populated.to_string(), empty.to_string());
    }
}
