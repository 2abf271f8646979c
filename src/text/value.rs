//! Nested brace rendering of a variable's value, optionally preceded by
//! its declaration: `Int32 v[2][2] = {{1, 2}, {3, 4}};`.
use std::fmt::Write;

use super::declaration::declaration;
use crate::variable::{VarKind, Variable, array::{ArrayData, ArrayVariable}};

/// Value of `var` in nested braces. With `with_declaration` the value is
/// assigned to the declaration of `var` and the statement is terminated.
pub fn print_value(var: &Variable, indent: &str, with_declaration: bool) -> String {
    let mut out = String::new();
    if with_declaration {
        out.push_str(&declaration(var, indent, false));
        out.push_str(" = ");
    }
    write_value(&mut out, var);
    if with_declaration {
        out.push_str(";\n");
    }
    out
}

fn write_value(out: &mut String, var: &Variable) {
    match var.kind() {
        VarKind::Scalar(value) => {
            let _ = write!(out, "{value}");
        }
        VarKind::Array(array) => {
            let shape = array.shape();
            write_nested(out, array, &shape, 0);
        }
        VarKind::Structure(s) => write_list(out, s.children()),
        VarKind::Sequence(seq) => {
            out.push_str("{ ");
            for (i, row) in seq.rows().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_list(out, row);
            }
            out.push_str(" }");
        }
        VarKind::Grid(grid) => {
            out.push_str("{  Array: ");
            write_value(out, grid.array());
            out.push_str(" Maps: ");
            for (i, map) in grid.maps().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, map);
            }
            out.push_str(" }");
        }
    }
}

fn write_list(out: &mut String, members: &[Variable]) {
    out.push_str("{ ");
    for (i, member) in members.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_value(out, member);
    }
    out.push_str(" }");
}

/// One brace level per dimension; returns the next flattened offset.
fn write_nested(out: &mut String, array: &ArrayVariable, shape: &[usize], mut offset: usize) -> usize {
    let Some((&size, inner)) = shape.split_first() else {
        return offset;
    };

    out.push('{');
    for i in 0..size {
        if i > 0 {
            out.push_str(", ");
        }
        if !inner.is_empty() {
            offset = write_nested(out, array, inner, offset);
            continue;
        }
        match array.data() {
            ArrayData::Primitive(buf) => {
                if let Some(value) = buf.get(offset) {
                    let _ = write!(out, "{value}");
                }
            }
            ArrayData::Containers { elements, .. } => {
                if let Some(element) = elements.get(offset) {
                    write_value(out, element);
                }
            }
        }
        offset += 1;
    }
    out.push('}');
    offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::{
        array::Dimension,
        buffer::PrimitiveBuffer,
        scalar::{ScalarType, ScalarValue},
    };

    #[test]
    fn scalar_with_declaration() {
        let x = Variable::with_value("x", ScalarValue::Float32(0.25));
        assert_eq!(print_value(&x, "", true), "Float32 x = 0.250000;\n");
        assert_eq!(print_value(&x, "", false), "0.250000");
    }

    #[test]
    fn arrays_nest_per_dimension() {
        let v = Variable::array_with_values(
            "v",
            PrimitiveBuffer::from(vec![1i32, 2, 3, 4]),
            vec![Dimension::new(2), Dimension::new(2)],
        )
        .unwrap();
        assert_eq!(print_value(&v, "", true), "Int32 v[2][2] = {{1, 2}, {3, 4}};\n");
    }

    #[test]
    fn structure_declaration_then_value() {
        let s = Variable::structure("s")
            .with_variable(Variable::with_value("name", ScalarValue::String("a\"b".into())))
            .unwrap();
        assert_eq!(
            print_value(&s, "", true),
            "Structure {\n    String name;\n} s = { \"a\"b\" };\n"
        );
    }

    #[test]
    fn grid_lists_array_then_maps() {
        let data = Variable::array_with_values(
            "sst",
            PrimitiveBuffer::from(vec![1.0f64, 2.0]),
            vec![Dimension::named("lat", 2)],
        )
        .unwrap();
        let lat = Variable::array_with_values(
            "lat",
            PrimitiveBuffer::from(vec![-10i16, 10]),
            vec![Dimension::named("lat", 2)],
        )
        .unwrap();
        let grid = Variable::grid("sst", data).unwrap().with_variable(lat).unwrap();

        assert_eq!(
            print_value(&grid, "", false),
            "{  Array: {1.000000, 2.000000} Maps: {-10, 10} }"
        );
    }

    #[test]
    fn sequence_and_structure_array() {
        let mut seq = Variable::sequence("obs")
            .with_variable(Variable::scalar("t", ScalarType::UInt32))
            .unwrap();
        let row = seq.as_sequence().unwrap().new_row();
        seq.push_row(row).unwrap();
        assert_eq!(print_value(&seq, "", false), "{ { 0 } }");

        let pt = Variable::structure("pt")
            .with_variable(Variable::scalar("x", ScalarType::Int8))
            .unwrap();
        let pts = Variable::array_of("pts", pt, vec![Dimension::new(2)]).unwrap();
        assert_eq!(print_value(&pts, "", false), "{{ 0 }, { 0 }}");
    }
}
