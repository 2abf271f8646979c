//! Flat ASCII rendering of variable values.
//!
//! Text clients consume values as lines of comma-separated fields, each
//! optionally labelled by a dotted "flat name". Arrays of scalars are
//! labelled once with their dimension sizes (`s.v[3]`), then printed one
//! innermost row per line, each row prefixed by the indices of its outer
//! dimensions (`[0], 1, 2, 3`). String and Url values are double-quoted.
//!
//! Arrays of containers are named after their first element: the flat name
//! recurses into that element with the array's dotted name as the new root,
//! and the array's own dimensions are not appended.
use std::fmt::Write;

use crate::variable::{VarKind, Variable, array::{ArrayData, ArrayVariable}};

/// Dotted name of `var` below `root`, with dimension suffixes for arrays of scalars.
pub fn flat_name(var: &Variable, root: Option<&str>) -> String {
    let base = join(root, var.name());

    let VarKind::Array(array) = var.kind() else {
        return base;
    };
    match array.first_logical() {
        Some(element) => flat_name(element, Some(&base)),
        None => {
            let mut name = base;
            for dim in array.dimensions() {
                let _ = write!(name, "[{}]", dim.size);
            }
            name
        }
    }
}

fn join(root: Option<&str>, name: &str) -> String {
    match root.filter(|r| !r.is_empty()) {
        Some(root) if name.is_empty() => root.to_string(),
        Some(root) => format!("{root}.{name}"),
        None => name.to_string(),
    }
}

/// Renders the value of `var`. With `add_name` the output is labelled by
/// the flat name below `root`; with `newline` it ends in a line break.
pub fn render(var: &Variable, add_name: bool, root: Option<&str>, newline: bool) -> String {
    let mut out = String::new();
    write_ascii(&mut out, var, add_name, root, newline);
    out
}

fn write_ascii(out: &mut String, var: &Variable, add_name: bool, root: Option<&str>, newline: bool) {
    match var.kind() {
        VarKind::Scalar(value) => {
            if add_name {
                let _ = write!(out, "{}, ", flat_name(var, root));
            }
            let _ = write!(out, "{value}");
        }
        VarKind::Array(array) => {
            if add_name {
                out.push_str(&flat_name(var, root));
                out.push('\n');
            }
            let shape = array.shape();
            write_rows(out, array, add_name, "", 0, &shape);
        }
        VarKind::Structure(_) | VarKind::Grid(_) => {
            if add_name {
                let _ = write!(out, "{}, ", flat_name(var, root));
            }
            write_members(out, var.children().unwrap_or_default());
        }
        VarKind::Sequence(seq) => {
            if add_name {
                let _ = write!(out, "{}, ", flat_name(var, root));
            }
            out.push_str("{ ");
            for (i, row) in seq.rows().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_members(out, row);
            }
            out.push_str(" }");
        }
    }

    if newline {
        out.push('\n');
    }
}

fn write_members(out: &mut String, members: &[Variable]) {
    out.push_str("{ ");
    for (i, member) in members.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_ascii(out, member, false, None, false);
    }
    out.push_str(" }");
}

/// Walks `shape` in row-major order starting at flattened `index`; returns
/// the index following the last element written.
fn write_rows(
    out: &mut String,
    array: &ArrayVariable,
    add_name: bool,
    label: &str,
    mut index: usize,
    shape: &[usize],
) -> usize {
    let Some((&size, inner)) = shape.split_first() else {
        return index;
    };

    if !inner.is_empty() {
        for i in 0..size {
            let mut row_label = format!("{label}[{i}]");
            if inner.len() == 1 {
                row_label.push_str(", ");
            }
            index = write_rows(out, array, add_name, &row_label, index, inner);
        }
        return index;
    }

    if add_name {
        out.push_str(label);
    }
    for i in 0..size {
        // Unlabelled rows run on from the previous one.
        let separated = i > 0 || (!add_name && index > 0);
        match array.data() {
            ArrayData::Primitive(buf) => {
                if separated {
                    out.push_str(", ");
                }
                if let Some(value) = buf.get(index) {
                    let _ = write!(out, "{value}");
                }
            }
            ArrayData::Containers { elements, .. } => {
                if separated {
                    out.push('\n');
                }
                if let Some(element) = elements.get(index) {
                    write_ascii(out, element, false, None, false);
                }
            }
        }
        index += 1;
    }
    if add_name {
        out.push('\n');
    }
    index
}
