use super::{VarId, Variable};

/// Fixed, ordered set of uniquely-named members.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Structure {
    pub(crate) children: Vec<Variable>,
}

impl Structure {
    pub fn children(&self) -> &[Variable] {
        &self.children
    }
}

/// Stream of rows that all share the shape described by `columns`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sequence {
    pub(crate) columns: Vec<Variable>,
    pub(crate) rows: Vec<Vec<Variable>>,
}

impl Sequence {
    /// Per-row shape.
    pub fn columns(&self) -> &[Variable] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Variable>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[Variable]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// A detached, value-less row shaped like the columns.
    pub fn new_row(&self) -> Vec<Variable> {
        self.columns.to_vec()
    }

    /// Appends a complete row owned by the sequence node `owner`.
    pub(crate) fn append_row(&mut self, owner: VarId, mut row: Vec<Variable>) {
        for var in row.iter_mut() {
            var.parent = Some(owner);
        }
        self.rows.push(row);
    }

    pub(crate) fn clear_rows(&mut self) {
        self.rows.clear();
    }
}

/// Data array plus its coordinate maps. Member 0 is the data array.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub(crate) members: Vec<Variable>,
}

impl Grid {
    pub fn array(&self) -> &Variable {
        &self.members[0]
    }

    pub fn maps(&self) -> &[Variable] {
        &self.members[1..]
    }
}
