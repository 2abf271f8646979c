//! The typed variable tree.
//!
//! This module defines [`Variable`], the single recursive node type used to
//! describe both the shape and the values of a dataset. Every node carries a
//! name, a process-unique [`VarId`], an optional parent id and a [`VarKind`]
//! selecting one of the variants:
//!
//! - `Scalar`: one typed value.
//! - `Array`: dimensioned storage of scalars or of container clones.
//! - `Structure`: ordered, uniquely-named members.
//! - `Sequence`: a per-row shape plus the rows materialized so far.
//! - `Grid`: a data array plus named coordinate map arrays.
//!
//! # Ownership
//!
//! Containers own their members outright. The parent link is only an id;
//! resolve it against the owning root with [`Variable::parent_in`]. Cloning
//! a node copies the whole subtree, assigns fresh ids and re-parents the
//! copied members to the clone.
//!
//! # Example
//! ```rust
//! use dapvar::{ScalarType, ScalarValue, Variable};
//!
//! let mut s = Variable::structure("s");
//! s.add_variable(Variable::scalar("x", ScalarType::Int32)).unwrap();
//! s.lookup_mut("x").unwrap().set_value(ScalarValue::Int32(5)).unwrap();
//!
//! assert_eq!(s.lookup("x").unwrap().value(), Some(&ScalarValue::Int32(5)));
//! ```
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{DapError, Result};

pub mod array;
pub mod buffer;
pub mod container;
pub mod name;
pub mod scalar;

use array::{ArrayData, ArrayVariable, Dimension};
use buffer::{BufferError, PrimitiveBuffer};
use container::{Grid, Sequence, Structure};
use scalar::{ScalarType, ScalarValue};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identifier of a node, used for parent links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(u64);

impl VarId {
    fn next() -> Self {
        VarId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VarKind {
    Scalar(ScalarValue),
    Array(ArrayVariable),
    Structure(Structure),
    Sequence(Sequence),
    Grid(Grid),
}

#[derive(Debug)]
pub struct Variable {
    id: VarId,
    name: String,
    parent: Option<VarId>,
    kind: VarKind,
}

impl Variable {
    fn from_kind(name: impl Into<String>, kind: VarKind) -> Self {
        let mut var = Self {
            id: VarId::next(),
            name: name.into(),
            parent: None,
            kind,
        };
        var.adopt_members();
        var
    }

    /// A scalar holding the default value of `ty`.
    pub fn scalar(name: impl Into<String>, ty: ScalarType) -> Self {
        Self::from_kind(name, VarKind::Scalar(ty.default_value()))
    }

    pub fn with_value(name: impl Into<String>, value: ScalarValue) -> Self {
        Self::from_kind(name, VarKind::Scalar(value))
    }

    /// A primitive array of default values. At least one dimension is required.
    pub fn array(name: impl Into<String>, ty: ScalarType, dims: Vec<Dimension>) -> Result<Self> {
        let name = name.into();
        let len = check_dims(&name, &dims)?;
        let buf = PrimitiveBuffer::new(ty, len);
        let array = ArrayVariable::new(dims, ArrayData::Primitive(buf));
        Ok(Self::from_kind(name, VarKind::Array(array)))
    }

    /// A primitive array over an existing buffer whose length must match `dims`.
    pub fn array_with_values(
        name: impl Into<String>,
        values: PrimitiveBuffer,
        dims: Vec<Dimension>,
    ) -> Result<Self> {
        let name = name.into();
        let expected = check_dims(&name, &dims)?;
        if values.len() != expected {
            return Err(DapError::InvalidShape {
                variable: name,
                reason: format!(
                    "buffer holds {} values but the dimensions describe {expected}",
                    values.len()
                ),
            });
        }
        let array = ArrayVariable::new(dims, ArrayData::Primitive(values));
        Ok(Self::from_kind(name, VarKind::Array(array)))
    }

    /// An array whose elements are clones of the container `template`.
    pub fn array_of(name: impl Into<String>, template: Variable, dims: Vec<Dimension>) -> Result<Self> {
        let name = name.into();
        let len = check_dims(&name, &dims)?;
        if !template.is_container() {
            return Err(DapError::InvalidShape {
                variable: name,
                reason: format!(
                    "array elements must be containers, found {}",
                    template.type_name()
                ),
            });
        }

        let elements = (0..len).map(|_| template.clone()).collect();
        let data = ArrayData::Containers {
            template: Box::new(template),
            elements,
        };
        Ok(Self::from_kind(
            name,
            VarKind::Array(ArrayVariable::new(dims, data)),
        ))
    }

    pub fn structure(name: impl Into<String>) -> Self {
        Self::from_kind(name, VarKind::Structure(Structure::default()))
    }

    pub fn sequence(name: impl Into<String>) -> Self {
        Self::from_kind(name, VarKind::Sequence(Sequence::default()))
    }

    /// A grid over the data array `array`; maps are attached with [`Variable::add_variable`].
    pub fn grid(name: impl Into<String>, array: Variable) -> Result<Self> {
        if !matches!(array.kind, VarKind::Array(_)) {
            return Err(DapError::InvalidShape {
                variable: name.into(),
                reason: format!("grid data must be an Array, found {}", array.type_name()),
            });
        }
        Ok(Self::from_kind(
            name,
            VarKind::Grid(Grid {
                members: vec![array],
            }),
        ))
    }

    pub fn id(&self) -> VarId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn parent(&self) -> Option<VarId> {
        self.parent
    }

    pub fn kind(&self) -> &VarKind {
        &self.kind
    }

    pub(crate) fn kind_mut(&mut self) -> &mut VarKind {
        &mut self.kind
    }

    /// Name of the variant as written in declarations.
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            VarKind::Scalar(value) => value.scalar_type().name(),
            VarKind::Array(_) => "Array",
            VarKind::Structure(_) => "Structure",
            VarKind::Sequence(_) => "Sequence",
            VarKind::Grid(_) => "Grid",
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(
            self.kind,
            VarKind::Structure(_) | VarKind::Sequence(_) | VarKind::Grid(_)
        )
    }

    /// Direct members of a container: Structure children, Sequence columns
    /// or Grid array followed by its maps.
    pub fn children(&self) -> Option<&[Variable]> {
        match &self.kind {
            VarKind::Structure(s) => Some(&s.children),
            VarKind::Sequence(s) => Some(&s.columns),
            VarKind::Grid(g) => Some(&g.members),
            VarKind::Scalar(_) | VarKind::Array(_) => None,
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut [Variable]> {
        match &mut self.kind {
            VarKind::Structure(s) => Some(&mut s.children),
            VarKind::Sequence(s) => Some(&mut s.columns),
            VarKind::Grid(g) => Some(&mut g.members),
            VarKind::Scalar(_) | VarKind::Array(_) => None,
        }
    }

    pub fn child(&self, index: usize) -> Option<&Variable> {
        self.children().and_then(|c| c.get(index))
    }

    /// Attaches `child` as the last member of this container. Grids accept
    /// map arrays only; Sequences only before any row is materialized.
    pub fn add_variable(&mut self, mut child: Variable) -> Result<()> {
        child.parent = Some(self.id);
        match &mut self.kind {
            VarKind::Structure(s) => s.children.push(child),
            VarKind::Sequence(s) => {
                if !s.rows.is_empty() {
                    return Err(DapError::InvalidShape {
                        variable: self.name.clone(),
                        reason: "cannot change the row shape once rows exist".into(),
                    });
                }
                s.columns.push(child);
            }
            VarKind::Grid(g) => {
                if !matches!(child.kind, VarKind::Array(_)) {
                    return Err(DapError::InvalidShape {
                        variable: self.name.clone(),
                        reason: format!("grid map '{}' must be an Array", child.name),
                    });
                }
                g.members.push(child);
            }
            VarKind::Scalar(_) | VarKind::Array(_) => {
                return Err(DapError::NotAContainer {
                    name: self.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Builder form of [`Variable::add_variable`].
    pub fn with_variable(mut self, child: Variable) -> Result<Self> {
        self.add_variable(child)?;
        Ok(self)
    }

    /// Number of direct members, or of scalar leaves under this node when
    /// `leaves` is set. Scalars and arrays count as one.
    pub fn element_count(&self, leaves: bool) -> usize {
        match self.children() {
            None => 1,
            Some(children) if !leaves => children.len(),
            Some(children) => children.iter().map(|c| c.element_count(true)).sum(),
        }
    }

    pub fn value(&self) -> Option<&ScalarValue> {
        match &self.kind {
            VarKind::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// Replaces a scalar's value; the type tag must not change.
    pub fn set_value(&mut self, value: ScalarValue) -> Result<()> {
        match &mut self.kind {
            VarKind::Scalar(slot) if slot.scalar_type() == value.scalar_type() => {
                *slot = value;
                Ok(())
            }
            VarKind::Scalar(slot) => Err(DapError::TypeMismatch {
                variable: self.name.clone(),
                expected: slot.scalar_type().to_string(),
                found: value.scalar_type().to_string(),
            }),
            _ => Err(DapError::TypeMismatch {
                variable: self.name.clone(),
                expected: "scalar".into(),
                found: self.type_name().into(),
            }),
        }
    }

    pub fn as_array(&self) -> Option<&ArrayVariable> {
        match &self.kind {
            VarKind::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match &self.kind {
            VarKind::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    pub fn as_grid(&self) -> Option<&Grid> {
        match &self.kind {
            VarKind::Grid(grid) => Some(grid),
            _ => None,
        }
    }

    fn array_or_err(&self) -> Result<&ArrayVariable> {
        self.as_array().ok_or_else(|| DapError::TypeMismatch {
            variable: self.name.clone(),
            expected: "Array".into(),
            found: self.type_name().into(),
        })
    }

    fn index_error(&self, reason: String) -> DapError {
        DapError::IndexOutOfRange {
            variable: self.name.clone(),
            reason,
        }
    }

    /// Row-major linear offset of `indices` within this array.
    pub fn flatten_index(&self, indices: &[usize]) -> Result<usize> {
        self.array_or_err()?
            .locate(indices)
            .map_err(|reason| self.index_error(reason))
    }

    /// Inverse of [`Variable::flatten_index`].
    pub fn unflatten_index(&self, offset: usize) -> Result<Vec<usize>> {
        self.array_or_err()?
            .unlocate(offset)
            .map_err(|reason| self.index_error(reason))
    }

    /// Value of a primitive array element.
    pub fn get(&self, indices: &[usize]) -> Result<ScalarValue> {
        let offset = self.flatten_index(indices)?;
        self.array_or_err()?
            .value_at(offset)
            .ok_or_else(|| DapError::TypeMismatch {
                variable: self.name.clone(),
                expected: "array of scalars".into(),
                found: "array of containers".into(),
            })
    }

    pub fn set(&mut self, indices: &[usize], value: ScalarValue) -> Result<()> {
        let offset = self.flatten_index(indices)?;
        let name = self.name.clone();
        let VarKind::Array(array) = &mut self.kind else {
            return Err(not_an_array(name));
        };
        match array.data_mut() {
            ArrayData::Primitive(buf) => buf.set(offset, value).map_err(|e| match e {
                BufferError::OutOfBounds { index, len } => DapError::IndexOutOfRange {
                    variable: name,
                    reason: format!("offset {index} out of range for {len} elements"),
                },
                BufferError::Type { expected, found } => DapError::TypeMismatch {
                    variable: name,
                    expected: expected.to_string(),
                    found: found.to_string(),
                },
            }),
            ArrayData::Containers { .. } => Err(DapError::TypeMismatch {
                variable: name,
                expected: "array of scalars".into(),
                found: "array of containers".into(),
            }),
        }
    }

    /// Container element of an array of containers.
    pub fn element(&self, indices: &[usize]) -> Result<&Variable> {
        let offset = self.flatten_index(indices)?;
        self.array_or_err()?
            .elements()
            .get(offset)
            .ok_or_else(|| DapError::TypeMismatch {
                variable: self.name.clone(),
                expected: "array of containers".into(),
                found: "array of scalars".into(),
            })
    }

    pub fn element_mut(&mut self, indices: &[usize]) -> Result<&mut Variable> {
        let offset = self.flatten_index(indices)?;
        let name = self.name.clone();
        match &mut self.kind {
            VarKind::Array(array) => match array.data_mut() {
                ArrayData::Containers { elements, .. } => {
                    elements.get_mut(offset).ok_or(DapError::IndexOutOfRange {
                        variable: name,
                        reason: format!("offset {offset} out of range"),
                    })
                }
                ArrayData::Primitive(_) => Err(DapError::TypeMismatch {
                    variable: name,
                    expected: "array of containers".into(),
                    found: "array of scalars".into(),
                }),
            },
            _ => Err(not_an_array(name)),
        }
    }

    /// Appends a materialized row to a Sequence. Every member must have the
    /// shape of its column: name, scalar type, dimension sizes and nested
    /// members.
    pub fn push_row(&mut self, row: Vec<Variable>) -> Result<()> {
        let id = self.id;
        let name = self.name.clone();
        let type_name = self.type_name();
        let VarKind::Sequence(seq) = &mut self.kind else {
            return Err(DapError::TypeMismatch {
                variable: name,
                expected: "Sequence".into(),
                found: type_name.into(),
            });
        };

        let matches = row.len() == seq.columns.len()
            && row
                .iter()
                .zip(&seq.columns)
                .all(|(v, c)| same_shape(v, c));
        if !matches {
            return Err(DapError::DataMismatch {
                variable: name,
                reason: "row does not match the sequence columns".into(),
            });
        }

        seq.append_row(id, row);
        Ok(())
    }

    /// Depth-first search of this subtree, including array elements and
    /// sequence rows.
    pub fn find(&self, id: VarId) -> Option<&Variable> {
        if self.id == id {
            return Some(self);
        }
        self.members().find_map(|m| m.find(id))
    }

    /// Resolves this node's parent link against `root`.
    pub fn parent_in<'a>(&self, root: &'a Variable) -> Option<&'a Variable> {
        self.parent.and_then(|id| root.find(id))
    }

    /// Dotted path from `root` down to this node, skipping anonymous ancestors.
    pub fn long_name(&self, root: &Variable) -> String {
        let mut parts = vec![self.name.as_str()];
        let mut current = self.parent_in(root);
        while let Some(var) = current {
            if !var.name.is_empty() {
                parts.push(var.name.as_str());
            }
            current = var.parent_in(root);
        }
        parts.reverse();
        parts.join(".")
    }

    /// Every node owned directly by this one.
    fn members(&self) -> Box<dyn Iterator<Item = &Variable> + '_> {
        match &self.kind {
            VarKind::Scalar(_) => Box::new(std::iter::empty()),
            VarKind::Array(array) => match array.data() {
                ArrayData::Primitive(_) => Box::new(std::iter::empty()),
                ArrayData::Containers { template, elements } => {
                    Box::new(std::iter::once(template.as_ref()).chain(elements.iter()))
                }
            },
            VarKind::Structure(s) => Box::new(s.children.iter()),
            VarKind::Sequence(s) => Box::new(s.columns.iter().chain(s.rows.iter().flatten())),
            VarKind::Grid(g) => Box::new(g.members.iter()),
        }
    }

    fn adopt_members(&mut self) {
        let id = self.id;
        let members: Vec<&mut Variable> = match &mut self.kind {
            VarKind::Scalar(_) => Vec::new(),
            VarKind::Array(array) => match array.data_mut() {
                ArrayData::Primitive(_) => Vec::new(),
                ArrayData::Containers { template, elements } => std::iter::once(template.as_mut())
                    .chain(elements.iter_mut())
                    .collect(),
            },
            VarKind::Structure(s) => s.children.iter_mut().collect(),
            VarKind::Sequence(s) => s
                .columns
                .iter_mut()
                .chain(s.rows.iter_mut().flatten())
                .collect(),
            VarKind::Grid(g) => g.members.iter_mut().collect(),
        };
        for member in members {
            member.parent = Some(id);
        }
    }
}

fn not_an_array(variable: String) -> DapError {
    DapError::TypeMismatch {
        variable,
        expected: "Array".into(),
        found: "a non-array variable".into(),
    }
}

/// Element count of `dims`. At least one dimension is required and the
/// product must fit in a `usize`.
fn check_dims(name: &str, dims: &[Dimension]) -> Result<usize> {
    if dims.is_empty() {
        return Err(DapError::InvalidShape {
            variable: name.to_string(),
            reason: "an array needs at least one dimension".into(),
        });
    }
    dims.iter()
        .try_fold(1usize, |count, dim| count.checked_mul(dim.size))
        .ok_or_else(|| DapError::InvalidShape {
            variable: name.to_string(),
            reason: "element count overflows the address space".into(),
        })
}

/// Same name and same shape, ignoring values and ids.
fn same_shape(a: &Variable, b: &Variable) -> bool {
    if a.name != b.name {
        return false;
    }
    match (&a.kind, &b.kind) {
        (VarKind::Scalar(x), VarKind::Scalar(y)) => x.scalar_type() == y.scalar_type(),
        (VarKind::Array(x), VarKind::Array(y)) => {
            x.shape() == y.shape()
                && match (x.data(), y.data()) {
                    (ArrayData::Primitive(p), ArrayData::Primitive(q)) => {
                        p.scalar_type() == q.scalar_type()
                    }
                    (
                        ArrayData::Containers { template: t, .. },
                        ArrayData::Containers { template: u, .. },
                    ) => same_shape(t, u),
                    _ => false,
                }
        }
        (VarKind::Structure(_), VarKind::Structure(_))
        | (VarKind::Sequence(_), VarKind::Sequence(_))
        | (VarKind::Grid(_), VarKind::Grid(_)) => {
            let (x, y) = (a.children().unwrap_or_default(), b.children().unwrap_or_default());
            x.len() == y.len() && x.iter().zip(y).all(|(m, n)| same_shape(m, n))
        }
        _ => false,
    }
}

/// Deep copy with fresh ids. The copy is detached: it has no parent until
/// it is added to a container.
impl Clone for Variable {
    fn clone(&self) -> Self {
        Self::from_kind(self.name.clone(), self.kind.clone())
    }
}

/// Structural and value equality; ids and parent links are ignored.
impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.kind == other.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> Variable {
        Variable::structure("pt")
            .with_variable(Variable::scalar("x", ScalarType::Int32))
            .unwrap()
            .with_variable(Variable::scalar("y", ScalarType::Float64))
            .unwrap()
    }

    #[test]
    fn add_variable_sets_parent() {
        let mut s = Variable::structure("s");
        s.add_variable(Variable::scalar("x", ScalarType::Int32))
            .unwrap();

        let x = s.child(0).unwrap();
        assert_eq!(x.parent(), Some(s.id()));
        assert_eq!(x.parent_in(&s).unwrap().name(), "s");
    }

    #[test]
    fn scalar_is_not_a_container() {
        let mut x = Variable::scalar("x", ScalarType::Int32);
        let err = x
            .add_variable(Variable::scalar("y", ScalarType::Int32))
            .unwrap_err();
        assert!(matches!(err, DapError::NotAContainer { name } if name == "x"));
    }

    #[test]
    fn clone_is_independent() {
        let mut original = point();
        let mut copy = original.clone();
        assert_eq!(original, copy);
        assert_ne!(original.id(), copy.id());

        copy.lookup_mut("x")
            .unwrap()
            .set_value(ScalarValue::Int32(7))
            .unwrap();
        assert_eq!(
            original.lookup("x").unwrap().value(),
            Some(&ScalarValue::Int32(0))
        );

        original
            .lookup_mut("y")
            .unwrap()
            .set_value(ScalarValue::Float64(1.5))
            .unwrap();
        assert_eq!(
            copy.lookup("y").unwrap().value(),
            Some(&ScalarValue::Float64(0.0))
        );
    }

    #[test]
    fn clone_reparents_members() {
        let original = point();
        let copy = original.clone();

        assert_eq!(copy.parent(), None);
        for child in copy.children().unwrap() {
            assert_eq!(child.parent(), Some(copy.id()));
        }
        for child in original.children().unwrap() {
            assert_eq!(child.parent(), Some(original.id()));
        }
    }

    #[test]
    fn clone_of_primitive_array_does_not_alias() {
        let original = Variable::array_with_values(
            "v",
            PrimitiveBuffer::from(vec![1i16, 2, 3]),
            vec![Dimension::new(3)],
        )
        .unwrap();
        let mut copy = original.clone();
        copy.set(&[1], ScalarValue::Int16(-2)).unwrap();

        assert_eq!(original.get(&[1]).unwrap(), ScalarValue::Int16(2));
        assert_eq!(copy.get(&[1]).unwrap(), ScalarValue::Int16(-2));
    }

    #[test]
    fn array_of_containers_holds_clones() {
        let mut array = Variable::array_of("pts", point(), vec![Dimension::new(2)]).unwrap();
        array
            .element_mut(&[1])
            .unwrap()
            .lookup_mut("x")
            .unwrap()
            .set_value(ScalarValue::Int32(9))
            .unwrap();

        let first = array.element(&[0]).unwrap();
        let second = array.element(&[1]).unwrap();
        assert_eq!(first.lookup("x").unwrap().value(), Some(&ScalarValue::Int32(0)));
        assert_eq!(second.lookup("x").unwrap().value(), Some(&ScalarValue::Int32(9)));
        assert_eq!(second.parent(), Some(array.id()));
    }

    #[test]
    fn array_rejects_scalar_template_and_no_dims() {
        let err = Variable::array_of(
            "bad",
            Variable::scalar("x", ScalarType::Int32),
            vec![Dimension::new(2)],
        )
        .unwrap_err();
        assert!(matches!(err, DapError::InvalidShape { .. }));

        let err = Variable::array("bad", ScalarType::Int32, vec![]).unwrap_err();
        assert!(matches!(err, DapError::InvalidShape { .. }));
    }

    #[test]
    fn buffer_length_must_match_dims() {
        let err = Variable::array_with_values(
            "v",
            PrimitiveBuffer::from(vec![1i32, 2]),
            vec![Dimension::new(3)],
        )
        .unwrap_err();
        assert!(matches!(err, DapError::InvalidShape { .. }));
    }

    #[test]
    fn set_rejects_wrong_type_and_index() {
        let mut v = Variable::array("v", ScalarType::Int32, vec![Dimension::new(2)]).unwrap();
        assert!(matches!(
            v.set(&[0], ScalarValue::Float64(1.0)),
            Err(DapError::TypeMismatch { .. })
        ));
        assert!(matches!(
            v.set(&[2], ScalarValue::Int32(1)),
            Err(DapError::IndexOutOfRange { .. })
        ));
        assert!(matches!(
            v.flatten_index(&[0, 0]),
            Err(DapError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn set_value_keeps_type_tag() {
        let mut x = Variable::scalar("x", ScalarType::UInt16);
        let err = x.set_value(ScalarValue::Int16(1)).unwrap_err();
        assert!(matches!(err, DapError::TypeMismatch { .. }));
    }

    #[test]
    fn sequence_rows_must_match_columns() {
        let mut seq = Variable::sequence("seq")
            .with_variable(Variable::scalar("a", ScalarType::Int32))
            .unwrap();

        let row = seq.as_sequence().unwrap().new_row();
        seq.push_row(row).unwrap();
        let bad = vec![Variable::scalar("b", ScalarType::Int32)];
        assert!(matches!(
            seq.push_row(bad),
            Err(DapError::DataMismatch { .. })
        ));

        assert_eq!(seq.as_sequence().unwrap().row_count(), 1);
        let err = seq
            .add_variable(Variable::scalar("c", ScalarType::Int32))
            .unwrap_err();
        assert!(matches!(err, DapError::InvalidShape { .. }));
    }

    #[test]
    fn sequence_rows_must_match_column_shapes() {
        let mut seq = Variable::sequence("seq")
            .with_variable(Variable::array("a", ScalarType::Int16, vec![Dimension::new(2)]).unwrap())
            .unwrap()
            .with_variable(point())
            .unwrap();

        let wider = vec![
            Variable::array("a", ScalarType::Int16, vec![Dimension::new(5)]).unwrap(),
            point(),
        ];
        assert!(matches!(seq.push_row(wider), Err(DapError::DataMismatch { .. })));

        let retyped = vec![
            Variable::array("a", ScalarType::Float64, vec![Dimension::new(2)]).unwrap(),
            point(),
        ];
        assert!(matches!(seq.push_row(retyped), Err(DapError::DataMismatch { .. })));

        let extra_member = point()
            .with_variable(Variable::scalar("z", ScalarType::Int32))
            .unwrap();
        let regrown = vec![
            Variable::array("a", ScalarType::Int16, vec![Dimension::new(2)]).unwrap(),
            extra_member,
        ];
        assert!(matches!(seq.push_row(regrown), Err(DapError::DataMismatch { .. })));
        assert_eq!(seq.as_sequence().unwrap().row_count(), 0);

        let mut row = seq.as_sequence().unwrap().new_row();
        row[0].set(&[1], ScalarValue::Int16(7)).unwrap();
        seq.push_row(row).unwrap();
        assert_eq!(seq.as_sequence().unwrap().row_count(), 1);
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        let dims = vec![Dimension::new(usize::MAX), Dimension::new(2)];
        let err = Variable::array("v", ScalarType::Int32, dims.clone()).unwrap_err();
        assert!(matches!(err, DapError::InvalidShape { ref variable, .. } if variable == "v"));

        let err = Variable::array_of("pts", point(), dims).unwrap_err();
        assert!(matches!(err, DapError::InvalidShape { .. }));
    }

    #[test]
    fn grid_accepts_only_array_maps() {
        let data = Variable::array("sst", ScalarType::Float32, vec![Dimension::named("lat", 2)]).unwrap();
        let mut grid = Variable::grid("sst", data).unwrap();
        let lat = Variable::array("lat", ScalarType::Float64, vec![Dimension::named("lat", 2)]).unwrap();
        grid.add_variable(lat).unwrap();

        let err = grid
            .add_variable(Variable::scalar("bad", ScalarType::Int32))
            .unwrap_err();
        assert!(matches!(err, DapError::InvalidShape { .. }));
        assert_eq!(grid.as_grid().unwrap().maps().len(), 1);
        assert_eq!(grid.as_grid().unwrap().array().name(), "sst");
    }

    #[test]
    fn long_name_walks_parents() {
        let inner = Variable::structure("inner")
            .with_variable(Variable::scalar("x", ScalarType::Int32))
            .unwrap();
        let root = Variable::structure("")
            .with_variable(Variable::structure("outer").with_variable(inner).unwrap())
            .unwrap();

        let x = root.lookup("outer.inner.x").unwrap();
        assert_eq!(x.long_name(&root), "outer.inner.x");
    }

    #[test]
    fn element_count_counts_leaves() {
        let nested = Variable::structure("n")
            .with_variable(point())
            .unwrap()
            .with_variable(Variable::scalar("z", ScalarType::Byte))
            .unwrap();

        assert_eq!(nested.element_count(false), 2);
        assert_eq!(nested.element_count(true), 3);
        assert_eq!(Variable::scalar("z", ScalarType::Byte).element_count(true), 1);
    }
}
