//! Dimensioned variables.
//!
//! An [`ArrayVariable`] pairs an ordered list of [`Dimension`]s with its
//! element storage. Scalar elements live densely in a [`PrimitiveBuffer`];
//! container elements are independent clones of a template, one per
//! flattened index.
//!
//! # Indexing
//!
//! Index tuples map to linear offsets in row-major order: the last
//! dimension varies fastest. The wire codec and the renderers walk elements
//! in exactly this order.
use super::{
    Variable,
    buffer::PrimitiveBuffer,
    scalar::{ScalarType, ScalarValue},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub size: usize,
    pub name: Option<String>,
}

impl Dimension {
    pub fn new(size: usize) -> Self {
        Self { size, name: None }
    }

    pub fn named(name: impl Into<String>, size: usize) -> Self {
        Self {
            size,
            name: Some(name.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    Primitive(PrimitiveBuffer),
    Containers {
        template: Box<Variable>,
        elements: Vec<Variable>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayVariable {
    dims: Vec<Dimension>,
    data: ArrayData,
}

/// Number of elements described by `dims`.
fn element_count(dims: &[Dimension]) -> usize {
    dims.iter().map(|d| d.size).product()
}

impl ArrayVariable {
    pub(crate) fn new(dims: Vec<Dimension>, data: ArrayData) -> Self {
        Self { dims, data }
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dims
    }

    pub fn shape(&self) -> Vec<usize> {
        self.dims.iter().map(|d| d.size).collect()
    }

    /// Total element count, the product of the dimension sizes.
    pub fn len(&self) -> usize {
        element_count(&self.dims)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut ArrayData {
        &mut self.data
    }

    /// Scalar type of a primitive array, `None` for arrays of containers.
    pub fn element_type(&self) -> Option<ScalarType> {
        self.buffer().map(PrimitiveBuffer::scalar_type)
    }

    pub fn buffer(&self) -> Option<&PrimitiveBuffer> {
        match &self.data {
            ArrayData::Primitive(buf) => Some(buf),
            ArrayData::Containers { .. } => None,
        }
    }

    pub fn template(&self) -> Option<&Variable> {
        match &self.data {
            ArrayData::Primitive(_) => None,
            ArrayData::Containers { template, .. } => Some(template.as_ref()),
        }
    }

    pub fn elements(&self) -> &[Variable] {
        match &self.data {
            ArrayData::Primitive(_) => &[],
            ArrayData::Containers { elements, .. } => elements,
        }
    }

    /// Element whose name drives flat-name computation: the first element,
    /// or the template when the array is empty.
    pub(crate) fn first_logical(&self) -> Option<&Variable> {
        match &self.data {
            ArrayData::Primitive(_) => None,
            ArrayData::Containers { template, elements } => {
                elements.first().or(Some(template.as_ref()))
            }
        }
    }

    pub(crate) fn locate(&self, indices: &[usize]) -> Result<usize, String> {
        if indices.len() != self.dims.len() {
            return Err(format!(
                "expected {} indices, got {}",
                self.dims.len(),
                indices.len()
            ));
        }

        let mut offset = 0;
        for (i, (index, dim)) in indices.iter().zip(&self.dims).enumerate() {
            if *index >= dim.size {
                return Err(format!(
                    "index {index} out of range for dimension {i} of size {}",
                    dim.size
                ));
            }
            offset = offset * dim.size + index;
        }
        Ok(offset)
    }

    pub(crate) fn unlocate(&self, mut offset: usize) -> Result<Vec<usize>, String> {
        let len = self.len();
        if offset >= len {
            return Err(format!("offset {offset} out of range for {len} elements"));
        }

        let mut indices = vec![0; self.dims.len()];
        for (slot, dim) in indices.iter_mut().zip(&self.dims).rev() {
            *slot = offset % dim.size;
            offset /= dim.size;
        }
        Ok(indices)
    }

    pub(crate) fn value_at(&self, offset: usize) -> Option<ScalarValue> {
        self.buffer().and_then(|buf| buf.get(offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(shape: &[usize]) -> ArrayVariable {
        let dims: Vec<Dimension> = shape.iter().map(|s| Dimension::new(*s)).collect();
        let len = element_count(&dims);
        ArrayVariable::new(
            dims,
            ArrayData::Primitive(PrimitiveBuffer::new(ScalarType::Int32, len)),
        )
    }

    #[test]
    fn locate_is_row_major() {
        let array = grid(&[2, 3, 4]);
        assert_eq!(array.locate(&[0, 0, 0]).unwrap(), 0);
        assert_eq!(array.locate(&[0, 0, 1]).unwrap(), 1);
        assert_eq!(array.locate(&[0, 1, 0]).unwrap(), 4);
        assert_eq!(array.locate(&[1, 0, 0]).unwrap(), 12);
        assert_eq!(array.locate(&[1, 2, 3]).unwrap(), 23);
    }

    #[test]
    fn locate_is_a_bijection() {
        let array = grid(&[3, 1, 2, 4]);
        let mut seen = vec![false; array.len()];
        let mut expected = 0;

        for a in 0..3 {
            for b in 0..1 {
                for c in 0..2 {
                    for d in 0..4 {
                        let offset = array.locate(&[a, b, c, d]).unwrap();
                        assert_eq!(offset, expected);
                        assert!(!seen[offset]);
                        seen[offset] = true;
                        assert_eq!(array.unlocate(offset).unwrap(), vec![a, b, c, d]);
                        expected += 1;
                    }
                }
            }
        }
        assert!(seen.into_iter().all(|s| s));
    }

    #[test]
    fn locate_rejects_bad_tuples() {
        let array = grid(&[2, 3]);
        assert!(array.locate(&[2, 0]).is_err());
        assert!(array.locate(&[0, 3]).is_err());
        assert!(array.locate(&[0]).is_err());
        assert!(array.locate(&[0, 0, 0]).is_err());
        assert!(array.unlocate(6).is_err());
    }

    #[test]
    fn zero_sized_dimension_has_no_elements() {
        let array = grid(&[4, 0]);
        assert!(array.is_empty());
        assert!(array.unlocate(0).is_err());
    }
}
