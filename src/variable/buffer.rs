//! Dense storage for the elements of a primitive array.
//!
//! A [`PrimitiveBuffer`] holds exactly one value slot per flattened array
//! index. Its length is fixed at construction from the array's shape and
//! never changes afterwards; values are replaced in place.
use super::scalar::{ScalarType, ScalarValue};

#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveBuffer {
    Byte(Vec<u8>),
    Int8(Vec<i8>),
    UInt8(Vec<u8>),
    Int16(Vec<i16>),
    UInt16(Vec<u16>),
    Int32(Vec<i32>),
    UInt32(Vec<u32>),
    Int64(Vec<i64>),
    UInt64(Vec<u64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    String(Vec<String>),
    Url(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum BufferError {
    OutOfBounds { index: usize, len: usize },
    Type { expected: ScalarType, found: ScalarType },
}

macro_rules! each_buffer {
    ($buf:expr, $v:ident => $body:expr) => {
        match $buf {
            PrimitiveBuffer::Byte($v) => $body,
            PrimitiveBuffer::Int8($v) => $body,
            PrimitiveBuffer::UInt8($v) => $body,
            PrimitiveBuffer::Int16($v) => $body,
            PrimitiveBuffer::UInt16($v) => $body,
            PrimitiveBuffer::Int32($v) => $body,
            PrimitiveBuffer::UInt32($v) => $body,
            PrimitiveBuffer::Int64($v) => $body,
            PrimitiveBuffer::UInt64($v) => $body,
            PrimitiveBuffer::Float32($v) => $body,
            PrimitiveBuffer::Float64($v) => $body,
            PrimitiveBuffer::String($v) => $body,
            PrimitiveBuffer::Url($v) => $body,
        }
    };
}

macro_rules! impl_from_vec {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<Vec<$t>> for PrimitiveBuffer {
                fn from(values: Vec<$t>) -> Self {
                    PrimitiveBuffer::$variant(values)
                }
            }
        )*
    };
}

impl_from_vec!(
    u8 => Byte,
    i8 => Int8,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
    String => String,
);

impl PrimitiveBuffer {
    /// Allocates `len` default-valued slots of type `ty`.
    pub fn new(ty: ScalarType, len: usize) -> Self {
        match ty {
            ScalarType::Byte => PrimitiveBuffer::Byte(vec![0; len]),
            ScalarType::Int8 => PrimitiveBuffer::Int8(vec![0; len]),
            ScalarType::UInt8 => PrimitiveBuffer::UInt8(vec![0; len]),
            ScalarType::Int16 => PrimitiveBuffer::Int16(vec![0; len]),
            ScalarType::UInt16 => PrimitiveBuffer::UInt16(vec![0; len]),
            ScalarType::Int32 => PrimitiveBuffer::Int32(vec![0; len]),
            ScalarType::UInt32 => PrimitiveBuffer::UInt32(vec![0; len]),
            ScalarType::Int64 => PrimitiveBuffer::Int64(vec![0; len]),
            ScalarType::UInt64 => PrimitiveBuffer::UInt64(vec![0; len]),
            ScalarType::Float32 => PrimitiveBuffer::Float32(vec![0.0; len]),
            ScalarType::Float64 => PrimitiveBuffer::Float64(vec![0.0; len]),
            ScalarType::String => PrimitiveBuffer::String(vec![String::new(); len]),
            ScalarType::Url => PrimitiveBuffer::Url(vec![String::new(); len]),
        }
    }

    pub fn len(&self) -> usize {
        each_buffer!(self, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn scalar_type(&self) -> ScalarType {
        match self {
            PrimitiveBuffer::Byte(_) => ScalarType::Byte,
            PrimitiveBuffer::Int8(_) => ScalarType::Int8,
            PrimitiveBuffer::UInt8(_) => ScalarType::UInt8,
            PrimitiveBuffer::Int16(_) => ScalarType::Int16,
            PrimitiveBuffer::UInt16(_) => ScalarType::UInt16,
            PrimitiveBuffer::Int32(_) => ScalarType::Int32,
            PrimitiveBuffer::UInt32(_) => ScalarType::UInt32,
            PrimitiveBuffer::Int64(_) => ScalarType::Int64,
            PrimitiveBuffer::UInt64(_) => ScalarType::UInt64,
            PrimitiveBuffer::Float32(_) => ScalarType::Float32,
            PrimitiveBuffer::Float64(_) => ScalarType::Float64,
            PrimitiveBuffer::String(_) => ScalarType::String,
            PrimitiveBuffer::Url(_) => ScalarType::Url,
        }
    }

    pub fn get(&self, index: usize) -> Option<ScalarValue> {
        match self {
            PrimitiveBuffer::Byte(v) => v.get(index).map(|x| ScalarValue::Byte(*x)),
            PrimitiveBuffer::Int8(v) => v.get(index).map(|x| ScalarValue::Int8(*x)),
            PrimitiveBuffer::UInt8(v) => v.get(index).map(|x| ScalarValue::UInt8(*x)),
            PrimitiveBuffer::Int16(v) => v.get(index).map(|x| ScalarValue::Int16(*x)),
            PrimitiveBuffer::UInt16(v) => v.get(index).map(|x| ScalarValue::UInt16(*x)),
            PrimitiveBuffer::Int32(v) => v.get(index).map(|x| ScalarValue::Int32(*x)),
            PrimitiveBuffer::UInt32(v) => v.get(index).map(|x| ScalarValue::UInt32(*x)),
            PrimitiveBuffer::Int64(v) => v.get(index).map(|x| ScalarValue::Int64(*x)),
            PrimitiveBuffer::UInt64(v) => v.get(index).map(|x| ScalarValue::UInt64(*x)),
            PrimitiveBuffer::Float32(v) => v.get(index).map(|x| ScalarValue::Float32(*x)),
            PrimitiveBuffer::Float64(v) => v.get(index).map(|x| ScalarValue::Float64(*x)),
            PrimitiveBuffer::String(v) => v.get(index).map(|x| ScalarValue::String(x.clone())),
            PrimitiveBuffer::Url(v) => v.get(index).map(|x| ScalarValue::Url(x.clone())),
        }
    }

    pub(crate) fn set(&mut self, index: usize, value: ScalarValue) -> Result<(), BufferError> {
        let len = self.len();
        if index >= len {
            return Err(BufferError::OutOfBounds { index, len });
        }

        match (self, value) {
            (PrimitiveBuffer::Byte(v), ScalarValue::Byte(x)) => v[index] = x,
            (PrimitiveBuffer::Int8(v), ScalarValue::Int8(x)) => v[index] = x,
            (PrimitiveBuffer::UInt8(v), ScalarValue::UInt8(x)) => v[index] = x,
            (PrimitiveBuffer::Int16(v), ScalarValue::Int16(x)) => v[index] = x,
            (PrimitiveBuffer::UInt16(v), ScalarValue::UInt16(x)) => v[index] = x,
            (PrimitiveBuffer::Int32(v), ScalarValue::Int32(x)) => v[index] = x,
            (PrimitiveBuffer::UInt32(v), ScalarValue::UInt32(x)) => v[index] = x,
            (PrimitiveBuffer::Int64(v), ScalarValue::Int64(x)) => v[index] = x,
            (PrimitiveBuffer::UInt64(v), ScalarValue::UInt64(x)) => v[index] = x,
            (PrimitiveBuffer::Float32(v), ScalarValue::Float32(x)) => v[index] = x,
            (PrimitiveBuffer::Float64(v), ScalarValue::Float64(x)) => v[index] = x,
            (PrimitiveBuffer::String(v), ScalarValue::String(x)) => v[index] = x,
            (PrimitiveBuffer::Url(v), ScalarValue::Url(x)) => v[index] = x,
            (buf, value) => {
                return Err(BufferError::Type {
                    expected: buf.scalar_type(),
                    found: value.scalar_type(),
                });
            }
        }
        Ok(())
    }

    pub fn values(&self) -> impl Iterator<Item = ScalarValue> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_default_filled() {
        let buf = PrimitiveBuffer::new(ScalarType::String, 3);
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.get(2), Some(ScalarValue::String(String::new())));
        assert_eq!(buf.get(3), None);
    }

    #[test]
    fn set_replaces_in_place() {
        let mut buf = PrimitiveBuffer::from(vec![1i32, 2, 3]);
        buf.set(1, ScalarValue::Int32(20)).unwrap();

        let values: Vec<ScalarValue> = buf.values().collect();
        assert_eq!(
            values,
            vec![
                ScalarValue::Int32(1),
                ScalarValue::Int32(20),
                ScalarValue::Int32(3)
            ]
        );
    }

    #[test]
    fn set_rejects_other_types() {
        let mut buf = PrimitiveBuffer::new(ScalarType::Int16, 1);
        let err = buf.set(0, ScalarValue::Int32(1)).unwrap_err();
        assert_eq!(
            err,
            BufferError::Type {
                expected: ScalarType::Int16,
                found: ScalarType::Int32
            }
        );
    }

    #[test]
    fn set_rejects_out_of_bounds() {
        let mut buf = PrimitiveBuffer::new(ScalarType::Byte, 2);
        let err = buf.set(2, ScalarValue::Byte(1)).unwrap_err();
        assert_eq!(err, BufferError::OutOfBounds { index: 2, len: 2 });
    }
}
