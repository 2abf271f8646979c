use std::fmt;

/// Type tag of a scalar variable or of a primitive array's elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Byte,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
    String,
    Url,
}

impl ScalarType {
    pub const ALL: [ScalarType; 13] = [
        ScalarType::Byte,
        ScalarType::Int8,
        ScalarType::UInt8,
        ScalarType::Int16,
        ScalarType::UInt16,
        ScalarType::Int32,
        ScalarType::UInt32,
        ScalarType::Int64,
        ScalarType::UInt64,
        ScalarType::Float32,
        ScalarType::Float64,
        ScalarType::String,
        ScalarType::Url,
    ];

    /// Name used in declarations.
    pub fn name(self) -> &'static str {
        match self {
            ScalarType::Byte => "Byte",
            ScalarType::Int8 => "Int8",
            ScalarType::UInt8 => "UInt8",
            ScalarType::Int16 => "Int16",
            ScalarType::UInt16 => "UInt16",
            ScalarType::Int32 => "Int32",
            ScalarType::UInt32 => "UInt32",
            ScalarType::Int64 => "Int64",
            ScalarType::UInt64 => "UInt64",
            ScalarType::Float32 => "Float32",
            ScalarType::Float64 => "Float64",
            ScalarType::String => "String",
            ScalarType::Url => "Url",
        }
    }

    pub fn default_value(self) -> ScalarValue {
        match self {
            ScalarType::Byte => ScalarValue::Byte(0),
            ScalarType::Int8 => ScalarValue::Int8(0),
            ScalarType::UInt8 => ScalarValue::UInt8(0),
            ScalarType::Int16 => ScalarValue::Int16(0),
            ScalarType::UInt16 => ScalarValue::UInt16(0),
            ScalarType::Int32 => ScalarValue::Int32(0),
            ScalarType::UInt32 => ScalarValue::UInt32(0),
            ScalarType::Int64 => ScalarValue::Int64(0),
            ScalarType::UInt64 => ScalarValue::UInt64(0),
            ScalarType::Float32 => ScalarValue::Float32(0.0),
            ScalarType::Float64 => ScalarValue::Float64(0.0),
            ScalarType::String => ScalarValue::String(String::new()),
            ScalarType::Url => ScalarValue::Url(String::new()),
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Value slot of a scalar variable. The variant doubles as the type tag.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Byte(u8),
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    String(String),
    Url(String),
}

impl ScalarValue {
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            ScalarValue::Byte(_) => ScalarType::Byte,
            ScalarValue::Int8(_) => ScalarType::Int8,
            ScalarValue::UInt8(_) => ScalarType::UInt8,
            ScalarValue::Int16(_) => ScalarType::Int16,
            ScalarValue::UInt16(_) => ScalarType::UInt16,
            ScalarValue::Int32(_) => ScalarType::Int32,
            ScalarValue::UInt32(_) => ScalarType::UInt32,
            ScalarValue::Int64(_) => ScalarType::Int64,
            ScalarValue::UInt64(_) => ScalarType::UInt64,
            ScalarValue::Float32(_) => ScalarType::Float32,
            ScalarValue::Float64(_) => ScalarType::Float64,
            ScalarValue::String(_) => ScalarType::String,
            ScalarValue::Url(_) => ScalarType::Url,
        }
    }
}

/// Canonical text form: decimal integers, six-decimal floats, quoted strings.
impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Byte(v) | ScalarValue::UInt8(v) => write!(f, "{v}"),
            ScalarValue::Int8(v) => write!(f, "{v}"),
            ScalarValue::Int16(v) => write!(f, "{v}"),
            ScalarValue::UInt16(v) => write!(f, "{v}"),
            ScalarValue::Int32(v) => write!(f, "{v}"),
            ScalarValue::UInt32(v) => write!(f, "{v}"),
            ScalarValue::Int64(v) => write!(f, "{v}"),
            ScalarValue::UInt64(v) => write!(f, "{v}"),
            ScalarValue::Float32(v) => write!(f, "{v:.6}"),
            ScalarValue::Float64(v) => write!(f, "{v:.6}"),
            ScalarValue::String(s) | ScalarValue::Url(s) => write!(f, "\"{s}\""),
        }
    }
}
