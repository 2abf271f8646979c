pub mod codec;
pub mod error;
pub mod text;
pub mod variable;

pub use codec::{
    WireCodec,
    cancel::CancelToken,
    version::{ProtocolVersion, SequenceFraming},
};
pub use error::{DapError, Result};
pub use text::{declaration, flat_name, print_value, render};
pub use variable::{
    VarId, VarKind, Variable,
    array::{ArrayData, ArrayVariable, Dimension},
    buffer::PrimitiveBuffer,
    container::{Grid, Sequence, Structure},
    scalar::{ScalarType, ScalarValue},
};
