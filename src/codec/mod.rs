//! Binary wire codec for the variable tree.
//!
//! The codec serializes a populated [`Variable`] tree to a byte sink and
//! fills an already-shaped tree from a byte source. No type information
//! travels on the wire: both sides must agree on the shape out of band,
//! normally through the dataset's declaration.
//!
//! # Binary Format
//!
//! - Scalars use their natural width in network byte order. String and Url
//!   values are a u32 byte length, the UTF-8 bytes and zero padding to a
//!   4-byte boundary.
//! - Arrays write their element count once as a u32, then every element in
//!   row-major order.
//! - Structures and Grids write their members in declared order.
//! - Sequences frame their rows as selected by the [`ProtocolVersion`]
//!   (see [`version`]).
//!
//! # Cancellation
//!
//! [`WireCodec::decode`] polls a [`CancelToken`] before every element, member
//! and row. A cancelled decode leaves the tree partially filled; the caller
//! should discard it. Sequence rows are only appended once fully read.
//!
//! # Example
//! ```rust
//! use std::io::Cursor;
//! use dapvar::{CancelToken, ProtocolVersion, ScalarType, ScalarValue, Variable, WireCodec};
//!
//! let mut x = Variable::scalar("x", ScalarType::Int32);
//! let codec = WireCodec::new(ProtocolVersion::V2);
//!
//! codec
//!     .decode(&mut x, &mut Cursor::new(vec![0, 0, 0, 42]), &CancelToken::new())
//!     .unwrap();
//! assert_eq!(x.value(), Some(&ScalarValue::Int32(42)));
//! ```
use std::io::{Read, Write};

use log::{debug, trace, warn};

use crate::{
    error::{DapError, Result},
    variable::{VarId, VarKind, Variable, array::ArrayData, container::Sequence},
};

pub mod cancel;
pub mod stream;
pub mod version;

use cancel::CancelToken;
use stream::{WireReader, WireWriter};
use version::{END_OF_SEQUENCE, ProtocolVersion, START_OF_INSTANCE, SequenceFraming};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WireCodec {
    version: ProtocolVersion,
}

impl WireCodec {
    pub fn new(version: ProtocolVersion) -> Self {
        Self { version }
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    pub fn encode<W: Write>(&self, var: &Variable, sink: &mut W) -> Result<()> {
        debug!(
            "encoding {} '{}' with {:?}",
            var.type_name(),
            var.name(),
            self.version
        );
        let mut writer = WireWriter::new(sink);
        self.write_variable(var, &mut writer)?;
        writer.flush()
    }

    pub fn decode<R: Read>(
        &self,
        var: &mut Variable,
        source: &mut R,
        cancel: &CancelToken,
    ) -> Result<()> {
        debug!(
            "decoding {} '{}' with {:?}",
            var.type_name(),
            var.name(),
            self.version
        );
        let mut reader = WireReader::new(source);
        let res = self.read_variable(var, &mut reader, cancel);

        if let Err(e) = &res {
            warn!("decoding '{}' stopped: {e}", var.name());
        }
        res
    }

    fn write_variable<W: Write>(&self, var: &Variable, w: &mut WireWriter<W>) -> Result<()> {
        match var.kind() {
            VarKind::Scalar(value) => w.write_scalar(value, var.name()),
            VarKind::Array(array) => {
                w.write_count(array.len(), var.name())?;
                match array.data() {
                    ArrayData::Primitive(buf) => {
                        for value in buf.values() {
                            w.write_scalar(&value, var.name())?;
                        }
                    }
                    ArrayData::Containers { elements, .. } => self.write_members(elements, w)?,
                }
                Ok(())
            }
            VarKind::Structure(s) => self.write_members(s.children(), w),
            VarKind::Grid(g) => self.write_members(&g.members, w),
            VarKind::Sequence(seq) => self.write_sequence(seq, var.name(), w),
        }
    }

    fn write_members<W: Write>(&self, members: &[Variable], w: &mut WireWriter<W>) -> Result<()> {
        for member in members {
            self.write_variable(member, w)?;
        }
        Ok(())
    }

    fn write_sequence<W: Write>(
        &self,
        seq: &Sequence,
        name: &str,
        w: &mut WireWriter<W>,
    ) -> Result<()> {
        let framing = self.version.sequence_framing();
        trace!("writing {} rows of '{name}' as {framing:?}", seq.row_count());

        if let SequenceFraming::Counted = framing {
            w.write_count(seq.row_count(), name)?;
        }
        for row in seq.rows() {
            if let SequenceFraming::Markers { width } = framing {
                w.write_marker(START_OF_INSTANCE, width)?;
            }
            self.write_members(row, w)?;
        }
        if let SequenceFraming::Markers { width } = framing {
            w.write_marker(END_OF_SEQUENCE, width)?;
        }
        Ok(())
    }

    fn read_variable<R: Read>(
        &self,
        var: &mut Variable,
        r: &mut WireReader<R>,
        cancel: &CancelToken,
    ) -> Result<()> {
        let name = var.name().to_string();
        let id = var.id();

        match var.kind_mut() {
            VarKind::Scalar(slot) => {
                *slot = r.read_scalar(slot.scalar_type(), &name)?;
            }
            VarKind::Array(array) => {
                let declared = array.len();
                let count = r.read_count(&name)?;
                if count != declared {
                    return Err(DapError::DataMismatch {
                        variable: name,
                        reason: format!("stream holds {count} elements, declared {declared}"),
                    });
                }
                trace!("reading {count} elements of '{name}'");

                match array.data_mut() {
                    ArrayData::Primitive(buf) => {
                        let ty = buf.scalar_type();
                        for i in 0..declared {
                            cancel.check()?;
                            let value = r.read_scalar(ty, &name)?;
                            buf.set(i, value).map_err(|e| DapError::DataMismatch {
                                variable: name.clone(),
                                reason: format!("{e:?}"),
                            })?;
                        }
                    }
                    ArrayData::Containers { elements, .. } => {
                        self.read_members(elements, r, cancel)?
                    }
                }
            }
            VarKind::Structure(s) => self.read_members(&mut s.children, r, cancel)?,
            VarKind::Grid(g) => self.read_members(&mut g.members, r, cancel)?,
            VarKind::Sequence(seq) => self.read_sequence(seq, id, &name, r, cancel)?,
        }
        Ok(())
    }

    fn read_members<R: Read>(
        &self,
        members: &mut [Variable],
        r: &mut WireReader<R>,
        cancel: &CancelToken,
    ) -> Result<()> {
        for member in members.iter_mut() {
            cancel.check()?;
            self.read_variable(member, r, cancel)?;
        }
        Ok(())
    }

    fn read_sequence<R: Read>(
        &self,
        seq: &mut Sequence,
        id: VarId,
        name: &str,
        r: &mut WireReader<R>,
        cancel: &CancelToken,
    ) -> Result<()> {
        let framing = self.version.sequence_framing();
        debug!("reading sequence '{name}' as {framing:?}");
        seq.clear_rows();

        match framing {
            SequenceFraming::Counted => {
                let rows = r.read_count(name)?;
                for _ in 0..rows {
                    cancel.check()?;
                    let row = self.read_row(seq, r, cancel)?;
                    seq.append_row(id, row);
                }
            }
            SequenceFraming::Markers { width } => loop {
                cancel.check()?;
                match r.read_marker(width, name)? {
                    START_OF_INSTANCE => {
                        let row = self.read_row(seq, r, cancel)?;
                        seq.append_row(id, row);
                        trace!("read row {} of '{name}'", seq.row_count());
                    }
                    END_OF_SEQUENCE => break,
                    marker => {
                        return Err(DapError::DataMismatch {
                            variable: name.to_string(),
                            reason: format!("unexpected sequence marker {marker:#04x}"),
                        });
                    }
                }
            },
        }
        Ok(())
    }

    fn read_row<R: Read>(
        &self,
        seq: &Sequence,
        r: &mut WireReader<R>,
        cancel: &CancelToken,
    ) -> Result<Vec<Variable>> {
        let mut row = seq.new_row();
        self.read_members(&mut row, r, cancel)?;
        Ok(row)
    }
}
