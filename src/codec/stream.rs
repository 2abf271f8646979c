use std::io::{self, Read, Write};

use bincode::{
    config::{BigEndian, Configuration, Fixint},
    decode_from_std_read, encode_into_std_write,
    error::DecodeError,
};

use crate::{
    error::{DapError, Result},
    variable::scalar::{ScalarType, ScalarValue},
};

fn wire_config() -> Configuration<BigEndian, Fixint> {
    bincode::config::standard()
        .with_big_endian()
        .with_fixed_int_encoding()
}

/// Padding that brings `len` bytes up to a 4-byte boundary.
fn padding(len: usize) -> usize {
    (4 - len % 4) % 4
}

/// Writes fixed-width network-order values to an output sink.
pub struct WireWriter<W: Write> {
    sink: W,
    config: Configuration<BigEndian, Fixint>,
}

impl<W: Write> WireWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            config: wire_config(),
        }
    }

    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        encode_into_std_write(value, &mut self.sink, self.config)?;
        Ok(())
    }

    /// Element or row count; fails if it does not fit the u32 wire word.
    pub fn write_count(&mut self, count: usize, variable: &str) -> Result<()> {
        let count = u32::try_from(count).map_err(|_| DapError::DataMismatch {
            variable: variable.to_string(),
            reason: format!("count {count} does not fit in a u32"),
        })?;
        self.write_u32(count)
    }

    pub fn write_marker(&mut self, marker: u8, width: usize) -> Result<()> {
        let mut word = vec![0; width.max(1)];
        word[0] = marker;
        self.sink.write_all(&word)?;
        Ok(())
    }

    pub fn write_scalar(&mut self, value: &ScalarValue, variable: &str) -> Result<()> {
        match value {
            ScalarValue::Byte(v) | ScalarValue::UInt8(v) => {
                encode_into_std_write(*v, &mut self.sink, self.config)?
            }
            ScalarValue::Int8(v) => encode_into_std_write(*v, &mut self.sink, self.config)?,
            ScalarValue::Int16(v) => encode_into_std_write(*v, &mut self.sink, self.config)?,
            ScalarValue::UInt16(v) => encode_into_std_write(*v, &mut self.sink, self.config)?,
            ScalarValue::Int32(v) => encode_into_std_write(*v, &mut self.sink, self.config)?,
            ScalarValue::UInt32(v) => encode_into_std_write(*v, &mut self.sink, self.config)?,
            ScalarValue::Int64(v) => encode_into_std_write(*v, &mut self.sink, self.config)?,
            ScalarValue::UInt64(v) => encode_into_std_write(*v, &mut self.sink, self.config)?,
            ScalarValue::Float32(v) => encode_into_std_write(*v, &mut self.sink, self.config)?,
            ScalarValue::Float64(v) => encode_into_std_write(*v, &mut self.sink, self.config)?,
            ScalarValue::String(s) | ScalarValue::Url(s) => {
                self.write_count(s.len(), variable)?;
                self.sink.write_all(s.as_bytes())?;
                self.sink.write_all(&[0; 3][..padding(s.len())])?;
                return Ok(());
            }
        };
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }
}

/// Reads fixed-width network-order values from an input source.
pub struct WireReader<R: Read> {
    source: R,
    config: Configuration<BigEndian, Fixint>,
}

impl<R: Read> WireReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            config: wire_config(),
        }
    }

    fn decode<T: bincode::Decode<()>>(&mut self, variable: &str) -> Result<T> {
        decode_from_std_read(&mut self.source, self.config).map_err(|e| decode_error(e, variable))
    }

    pub fn read_u32(&mut self, variable: &str) -> Result<u32> {
        self.decode(variable)
    }

    pub fn read_count(&mut self, variable: &str) -> Result<usize> {
        Ok(self.read_u32(variable)? as usize)
    }

    /// Reads a `width`-byte marker word and returns its leading byte.
    pub fn read_marker(&mut self, width: usize, variable: &str) -> Result<u8> {
        let mut word = vec![0; width.max(1)];
        self.read_exact(&mut word, variable)?;
        Ok(word[0])
    }

    pub fn read_scalar(&mut self, ty: ScalarType, variable: &str) -> Result<ScalarValue> {
        Ok(match ty {
            ScalarType::Byte => ScalarValue::Byte(self.decode(variable)?),
            ScalarType::Int8 => ScalarValue::Int8(self.decode(variable)?),
            ScalarType::UInt8 => ScalarValue::UInt8(self.decode(variable)?),
            ScalarType::Int16 => ScalarValue::Int16(self.decode(variable)?),
            ScalarType::UInt16 => ScalarValue::UInt16(self.decode(variable)?),
            ScalarType::Int32 => ScalarValue::Int32(self.decode(variable)?),
            ScalarType::UInt32 => ScalarValue::UInt32(self.decode(variable)?),
            ScalarType::Int64 => ScalarValue::Int64(self.decode(variable)?),
            ScalarType::UInt64 => ScalarValue::UInt64(self.decode(variable)?),
            ScalarType::Float32 => ScalarValue::Float32(self.decode(variable)?),
            ScalarType::Float64 => ScalarValue::Float64(self.decode(variable)?),
            ScalarType::String => ScalarValue::String(self.read_string(variable)?),
            ScalarType::Url => ScalarValue::Url(self.read_string(variable)?),
        })
    }

    fn read_string(&mut self, variable: &str) -> Result<String> {
        let len = self.read_count(variable)?;
        let mut bytes = Vec::new();
        (&mut self.source)
            .take(len as u64)
            .read_to_end(&mut bytes)?;
        if bytes.len() < len {
            return Err(DapError::UnexpectedEndOfStream {
                variable: variable.to_string(),
            });
        }

        let mut pad = [0; 3];
        self.read_exact(&mut pad[..padding(len)], variable)?;

        String::from_utf8(bytes).map_err(|e| DapError::DataMismatch {
            variable: variable.to_string(),
            reason: format!("string is not valid UTF-8: {e}"),
        })
    }

    fn read_exact(&mut self, buf: &mut [u8], variable: &str) -> Result<()> {
        self.source.read_exact(buf).map_err(|e| io_error(e, variable))
    }
}

fn io_error(err: io::Error, variable: &str) -> DapError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        DapError::UnexpectedEndOfStream {
            variable: variable.to_string(),
        }
    } else {
        DapError::Io(err)
    }
}

fn decode_error(err: DecodeError, variable: &str) -> DapError {
    match err {
        DecodeError::UnexpectedEnd { .. } => DapError::UnexpectedEndOfStream {
            variable: variable.to_string(),
        },
        DecodeError::Io { inner, .. } => io_error(inner, variable),
        other => DapError::Deserialize(other),
    }
}
