//! GGUF container parsing — header, metadata table, tensor directory.
//!
//! The file layout is little-endian throughout: magic "GGUF", u32
//! version, u64 tensor count, u64 metadata count, then metadata key/value
//! entries, then tensor directory entries, then alignment padding, then
//! tensor data. Parsing touches only the header region; tensor bytes stay
//! on disk until the mmap layer hands out views.

use byteorder::{LittleEndian, ReadBytesExt};
use std::collections::HashMap;
use std::io::Read;

use tinfer_core::error::{GgufError, Result};

use crate::quant::GgmlType;

pub const GGUF_MAGIC: u32 = 0x4655_4747; // "GGUF" little-endian
pub const DEFAULT_ALIGNMENT: u64 = 32;

/// A typed metadata value.
#[derive(Debug, Clone, PartialEq)]
pub enum GgufValue {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    F32(f32),
    Bool(bool),
    String(String),
    Array(Vec<GgufValue>),
    U64(u64),
    I64(i64),
    F64(f64),
}

impl GgufValue {
    pub fn as_u32(&self) -> Option<u32> {
        match *self {
            GgufValue::U8(v) => Some(v as u32),
            GgufValue::I8(v) => Some(v as u32),
            GgufValue::U16(v) => Some(v as u32),
            GgufValue::I16(v) => Some(v as u32),
            GgufValue::U32(v) => Some(v),
            GgufValue::I32(v) => Some(v as u32),
            GgufValue::U64(v) => Some(v as u32),
            GgufValue::I64(v) => Some(v as u32),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            GgufValue::U32(v) => Some(v as u64),
            GgufValue::U64(v) => Some(v),
            GgufValue::I32(v) => Some(v as u64),
            GgufValue::I64(v) => Some(v as u64),
            _ => self.as_u32().map(u64::from),
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match *self {
            GgufValue::F32(v) => Some(v),
            GgufValue::F64(v) => Some(v as f32),
            GgufValue::U32(v) => Some(v as f32),
            GgufValue::I32(v) => Some(v as f32),
            GgufValue::U64(v) => Some(v as f32),
            GgufValue::I64(v) => Some(v as f32),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            GgufValue::Bool(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            GgufValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[GgufValue]> {
        match self {
            GgufValue::Array(a) => Some(a),
            _ => None,
        }
    }
}

/// One entry of the tensor directory.
#[derive(Debug, Clone)]
pub struct GgufTensorInfo {
    pub name: String,
    /// dims[0] is the contiguous (column) dimension.
    pub dims: Vec<u64>,
    pub ggml_type: GgmlType,
    /// Byte offset relative to the start of the data section.
    pub offset: u64,
}

impl GgufTensorInfo {
    /// Total element count.
    pub fn element_count(&self) -> u64 {
        self.dims.iter().product()
    }

    /// Encoded byte size of the whole tensor.
    pub fn size_bytes(&self) -> u64 {
        self.ggml_type.row_bytes(self.element_count() as usize) as u64
    }

    /// Columns (contiguous dimension).
    pub fn cols(&self) -> usize {
        self.dims.first().copied().unwrap_or(1) as usize
    }

    /// Rows = product of the remaining dimensions.
    pub fn rows(&self) -> usize {
        self.dims.iter().skip(1).product::<u64>().max(1) as usize
    }
}

/// Parsed GGUF header: metadata store plus tensor directory.
#[derive(Debug)]
pub struct GgufFile {
    pub version: u32,
    pub metadata: HashMap<String, GgufValue>,
    pub tensors: Vec<GgufTensorInfo>,
    /// Absolute file offset where the tensor data section begins.
    pub data_offset: u64,
    pub alignment: u64,
}

impl GgufFile {
    /// Parse the header from a reader positioned at the file start.
    pub fn parse<R: Read>(reader: &mut R) -> Result<Self> {
        let mut counter = CountingReader::new(reader);
        let r = &mut counter;

        let magic = read_u32(r, "magic")?;
        if magic != GGUF_MAGIC {
            return Err(GgufError::BadMagic { found: magic }.into());
        }
        let version = read_u32(r, "version")?;
        if !(2..=3).contains(&version) {
            return Err(GgufError::UnsupportedVersion(version).into());
        }

        let tensor_count = read_u64(r, "tensor count")?;
        let metadata_count = read_u64(r, "metadata count")?;

        let mut metadata = HashMap::with_capacity(metadata_count as usize);
        for _ in 0..metadata_count {
            let key = read_string(r, "metadata key")?;
            let value_type = read_u32(r, "metadata value type")?;
            let value = read_value(r, value_type)?;
            metadata.insert(key, value);
        }

        let alignment = metadata
            .get("general.alignment")
            .and_then(GgufValue::as_u64)
            .filter(|&a| a > 0)
            .unwrap_or(DEFAULT_ALIGNMENT);

        let mut tensors = Vec::with_capacity(tensor_count as usize);
        for _ in 0..tensor_count {
            let name = read_string(r, "tensor name")?;
            let n_dims = read_u32(r, "tensor n_dims")?;
            let mut dims = Vec::with_capacity(n_dims as usize);
            for _ in 0..n_dims {
                dims.push(read_u64(r, "tensor dims")?);
            }
            let type_id = read_u32(r, "tensor type")?;
            let ggml_type =
                GgmlType::from_id(type_id).ok_or(GgufError::UnknownQuantType(type_id))?;
            let offset = read_u64(r, "tensor offset")?;
            tensors.push(GgufTensorInfo {
                name,
                dims,
                ggml_type,
                offset,
            });
        }

        let header_end = counter.consumed;
        let data_offset = header_end.div_ceil(alignment) * alignment;

        Ok(Self {
            version,
            metadata,
            tensors,
            data_offset,
            alignment,
        })
    }

    /// `general.architecture`, e.g. "llama" or "deepseek2".
    pub fn architecture(&self) -> Option<&str> {
        self.metadata.get("general.architecture")?.as_str()
    }

    pub fn get_u32(&self, key: &str) -> Option<u32> {
        self.metadata.get(key)?.as_u32()
    }

    pub fn get_f32(&self, key: &str) -> Option<f32> {
        self.metadata.get(key)?.as_f32()
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.metadata.get(key)?.as_bool()
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key)?.as_str()
    }

    pub fn find_tensor(&self, name: &str) -> Option<(usize, &GgufTensorInfo)> {
        self.tensors
            .iter()
            .enumerate()
            .find(|(_, t)| t.name == name)
    }
}

/// Wraps a reader and counts consumed bytes so the data-section offset can
/// be computed without seeking.
struct CountingReader<'a, R: Read> {
    inner: &'a mut R,
    consumed: u64,
}

impl<'a, R: Read> CountingReader<'a, R> {
    fn new(inner: &'a mut R) -> Self {
        Self { inner, consumed: 0 }
    }
}

impl<R: Read> Read for CountingReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.consumed += n as u64;
        Ok(n)
    }
}

fn read_u32<R: Read>(r: &mut R, context: &'static str) -> Result<u32> {
    r.read_u32::<LittleEndian>()
        .map_err(|_| GgufError::Truncated { context }.into())
}

fn read_u64<R: Read>(r: &mut R, context: &'static str) -> Result<u64> {
    r.read_u64::<LittleEndian>()
        .map_err(|_| GgufError::Truncated { context }.into())
}

fn read_string<R: Read>(r: &mut R, context: &'static str) -> Result<String> {
    let len = read_u64(r, context)?;
    let mut buf = vec![0u8; len as usize];
    r.read_exact(&mut buf)
        .map_err(|_| GgufError::Truncated { context })?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn read_value<R: Read>(r: &mut R, value_type: u32) -> Result<GgufValue> {
    let ctx = "metadata value";
    let value = match value_type {
        0 => GgufValue::U8(r.read_u8().map_err(|_| GgufError::Truncated { context: ctx })?),
        1 => GgufValue::I8(r.read_i8().map_err(|_| GgufError::Truncated { context: ctx })?),
        2 => GgufValue::U16(
            r.read_u16::<LittleEndian>()
                .map_err(|_| GgufError::Truncated { context: ctx })?,
        ),
        3 => GgufValue::I16(
            r.read_i16::<LittleEndian>()
                .map_err(|_| GgufError::Truncated { context: ctx })?,
        ),
        4 => GgufValue::U32(read_u32(r, ctx)?),
        5 => GgufValue::I32(
            r.read_i32::<LittleEndian>()
                .map_err(|_| GgufError::Truncated { context: ctx })?,
        ),
        6 => GgufValue::F32(
            r.read_f32::<LittleEndian>()
                .map_err(|_| GgufError::Truncated { context: ctx })?,
        ),
        7 => GgufValue::Bool(
            r.read_u8().map_err(|_| GgufError::Truncated { context: ctx })? != 0,
        ),
        8 => GgufValue::String(read_string(r, ctx)?),
        9 => {
            let elem_type = read_u32(r, ctx)?;
            let len = read_u64(r, ctx)?;
            let mut items = Vec::with_capacity(len.min(1 << 24) as usize);
            for _ in 0..len {
                items.push(read_value(r, elem_type)?);
            }
            GgufValue::Array(items)
        }
        10 => GgufValue::U64(read_u64(r, ctx)?),
        11 => GgufValue::I64(
            r.read_i64::<LittleEndian>()
                .map_err(|_| GgufError::Truncated { context: ctx })?,
        ),
        12 => GgufValue::F64(
            r.read_f64::<LittleEndian>()
                .map_err(|_| GgufError::Truncated { context: ctx })?,
        ),
        other => return Err(GgufError::UnknownValueType(other).into()),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn push_string(buf: &mut Vec<u8>, s: &str) {
        buf.extend_from_slice(&(s.len() as u64).to_le_bytes());
        buf.extend_from_slice(s.as_bytes());
    }

    fn minimal_header() -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&GGUF_MAGIC.to_le_bytes());
        buf.extend_from_slice(&3u32.to_le_bytes()); // version
        buf.extend_from_slice(&1u64.to_le_bytes()); // tensor count
        buf.extend_from_slice(&1u64.to_le_bytes()); // metadata count

        // metadata: general.architecture = "llama"
        push_string(&mut buf, "general.architecture");
        buf.extend_from_slice(&8u32.to_le_bytes()); // string type
        push_string(&mut buf, "llama");

        // tensor: token_embd.weight, 2x4 F32 at offset 0
        push_string(&mut buf, "token_embd.weight");
        buf.extend_from_slice(&2u32.to_le_bytes());
        buf.extend_from_slice(&4u64.to_le_bytes()); // cols
        buf.extend_from_slice(&2u64.to_le_bytes()); // rows
        buf.extend_from_slice(&0u32.to_le_bytes()); // F32
        buf.extend_from_slice(&0u64.to_le_bytes());
        buf
    }

    #[test]
    fn parses_minimal_file() {
        let buf = minimal_header();
        let gguf = GgufFile::parse(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(gguf.version, 3);
        assert_eq!(gguf.architecture(), Some("llama"));
        assert_eq!(gguf.tensors.len(), 1);
        let t = &gguf.tensors[0];
        assert_eq!(t.name, "token_embd.weight");
        assert_eq!(t.cols(), 4);
        assert_eq!(t.rows(), 2);
        assert_eq!(t.element_count(), 8);
        assert_eq!(t.size_bytes(), 32);
        // data offset is aligned
        assert_eq!(gguf.data_offset % DEFAULT_ALIGNMENT, 0);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut buf = minimal_header();
        buf[0] = b'X';
        match GgufFile::parse(&mut Cursor::new(&buf)) {
            Err(tinfer_core::EngineError::Gguf(GgufError::BadMagic { .. })) => {}
            other => panic!("expected BadMagic, got {other:?}"),
        }
    }

    #[test]
    fn rejects_future_version() {
        let mut buf = minimal_header();
        buf[4..8].copy_from_slice(&9u32.to_le_bytes());
        match GgufFile::parse(&mut Cursor::new(&buf)) {
            Err(tinfer_core::EngineError::Gguf(GgufError::UnsupportedVersion(9))) => {}
            other => panic!("expected UnsupportedVersion, got {other:?}"),
        }
    }

    #[test]
    fn rejects_truncation() {
        let buf = minimal_header();
        let cut = &buf[..buf.len() - 6];
        match GgufFile::parse(&mut Cursor::new(cut)) {
            Err(tinfer_core::EngineError::Gguf(GgufError::Truncated { .. })) => {}
            other => panic!("expected Truncated, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_quant() {
        let mut buf = minimal_header();
        // tensor type field is 12 bytes from the end (type u32 + offset u64)
        let at = buf.len() - 12;
        buf[at..at + 4].copy_from_slice(&999u32.to_le_bytes());
        match GgufFile::parse(&mut Cursor::new(&buf)) {
            Err(tinfer_core::EngineError::Gguf(GgufError::UnknownQuantType(999))) => {}
            other => panic!("expected UnknownQuantType, got {other:?}"),
        }
    }
}
