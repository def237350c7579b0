//! Memory-mapped model access.
//!
//! The GGUF file is mapped in segments of at most 1 GiB so that files
//! larger than a platform's maximum single mapping still load. Weight
//! bytes are never copied into process memory; tensors are `TensorView`s
//! into the shared mapping. Multi-byte reads that cross a segment
//! boundary are reassembled byte-wise, little-endian.

use memmap2::Mmap;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use tinfer_core::error::{EngineError, GgufError, Result};

use crate::gguf::GgufFile;

/// Maximum size of one mapping segment.
pub const SEGMENT_SIZE: u64 = 1 << 30;

/// The whole file as a sequence of mmap segments.
pub struct SegmentedMmap {
    segments: Vec<Mmap>,
    len: u64,
}

impl SegmentedMmap {
    pub fn map(file: &File) -> Result<Self> {
        let len = file.metadata()?.len();
        let mut segments = Vec::new();
        let mut offset = 0u64;
        while offset < len {
            let seg_len = (len - offset).min(SEGMENT_SIZE);
            // Safety: the file is opened read-only and weights are treated
            // as immutable for the engine's lifetime.
            let mmap = unsafe {
                memmap2::MmapOptions::new()
                    .offset(offset)
                    .len(seg_len as usize)
                    .map(file)
                    .map_err(|e| EngineError::ModelLoad(format!("mmap failed: {e}")))?
            };
            segments.push(mmap);
            offset += seg_len;
        }
        Ok(Self { segments, len })
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn byte(&self, offset: u64) -> u8 {
        let seg = (offset / SEGMENT_SIZE) as usize;
        let within = (offset % SEGMENT_SIZE) as usize;
        self.segments[seg][within]
    }

    /// Borrow a contiguous byte run, or None when it crosses a segment
    /// boundary.
    #[inline]
    pub fn contiguous(&self, offset: u64, len: usize) -> Option<&[u8]> {
        let seg = (offset / SEGMENT_SIZE) as usize;
        let within = (offset % SEGMENT_SIZE) as usize;
        let segment = self.segments.get(seg)?;
        if within + len <= segment.len() {
            Some(&segment[within..within + len])
        } else {
            None
        }
    }

    /// Copy `dst.len()` bytes starting at `offset`, handling boundary
    /// crossings.
    pub fn copy_into(&self, offset: u64, dst: &mut [u8]) {
        if let Some(src) = self.contiguous(offset, dst.len()) {
            dst.copy_from_slice(src);
            return;
        }
        for (i, b) in dst.iter_mut().enumerate() {
            *b = self.byte(offset + i as u64);
        }
    }
}

/// Immutable byte-addressable view of a tensor's data range.
///
/// Freely clonable and sharable; all reads are little-endian and
/// boundary-safe.
#[derive(Clone)]
pub struct TensorView {
    mmap: Arc<SegmentedMmap>,
    base: u64,
    len: u64,
}

impl TensorView {
    pub fn new(mmap: Arc<SegmentedMmap>, base: u64, len: u64) -> Self {
        Self { mmap, base, len }
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Derive a sub-view.
    pub fn slice(&self, offset: u64, len: u64) -> Self {
        debug_assert!(offset + len <= self.len);
        Self {
            mmap: Arc::clone(&self.mmap),
            base: self.base + offset,
            len,
        }
    }

    #[inline]
    pub fn u8_at(&self, offset: usize) -> u8 {
        debug_assert!((offset as u64) < self.len);
        self.mmap.byte(self.base + offset as u64)
    }

    #[inline]
    pub fn i8_at(&self, offset: usize) -> i8 {
        self.u8_at(offset) as i8
    }

    #[inline]
    pub fn u16_at(&self, offset: usize) -> u16 {
        let mut b = [0u8; 2];
        self.copy_to(offset, &mut b);
        u16::from_le_bytes(b)
    }

    #[inline]
    pub fn i16_at(&self, offset: usize) -> i16 {
        self.u16_at(offset) as i16
    }

    #[inline]
    pub fn u32_at(&self, offset: usize) -> u32 {
        let mut b = [0u8; 4];
        self.copy_to(offset, &mut b);
        u32::from_le_bytes(b)
    }

    #[inline]
    pub fn i32_at(&self, offset: usize) -> i32 {
        self.u32_at(offset) as i32
    }

    #[inline]
    pub fn u64_at(&self, offset: usize) -> u64 {
        let mut b = [0u8; 8];
        self.copy_to(offset, &mut b);
        u64::from_le_bytes(b)
    }

    #[inline]
    pub fn i64_at(&self, offset: usize) -> i64 {
        self.u64_at(offset) as i64
    }

    #[inline]
    pub fn f32_at(&self, offset: usize) -> f32 {
        f32::from_bits(self.u32_at(offset))
    }

    #[inline]
    pub fn f64_at(&self, offset: usize) -> f64 {
        f64::from_bits(self.u64_at(offset))
    }

    /// f16 stored as two LE bytes.
    #[inline]
    pub fn f16_at(&self, offset: usize) -> f32 {
        half::f16::from_bits(self.u16_at(offset)).to_f32()
    }

    /// bf16 stored as two LE bytes.
    #[inline]
    pub fn bf16_at(&self, offset: usize) -> f32 {
        half::bf16::from_bits(self.u16_at(offset)).to_f32()
    }

    /// Bulk copy into a caller buffer.
    #[inline]
    pub fn copy_to(&self, offset: usize, dst: &mut [u8]) {
        debug_assert!(offset as u64 + dst.len() as u64 <= self.len);
        self.mmap.copy_into(self.base + offset as u64, dst);
    }

    /// Borrow the bytes when they do not cross a segment boundary. The
    /// quant kernels use this fast path and fall back to `copy_to`.
    #[inline]
    pub fn contiguous(&self, offset: usize, len: usize) -> Option<&[u8]> {
        debug_assert!(offset as u64 + len as u64 <= self.len);
        self.mmap.contiguous(self.base + offset as u64, len)
    }
}

/// A memory-mapped GGUF model file: parsed header + segmented mapping.
pub struct MmapModel {
    /// The parsed GGUF header with metadata and tensor directory.
    pub gguf: GgufFile,
    mmap: Arc<SegmentedMmap>,
}

impl MmapModel {
    /// Load a GGUF model file using mmap.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(EngineError::ModelLoad(format!(
                "Model file not found: {}",
                path.display()
            )));
        }

        let file = File::open(path)
            .map_err(|e| EngineError::ModelLoad(format!("Failed to open model: {e}")))?;

        let mut reader = std::io::BufReader::new(&file);
        let gguf = GgufFile::parse(&mut reader)?;

        tracing::info!(
            "GGUF model: arch={}, tensors={}, data_offset={}",
            gguf.architecture().unwrap_or("unknown"),
            gguf.tensors.len(),
            gguf.data_offset
        );

        let mmap = Arc::new(SegmentedMmap::map(&file)?);

        // Validate every tensor range up front so forward passes never
        // discover a truncated file mid-layer.
        for t in &gguf.tensors {
            let start = gguf.data_offset + t.offset;
            let size = t.size_bytes();
            if start + size > mmap.len() {
                return Err(GgufError::TensorOutOfBounds {
                    name: t.name.clone(),
                    offset: start,
                    len: size,
                    file_len: mmap.len(),
                }
                .into());
            }
        }

        tracing::info!(
            "Model mapped: {} ({:.1} MB, {} segment(s))",
            path.display(),
            mmap.len() as f64 / (1024.0 * 1024.0),
            mmap.len().div_ceil(SEGMENT_SIZE)
        );

        Ok(Self { gguf, mmap })
    }

    /// View over a tensor's data by directory index.
    pub fn tensor_view(&self, tensor_index: usize) -> Result<TensorView> {
        let tensor = self.gguf.tensors.get(tensor_index).ok_or_else(|| {
            EngineError::ModelLoad(format!(
                "Tensor index {} out of range (total: {})",
                tensor_index,
                self.gguf.tensors.len()
            ))
        })?;
        let start = self.gguf.data_offset + tensor.offset;
        Ok(TensorView::new(
            Arc::clone(&self.mmap),
            start,
            tensor.size_bytes(),
        ))
    }

    /// View over a tensor's data by name.
    pub fn tensor_view_by_name(&self, name: &str) -> Result<TensorView> {
        let (idx, _) = self
            .gguf
            .find_tensor(name)
            .ok_or_else(|| EngineError::MissingTensor(name.to_string()))?;
        self.tensor_view(idx)
    }

    pub fn architecture(&self) -> &str {
        self.gguf.architecture().unwrap_or("unknown")
    }

    pub fn file_size(&self) -> u64 {
        self.mmap.len()
    }

    pub fn tensor_count(&self) -> usize {
        self.gguf.tensors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn view_over(bytes: &[u8]) -> TensorView {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(bytes).unwrap();
        f.flush().unwrap();
        let file = f.reopen().unwrap();
        let mmap = Arc::new(SegmentedMmap::map(&file).unwrap());
        TensorView::new(mmap, 0, bytes.len() as u64)
    }

    #[test]
    fn little_endian_reads() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0x1234u16.to_le_bytes());
        bytes.extend_from_slice(&0xdeadbeefu32.to_le_bytes());
        bytes.extend_from_slice(&1.5f32.to_le_bytes());
        let v = view_over(&bytes);
        assert_eq!(v.u16_at(0), 0x1234);
        assert_eq!(v.u32_at(2), 0xdeadbeef);
        assert!((v.f32_at(6) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn slicing_preserves_content() {
        let bytes: Vec<u8> = (0..64).collect();
        let v = view_over(&bytes);
        let sub = v.slice(16, 16);
        for i in 0..16 {
            assert_eq!(sub.u8_at(i), v.u8_at(16 + i));
        }
        // Two disjoint views over the same range agree byte for byte.
        let a = v.slice(8, 24);
        let b = v.slice(8, 24);
        for i in 0..24 {
            assert_eq!(a.u8_at(i), b.u8_at(i));
        }
    }

    #[test]
    fn f16_decode() {
        let bits = half::f16::from_f32(0.5).to_bits();
        let v = view_over(&bits.to_le_bytes());
        assert!((v.f16_at(0) - 0.5).abs() < 1e-6);
    }
}
