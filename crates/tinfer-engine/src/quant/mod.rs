//! Block-quantized weight tensors.
//!
//! Each GGUF quant format stores weights in fixed-size blocks sharing a
//! scale (and sometimes a min). The engine never materializes a full f32
//! weight matrix: `dot` walks blocks, dequantizes each into a stack
//! scratch buffer, and runs the dense dot kernel against the matching
//! input slice. `matmul` parallelizes over output rows with rayon; each
//! row reduces sequentially over blocks, so results are identical for any
//! worker count.

pub mod float;
pub mod iquants;
pub mod kquants;
pub mod legacy;
pub mod mxfp4;
pub mod tables;

use rayon::prelude::*;

use tinfer_core::error::{EngineError, Result};

use crate::gpu::GpuTensorHandle;
use crate::mmap::TensorView;

/// GGML tensor encoding, tagged with the GGUF wire id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GgmlType {
    F32,
    F16,
    Q4_0,
    Q5_0,
    Q8_0,
    Q2K,
    Q3K,
    Q4K,
    Q5K,
    Q6K,
    Iq3Xxs,
    Iq4Nl,
    Iq3S,
    Iq2S,
    Iq4Xs,
    Bf16,
    Mxfp4,
}

impl GgmlType {
    /// Decode the GGUF wire id.
    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            0 => Some(Self::F32),
            1 => Some(Self::F16),
            2 => Some(Self::Q4_0),
            6 => Some(Self::Q5_0),
            8 => Some(Self::Q8_0),
            10 => Some(Self::Q2K),
            11 => Some(Self::Q3K),
            12 => Some(Self::Q4K),
            13 => Some(Self::Q5K),
            14 => Some(Self::Q6K),
            18 => Some(Self::Iq3Xxs),
            20 => Some(Self::Iq4Nl),
            21 => Some(Self::Iq3S),
            22 => Some(Self::Iq2S),
            23 => Some(Self::Iq4Xs),
            30 => Some(Self::Bf16),
            39 => Some(Self::Mxfp4),
            _ => None,
        }
    }

    pub fn id(self) -> u32 {
        match self {
            Self::F32 => 0,
            Self::F16 => 1,
            Self::Q4_0 => 2,
            Self::Q5_0 => 6,
            Self::Q8_0 => 8,
            Self::Q2K => 10,
            Self::Q3K => 11,
            Self::Q4K => 12,
            Self::Q5K => 13,
            Self::Q6K => 14,
            Self::Iq3Xxs => 18,
            Self::Iq4Nl => 20,
            Self::Iq3S => 21,
            Self::Iq2S => 22,
            Self::Iq4Xs => 23,
            Self::Bf16 => 30,
            Self::Mxfp4 => 39,
        }
    }

    /// Weights per block.
    pub fn block_size(self) -> usize {
        match self {
            Self::F32 | Self::F16 | Self::Bf16 => 1,
            Self::Q4_0 | Self::Q5_0 | Self::Q8_0 | Self::Iq4Nl | Self::Mxfp4 => 32,
            Self::Q2K
            | Self::Q3K
            | Self::Q4K
            | Self::Q5K
            | Self::Q6K
            | Self::Iq3Xxs
            | Self::Iq3S
            | Self::Iq2S
            | Self::Iq4Xs => 256,
        }
    }

    /// Encoded bytes per block.
    pub fn type_size(self) -> usize {
        match self {
            Self::F32 => 4,
            Self::F16 | Self::Bf16 => 2,
            Self::Q4_0 => 18,
            Self::Q5_0 => 22,
            Self::Q8_0 => 34,
            Self::Q2K => 84,
            Self::Q3K => 110,
            Self::Q4K => 144,
            Self::Q5K => 176,
            Self::Q6K => 210,
            Self::Iq3Xxs => 98,
            Self::Iq4Nl => 18,
            Self::Iq3S => 110,
            Self::Iq2S => 82,
            Self::Iq4Xs => 136,
            Self::Mxfp4 => 17,
        }
    }

    /// Encoded size of `n` elements; `n` must be a multiple of
    /// `block_size`.
    pub fn row_bytes(self, n: usize) -> usize {
        debug_assert_eq!(n % self.block_size(), 0);
        n / self.block_size() * self.type_size()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::F32 => "F32",
            Self::F16 => "F16",
            Self::Q4_0 => "Q4_0",
            Self::Q5_0 => "Q5_0",
            Self::Q8_0 => "Q8_0",
            Self::Q2K => "Q2_K",
            Self::Q3K => "Q3_K",
            Self::Q4K => "Q4_K",
            Self::Q5K => "Q5_K",
            Self::Q6K => "Q6_K",
            Self::Iq3Xxs => "IQ3_XXS",
            Self::Iq4Nl => "IQ4_NL",
            Self::Iq3S => "IQ3_S",
            Self::Iq2S => "IQ2_S",
            Self::Iq4Xs => "IQ4_XS",
            Self::Bf16 => "BF16",
            Self::Mxfp4 => "MXFP4",
        }
    }
}

/// A CPU-resident block-quantized weight tensor backed by the mmap.
#[derive(Clone)]
pub struct CpuTensor {
    pub ggml_type: GgmlType,
    pub view: TensorView,
    pub n_elements: usize,
    pub rows: usize,
    pub cols: usize,
}

/// A weight tensor: quantized bytes on the CPU side, or a handle into the
/// optional GPU backend. The forward passes only see `get`/`dot`/`matmul`.
#[derive(Clone)]
pub enum QuantTensor {
    Cpu(CpuTensor),
    Gpu(GpuTensorHandle),
}

impl QuantTensor {
    /// Build a tensor over a raw view. Consults the GPU placement hook
    /// first and falls back to the CPU representation.
    pub fn from_view(
        ggml_type: GgmlType,
        view: TensorView,
        n_elements: usize,
        rows: usize,
        cols: usize,
    ) -> Result<Self> {
        if n_elements % ggml_type.block_size() != 0 {
            return Err(EngineError::ModelLoad(format!(
                "element count {} not a multiple of {} block size {}",
                n_elements,
                ggml_type.name(),
                ggml_type.block_size()
            )));
        }
        let expected = ggml_type.row_bytes(n_elements) as u64;
        if view.len() < expected {
            return Err(EngineError::ModelLoad(format!(
                "tensor view too small: {} < {} bytes",
                view.len(),
                expected
            )));
        }

        if let Some(handle) = crate::gpu::try_upload(ggml_type, &view, n_elements, rows, cols) {
            return Ok(Self::Gpu(handle));
        }

        Ok(Self::Cpu(CpuTensor {
            ggml_type,
            view,
            n_elements,
            rows,
            cols,
        }))
    }

    pub fn ggml_type(&self) -> GgmlType {
        match self {
            Self::Cpu(t) => t.ggml_type,
            Self::Gpu(h) => h.ggml_type(),
        }
    }

    pub fn n_elements(&self) -> usize {
        match self {
            Self::Cpu(t) => t.n_elements,
            Self::Gpu(h) => h.n_elements(),
        }
    }

    pub fn rows(&self) -> usize {
        match self {
            Self::Cpu(t) => t.rows,
            Self::Gpu(h) => h.rows(),
        }
    }

    pub fn cols(&self) -> usize {
        match self {
            Self::Cpu(t) => t.cols,
            Self::Gpu(h) => h.cols(),
        }
    }

    /// Decode one element.
    pub fn get(&self, index: usize) -> f32 {
        match self {
            Self::Gpu(h) => h.get(index),
            Self::Cpu(t) => {
                debug_assert!(index < t.n_elements);
                match t.ggml_type {
                    GgmlType::F32 => float::get_f32(&t.view, index),
                    GgmlType::F16 => float::get_f16(&t.view, index),
                    GgmlType::Bf16 => float::get_bf16(&t.view, index),
                    GgmlType::Q4_0 => legacy::get_q4_0(&t.view, index),
                    GgmlType::Q5_0 => legacy::get_q5_0(&t.view, index),
                    GgmlType::Q8_0 => legacy::get_q8_0(&t.view, index),
                    GgmlType::Q2K => kquants::get_q2k(&t.view, index),
                    GgmlType::Q3K => kquants::get_q3k(&t.view, index),
                    GgmlType::Q4K => kquants::get_q4k(&t.view, index),
                    GgmlType::Q5K => kquants::get_q5k(&t.view, index),
                    GgmlType::Q6K => kquants::get_q6k(&t.view, index),
                    GgmlType::Iq3Xxs => iquants::get_iq3xxs(&t.view, index),
                    GgmlType::Iq4Nl => iquants::get_iq4nl(&t.view, index),
                    GgmlType::Iq3S => iquants::get_iq3s(&t.view, index),
                    GgmlType::Iq2S => iquants::get_iq2s(&t.view, index),
                    GgmlType::Iq4Xs => iquants::get_iq4xs(&t.view, index),
                    GgmlType::Mxfp4 => mxfp4::get(&t.view, index),
                }
            }
        }
    }

    /// Dot product of the weight row starting at element `offset` with a
    /// dense vector. `offset` and `x.len()` must be multiples of the
    /// block size.
    pub fn dot(&self, offset: usize, x: &[f32]) -> f32 {
        match self {
            Self::Gpu(h) => h.dot(offset, x),
            Self::Cpu(t) => {
                debug_assert!(offset + x.len() <= t.n_elements);
                debug_assert_eq!(offset % t.ggml_type.block_size(), 0);
                debug_assert_eq!(x.len() % t.ggml_type.block_size(), 0);
                match t.ggml_type {
                    GgmlType::F32 => float::dot_f32(&t.view, offset, x),
                    GgmlType::F16 => float::dot_f16(&t.view, offset, x),
                    GgmlType::Bf16 => float::dot_bf16(&t.view, offset, x),
                    GgmlType::Q4_0 => legacy::dot_q4_0(&t.view, offset, x),
                    GgmlType::Q5_0 => legacy::dot_q5_0(&t.view, offset, x),
                    GgmlType::Q8_0 => legacy::dot_q8_0(&t.view, offset, x),
                    GgmlType::Q2K => kquants::dot_q2k(&t.view, offset, x),
                    GgmlType::Q3K => kquants::dot_q3k(&t.view, offset, x),
                    GgmlType::Q4K => kquants::dot_q4k(&t.view, offset, x),
                    GgmlType::Q5K => kquants::dot_q5k(&t.view, offset, x),
                    GgmlType::Q6K => kquants::dot_q6k(&t.view, offset, x),
                    GgmlType::Iq3Xxs => iquants::dot_iq3xxs(&t.view, offset, x),
                    GgmlType::Iq4Nl => iquants::dot_iq4nl(&t.view, offset, x),
                    GgmlType::Iq3S => iquants::dot_iq3s(&t.view, offset, x),
                    GgmlType::Iq2S => iquants::dot_iq2s(&t.view, offset, x),
                    GgmlType::Iq4Xs => iquants::dot_iq4xs(&t.view, offset, x),
                    GgmlType::Mxfp4 => mxfp4::dot(&t.view, offset, x),
                }
            }
        }
    }

    /// Dequantize a contiguous element range into `out`. `offset` and
    /// `out.len()` must be multiples of the block size. Used to
    /// materialize embedding rows and norm weights.
    pub fn dequant_range(&self, offset: usize, out: &mut [f32]) {
        match self {
            Self::Gpu(h) => h.dequant_range(offset, out),
            Self::Cpu(t) => {
                let bs = t.ggml_type.block_size();
                debug_assert_eq!(offset % bs, 0);
                debug_assert_eq!(out.len() % bs, 0);
                debug_assert!(offset + out.len() <= t.n_elements);
                match t.ggml_type {
                    GgmlType::F32 | GgmlType::F16 | GgmlType::Bf16 => {
                        for (j, o) in out.iter_mut().enumerate() {
                            *o = self.get(offset + j);
                        }
                    }
                    _ => {
                        let ts = t.ggml_type.type_size();
                        let mut raw = [0u8; 256];
                        for (bi, chunk) in out.chunks_exact_mut(bs).enumerate() {
                            let block = block_bytes(&t.view, offset / bs + bi, ts, &mut raw);
                            dequant_block_dyn(t.ggml_type, block, chunk);
                        }
                    }
                }
            }
        }
    }

    /// Dequantize one whole row (the tensor's `cols` elements).
    pub fn read_row(&self, row: usize, out: &mut [f32]) {
        debug_assert_eq!(out.len(), self.cols());
        self.dequant_range(row * self.cols(), out);
    }

    /// Materialize the whole tensor; only sensible for small vectors
    /// such as norm weights and biases.
    pub fn to_vec(&self) -> Vec<f32> {
        let mut out = vec![0.0f32; self.n_elements()];
        self.dequant_range(0, &mut out);
        out
    }

    /// Matrix-vector multiply: `out[r] = row_r · x` for the tensor's own
    /// row/col shape, rows split across the rayon pool.
    pub fn matmul(&self, out: &mut [f32], x: &[f32]) {
        let rows = self.rows();
        let cols = self.cols();
        self.matmul_at(0, out, x, rows, cols);
    }

    /// Matrix-vector multiply over a sub-range starting at element
    /// `base` (used for 3-D expert banks, where expert `e` begins at
    /// `e * rows * cols`).
    pub fn matmul_at(&self, base: usize, out: &mut [f32], x: &[f32], rows: usize, cols: usize) {
        debug_assert_eq!(out.len(), rows);
        debug_assert_eq!(x.len(), cols);

        if let Self::Gpu(h) = self {
            h.matmul_at(base, out, x, rows, cols);
            return;
        }

        // Row partitioning depends only on the row count and pool size;
        // each slot is written by exactly one task.
        if rows >= 4 {
            out.par_iter_mut().enumerate().for_each(|(r, o)| {
                *o = self.dot(base + r * cols, x);
            });
        } else {
            for (r, o) in out.iter_mut().enumerate() {
                *o = self.dot(base + r * cols, x);
            }
        }
    }
}

/// Dequantize a single block of `t.block_size()` elements.
fn dequant_block_dyn(t: GgmlType, block: &[u8], out: &mut [f32]) {
    match t {
        GgmlType::Q4_0 => {
            let mut tmp = [0.0f32; 32];
            legacy::dequant_q4_0(block, &mut tmp);
            out.copy_from_slice(&tmp);
        }
        GgmlType::Q5_0 => {
            let mut tmp = [0.0f32; 32];
            legacy::dequant_q5_0(block, &mut tmp);
            out.copy_from_slice(&tmp);
        }
        GgmlType::Q8_0 => {
            let mut tmp = [0.0f32; 32];
            legacy::dequant_q8_0(block, &mut tmp);
            out.copy_from_slice(&tmp);
        }
        GgmlType::Iq4Nl => {
            let mut tmp = [0.0f32; 32];
            iquants::dequant_iq4nl(block, &mut tmp);
            out.copy_from_slice(&tmp);
        }
        GgmlType::Mxfp4 => {
            let mut tmp = [0.0f32; 32];
            mxfp4::dequant(block, &mut tmp);
            out.copy_from_slice(&tmp);
        }
        GgmlType::Q2K => {
            let mut tmp = [0.0f32; 256];
            kquants::dequant_q2k(block, &mut tmp);
            out.copy_from_slice(&tmp);
        }
        GgmlType::Q3K => {
            let mut tmp = [0.0f32; 256];
            kquants::dequant_q3k(block, &mut tmp);
            out.copy_from_slice(&tmp);
        }
        GgmlType::Q4K => {
            let mut tmp = [0.0f32; 256];
            kquants::dequant_q4k(block, &mut tmp);
            out.copy_from_slice(&tmp);
        }
        GgmlType::Q5K => {
            let mut tmp = [0.0f32; 256];
            kquants::dequant_q5k(block, &mut tmp);
            out.copy_from_slice(&tmp);
        }
        GgmlType::Q6K => {
            let mut tmp = [0.0f32; 256];
            kquants::dequant_q6k(block, &mut tmp);
            out.copy_from_slice(&tmp);
        }
        GgmlType::Iq4Xs => {
            let mut tmp = [0.0f32; 256];
            iquants::dequant_iq4xs(block, &mut tmp);
            out.copy_from_slice(&tmp);
        }
        GgmlType::Iq3Xxs => {
            let mut tmp = [0.0f32; 256];
            iquants::dequant_iq3xxs(block, &mut tmp);
            out.copy_from_slice(&tmp);
        }
        GgmlType::Iq3S => {
            let mut tmp = [0.0f32; 256];
            iquants::dequant_iq3s(block, &mut tmp);
            out.copy_from_slice(&tmp);
        }
        GgmlType::Iq2S => {
            let mut tmp = [0.0f32; 256];
            iquants::dequant_iq2s(block, &mut tmp);
            out.copy_from_slice(&tmp);
        }
        GgmlType::F32 | GgmlType::F16 | GgmlType::Bf16 => unreachable!("float formats are element-addressed"),
    }
}

/// Fetch the raw bytes of block `block_idx`, borrowing from the mapping
/// when contiguous and copying through `scratch` across segment
/// boundaries.
#[inline]
pub(crate) fn block_bytes<'a>(
    view: &'a TensorView,
    block_idx: usize,
    type_size: usize,
    scratch: &'a mut [u8],
) -> &'a [u8] {
    let offset = block_idx * type_size;
    if let Some(bytes) = view.contiguous(offset, type_size) {
        bytes
    } else {
        view.copy_to(offset, &mut scratch[..type_size]);
        &scratch[..type_size]
    }
}

#[inline]
pub(crate) fn f16_from(bytes: &[u8], at: usize) -> f32 {
    half::f16::from_le_bytes([bytes[at], bytes[at + 1]]).to_f32()
}
