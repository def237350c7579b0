//! Optional GPU backend hook.
//!
//! The engine itself is CPU-only; a GPU backend can register a global
//! buffer manager that the tensor factory consults before building a CPU
//! tensor. The facade toggles the hook around per-layer tensor groups to
//! implement MoE-optimized placement (attention + router + shared experts
//! on the GPU, expert banks on the CPU). Forward passes are oblivious to
//! which variant got built.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::mmap::TensorView;
use crate::quant::GgmlType;

/// A device-resident weight tensor. Implementations mirror the CPU
/// capability set exactly.
pub trait GpuTensor: Send + Sync {
    fn ggml_type(&self) -> GgmlType;
    fn n_elements(&self) -> usize;
    fn rows(&self) -> usize;
    fn cols(&self) -> usize;
    fn get(&self, index: usize) -> f32;
    fn dot(&self, offset: usize, x: &[f32]) -> f32;
    fn matmul_at(&self, base: usize, out: &mut [f32], x: &[f32], rows: usize, cols: usize);
    fn dequant_range(&self, offset: usize, out: &mut [f32]);
}

/// Buffer manager contract: attempt to upload a weight tensor, returning
/// None to fall back to the CPU representation.
pub trait GpuBufferManager: Send + Sync {
    fn upload(
        &self,
        ggml_type: GgmlType,
        view: &TensorView,
        n_elements: usize,
        rows: usize,
        cols: usize,
    ) -> Option<Arc<dyn GpuTensor>>;
}

/// Shared handle stored inside `QuantTensor::Gpu`.
#[derive(Clone)]
pub struct GpuTensorHandle(Arc<dyn GpuTensor>);

impl GpuTensorHandle {
    pub fn ggml_type(&self) -> GgmlType {
        self.0.ggml_type()
    }
    pub fn n_elements(&self) -> usize {
        self.0.n_elements()
    }
    pub fn rows(&self) -> usize {
        self.0.rows()
    }
    pub fn cols(&self) -> usize {
        self.0.cols()
    }
    pub fn get(&self, index: usize) -> f32 {
        self.0.get(index)
    }
    pub fn dot(&self, offset: usize, x: &[f32]) -> f32 {
        self.0.dot(offset, x)
    }
    pub fn matmul_at(&self, base: usize, out: &mut [f32], x: &[f32], rows: usize, cols: usize) {
        self.0.matmul_at(base, out, x, rows, cols)
    }
    pub fn dequant_range(&self, offset: usize, out: &mut [f32]) {
        self.0.dequant_range(offset, out)
    }
}

static MANAGER: RwLock<Option<Arc<dyn GpuBufferManager>>> = RwLock::new(None);
static PLACEMENT_ENABLED: AtomicBool = AtomicBool::new(true);

/// Install (or clear) the global buffer manager.
pub fn set_buffer_manager(manager: Option<Arc<dyn GpuBufferManager>>) {
    *MANAGER.write().expect("gpu manager lock poisoned") = manager;
}

/// Temporarily steer tensor construction to the CPU even when a manager
/// is installed. Used by the loader for per-group placement.
pub fn set_placement_enabled(enabled: bool) {
    PLACEMENT_ENABLED.store(enabled, Ordering::SeqCst);
}

pub fn placement_enabled() -> bool {
    PLACEMENT_ENABLED.load(Ordering::SeqCst)
}

pub(crate) fn try_upload(
    ggml_type: GgmlType,
    view: &TensorView,
    n_elements: usize,
    rows: usize,
    cols: usize,
) -> Option<GpuTensorHandle> {
    if !placement_enabled() {
        return None;
    }
    let guard = MANAGER.read().ok()?;
    let manager = guard.as_ref()?;
    manager
        .upload(ggml_type, view, n_elements, rows, cols)
        .map(GpuTensorHandle)
}

/// RAII guard that disables GPU placement for a scope.
pub struct CpuPlacementGuard {
    previous: bool,
}

impl CpuPlacementGuard {
    pub fn new() -> Self {
        let previous = placement_enabled();
        set_placement_enabled(false);
        Self { previous }
    }
}

impl Default for CpuPlacementGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CpuPlacementGuard {
    fn drop(&mut self) {
        set_placement_enabled(self.previous);
    }
}
