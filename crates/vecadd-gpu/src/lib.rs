//! wgpu compute backend for the vector-add debugger fixture.
//!
//! Provides adapter enumeration, per-device buffer management with staging
//! readback, and a [`VectorAdd`] pipeline that runs the bounds-guarded
//! elementwise add kernel on one device's queue.

pub mod buffer;
pub mod device;
pub mod dispatch;
pub mod error;
pub mod pipeline;
pub mod shader;

pub use buffer::GpuBuffer;
pub use device::{enumerate_adapters, new_instance, DeviceInfo, GpuDevice, MAX_DEVICES};
pub use error::GpuError;
pub use pipeline::ComputePipeline;

use crate::error::Result;
use bytemuck::{Pod, Zeroable};
use tracing::debug;

/// Uniform parameters for the add shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct AddParams {
    pub count: u32,
    pub _pad: u32,
}

/// The compiled vector-add pipeline for one device.
pub struct VectorAdd {
    pipeline: ComputePipeline,
}

impl VectorAdd {
    /// Compile the add shader for `device`.
    pub fn new(device: &wgpu::Device) -> Result<Self> {
        let pipeline = ComputePipeline::new(
            device,
            shader::VECTOR_ADD_SRC,
            "vector-add",
            shader::VECTOR_ADD_ENTRY,
        )?;
        Ok(Self { pipeline })
    }

    /// Run `c = a + b` on `gpu` and return the result.
    ///
    /// Uploads both inputs, dispatches the kernel, then reads the output
    /// back through a staging buffer. The readback drains the queue, so all
    /// three device buffers are complete before this returns; they are
    /// released when the locals drop at the end of the call.
    pub async fn run(&self, gpu: &GpuDevice, a: &[i32], b: &[i32]) -> Result<Vec<i32>> {
        if a.len() != b.len() {
            return Err(GpuError::InvalidCount(format!(
                "input lengths differ: {} vs {}",
                a.len(),
                b.len()
            )));
        }
        let count = u32::try_from(a.len())
            .map_err(|_| GpuError::InvalidCount(format!("{} overflows u32", a.len())))?;
        if count == 0 {
            return Ok(Vec::new());
        }

        let device = &gpu.device;
        let queue = &gpu.queue;

        let buf_a = GpuBuffer::from_slice(device, queue, a, "add-a");
        let buf_b = GpuBuffer::from_slice(device, queue, b, "add-b");
        let buf_c = GpuBuffer::new_uninit::<i32>(device, a.len(), "add-c");
        let params = AddParams { count, _pad: 0 };
        let buf_params = GpuBuffer::new_uniform(device, queue, &params, "add-params");

        let bind_group = self.pipeline.bind_group(
            device,
            &[
                wgpu::BindGroupEntry { binding: 0, resource: buf_a.storage.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 1, resource: buf_b.storage.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 2, resource: buf_c.storage.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 3, resource: buf_params.as_entire_binding() },
            ],
        );

        let workgroups = dispatch::compute_dispatch_size(count, dispatch::WORKGROUP_SIZE);
        debug!(device = gpu.info.index, count, workgroups, "dispatching vector add");

        let mut encoder = device.create_command_encoder(&Default::default());
        {
            let mut pass = encoder.begin_compute_pass(&Default::default());
            pass.set_pipeline(&self.pipeline.pipeline);
            pass.set_bind_group(0, Some(&bind_group), &[]);
            pass.dispatch_workgroups(workgroups, 1, 1);
        }
        queue.submit(std::iter::once(encoder.finish()));

        buf_c.read_back::<i32>(device, queue).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_params_pod_layout() {
        assert_eq!(std::mem::size_of::<AddParams>(), 8);
    }

    #[test]
    fn add_params_zeroed() {
        let p = AddParams::zeroed();
        assert_eq!(p.count, 0);
    }

    #[test]
    fn error_display_invalid_count() {
        let e = GpuError::InvalidCount("input lengths differ: 3 vs 4".into());
        assert!(format!("{e}").contains("3 vs 4"));
    }

    // --- integration tests (require GPU adapter) ---

    async fn first_device() -> GpuDevice {
        let instance = new_instance();
        let adapters = enumerate_adapters(&instance);
        let adapter = adapters.first().expect("no GPU adapter present");
        GpuDevice::from_adapter(0, adapter).await.expect("device request")
    }

    #[tokio::test]
    #[ignore = "requires GPU adapter - run manually on machines with a GPU"]
    async fn vector_add_default_workload() {
        let gpu = first_device().await;
        let add = VectorAdd::new(&gpu.device).unwrap();
        let a: Vec<i32> = (0..64).map(|i| 2 * i).collect();
        let b: Vec<i32> = (0..64).collect();
        let c = add.run(&gpu, &a, &b).await.unwrap();
        assert_eq!(c.len(), 64);
        for (i, &got) in c.iter().enumerate() {
            assert_eq!(got, 3 * i as i32, "mismatch at index {i}");
        }
    }

    #[tokio::test]
    #[ignore = "requires GPU adapter - run manually on machines with a GPU"]
    async fn vector_add_non_multiple_of_workgroup() {
        let gpu = first_device().await;
        let add = VectorAdd::new(&gpu.device).unwrap();
        let a: Vec<i32> = (0..300).collect();
        let b: Vec<i32> = (0..300).map(|i| i * 10).collect();
        let c = add.run(&gpu, &a, &b).await.unwrap();
        assert_eq!(c.len(), 300);
        assert_eq!(c[299], 299 + 2990);
    }

    #[tokio::test]
    #[ignore = "requires GPU adapter - run manually on machines with a GPU"]
    async fn vector_add_rejects_mismatched_inputs() {
        let gpu = first_device().await;
        let add = VectorAdd::new(&gpu.device).unwrap();
        let err = add.run(&gpu, &[1, 2, 3], &[1, 2]).await.unwrap_err();
        assert!(matches!(err, GpuError::InvalidCount(_)));
    }
}
