//! wgpu adapter enumeration and device creation.

use crate::error::Result;
use tracing::info;

/// Upper bound on the number of adapters the fixture will consider.
pub const MAX_DEVICES: usize = 8;

/// Descriptive properties of one enumerated adapter.
///
/// Queried once per device and used for the diagnostic descriptor line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Position in enumeration order.
    pub index: usize,
    /// Human-readable adapter name.
    pub name: String,
    /// PCI vendor identifier.
    pub vendor: u32,
    /// Backend API serving this adapter.
    pub backend: wgpu::Backend,
    /// Device type classification (discrete, integrated, CPU, …).
    pub device_type: wgpu::DeviceType,
}

impl DeviceInfo {
    /// Extract descriptive properties from an adapter.
    pub fn from_adapter(index: usize, adapter: &wgpu::Adapter) -> Self {
        let info = adapter.get_info();
        Self {
            index,
            name: info.name,
            vendor: info.vendor,
            backend: info.backend,
            device_type: info.device_type,
        }
    }

    /// The per-device console line: `#   device <idx> [0x<vendor>] <name>`.
    ///
    /// wgpu does not expose PCI bus ids, so the bracketed slot carries the
    /// PCI vendor id instead.
    pub fn descriptor_line(&self) -> String {
        format!("#   device {} [0x{:04x}] {}", self.index, self.vendor, self.name)
    }
}

/// Create a wgpu instance covering all platform backends.
pub fn new_instance() -> wgpu::Instance {
    wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    })
}

/// Enumerate adapters across all backends, capped at [`MAX_DEVICES`].
///
/// Returns an empty `Vec` when no adapter is present; callers treat that as
/// "nothing to do", not as an error.
pub fn enumerate_adapters(instance: &wgpu::Instance) -> Vec<wgpu::Adapter> {
    let mut adapters = instance.enumerate_adapters(wgpu::Backends::all());
    adapters.truncate(MAX_DEVICES);
    adapters
}

/// A logical device and its submission queue, bound to one adapter.
pub struct GpuDevice {
    pub info: DeviceInfo,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GpuDevice {
    /// Request a logical device and queue from `adapter`.
    pub async fn from_adapter(index: usize, adapter: &wgpu::Adapter) -> Result<Self> {
        let info = DeviceInfo::from_adapter(index, adapter);
        info!(
            device = index,
            backend = ?info.backend,
            device_type = ?info.device_type,
            name = %info.name,
            "selected GPU adapter"
        );

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("vecadd-device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    ..Default::default()
                },
                None,
            )
            .await?;

        Ok(Self { info, device, queue })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_info() -> DeviceInfo {
        DeviceInfo {
            index: 0,
            name: "Test GPU".to_string(),
            vendor: 0x10DE,
            backend: wgpu::Backend::Vulkan,
            device_type: wgpu::DeviceType::DiscreteGpu,
        }
    }

    #[test]
    fn descriptor_line_format() {
        let info = make_info();
        assert_eq!(info.descriptor_line(), "#   device 0 [0x10de] Test GPU");
    }

    #[test]
    fn descriptor_line_pads_vendor() {
        let mut info = make_info();
        info.index = 3;
        info.vendor = 0x2;
        assert_eq!(info.descriptor_line(), "#   device 3 [0x0002] Test GPU");
    }

    #[test]
    fn device_type_reads_back_from_info() {
        let info = make_info();
        assert_eq!(info.device_type, wgpu::DeviceType::DiscreteGpu);
        assert_eq!(format!("{:?}", info.device_type), "DiscreteGpu");
    }

    #[test]
    fn max_devices_cap() {
        assert_eq!(MAX_DEVICES, 8);
    }

    // --- integration tests (require GPU adapter) ---

    #[test]
    #[ignore = "requires GPU adapter - run manually on machines with a GPU"]
    fn enumerate_respects_cap() {
        let instance = new_instance();
        let adapters = enumerate_adapters(&instance);
        assert!(adapters.len() <= MAX_DEVICES);
    }
}
