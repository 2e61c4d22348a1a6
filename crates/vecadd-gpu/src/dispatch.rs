//! Workgroup dispatch sizing.

/// Threads per workgroup declared in the add shader.
pub const WORKGROUP_SIZE: u32 = 256;

/// Compute the number of workgroups needed to cover `total_elements`,
/// rounding up so no element is missed.
pub fn compute_dispatch_size(total_elements: u32, workgroup_size: u32) -> u32 {
    assert!(workgroup_size > 0, "workgroup_size must be > 0");
    total_elements.div_ceil(workgroup_size)
}
