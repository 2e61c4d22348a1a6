//! WGSL compute shader source for the vector-add kernel.

/// Bounds-guarded elementwise integer add: `c[i] = a[i] + b[i]`.
///
/// One thread owns one output slot; threads with a global index at or past
/// `params.count` perform no write. Workgroup size: [256, 1, 1].
pub const VECTOR_ADD_SRC: &str = r"
struct AddParams {
    count: u32,
    _pad: u32,
}

@group(0) @binding(0) var<storage, read> a: array<i32>;
@group(0) @binding(1) var<storage, read> b: array<i32>;
@group(0) @binding(2) var<storage, read_write> c: array<i32>;
@group(0) @binding(3) var<uniform> params: AddParams;

@compute @workgroup_size(256, 1, 1)
fn vector_add(@builtin(global_invocation_id) gid: vec3<u32>) {
    let i = gid.x;
    if i < params.count {
        c[i] = a[i] + b[i];
    }
}
";

/// Shader entry point name.
pub const VECTOR_ADD_ENTRY: &str = "vector_add";

#[cfg(test)]
mod tests {
    use naga::front::wgsl;

    fn validate_wgsl(source: &str) -> Result<(), String> {
        let module = wgsl::parse_str(source).map_err(|e| format!("{e}"))?;
        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator.validate(&module).map_err(|e| format!("{e}"))?;
        Ok(())
    }

    #[test]
    fn vector_add_valid() {
        validate_wgsl(super::VECTOR_ADD_SRC).unwrap();
    }

    #[test]
    fn vector_add_contains_entry_point() {
        assert!(super::VECTOR_ADD_SRC.contains("fn vector_add"));
    }

    #[test]
    fn vector_add_is_bounds_guarded() {
        assert!(super::VECTOR_ADD_SRC.contains("i < params.count"));
    }
}
