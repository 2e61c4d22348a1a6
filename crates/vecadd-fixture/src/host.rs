//! Host-side input generation and result verification.

use thiserror::Error;

/// A fatal verification failure.
///
/// The first problem found is fatal; the fixture never scans past it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("verification failed at index {index}: expected {expected}, got {got}")]
    Mismatch { index: usize, expected: i32, got: i32 },

    #[error("result has {got} elements, inputs have {expected}")]
    Length { expected: usize, got: usize },
}

/// Generate the deterministic input pair: `a[i] = 2*i`, `b[i] = i`.
///
/// Each device iteration gets its own freshly generated pair, so the
/// verification below always checks against the inputs that device
/// actually computed with.
pub fn generate_inputs(count: usize) -> (Vec<i32>, Vec<i32>) {
    let a = (0..count).map(|i| 2 * i as i32).collect();
    let b = (0..count).map(|i| i as i32).collect();
    (a, b)
}

/// Check every result element against `a[i] + b[i]`.
///
/// A result buffer of the wrong length is itself a verification failure;
/// a truncated result must not pass by only comparing its prefix.
pub fn verify(a: &[i32], b: &[i32], c: &[i32]) -> Result<(), VerifyError> {
    if b.len() != a.len() {
        return Err(VerifyError::Length { expected: a.len(), got: b.len() });
    }
    if c.len() != a.len() {
        return Err(VerifyError::Length { expected: a.len(), got: c.len() });
    }
    for (i, ((&x, &y), &got)) in a.iter().zip(b).zip(c).enumerate() {
        let expected = x + y;
        if got != expected {
            return Err(VerifyError::Mismatch { index: i, expected, got });
        }
    }
    Ok(())
}
