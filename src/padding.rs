//! Workgroup padding with reduction-neutral elements.
//!
//! Device reduction kernels assume full workgroups. Rather than branch inside
//! the kernel, the input is extended to the next multiple of the workgroup
//! size with the reduction's identity value, which leaves the mathematical
//! result unchanged. Statistics derived from the result must still use the
//! *original* element count (average = sum / original length, never the
//! padded length).

/// A reduction kind dispatched by the pipeline.
///
/// Each kind carries its neutral (identity) element and the name of the WGSL
/// entry point that computes it. The neutral elements are tied explicitly to
/// `i32`, the pipeline's element type, and are mirrored verbatim in the
/// shader source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reduction {
    /// Minimum value; neutral element is `i32::MAX`
    Min,
    /// Maximum value; neutral element is `i32::MIN`
    Max,
    /// Sum of values; neutral element is `0`
    Sum,
}

impl Reduction {
    /// The identity value for this reduction operator.
    ///
    /// Appending any number of copies to the input leaves the result
    /// unchanged.
    pub const fn neutral(self) -> i32 {
        match self {
            Reduction::Min => i32::MAX,
            Reduction::Max => i32::MIN,
            Reduction::Sum => 0,
        }
    }

    /// WGSL entry point name for this reduction's kernel.
    pub const fn entry_point(self) -> &'static str {
        match self {
            Reduction::Min => "minVal",
            Reduction::Max => "maxVal",
            Reduction::Sum => "sum",
        }
    }
}

impl std::fmt::Display for Reduction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.entry_point())
    }
}

/// Pad `values` to the next multiple of `workgroup_size` with the
/// reduction's neutral element.
///
/// If the length is already a multiple of the workgroup size no padding
/// occurs. All three reduction kinds produce the same padded length for a
/// given input, so every dispatch shares one global/local size pair.
pub fn pad_to_workgroup(values: &[i32], workgroup_size: usize, reduction: Reduction) -> Vec<i32> {
    debug_assert!(workgroup_size > 0);
    let mut padded = values.to_vec();
    let remainder = padded.len() % workgroup_size;
    if remainder != 0 {
        padded.resize(padded.len() + workgroup_size - remainder, reduction.neutral());
    }
    padded
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding_length_is_workgroup_multiple() {
        for len in [1usize, 3, 4, 5, 255, 256, 257, 1000] {
            let values = vec![7i32; len];
            for r in [Reduction::Min, Reduction::Max, Reduction::Sum] {
                let padded = pad_to_workgroup(&values, 256, r);
                assert_eq!(padded.len() % 256, 0, "len {len} op {r}");
                assert!(padded.len() - values.len() < 256);
            }
        }
    }

    #[test]
    fn test_exact_multiple_not_padded() {
        let values = vec![1i32; 512];
        let padded = pad_to_workgroup(&values, 256, Reduction::Sum);
        assert_eq!(padded, values);
    }

    #[test]
    fn test_padding_neutrality() {
        // Appending neutral elements must not change min, max, or sum.
        let values = [5i32, -3, 8];

        let sum_padded = pad_to_workgroup(&values, 4, Reduction::Sum);
        assert_eq!(sum_padded, vec![5, -3, 8, 0]);
        assert_eq!(
            sum_padded.iter().sum::<i32>(),
            values.iter().sum::<i32>()
        );

        let min_padded = pad_to_workgroup(&values, 4, Reduction::Min);
        assert_eq!(min_padded.iter().min(), values.iter().min());

        let max_padded = pad_to_workgroup(&values, 4, Reduction::Max);
        assert_eq!(max_padded.iter().max(), values.iter().max());
    }

    #[test]
    fn test_neutral_elements() {
        assert_eq!(Reduction::Min.neutral(), i32::MAX);
        assert_eq!(Reduction::Max.neutral(), i32::MIN);
        assert_eq!(Reduction::Sum.neutral(), 0);
    }

    #[test]
    fn test_empty_input_stays_empty() {
        let padded = pad_to_workgroup(&[], 256, Reduction::Sum);
        assert!(padded.is_empty());
    }
}
