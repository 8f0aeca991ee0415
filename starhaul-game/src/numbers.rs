//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Scale a unit roll in `[0, 1)` onto `0..span`, clamping stray inputs.
#[must_use]
pub fn scale_unit(unit: f64, span: u64) -> u64 {
    if span == 0 {
        return 0;
    }
    let unit = if unit.is_finite() {
        unit.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let scaled = (unit * u64_to_f64(span)).floor();
    cast::<f64, u64>(scaled).unwrap_or(0).min(span - 1)
}

/// Ceil a f64 and clamp it to the u32 range, returning 0 for non-finite or negative values.
#[must_use]
pub fn ceil_f64_to_u32(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    let max = cast::<u32, f64>(u32::MAX).unwrap_or(f64::MAX);
    cast::<f64, u32>(value.ceil().min(max)).unwrap_or(0)
}

/// Convert u64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn u64_to_f64(value: u64) -> f64 {
    cast::<u64, f64>(value).unwrap_or(0.0)
}

/// Widen a collection length into roll arithmetic, saturating.
#[must_use]
pub fn usize_to_u64(value: usize) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

/// Narrow a u64 roll into a u32 field, saturating.
#[must_use]
pub fn u64_to_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
