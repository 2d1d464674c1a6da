//! Float-tolerant assertions

pub const EPSILON: f64 = 1e-9;

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "expected {expected}, got {actual}"
    );
}

pub fn assert_unit_interval(values: &[f64]) {
    for v in values {
        assert!(v.is_finite() && (0.0..=1.0).contains(v), "{v} outside [0,1]");
    }
}
