//! Assertion helpers shared across domain tests.

/// Unwrap an Option with a readable failure message
pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
    match value {
        Some(inner) => inner,
        None => panic!("expected Some: {}", context),
    }
}

/// Assert two floats are within epsilon of each other
pub fn assert_close(actual: f64, expected: f64, epsilon: f64, context: &str) {
    assert!(
        (actual - expected).abs() < epsilon,
        "{}: expected {} within {} of {}, difference {}",
        context,
        actual,
        epsilon,
        expected,
        (actual - expected).abs()
    );
}
