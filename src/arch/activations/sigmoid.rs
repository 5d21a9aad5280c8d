/// The logistic function, `1 / (1 + e^-x)`.
pub fn sigmoid(x: f64) -> f64 {
    1. / (1. + (-x).exp())
}

/// The sigmoid's derivative expressed through its own output.
///
/// # Arguments
/// * `y` - A value already returned by `sigmoid`, never a raw weighted sum.
pub fn dsigmoid(y: f64) -> f64 {
    y * (1. - y)
}
