//! Internal Rate of Return (IRR) calculation
//!
//! Newton-Raphson on the annual rate, with bisection over the whole solver
//! domain when Newton stalls or lands on a bound.

/// Annual rate bounds searched by the solver
const MIN_RATE: f64 = -0.99;
const MAX_RATE: f64 = 10.0;

const TOLERANCE: f64 = 1e-10;
const MAX_ITERATIONS: usize = 1000;

/// Flows smaller than this count as zero when looking for a sign change
const ZERO_FLOW: f64 = 1e-10;

/// Annual IRR of a cash-flow series indexed by year
///
/// # Arguments
/// * `cashflows` - Cash flows indexed by year (positive = inflow, negative = outflow)
///
/// # Returns
/// * `Option<f64>` - Annual IRR as a decimal (e.g., 0.05 for 5%), or None if no
///   root exists in the solver domain or a flow is not finite
pub fn calculate_irr(cashflows: &[f64]) -> Option<f64> {
    if cashflows.is_empty() || cashflows.iter().any(|cf| !cf.is_finite()) {
        return None;
    }
    if cashflows.iter().all(|cf| cf.abs() < ZERO_FLOW) {
        return Some(0.0);
    }

    // A root needs at least one sign change
    let has_inflow = cashflows.iter().any(|&cf| cf > ZERO_FLOW);
    let has_outflow = cashflows.iter().any(|&cf| cf < -ZERO_FLOW);
    if !(has_inflow && has_outflow) {
        return None;
    }

    newton_raphson(cashflows).or_else(|| bisection(cashflows))
}

/// Newton-Raphson from a 5% guess; `None` unless the step converges on a root
fn newton_raphson(cashflows: &[f64]) -> Option<f64> {
    let scale: f64 = cashflows.iter().map(|cf| cf.abs()).sum();
    let mut rate = 0.05;

    for _ in 0..MAX_ITERATIONS {
        let (npv, slope) = npv_and_derivative(cashflows, rate);
        if slope.abs() < 1e-20 {
            return None;
        }

        let next = (rate - npv / slope).clamp(MIN_RATE, MAX_RATE);
        if (next - rate).abs() < TOLERANCE {
            // Pinned against a bound is not a root
            return (npv_at_rate(cashflows, next).abs() <= 1e-8 * scale).then_some(next);
        }
        rate = next;
    }

    None
}

/// NPV and dNPV/drate in one pass
fn npv_and_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let growth = 1.0 + rate;
    cashflows
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(npv, slope), (year, &cf)| {
            let discounted = cf / growth.powi(year as i32);
            (npv + discounted, slope - year as f64 * discounted / growth)
        })
}

/// Bisection over [MIN_RATE, MAX_RATE]; `None` when the ends do not bracket a root
fn bisection(cashflows: &[f64]) -> Option<f64> {
    let (mut low, mut high) = (MIN_RATE, MAX_RATE);
    let mut npv_low = npv_at_rate(cashflows, low);
    if npv_low * npv_at_rate(cashflows, high) > 0.0 {
        return None;
    }

    for _ in 0..MAX_ITERATIONS {
        let mid = 0.5 * (low + high);
        let npv_mid = npv_at_rate(cashflows, mid);
        if npv_mid.abs() < TOLERANCE || 0.5 * (high - low) < TOLERANCE {
            return Some(mid);
        }
        if npv_mid * npv_low < 0.0 {
            high = mid;
        } else {
            low = mid;
            npv_low = npv_mid;
        }
    }

    None
}

/// NPV of annual cash flows at a given rate, year 0 undiscounted
pub fn npv_at_rate(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(year, &cf)| cf / (1.0 + rate).powi(year as i32))
        .sum()
}
