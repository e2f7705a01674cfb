//! Equated Monthly Installment: the fixed payment that fully amortizes a
//! loan of `principal` over `years` at `annual_rate_percent`.

/// Standard amortizing-loan monthly payment.
///
/// A zero rate degenerates to straight-line repayment (`principal / months`)
/// instead of dividing by zero. Non-positive principal or tenure yields 0.
pub fn emi(principal: f64, annual_rate_percent: f64, years: u32) -> f64 {
    if principal <= 0.0 || years == 0 {
        return 0.0;
    }

    let months = (years * 12) as f64;
    let monthly_rate = annual_rate_percent / 1200.0;

    if monthly_rate == 0.0 {
        return principal / months;
    }

    let growth = (1.0 + monthly_rate).powf(months);
    (principal * monthly_rate * growth) / (growth - 1.0)
}
