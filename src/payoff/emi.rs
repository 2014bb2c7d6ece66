//! Equated monthly installment (EMI) arithmetic
//!
//! Used by the debt manager to suggest a payment for a fixed tenure, and to
//! cross-check single-debt simulations.

/// Monthly installment that clears `principal` in `tenure_months` payments.
///
/// # Arguments
/// * `principal` - Amount borrowed
/// * `annual_rate` - Annual percentage rate (18 for 18%)
/// * `tenure_months` - Number of monthly installments
///
/// # Returns
/// * `Option<f64>` - The installment, or None for a zero tenure or invalid inputs
pub fn emi(principal: f64, annual_rate: f64, tenure_months: u32) -> Option<f64> {
    if tenure_months == 0 || !principal.is_finite() || principal < 0.0 {
        return None;
    }
    if !annual_rate.is_finite() || annual_rate < 0.0 {
        return None;
    }

    let n = tenure_months as f64;
    let r = annual_rate / 12.0 / 100.0;

    if r == 0.0 {
        return Some(principal / n);
    }

    let growth = (1.0 + r).powf(n);
    Some(principal * r * growth / (growth - 1.0))
}

/// Number of whole months a fixed `payment` needs to clear `balance`.
///
/// Returns None when the payment never catches up with the monthly interest.
pub fn months_to_repay(balance: f64, annual_rate: f64, payment: f64) -> Option<u32> {
    if balance <= 0.0 {
        return Some(0);
    }
    if payment <= 0.0 || !payment.is_finite() || !balance.is_finite() {
        return None;
    }

    let r = annual_rate / 12.0 / 100.0;
    if r == 0.0 {
        return Some((balance / payment).ceil() as u32);
    }

    let interest = balance * r;
    if payment <= interest {
        return None;
    }

    // n = -ln(1 - rB/P) / ln(1 + r), interest charged before each payment
    let n = -(1.0 - interest / payment).ln() / (1.0 + r).ln();
    Some(n.ceil() as u32)
}
