//! # Row Width Distribution
//!
//! Each element in a row may request a width: a percentage, a ratio, an
//! absolute length, or nothing ("auto"). Fixed requests are resolved against
//! the row's width minus the gaps between elements, and whatever is left is
//! split evenly among the auto elements. When there is no auto element to
//! absorb the difference, the fixed widths are grown or shrunk in
//! proportion so the slots always tile the row exactly.

use log::warn;

use super::PX_TO_PT;

/// A parsed render width specifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderWidth {
    Auto,
    /// Percentage of the row's inner width.
    Percent(f64),
    /// Fraction of the row's inner width, e.g. "1/3".
    Ratio(f64),
    /// Absolute width in points.
    Points(f64),
}

impl RenderWidth {
    /// Parse a specifier. Anything unparsable falls back to auto.
    pub fn parse(spec: &str) -> RenderWidth {
        let spec = spec.trim();
        if spec.is_empty() || spec.eq_ignore_ascii_case("auto") || spec.starts_with("calc") {
            return RenderWidth::Auto;
        }
        match Self::try_parse(spec) {
            Some(width) => width,
            None => {
                warn!("unparsable render width {:?}, using auto", spec);
                RenderWidth::Auto
            }
        }
    }

    fn try_parse(spec: &str) -> Option<RenderWidth> {
        let number = |s: &str| -> Option<f64> {
            let v: f64 = s.trim().parse().ok()?;
            (v.is_finite() && v >= 0.0).then_some(v)
        };

        if let Some(pct) = spec.strip_suffix('%') {
            return number(pct).map(RenderWidth::Percent);
        }
        if let Some((num, den)) = spec.split_once('/') {
            let (num, den) = (number(num)?, number(den)?);
            return (den > 0.0).then(|| RenderWidth::Ratio(num / den));
        }
        if let Some(pt) = spec.strip_suffix("pt") {
            return number(pt).map(RenderWidth::Points);
        }
        let px = spec.strip_suffix("px").unwrap_or(spec);
        number(px).map(|v| RenderWidth::Points(v * PX_TO_PT))
    }

    /// Width in points against `inner`, or `None` for auto.
    pub fn resolve(&self, inner: f64) -> Option<f64> {
        match *self {
            RenderWidth::Auto => None,
            RenderWidth::Percent(p) => Some(inner * p / 100.0),
            RenderWidth::Ratio(r) => Some(inner * r),
            RenderWidth::Points(v) => Some(v),
        }
    }
}

/// Split `available` into one width per element, leaving `gap` between
/// neighbours. The widths plus `(n - 1) × gap` add up to `available`
/// whenever the gaps themselves fit.
pub fn distribute_widths(specs: &[RenderWidth], available: f64, gap: f64) -> Vec<f64> {
    if specs.is_empty() {
        return Vec::new();
    }
    let inner = (available - (specs.len() - 1) as f64 * gap).max(0.0);
    let resolved: Vec<Option<f64>> = specs.iter().map(|s| s.resolve(inner)).collect();
    let autos = resolved.iter().filter(|w| w.is_none()).count();
    let fixed_sum: f64 = resolved.iter().flatten().sum();
    let remaining = inner - fixed_sum;

    if autos > 0 && remaining >= 0.0 {
        let share = remaining / autos as f64;
        return resolved.iter().map(|w| w.unwrap_or(share)).collect();
    }

    // No auto slot can take up the slack: every fixed slot stretches or
    // squeezes in proportion to what it asked for, autos stay at zero.
    let mut slots: Vec<f64> = resolved.iter().map(|w| w.unwrap_or(0.0)).collect();
    if fixed_sum > 0.0 {
        scale_slots(&mut slots, inner);
    } else {
        let fixed = resolved.iter().filter(|w| w.is_some()).count();
        let share = remaining / fixed as f64;
        for (slot, requested) in slots.iter_mut().zip(&resolved) {
            if requested.is_some() {
                *slot = share;
            }
        }
    }
    slots
}

/// Rescale `slots` so they add up to `inner`, keeping their proportions.
fn scale_slots(slots: &mut [f64], inner: f64) {
    let total: f64 = slots.iter().sum();
    if total <= 0.0 {
        return;
    }
    let factor = inner / total;
    for slot in slots.iter_mut() {
        *slot *= factor;
    }
}
