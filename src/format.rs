//! Magnitude-aware number formatting for axis ticks and bin labels.

/// True when `v` is a whole multiple of `unit`, within floating-point slack.
fn is_multiple_of(v: f64, unit: f64) -> bool {
    let scaled = v / unit;
    (scaled - scaled.round()).abs() < 1e-9
}

fn trim_integer(v: f64) -> String {
    format!("{}", v)
}

/// Mantissa-times-power-of-ten form for very large or very small magnitudes.
fn format_scientific(v: f64) -> String {
    let exponent = v.abs().log10().floor();
    let mantissa = v / 10f64.powf(exponent);
    let mantissa_str = if is_multiple_of(mantissa, 1.0) {
        trim_integer(mantissa.round())
    } else {
        format!("{:.1}", mantissa)
    };
    format!("{}\u{d7}10^{}", mantissa_str, exponent as i64)
}

/// Format an axis tick value. Whole numbers print without decimals; fractional
/// values get just enough precision; magnitudes at or beyond 1e6 (or below
/// 1e-3) switch to mantissa-exponent form.
pub fn format_number(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }

    let abs = v.abs();
    if abs >= 1e6 || abs < 1e-3 {
        format_scientific(v)
    } else if abs >= 1.0 {
        if is_multiple_of(v, 1.0) {
            trim_integer(v.round())
        } else if is_multiple_of(v, 0.1) {
            format!("{:.1}", v)
        } else {
            format!("{:.2}", v)
        }
    } else if is_multiple_of(v, 0.01) {
        format!("{:.2}", v)
    } else if is_multiple_of(v, 0.001) {
        format!("{:.3}", v)
    } else {
        format!("{:.4}", v)
    }
}

/// Format one edge of a numeric bin. Precision follows the bin width: wider
/// bins need fewer decimals to stay unambiguous.
fn format_bin_edge(v: f64, bin_width: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }

    let abs = v.abs();
    if abs >= 1e6 || abs < 1e-3 {
        format_scientific(v)
    } else if abs >= 1.0 {
        if is_multiple_of(v, 1.0) {
            trim_integer(v.round())
        } else if bin_width >= 1.0 {
            format!("{:.0}", v)
        } else if bin_width >= 0.1 {
            format!("{:.1}", v)
        } else {
            format!("{:.2}", v)
        }
    } else if bin_width >= 0.01 {
        format!("{:.2}", v)
    } else if bin_width >= 0.001 {
        format!("{:.3}", v)
    } else {
        format!("{:.4}", v)
    }
}

/// Label for a numeric bin spanning `[start, end]`.
pub fn format_bin_label(start: f64, end: f64, bin_width: f64) -> String {
    format!(
        "{}-{}",
        format_bin_edge(start, bin_width),
        format_bin_edge(end, bin_width)
    )
}
