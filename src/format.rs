// ---------------------------------------------------------------------------
// Number formatting for axes, tooltips and the table
// ---------------------------------------------------------------------------

/// Compact axis tick: `1.5B`, `2.0M`, `3.2K`, or the plain value.
pub fn short_tons(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e9 {
        format!("{:.1}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if abs >= 1e3 {
        format!("{:.1}K", value / 1e3)
    } else {
        format!("{value:.0}")
    }
}

/// Tooltip text with two decimals and a unit, e.g. `1.23M ton`.
pub fn tooltip_tons(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e9 {
        format!("{:.2}B ton", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.2}M ton", value / 1e6)
    } else if abs >= 1e3 {
        format!("{:.2}K ton", value / 1e3)
    } else {
        format!("{} ton", grouped(value))
    }
}

/// Integer part with thousands separators: `1234567.8` → `1,234,568`.
pub fn grouped(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_units() {
        assert_eq!(short_tons(2_500_000_000.0), "2.5B");
        assert_eq!(short_tons(1_200_000.0), "1.2M");
        assert_eq!(short_tons(4_500.0), "4.5K");
        assert_eq!(short_tons(12.0), "12");
    }

    #[test]
    fn tooltip_units() {
        assert_eq!(tooltip_tons(1_234_000.0), "1.23M ton");
        assert_eq!(tooltip_tons(999.0), "999 ton");
    }

    #[test]
    fn thousands_separators() {
        assert_eq!(grouped(0.0), "0");
        assert_eq!(grouped(999.0), "999");
        assert_eq!(grouped(1000.0), "1,000");
        assert_eq!(grouped(1_234_567.8), "1,234,568");
        assert_eq!(grouped(-45_000.0), "-45,000");
    }
}
