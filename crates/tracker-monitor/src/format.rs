//! Human-readable number formatting for tables and reports.

const THOUSAND: f64 = 1_000.0;
const MILLION: f64 = 1_000_000.0;
const BILLION: f64 = 1_000_000_000.0;
const TRILLION: f64 = 1_000_000_000_000.0;

/// Format a market capitalization, e.g. `$2.50T`, `$812.40B`, `$45.3M`.
pub fn format_market_cap(value: f64) -> String {
    if value >= TRILLION {
        format!("${:.2}T", value / TRILLION)
    } else if value >= BILLION {
        format!("${:.2}B", value / BILLION)
    } else if value >= MILLION {
        format!("${:.1}M", value / MILLION)
    } else {
        format!("${}", group_thousands(value.round() as i64))
    }
}

/// Format a share volume, e.g. `1.25B`, `3.4M`, `1.5K`, `999`.
pub fn format_volume(value: f64) -> String {
    if value >= BILLION {
        format!("{:.2}B", value / BILLION)
    } else if value >= MILLION {
        format!("{:.1}M", value / MILLION)
    } else if value >= THOUSAND {
        format!("{:.1}K", value / THOUSAND)
    } else {
        group_thousands(value.round() as i64)
    }
}

/// Compact market cap label for chart axis ticks.
pub fn format_market_cap_axis(value: f64) -> String {
    if value >= TRILLION {
        format!("${:.1}T", value / TRILLION)
    } else if value >= BILLION {
        format!("${:.1}B", value / BILLION)
    } else if value >= MILLION {
        format!("${:.1}M", value / MILLION)
    } else {
        format!("${}", group_thousands(value.round() as i64))
    }
}

/// Dollar change with an explicit sign, e.g. `$+1.25`, `$-0.40`.
pub fn format_signed_money(value: f64) -> String {
    format!("${:+.2}", value)
}

/// Percent change with an explicit sign, e.g. `+2.31%`.
pub fn format_signed_pct(value: f64) -> String {
    format!("{:+.2}%", value)
}

/// Insert `,` between groups of three digits.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_cap_tiers() {
        assert_eq!(format_market_cap(2.5e12), "$2.50T");
        assert_eq!(format_market_cap(812.4e9), "$812.40B");
        assert_eq!(format_market_cap(45.3e6), "$45.3M");
        assert_eq!(format_market_cap(950_000.0), "$950,000");
        assert_eq!(format_market_cap(0.0), "$0");
    }

    #[test]
    fn test_volume_tiers() {
        assert_eq!(format_volume(1500.0), "1.5K");
        assert_eq!(format_volume(3_400_000.0), "3.4M");
        assert_eq!(format_volume(1.25e9), "1.25B");
        assert_eq!(format_volume(999.0), "999");
    }

    #[test]
    fn test_axis_labels() {
        assert_eq!(format_market_cap_axis(2.5e12), "$2.5T");
        assert_eq!(format_market_cap_axis(3.04e9), "$3.0B");
        assert_eq!(format_market_cap_axis(12_500.0), "$12,500");
    }

    #[test]
    fn test_signed() {
        assert_eq!(format_signed_money(1.25), "$+1.25");
        assert_eq!(format_signed_money(-0.4), "$-0.40");
        assert_eq!(format_signed_pct(2.314), "+2.31%");
        assert_eq!(format_signed_pct(0.0), "+0.00%");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
        assert_eq!(group_thousands(-12_345), "-12,345");
    }
}
