/// Baht amount with thousands separators and two decimals, e.g. `1,234.50`.
pub fn format_baht(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (whole, fraction) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}

pub fn route_description(stops: &[String]) -> String {
    stops.join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baht_grouping() {
        assert_eq!(format_baht(0.0), "0.00");
        assert_eq!(format_baht(998.6), "998.60");
        assert_eq!(format_baht(1000.0), "1,000.00");
        assert_eq!(format_baht(1234567.891), "1,234,567.89");
        assert_eq!(format_baht(-2500.5), "-2,500.50");
        assert_eq!(format_baht(-0.001), "0.00");
    }

    #[test]
    fn description_joins_with_arrows() {
        let stops = vec!["W".to_string(), "A".to_string(), "W".to_string()];
        assert_eq!(route_description(&stops), "W -> A -> W");
    }
}
