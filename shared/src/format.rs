//! Display formatting for table cells and labels

use rust_decimal::Decimal;

use crate::types::Language;

/// Uppercase the first letter of every word. Names are stored lowercase.
pub fn capitalize(value: &str) -> String {
    value
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Trim and lowercase free-form text before it is stored or searched
pub fn normalize_text(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Money with two decimals and a leading dollar sign
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${:.2}", rounded.abs())
    } else {
        format!("${:.2}", rounded.abs())
    }
}

/// Quantity annotated with its measurement unit, e.g. `"3.5 kg"`
pub fn format_quantity(quantity: Decimal, unit: &str) -> String {
    let quantity = quantity.normalize();
    if unit.is_empty() {
        quantity.to_string()
    } else {
        format!("{} {}", quantity, unit)
    }
}

/// Lot number as shown in tables and labels
pub fn format_lot_number(id: crate::types::EntityId) -> String {
    format!("#{}", id)
}

/// Canonical empty-table message
pub fn no_records_message(language: Language) -> &'static str {
    language.pick("no records found", "no se encontró ningún registro")
}

/// Placeholder shown in the scan field
pub fn scanner_placeholder(language: Language) -> &'static str {
    language.pick("Waiting for scanner...", "Esperando scanner...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("miel de abeja"), "Miel De Abeja");
        assert_eq!(capitalize("bodega"), "Bodega");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("ñandú"), "Ñandú");
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Bodega Norte "), "bodega norte");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(dec("12.5")), "$12.50");
        assert_eq!(format_currency(dec("0")), "$0.00");
        assert_eq!(format_currency(dec("3.456")), "$3.46");
        assert_eq!(format_currency(dec("-4")), "-$4.00");
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(dec("3.500"), "kg"), "3.5 kg");
        assert_eq!(format_quantity(dec("12"), ""), "12");
    }

    #[test]
    fn test_messages_follow_language() {
        assert_eq!(no_records_message(Language::Spanish), "no se encontró ningún registro");
        assert_eq!(no_records_message(Language::English), "no records found");
        assert_eq!(scanner_placeholder(Language::Spanish), "Esperando scanner...");
    }
}
