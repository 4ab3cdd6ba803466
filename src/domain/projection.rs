//! Maps a computed quote onto named display slots.
//!
//! Slot ids match the form's output elements one-to-one. A slot renders
//! either an sv-SE currency string or the placeholder when the line is
//! suppressed.

use std::collections::BTreeMap;

use super::entities::QuoteResult;

/// Shown for suppressed lines and values without meaning (qty 0, NaN).
pub const PLACEHOLDER: &str = "—";

/// Formats an amount the way the form always has: grouped thousands, comma
/// decimals, trailing `kr`. Non-finite input renders as the placeholder.
pub fn sek(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }

    let cents = (value * 100.0).round() as i128;
    let negative = cents < 0;
    let cents = cents.unsigned_abs();
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped},{fraction:02} kr")
}

/// Area display: two decimals, placeholder when nothing is measured.
pub fn area_m2(value: f64) -> String {
    if value.is_finite() && value > 0.0 {
        format!("{value:.2}")
    } else {
        PLACEHOLDER.to_string()
    }
}

/// Projects every computed value onto its output slot.
pub fn project(result: &QuoteResult) -> BTreeMap<String, String> {
    let mut slots = BTreeMap::new();

    for line in &result.lines {
        let text = if line.display() {
            sek(line.line_total)
        } else {
            PLACEHOLDER.to_string()
        };
        slots.insert(format!("line_{}", line.id), text);
    }

    slots.insert("spec_m2".to_string(), area_m2(result.special.area_m2));
    let spec_text = if result.special.subtotal > 0.0 {
        sek(result.special.subtotal)
    } else {
        PLACEHOLDER.to_string()
    };
    slots.insert("spec_sum".to_string(), spec_text);

    let totals = &result.totals;
    slots.insert("belopp".to_string(), sek(totals.belopp));

    for extra in &result.extras {
        slots.insert(format!("res_{}", extra.field), sek(extra.amount));
    }

    // The discount slot keeps the original convention: an explicit leading
    // minus when a discount applies, a plain zero amount otherwise.
    let discount_text = if totals.discount_percent != 0 {
        format!("− {}", sek(totals.discount_amount))
    } else {
        sek(0.0)
    };
    slots.insert("res_rabatt".to_string(), discount_text);

    slots.insert("summa".to_string(), sek(totals.post_discount_subtotal));
    slots.insert("exkl_rot".to_string(), sek(totals.reduced_ratio_total));
    slots.insert("inkl_moms".to_string(), sek(totals.vat_inclusive_total));

    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::EngineConfig;
    use crate::domain::fields::FieldSnapshot;
    use crate::domain::price_table::PriceTable;
    use crate::domain::quote::compute;

    #[test]
    fn sek_groups_thousands_and_uses_comma_decimals() {
        assert_eq!(sek(0.0), "0,00 kr");
        assert_eq!(sek(450.0), "450,00 kr");
        assert_eq!(sek(12_345.678), "12 345,68 kr");
        assert_eq!(sek(1_000_000.0), "1 000 000,00 kr");
        assert_eq!(sek(-1234.5), "-1 234,50 kr");
    }

    #[test]
    fn sek_renders_placeholder_for_non_finite() {
        assert_eq!(sek(f64::NAN), PLACEHOLDER);
        assert_eq!(sek(f64::INFINITY), PLACEHOLDER);
    }

    #[test]
    fn area_uses_two_decimals_or_placeholder() {
        assert_eq!(area_m2(0.52), "0.52");
        assert_eq!(area_m2(0.0), PLACEHOLDER);
        assert_eq!(area_m2(-1.0), PLACEHOLDER);
    }

    #[test]
    fn zero_baseline_projects_placeholders_and_zero_totals() {
        let result = compute(
            &FieldSnapshot::new(),
            &PriceTable::new(),
            &EngineConfig::default(),
        );
        let slots = project(&result);

        assert_eq!(slots["line_stol"], PLACEHOLDER);
        assert_eq!(slots["spec_m2"], PLACEHOLDER);
        assert_eq!(slots["spec_sum"], PLACEHOLDER);
        assert_eq!(slots["belopp"], "0,00 kr");
        assert_eq!(slots["res_rabatt"], "0,00 kr");
        assert_eq!(slots["summa"], "0,00 kr");
        assert_eq!(slots["exkl_rot"], "0,00 kr");
        assert_eq!(slots["inkl_moms"], "0,00 kr");
    }

    #[test]
    fn discount_slot_carries_a_leading_minus() {
        let mut snapshot = FieldSnapshot::new();
        snapshot.set_text("stol", "1");
        snapshot.set_text("rabatt", "10");
        let prices = PriceTable::from_entries([("p_stol".to_string(), 1000.0)]);

        let slots = project(&compute(&snapshot, &prices, &EngineConfig::default()));
        assert_eq!(slots["res_rabatt"], "− 100,00 kr");
        assert_eq!(slots["line_stol"], "1 000,00 kr");
    }
}
