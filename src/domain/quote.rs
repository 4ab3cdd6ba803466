//! The pure compute cycle: snapshot plus price table in, quote out.
//!
//! Runs line items, the custom-dimension job and the totals chain in order,
//! with no state carried between calls. Every code path terminates with a
//! fully formed [`QuoteResult`], even under maximally malformed input.

use super::entities::{
    EngineConfig, ExtraLine, LineItem, QuoteResult, ShapeType, SideSurcharge, SpecialResult,
    TotalsResult, VatPolicy,
};
use super::fields::FieldSnapshot;
use super::price_table::PriceTable;

/// The fixed catalog of flat-priced items, in form order. The price key for
/// an item id is always `p_{id}`.
pub const CATALOG: &[(&str, &str)] = &[
    ("lucka_u1000", "Lucka under 1000 mm"),
    ("lucka_1000_1500", "Lucka 1000-1500 mm"),
    ("lucka_spegel", "Spegellucka"),
    ("skafferidor", "Skafferidörr"),
    ("garderob_o1500", "Garderobsdörr över 1500 mm"),
    ("ladfront_45", "Lådfront upp till 45 cm"),
    ("ladfront_stor", "Lådfront stor"),
    ("innerdor", "Innerdörr"),
    ("innerdor_glas", "Innerdörr med glas"),
    ("stol", "Stol"),
    ("kryddhylla", "Kryddhylla"),
    ("bord", "Bord"),
    ("ytterdor_1", "Ytterdörr, en sida"),
    ("ytterdor_2", "Ytterdörr, två sidor"),
    ("karm", "Karm"),
    ("sidoljus", "Sidoljus"),
    ("sockel_m", "Sockel per meter"),
];

/// Custom-dimension form fields.
pub const FIELD_SHAPE: &str = "spec_typ";
pub const FIELD_COUNT: &str = "spec_antal";
pub const FIELD_WIDTH: &str = "spec_b";
pub const FIELD_DEPTH: &str = "spec_d";
pub const FIELD_HEIGHT: &str = "spec_h";
pub const FIELD_SHELVES: &str = "spec_hyll";
pub const SIDE_FLAGS: &[&str] = &["spec_utv", "spec_bak", "spec_under", "spec_inv"];

pub const FIELD_DISCOUNT: &str = "rabatt";
pub const SHELF_PRICE_KEY: &str = "p_hyllplan";

/// ROT projection coefficient applied to the post-discount total.
pub const REDUCED_RATIO: f64 = 0.7;

/// Runs one full compute cycle. Pure and idempotent: identical inputs yield
/// an identical result, and the snapshot and table are only read.
pub fn compute(
    snapshot: &FieldSnapshot,
    prices: &PriceTable,
    config: &EngineConfig,
) -> QuoteResult {
    let material = config
        .material_field
        .as_deref()
        .map(|field| snapshot.text(field).trim())
        .filter(|value| !value.is_empty());

    let lines = compute_lines(snapshot, prices, material);
    let material_subtotal: f64 = lines.iter().map(|line| line.line_total).sum();

    let special = compute_special(snapshot, prices, config);
    let extras = compute_extras(snapshot, prices, config);

    let totals = aggregate(snapshot, config, material_subtotal, &special, &extras);

    QuoteResult {
        lines,
        special,
        extras,
        totals,
    }
}

fn compute_lines(
    snapshot: &FieldSnapshot,
    prices: &PriceTable,
    material: Option<&str>,
) -> Vec<LineItem> {
    CATALOG
        .iter()
        .map(|&(id, _)| {
            let quantity = snapshot.read_number(id);
            let unit_price = prices.lookup_scoped(material, &format!("p_{id}"));
            LineItem {
                id,
                quantity,
                unit_price,
                line_total: quantity * unit_price,
            }
        })
        .collect()
}

fn compute_special(
    snapshot: &FieldSnapshot,
    prices: &PriceTable,
    config: &EngineConfig,
) -> SpecialResult {
    let shape = ShapeType::from_field(snapshot.text(FIELD_SHAPE));
    let count = snapshot.read_int(FIELD_COUNT);
    let width = snapshot.read_int(FIELD_WIDTH);
    let depth = snapshot.read_int(FIELD_DEPTH);
    let height = snapshot.read_int(FIELD_HEIGHT);
    let shelves = snapshot.read_number(FIELD_SHELVES);

    // mm² per unit; a panel is painted on one face, a carcass all around.
    // Any relevant dimension at or below zero zeroes the surface outright,
    // so two negative inputs can never multiply into a positive area. The
    // product is taken in floating point: oversized input must stay finite,
    // never overflow.
    let surface = match shape {
        ShapeType::Panel if width > 0 && height > 0 => width as f64 * height as f64,
        ShapeType::Furniture if width > 0 && depth > 0 && height > 0 => {
            let (w, d, h) = (width as f64, depth as f64, height as f64);
            2.0 * (w * h + w * d + d * h)
        }
        _ => 0.0,
    };
    let area_m2 = surface / 1_000_000.0 * count as f64;

    let unit_area_price = prices.lookup(shape.area_price_key());
    let shelf_price = prices.lookup(SHELF_PRICE_KEY);

    let side_count = SIDE_FLAGS
        .iter()
        .filter(|flag| snapshot.read_flag(flag))
        .count() as u8;
    let side_rate = match &config.side_surcharge {
        SideSurcharge::RateKey { key } => prices.lookup(key) / 100.0,
        SideSurcharge::PerSide { rate } => *rate,
    };

    let base = area_m2 * unit_area_price + shelves * shelf_price;
    let subtotal = base * (1.0 + side_count as f64 * side_rate);

    SpecialResult {
        shape,
        count,
        area_m2,
        side_count,
        subtotal,
    }
}

fn compute_extras(
    snapshot: &FieldSnapshot,
    prices: &PriceTable,
    config: &EngineConfig,
) -> Vec<ExtraLine> {
    config
        .extras
        .iter()
        .map(|extra| {
            let count = snapshot.read_int(&extra.field);
            let unit_price = prices.lookup(&extra.price_key);
            ExtraLine {
                field: extra.field.clone(),
                count,
                unit_price,
                amount: count as f64 * unit_price,
            }
        })
        .collect()
}

fn aggregate(
    snapshot: &FieldSnapshot,
    config: &EngineConfig,
    material_subtotal: f64,
    special: &SpecialResult,
    extras: &[ExtraLine],
) -> TotalsResult {
    let belopp = material_subtotal + special.subtotal;
    let extras_subtotal: f64 = extras.iter().map(|extra| extra.amount).sum();
    let pre_discount_subtotal = belopp + extras_subtotal;

    // A deployment without a discount field coerces to 0 and the stage is a
    // no-op. Percentages over 100 are accepted and drive the total negative.
    let discount_percent = snapshot.read_int(FIELD_DISCOUNT);
    let discount_amount = pre_discount_subtotal * discount_percent as f64 / 100.0;
    let post_discount_subtotal = pre_discount_subtotal - discount_amount;

    let reduced_ratio_total = post_discount_subtotal * REDUCED_RATIO;

    let vat_rate = match &config.vat {
        VatPolicy::PercentField { field } => snapshot.read_number(field) / 100.0,
        VatPolicy::Toggle { field, rate } => {
            if snapshot.read_flag(field) {
                *rate
            } else {
                0.0
            }
        }
    };
    let vat_inclusive_total = post_discount_subtotal * (1.0 + vat_rate);

    TotalsResult {
        material_subtotal,
        special_subtotal: special.subtotal,
        belopp,
        extras_subtotal,
        pre_discount_subtotal,
        discount_percent,
        discount_amount,
        post_discount_subtotal,
        reduced_ratio_total,
        vat_rate,
        vat_inclusive_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, f64)]) -> PriceTable {
        PriceTable::from_entries(entries.iter().map(|(k, v)| (k.to_string(), *v)))
    }

    #[test]
    fn empty_snapshot_and_table_is_all_zero() {
        let result = compute(
            &FieldSnapshot::new(),
            &PriceTable::new(),
            &EngineConfig::default(),
        );

        assert_eq!(result.lines.len(), CATALOG.len());
        assert!(result.lines.iter().all(|line| line.line_total == 0.0));
        assert!(result.lines.iter().all(|line| !line.display()));
        assert_eq!(result.special.subtotal, 0.0);
        assert_eq!(result.special.area_m2, 0.0);
        assert_eq!(result.totals.pre_discount_subtotal, 0.0);
        assert_eq!(result.totals.post_discount_subtotal, 0.0);
        assert_eq!(result.totals.vat_inclusive_total, 0.0);
        assert_eq!(result.totals.reduced_ratio_total, 0.0);
    }

    #[test]
    fn line_total_is_quantity_times_unit_price() {
        let mut snapshot = FieldSnapshot::new();
        snapshot.set_text("stol", "3");
        let prices = table(&[("p_stol", 150.0)]);

        let result = compute(&snapshot, &prices, &EngineConfig::default());
        let line = result.lines.iter().find(|l| l.id == "stol").unwrap();
        assert_eq!(line.line_total, 450.0);
        assert!(line.display());
        assert_eq!(result.totals.material_subtotal, 450.0);
    }

    #[test]
    fn zero_quantity_suppresses_display_regardless_of_price() {
        let mut snapshot = FieldSnapshot::new();
        snapshot.set_text("bord", "0");
        let prices = table(&[("p_bord", 2500.0)]);

        let result = compute(&snapshot, &prices, &EngineConfig::default());
        let line = result.lines.iter().find(|l| l.id == "bord").unwrap();
        assert_eq!(line.line_total, 0.0);
        assert!(!line.display());
    }

    #[test]
    fn material_keyed_lines_use_composite_prices() {
        let mut snapshot = FieldSnapshot::new();
        snapshot.set_text("material", "ek");
        snapshot.set_text("innerdor", "2");
        let prices = table(&[("p_innerdor", 900.0), ("ek_p_innerdor", 1400.0)]);

        let config = EngineConfig::material_keyed("material");
        let result = compute(&snapshot, &prices, &config);
        let line = result.lines.iter().find(|l| l.id == "innerdor").unwrap();
        assert_eq!(line.line_total, 2800.0);
    }

    #[test]
    fn panel_surface_uses_single_face() {
        let mut snapshot = FieldSnapshot::new();
        snapshot.set_text(FIELD_SHAPE, "skiva");
        snapshot.set_text(FIELD_WIDTH, "1000");
        snapshot.set_text(FIELD_HEIGHT, "500");
        snapshot.set_text(FIELD_COUNT, "2");
        let prices = table(&[("p_spec_skiva_m2", 1000.0)]);

        let result = compute(&snapshot, &prices, &EngineConfig::default());
        assert_eq!(result.special.area_m2, 1.0);
        assert_eq!(result.special.subtotal, 1000.0);
    }

    #[test]
    fn furniture_surface_uses_full_box() {
        let mut snapshot = FieldSnapshot::new();
        snapshot.set_text(FIELD_SHAPE, "mobel");
        snapshot.set_text(FIELD_WIDTH, "400");
        snapshot.set_text(FIELD_DEPTH, "300");
        snapshot.set_text(FIELD_HEIGHT, "200");
        snapshot.set_text(FIELD_COUNT, "1");

        let result = compute(&snapshot, &PriceTable::new(), &EngineConfig::default());
        // 2 * (400*200 + 400*300 + 300*200) = 520 000 mm²
        assert!((result.special.area_m2 - 0.52).abs() < 1e-12);
    }

    #[test]
    fn side_surcharge_from_table_rate() {
        let mut snapshot = FieldSnapshot::new();
        snapshot.set_text(FIELD_SHAPE, "skiva");
        snapshot.set_text(FIELD_WIDTH, "1000");
        snapshot.set_text(FIELD_HEIGHT, "500");
        snapshot.set_text(FIELD_COUNT, "2");
        snapshot.set_flag("spec_utv", true);
        snapshot.set_flag("spec_inv", true);
        let prices = table(&[("p_spec_skiva_m2", 1000.0), ("p_paslag_side_pct", 10.0)]);

        let result = compute(&snapshot, &prices, &EngineConfig::default());
        assert_eq!(result.special.side_count, 2);
        assert!((result.special.subtotal - 1200.0).abs() < 1e-9);
    }

    #[test]
    fn side_surcharge_full_per_side() {
        let mut snapshot = FieldSnapshot::new();
        snapshot.set_text(FIELD_SHAPE, "skiva");
        snapshot.set_text(FIELD_WIDTH, "1000");
        snapshot.set_text(FIELD_HEIGHT, "500");
        snapshot.set_text(FIELD_COUNT, "2");
        snapshot.set_flag("spec_utv", true);
        snapshot.set_flag("spec_inv", true);
        let prices = table(&[("p_spec_skiva_m2", 1000.0)]);

        let mut config = EngineConfig::default();
        config.side_surcharge = SideSurcharge::PerSide { rate: 1.0 };
        let result = compute(&snapshot, &prices, &config);
        assert!((result.special.subtotal - 3000.0).abs() < 1e-9);
    }

    #[test]
    fn no_side_flags_means_no_surcharge() {
        let mut snapshot = FieldSnapshot::new();
        snapshot.set_text(FIELD_SHAPE, "skiva");
        snapshot.set_text(FIELD_WIDTH, "500");
        snapshot.set_text(FIELD_HEIGHT, "500");
        snapshot.set_text(FIELD_COUNT, "1");
        let prices = table(&[("p_spec_skiva_m2", 800.0), ("p_paslag_side_pct", 10.0)]);

        let result = compute(&snapshot, &prices, &EngineConfig::default());
        assert_eq!(result.special.side_count, 0);
        assert!((result.special.subtotal - 200.0).abs() < 1e-9);
    }

    #[test]
    fn shelves_are_priced_without_dimensions() {
        let mut snapshot = FieldSnapshot::new();
        snapshot.set_text(FIELD_SHELVES, "3");
        let prices = table(&[("p_hyllplan", 120.0)]);

        let result = compute(&snapshot, &prices, &EngineConfig::default());
        assert_eq!(result.special.area_m2, 0.0);
        assert_eq!(result.special.subtotal, 360.0);
    }

    #[test]
    fn negative_dimension_yields_zero_surface_not_an_error() {
        let mut snapshot = FieldSnapshot::new();
        snapshot.set_text(FIELD_SHAPE, "skiva");
        snapshot.set_text(FIELD_WIDTH, "-100");
        snapshot.set_text(FIELD_HEIGHT, "500");
        snapshot.set_text(FIELD_COUNT, "4");

        let result = compute(&snapshot, &PriceTable::new(), &EngineConfig::default());
        assert_eq!(result.special.area_m2, 0.0);
        assert_eq!(result.special.subtotal, 0.0);

        // Two negatives must not multiply into a positive surface.
        snapshot.set_text(FIELD_HEIGHT, "-500");
        let result = compute(&snapshot, &PriceTable::new(), &EngineConfig::default());
        assert_eq!(result.special.area_m2, 0.0);
    }

    #[test]
    fn oversized_dimensions_never_overflow() {
        // Dimensions past any plausible workpiece still have to price to a
        // finite amount on both formulas.
        let mut snapshot = FieldSnapshot::new();
        snapshot.set_text(FIELD_SHAPE, "skiva");
        snapshot.set_text(FIELD_WIDTH, "4000000000");
        snapshot.set_text(FIELD_HEIGHT, "4000000000");
        snapshot.set_text(FIELD_COUNT, "1");
        let prices = table(&[("p_spec_skiva_m2", 1000.0), ("p_spec_mobel_m2", 1250.0)]);

        let panel = compute(&snapshot, &prices, &EngineConfig::default());
        assert!(panel.special.area_m2.is_finite());
        assert!(panel.special.area_m2 > 0.0);
        assert!(panel.totals.vat_inclusive_total.is_finite());

        snapshot.set_text(FIELD_SHAPE, "mobel");
        snapshot.set_text(FIELD_DEPTH, "4000000000");
        let furniture = compute(&snapshot, &prices, &EngineConfig::default());
        assert!(furniture.special.area_m2.is_finite());
        assert!(furniture.special.subtotal.is_finite());
    }

    #[test]
    fn furniture_with_missing_depth_has_no_surface() {
        let mut snapshot = FieldSnapshot::new();
        snapshot.set_text(FIELD_SHAPE, "mobel");
        snapshot.set_text(FIELD_WIDTH, "400");
        snapshot.set_text(FIELD_HEIGHT, "200");
        snapshot.set_text(FIELD_COUNT, "1");

        let result = compute(&snapshot, &PriceTable::new(), &EngineConfig::default());
        assert_eq!(result.special.area_m2, 0.0);
    }

    #[test]
    fn discount_and_vat_chain() {
        // Pre-discount 1000: one chair, priced to land exactly there.
        let mut snapshot = FieldSnapshot::new();
        snapshot.set_text("stol", "1");
        snapshot.set_text(FIELD_DISCOUNT, "10");
        snapshot.set_text("vat", "25");
        let prices = table(&[("p_stol", 1000.0)]);

        let result = compute(&snapshot, &prices, &EngineConfig::default());
        let totals = &result.totals;
        assert_eq!(totals.pre_discount_subtotal, 1000.0);
        assert_eq!(totals.discount_amount, 100.0);
        assert_eq!(totals.post_discount_subtotal, 900.0);
        assert!((totals.reduced_ratio_total - 630.0).abs() < 1e-9);
        assert!((totals.vat_inclusive_total - 1125.0).abs() < 1e-9);
    }

    #[test]
    fn discount_percent_is_truncated() {
        let mut snapshot = FieldSnapshot::new();
        snapshot.set_text("stol", "1");
        snapshot.set_text(FIELD_DISCOUNT, "10.9");
        let prices = table(&[("p_stol", 1000.0)]);

        let result = compute(&snapshot, &prices, &EngineConfig::default());
        assert_eq!(result.totals.discount_percent, 10);
        assert_eq!(result.totals.discount_amount, 100.0);
    }

    #[test]
    fn vat_toggle_applies_fixed_rate() {
        let mut snapshot = FieldSnapshot::new();
        snapshot.set_text("stol", "1");
        snapshot.set_text("material", "ek");
        let prices = table(&[("ek_p_stol", 400.0)]);
        let config = EngineConfig::material_keyed("material");

        let off = compute(&snapshot, &prices, &config);
        assert_eq!(off.totals.vat_rate, 0.0);
        assert_eq!(off.totals.vat_inclusive_total, 400.0);

        snapshot.set_flag("moms", true);
        let on = compute(&snapshot, &prices, &config);
        assert_eq!(on.totals.vat_rate, 0.25);
        assert_eq!(on.totals.vat_inclusive_total, 500.0);
    }

    #[test]
    fn extras_use_truncated_counts() {
        let mut snapshot = FieldSnapshot::new();
        snapshot.set_text("spackling", "2.9");
        snapshot.set_text("besok", "3");
        let prices = table(&[("p_spackling", 200.0), ("p_besok", 450.0)]);

        let result = compute(&snapshot, &prices, &EngineConfig::default());
        let spackling = result.extras.iter().find(|e| e.field == "spackling").unwrap();
        assert_eq!(spackling.count, 2);
        assert_eq!(spackling.amount, 400.0);
        assert_eq!(result.totals.extras_subtotal, 400.0 + 1350.0);
    }

    #[test]
    fn garbage_input_never_poisons_the_totals() {
        let mut snapshot = FieldSnapshot::new();
        snapshot.set_text("stol", "banan");
        snapshot.set_text(FIELD_WIDTH, "en meter");
        snapshot.set_text(FIELD_DISCOUNT, "NaN");
        snapshot.set_text("vat", "");
        let prices = table(&[("p_stol", 150.0)]);

        let result = compute(&snapshot, &prices, &EngineConfig::default());
        assert!(result.totals.vat_inclusive_total.is_finite());
        assert_eq!(result.totals.pre_discount_subtotal, 0.0);
    }

    #[test]
    fn negative_quantity_propagates_arithmetically() {
        let mut snapshot = FieldSnapshot::new();
        snapshot.set_text("stol", "-2");
        let prices = table(&[("p_stol", 150.0)]);

        let result = compute(&snapshot, &prices, &EngineConfig::default());
        assert_eq!(result.totals.material_subtotal, -300.0);
        assert!(result.totals.post_discount_subtotal < 0.0);
    }

    #[test]
    fn compute_is_idempotent() {
        let mut snapshot = FieldSnapshot::new();
        snapshot.set_text("stol", "2");
        snapshot.set_text(FIELD_SHAPE, "mobel");
        snapshot.set_text(FIELD_WIDTH, "400");
        snapshot.set_text(FIELD_DEPTH, "300");
        snapshot.set_text(FIELD_HEIGHT, "200");
        snapshot.set_text(FIELD_COUNT, "1");
        snapshot.set_flag("spec_utv", true);
        snapshot.set_text(FIELD_DISCOUNT, "5");
        snapshot.set_text("vat", "25");
        let prices = table(&[
            ("p_stol", 150.0),
            ("p_spec_mobel_m2", 1200.0),
            ("p_paslag_side_pct", 10.0),
        ]);
        let config = EngineConfig::default();

        let first = compute(&snapshot, &prices, &config);
        let second = compute(&snapshot, &prices, &config);
        assert_eq!(first, second);
    }
}
