//! Terminal rendering of engine results.
//!
//! Amounts are rounded half-up to paise and grouped the Indian way
//! (`₹10,43,092.80`). Rendering never feeds back into the engine.

use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};
use tax_core::calculations::common::round_half_up;
use tax_core::{Regime, RegimeComparison, RegimeRules, SlabBreakdown, TaxResult, TaxYearConfig};

/// One profile's comparison as emitted by `compare --json`.
#[derive(Debug, Serialize)]
pub struct ComparisonReport<'a> {
    pub label: &'a str,
    #[serde(flatten)]
    pub comparison: &'a RegimeComparison,
}

#[derive(Debug, Clone, Tabled)]
struct ComparisonRow {
    #[tabled(rename = "")]
    item: &'static str,
    #[tabled(rename = "New Regime")]
    new_regime: String,
    #[tabled(rename = "Old Regime")]
    old_regime: String,
}

#[derive(Debug, Clone, Tabled)]
struct BracketRow {
    #[tabled(rename = "Income Range")]
    range: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Taxed Amount")]
    taxed_amount: String,
    #[tabled(rename = "Tax")]
    tax: String,
}

#[derive(Debug, Clone, Tabled)]
struct ScheduleRow {
    #[tabled(rename = "Income Range")]
    range: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Slab Width")]
    width: String,
    #[tabled(rename = "Tax on Full Slab")]
    full_slab_tax: String,
}

#[derive(Debug, Clone, Tabled)]
struct RuleRow {
    #[tabled(rename = "Rule")]
    rule: &'static str,
    #[tabled(rename = "New Regime")]
    new_regime: String,
    #[tabled(rename = "Old Regime")]
    old_regime: String,
}

/// Formats `amount` as rupees with Indian digit grouping.
pub fn format_inr(amount: Decimal) -> String {
    let rounded = round_half_up(amount);
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    format!("{sign}₹{}.{fraction}", group_indian(whole))
}

/// Groups a run of digits as thousands, then lakhs and crores (pairs).
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("{},{tail}", groups.join(","))
}

fn yes_no(applies: bool) -> String {
    String::from(if applies { "yes" } else { "no" })
}

fn format_rate(rate: Decimal) -> String {
    format!("{}%", rate.normalize())
}

fn render<T: Tabled>(rows: Vec<T>) -> String {
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string()
}

/// Side-by-side computation of both regimes.
pub fn comparison_table(comparison: &RegimeComparison) -> String {
    let line = |item: &'static str, amount: fn(&TaxResult) -> Decimal| ComparisonRow {
        item,
        new_regime: format_inr(amount(&comparison.new_regime)),
        old_regime: format_inr(amount(&comparison.old_regime)),
    };

    render(vec![
        line("Gross income", |r| r.gross_income),
        line("Standard deduction", |r| r.deductions.standard_deduction),
        line("PF + NPS contributions", |r| r.deductions.employee_contributions),
        line("HRA exemption", |r| r.deductions.hra_exemption),
        line("LTA exemption", |r| r.deductions.lta_exemption),
        line("Conveyance exemption", |r| r.deductions.conveyance_exemption),
        line("Food card exemption", |r| r.deductions.food_card_exemption),
        line("Chapter VI-A deductions", |r| r.deductions.itemized_deductions),
        line("Professional tax", |r| r.deductions.professional_tax),
        line("Total deductions", |r| r.total_deductions),
        line("Taxable income", |r| r.taxable_income),
        line("Tax on slabs", |r| r.tax_before_rebate),
        line("Rebate u/s 87A", |r| r.rebate),
        line("Tax after rebate", |r| r.tax),
        line("Health & education cess", |r| r.cess),
        line("Total tax liability", |r| r.total_liability),
        line("Net income", |r| r.net_income),
    ])
}

/// One-line verdict for a profile.
pub fn comparison_summary(
    label: &str,
    comparison: &RegimeComparison,
) -> String {
    if comparison.savings.is_zero() {
        format!(
            "{label}: both regimes cost {}",
            format_inr(comparison.best().total_liability)
        )
    } else {
        format!(
            "{label}: {} saves {} a year",
            comparison.better.label(),
            format_inr(comparison.savings)
        )
    }
}

/// Per-slab tax on one taxable income.
pub fn breakdown_table(breakdown: &SlabBreakdown) -> String {
    let rows = breakdown
        .lines
        .iter()
        .map(|line| BracketRow {
            range: line.range_label(),
            rate: format_rate(line.rate),
            taxed_amount: format_inr(line.taxed_amount),
            tax: format_inr(line.tax),
        })
        .collect();

    render(rows)
}

/// Rate of the slab `income` falls in, or `-` when no slab covers it.
pub fn marginal_rate(
    rules: &RegimeRules,
    income: Decimal,
) -> String {
    rules
        .slabs
        .slab_for(income)
        .map_or_else(|| "-".to_string(), |slab| format_rate(slab.rate))
}

/// Slab schedule of one regime, as configured.
pub fn slab_schedule_table(rules: &RegimeRules) -> String {
    let rows = rules
        .slabs
        .iter()
        .map(|slab| ScheduleRow {
            range: match slab.max_income {
                Some(max) => format!("{} - {}", format_inr(slab.min_income), format_inr(max)),
                None => format!("{}+", format_inr(slab.min_income)),
            },
            rate: format_rate(slab.rate),
            width: slab
                .width()
                .map_or_else(|| "unbounded".to_string(), format_inr),
            full_slab_tax: slab.width().map_or_else(
                || "-".to_string(),
                |width| format_inr(width * slab.rate / Decimal::ONE_HUNDRED),
            ),
        })
        .collect();

    render(rows)
}

/// Rebate terms and which exemptions each regime honours.
pub fn rules_table(config: &TaxYearConfig) -> String {
    let row = |rule: &'static str, value: fn(&RegimeRules) -> String| RuleRow {
        rule,
        new_regime: value(config.rules(Regime::New)),
        old_regime: value(config.rules(Regime::Old)),
    };

    render(vec![
        row("Rebate threshold", |r| format_inr(r.rebate_threshold)),
        row("Rebate cap", |r| format_inr(r.rebate_cap)),
        row("HRA exemption", |r| yes_no(r.hra_exemption)),
        row("LTA exemption", |r| yes_no(r.lta_exemption)),
        row("Conveyance exemption", |r| yes_no(r.conveyance_exemption)),
        row("Food card exemption", |r| yes_no(r.food_card_exemption)),
        row("Chapter VI-A deductions", |r| yes_no(r.itemized_deductions)),
    ])
}
