//! Report rendering
//!
//! Text output is two comfy-table tables (costs, savings) with grand totals;
//! JSON output is the serialized [`Report`].

use crate::error::Result;
use crate::pricing::PricingTable;
use crate::report::Report;
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Table};
use console::style;
use rust_decimal::{Decimal, RoundingStrategy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// `$1,234.56`; half-cent values round away from zero
pub fn format_usd(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    let negative = rounded < Decimal::ZERO;
    let text = rounded.abs().to_string();
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}.{}", if negative { "-" } else { "" }, grouped, cents)
}

fn money_cell(value: Decimal) -> Cell {
    Cell::new(format_usd(value)).set_alignment(CellAlignment::Right)
}

/// One row per cost line, account name on the first row of each account
pub fn cost_table(report: &Report) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        "Cloud Account",
        "Module",
        "Tier",
        "Qty",
        "Unit Price",
        "Monthly",
        "Annual",
    ]);

    for summary in &report.summaries {
        for (i, cost) in summary.costs.iter().enumerate() {
            let account = if i == 0 { summary.cloud_account.as_str() } else { "" };
            table.add_row(vec![
                Cell::new(account),
                Cell::new(&cost.description),
                Cell::new(&cost.tier),
                Cell::new(cost.count).set_alignment(CellAlignment::Right),
                money_cell(cost.unit_price),
                money_cell(cost.monthly_cost),
                money_cell(cost.annual_cost),
            ]);
        }
    }

    table.add_row(vec![
        Cell::new("TOTAL"),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        money_cell(report.total_monthly),
        money_cell(report.total_annual),
    ]);
    table
}

/// One row per savings line with grand totals
pub fn savings_table(report: &Report) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Cloud Account", "Module", "Saving/mo", "Saving/yr"]);

    for saving in report.savings_items() {
        table.add_row(vec![
            Cell::new(&saving.cloud_account),
            Cell::new(&saving.description),
            money_cell(saving.monthly_saving),
            money_cell(saving.annual_saving),
        ]);
    }

    table.add_row(vec![
        Cell::new("TOTAL"),
        Cell::new(""),
        money_cell(report.potential_monthly_saving),
        money_cell(report.potential_annual_saving),
    ]);
    table
}

/// The active price list, flagging modules nothing counts
pub fn pricing_table(pricing: &PricingTable) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Module", "Description", "Unit Price", "Unit", "Count Key"]);

    for entry in pricing.entries() {
        let key = if entry.count_key.is_counted() {
            entry.count_key.to_string()
        } else {
            format!("{} (not counted)", entry.count_key)
        };
        table.add_row(vec![
            Cell::new(&entry.module_id),
            Cell::new(&entry.description),
            Cell::new(format!("${}", entry.unit_price)).set_alignment(CellAlignment::Right),
            Cell::new(&entry.unit_label),
            Cell::new(key),
        ]);
    }
    table
}

/// Render a report as text
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "\n{}\n\n",
        style("=== Defender for Cloud - Cost Summary ===").bold()
    ));
    out.push_str(&cost_table(report).to_string());
    out.push('\n');

    if report.has_savings() {
        out.push_str(&format!(
            "\n{}\n\n",
            style("=== Savings by Disabling Service ===").bold()
        ));
        out.push_str(&savings_table(report).to_string());
        out.push('\n');
    } else {
        out.push_str("\nNo savings opportunities found.\n");
    }
    out
}

pub fn print_report(report: &Report, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Text => println!("{}", render_text(report)),
    }
    Ok(())
}
