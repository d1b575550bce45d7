use comfy_table::{Attribute, Cell, CellAlignment, Color, Table};
use rust_decimal::Decimal;

use crate::calc::QuotationSummary;
use crate::ledger::QuotationInfo;
use crate::model::QuotationRecord;
use crate::money;

fn amount_cell(amount: Decimal) -> Cell {
    Cell::new(money::format(amount)).set_alignment(CellAlignment::Right)
}

/// Item rows with line totals, followed by the summary block.
pub fn preview_table(record: &QuotationRecord, summary: &QuotationSummary, currency: &str) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("S.No."),
        Cell::new("Description"),
        Cell::new("Quantity"),
        Cell::new(format!("Price ({})", currency)),
        Cell::new(format!("Total ({})", currency)),
    ]);

    for item in &record.items {
        table.add_row(vec![
            Cell::new(&item.serial_number),
            Cell::new(&item.description),
            Cell::new(item.quantity).set_alignment(CellAlignment::Right),
            amount_cell(item.unit_price),
            amount_cell(item.line_total()),
        ]);
    }

    let rows = [
        ("Subtotal".to_string(), summary.subtotal),
        ("Shipping Charges".to_string(), summary.shipping_charges),
        ("Packaging Charges".to_string(), summary.packaging_charges),
        (
            format!("Tax ({}%)", money::format_rate(summary.tax_rate)),
            summary.tax_amount,
        ),
    ];
    for (label, amount) in rows {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(""),
            Cell::new(""),
            Cell::new(""),
            amount_cell(amount),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total (Incl. Tax)").add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        amount_cell(summary.grand_total).add_attribute(Attribute::Bold),
    ]);
    table
}

/// Quotations of one year plus a total row. `infos` should already be sorted.
pub fn ledger_table(infos: &[QuotationInfo], year: i32, currency: &str) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Quotation"),
        Cell::new("Date"),
        Cell::new("Recipient"),
        Cell::new(format!("Grand Total ({})", currency)),
    ]);

    let mut year_total = Decimal::ZERO;
    for info in infos.iter().filter(|i| i.year() == year) {
        table.add_row(vec![
            Cell::new(&info.number),
            Cell::new(&info.date),
            Cell::new(&info.recipient),
            amount_cell(info.grand_total),
        ]);
        year_total = year_total.saturating_add(info.grand_total);
    }

    table.add_row(vec![
        Cell::new(format!("Total ({})", year)).add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(""),
        amount_cell(year_total)
            .add_attribute(Attribute::Bold)
            .fg(Color::Rgb { r: 4, g: 120, b: 87 }),
    ]);
    table
}
