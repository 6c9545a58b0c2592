use std::cmp::Ordering;
use std::io::Write;
use log::info;
use crate::error::Result;
use crate::models::{CellValue, MarketRecord, MarketTable, COLUMNS};

pub const TOP_N: usize = 5;

/// A row together with its position in the table it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRow {
    pub index: usize,
    pub record: MarketRecord,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSummary {
    pub row_count: usize,
    pub top_by_market_cap: Vec<RankedRow>,
    pub average_price: Option<f64>,
    pub highest_change: Option<RankedRow>,
    pub lowest_change: Option<RankedRow>,
}

impl AnalysisSummary {
    /// Average price rounded to cents, as shown in the report.
    pub fn rounded_average_price(&self) -> Option<f64> {
        self.average_price.map(round2)
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Computes the summary. The absence value is logged and passed through.
pub fn analyze(table: Option<&MarketTable>) -> Option<AnalysisSummary> {
    let table = match table {
        Some(table) => table,
        None => {
            info!("No data available for analysis.");
            return None;
        }
    };

    Some(summarize(table))
}

pub fn summarize(table: &MarketTable) -> AnalysisSummary {
    AnalysisSummary {
        row_count: table.len(),
        top_by_market_cap: top_by_market_cap(table, TOP_N),
        average_price: average_price(table),
        highest_change: extreme_change(table, Ordering::Greater),
        lowest_change: extreme_change(table, Ordering::Less),
    }
}

/// Analyzes the table and writes the report to `out`.
pub fn analyze_and_report(table: Option<&MarketTable>, out: &mut dyn Write) -> Result<Option<AnalysisSummary>> {
    let summary = analyze(table);
    if let Some(summary) = &summary {
        write_report(summary, out)?;
    }
    Ok(summary)
}

/// Rows with the largest market cap, descending. Ties keep table order; rows without a cap are not ranked.
pub fn top_by_market_cap(table: &MarketTable, n: usize) -> Vec<RankedRow> {
    let mut ranked: Vec<(usize, &MarketRecord, f64)> = table
        .iter()
        .enumerate()
        .filter_map(|(index, record)| match record.market_cap {
            Some(cap) if !cap.is_nan() => Some((index, record, cap)),
            _ => None,
        })
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(Ordering::Equal));

    ranked
        .into_iter()
        .take(n)
        .map(|(index, record, _)| RankedRow { index, record: record.clone() })
        .collect()
}

pub fn average_price(table: &MarketTable) -> Option<f64> {
    let prices: Vec<f64> = table
        .iter()
        .filter_map(|r| r.current_price)
        .filter(|p| !p.is_nan())
        .collect();

    if prices.is_empty() {
        return None;
    }
    Some(prices.iter().sum::<f64>() / prices.len() as f64)
}

// First occurrence wins: only a strictly better value replaces the current pick.
fn extreme_change(table: &MarketTable, wanted: Ordering) -> Option<RankedRow> {
    let mut best: Option<(usize, f64)> = None;
    for (index, record) in table.iter().enumerate() {
        let change = match record.price_change_24h {
            Some(change) if !change.is_nan() => change,
            _ => continue,
        };
        let replace = match best {
            None => true,
            Some((_, current)) => change.partial_cmp(&current) == Some(wanted),
        };
        if replace {
            best = Some((index, change));
        }
    }

    best.map(|(index, _)| RankedRow {
        index,
        record: table.records()[index].clone(),
    })
}

pub fn write_report(summary: &AnalysisSummary, out: &mut dyn Write) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "Top {} Cryptocurrencies by Market Cap:", TOP_N)?;
    write_rows(&summary.top_by_market_cap, out)?;

    writeln!(out)?;
    match summary.rounded_average_price() {
        Some(avg) => writeln!(
            out,
            "Average Price of Top {} Cryptocurrencies: ${:.2}",
            summary.row_count, avg
        )?,
        None => writeln!(
            out,
            "Average Price of Top {} Cryptocurrencies: n/a",
            summary.row_count
        )?,
    }

    writeln!(out)?;
    writeln!(out, "Highest 24h Price Change: {}", describe_change(summary.highest_change.as_ref()))?;
    writeln!(out)?;
    writeln!(out, "Lowest 24h Price Change: {}", describe_change(summary.lowest_change.as_ref()))?;
    out.flush()?;
    Ok(())
}

fn describe_change(row: Option<&RankedRow>) -> String {
    match row {
        Some(row) => format!(
            "{} - {} %",
            row.record.name,
            row.record.price_change_24h.map(|c| c.to_string()).unwrap_or_else(|| "-".into())
        ),
        None => "n/a".to_string(),
    }
}

fn display_cell(value: &CellValue) -> String {
    match value {
        CellValue::Text(s) => s.clone(),
        CellValue::Number(Some(n)) => n.to_string(),
        CellValue::Number(None) => "-".to_string(),
    }
}

fn write_rows(rows: &[RankedRow], out: &mut dyn Write) -> Result<()> {
    let cells: Vec<(String, Vec<String>)> = rows
        .iter()
        .map(|row| {
            let values = row.record.cells().iter().map(display_cell).collect();
            (row.index.to_string(), values)
        })
        .collect();

    let index_width = cells.iter().map(|(i, _)| i.len()).max().unwrap_or(0);
    let widths: Vec<usize> = COLUMNS
        .iter()
        .enumerate()
        .map(|(col, column)| {
            cells
                .iter()
                .map(|(_, values)| values[col].len())
                .chain(std::iter::once(column.header.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut header = format!("{:>width$}", "", width = index_width);
    for (column, width) in COLUMNS.iter().zip(&widths) {
        header.push_str(&format!("  {:>width$}", column.header, width = *width));
    }
    writeln!(out, "{}", header)?;

    for (index, values) in &cells {
        let mut line = format!("{:>width$}", index, width = index_width);
        for (value, width) in values.iter().zip(&widths) {
            line.push_str(&format!("  {:>width$}", value, width = *width));
        }
        writeln!(out, "{}", line)?;
    }
    Ok(())
}
