//! The fixed column layout shared by the transformer, the spreadsheet writer
//! and the spreadsheet reader.

use crate::models::market::MarketRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
}

impl ColumnKind {
    /// Value used when a field is absent and the policy asks for a default.
    pub fn empty(self) -> CellValue {
        match self {
            ColumnKind::Text => CellValue::Text(String::new()),
            ColumnKind::Number => CellValue::Number(None),
        }
    }

    /// Interpret an upstream JSON value as this kind. `None` on a type mismatch.
    pub fn from_json(self, raw: &serde_json::Value) -> Option<CellValue> {
        match self {
            ColumnKind::Text => raw.as_str().map(|s| CellValue::Text(s.to_string())),
            ColumnKind::Number if raw.is_null() => Some(CellValue::Number(None)),
            ColumnKind::Number => raw.as_f64().map(|n| CellValue::Number(Some(n))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(Option<f64>),
}

pub struct Column {
    pub header: &'static str,
    /// Key of the field in the upstream asset object.
    pub field: &'static str,
    pub kind: ColumnKind,
    get: fn(&MarketRecord) -> CellValue,
    set: fn(&mut MarketRecord, CellValue),
}

impl Column {
    pub fn value(&self, record: &MarketRecord) -> CellValue {
        (self.get)(record)
    }

    pub fn assign(&self, record: &mut MarketRecord, value: CellValue) {
        (self.set)(record, value)
    }
}

impl std::fmt::Debug for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("header", &self.header)
            .field("field", &self.field)
            .field("kind", &self.kind)
            .finish()
    }
}

pub static COLUMNS: [Column; 6] = [
    Column {
        header: "Cryptocurrency Name",
        field: "name",
        kind: ColumnKind::Text,
        get: get_name,
        set: set_name,
    },
    Column {
        header: "Symbol",
        field: "symbol",
        kind: ColumnKind::Text,
        get: get_symbol,
        set: set_symbol,
    },
    Column {
        header: "Current Price (USD)",
        field: "current_price",
        kind: ColumnKind::Number,
        get: get_current_price,
        set: set_current_price,
    },
    Column {
        header: "Market Capitalization",
        field: "market_cap",
        kind: ColumnKind::Number,
        get: get_market_cap,
        set: set_market_cap,
    },
    Column {
        header: "24h Trading Volume",
        field: "total_volume",
        kind: ColumnKind::Number,
        get: get_total_volume,
        set: set_total_volume,
    },
    Column {
        header: "24h Price Change (%)",
        field: "price_change_percentage_24h",
        kind: ColumnKind::Number,
        get: get_price_change_24h,
        set: set_price_change_24h,
    },
];

fn text(value: CellValue) -> String {
    match value {
        CellValue::Text(s) => s,
        CellValue::Number(Some(n)) => n.to_string(),
        CellValue::Number(None) => String::new(),
    }
}

fn number(value: CellValue) -> Option<f64> {
    match value {
        CellValue::Number(n) => n,
        CellValue::Text(s) => s.trim().parse().ok(),
    }
}

fn get_name(r: &MarketRecord) -> CellValue {
    CellValue::Text(r.name.clone())
}

fn set_name(r: &mut MarketRecord, v: CellValue) {
    r.name = text(v);
}

fn get_symbol(r: &MarketRecord) -> CellValue {
    CellValue::Text(r.symbol.clone())
}

// Symbols are always stored uppercased.
fn set_symbol(r: &mut MarketRecord, v: CellValue) {
    r.symbol = text(v).to_uppercase();
}

fn get_current_price(r: &MarketRecord) -> CellValue {
    CellValue::Number(r.current_price)
}

fn set_current_price(r: &mut MarketRecord, v: CellValue) {
    r.current_price = number(v);
}

fn get_market_cap(r: &MarketRecord) -> CellValue {
    CellValue::Number(r.market_cap)
}

fn set_market_cap(r: &mut MarketRecord, v: CellValue) {
    r.market_cap = number(v);
}

fn get_total_volume(r: &MarketRecord) -> CellValue {
    CellValue::Number(r.total_volume)
}

fn set_total_volume(r: &mut MarketRecord, v: CellValue) {
    r.total_volume = number(v);
}

fn get_price_change_24h(r: &MarketRecord) -> CellValue {
    CellValue::Number(r.price_change_24h)
}

fn set_price_change_24h(r: &mut MarketRecord, v: CellValue) {
    r.price_change_24h = number(v);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_headers_in_fixed_order() {
        let headers: Vec<_> = COLUMNS.iter().map(|c| c.header).collect();
        assert_eq!(
            headers,
            vec![
                "Cryptocurrency Name",
                "Symbol",
                "Current Price (USD)",
                "Market Capitalization",
                "24h Trading Volume",
                "24h Price Change (%)",
            ]
        );
    }

    #[test]
    fn test_symbol_is_uppercased_on_assign() {
        let mut record = MarketRecord::default();
        COLUMNS[1].assign(&mut record, CellValue::Text("btc".into()));
        assert_eq!(record.symbol, "BTC");
    }

    #[test]
    fn test_assign_then_value_per_column() {
        let mut record = MarketRecord::default();
        for (i, column) in COLUMNS.iter().enumerate() {
            let value = match column.kind {
                ColumnKind::Text => CellValue::Text(format!("T{}", i)),
                ColumnKind::Number => CellValue::Number(Some(i as f64 * 1.5)),
            };
            column.assign(&mut record, value.clone());
            assert_eq!(column.value(&record), value);
        }
    }

    #[test]
    fn test_kind_from_json() {
        assert_eq!(
            ColumnKind::Number.from_json(&json!(null)),
            Some(CellValue::Number(None))
        );
        assert_eq!(
            ColumnKind::Number.from_json(&json!(42)),
            Some(CellValue::Number(Some(42.0)))
        );
        assert_eq!(ColumnKind::Number.from_json(&json!("42")), None);
        assert_eq!(ColumnKind::Text.from_json(&json!(7)), None);
        assert_eq!(
            ColumnKind::Text.from_json(&json!("Tether")),
            Some(CellValue::Text("Tether".into()))
        );
    }
}
