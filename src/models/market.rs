use serde::{Deserialize, Serialize};
use crate::models::schema::{CellValue, COLUMNS};

/// One asset as reported by the upstream markets endpoint.
///
/// Numeric fields are `None` when the upstream reports `null` for them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketRecord {
    pub name: String,
    pub symbol: String,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub total_volume: Option<f64>,
    pub price_change_24h: Option<f64>,
}

impl MarketRecord {
    /// Cell values in schema order.
    pub fn cells(&self) -> Vec<CellValue> {
        COLUMNS.iter().map(|column| column.value(self)).collect()
    }
}

/// Ordered rows sharing the fixed six-column schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketTable {
    records: Vec<MarketRecord>,
}

impl MarketTable {
    pub fn new(records: Vec<MarketRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[MarketRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn column_count(&self) -> usize {
        COLUMNS.len()
    }

    pub fn headers(&self) -> Vec<&'static str> {
        COLUMNS.iter().map(|column| column.header).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MarketRecord> {
        self.records.iter()
    }
}

impl From<Vec<MarketRecord>> for MarketTable {
    fn from(records: Vec<MarketRecord>) -> Self {
        Self::new(records)
    }
}
