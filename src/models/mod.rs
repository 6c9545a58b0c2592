pub mod market;
pub mod schema;

pub use market::{MarketRecord, MarketTable};
pub use schema::{CellValue, Column, ColumnKind, COLUMNS};
