use crate::error::Result;
use crate::models::MarketTable;

pub mod xlsx;

pub use xlsx::XlsxExporter;

/// Destination for a finished table. Each call fully replaces what was stored before.
#[cfg_attr(test, mockall::automock)]
pub trait TablePersister: Send {
    fn persist(&self, table: &MarketTable) -> Result<()>;
}
