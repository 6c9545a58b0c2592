use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::error::{Error, Result};
use crate::models::{MarketRecord, MarketTable, COLUMNS};

/// What to do when an upstream asset object lacks one of the schema fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingFieldPolicy {
    /// Abort the whole tick.
    #[default]
    Fail,
    /// Drop the offending asset and keep the rest.
    Skip,
    /// Keep the asset with an empty value in the missing column.
    Default,
}

/// Builds a table from the raw asset list. Absence and an empty list both yield no table.
pub fn build_table(raw: Option<Vec<Value>>, policy: MissingFieldPolicy) -> Result<Option<MarketTable>> {
    let assets = match raw {
        Some(assets) if !assets.is_empty() => assets,
        Some(_) => {
            debug!("Upstream returned an empty asset list");
            return Ok(None);
        }
        None => return Ok(None),
    };

    let mut records = Vec::with_capacity(assets.len());
    for (index, asset) in assets.iter().enumerate() {
        if let Some(record) = to_record(index, asset, policy)? {
            records.push(record);
        }
    }

    debug!("Built market table with {} of {} assets", records.len(), assets.len());
    Ok(Some(MarketTable::new(records)))
}

fn to_record(index: usize, asset: &Value, policy: MissingFieldPolicy) -> Result<Option<MarketRecord>> {
    let object = asset
        .as_object()
        .ok_or_else(|| Error::MalformedResponse(format!("asset {} is not a JSON object", index)))?;

    let mut record = MarketRecord::default();
    for column in COLUMNS.iter() {
        let value = match object.get(column.field) {
            Some(raw) => column.kind.from_json(raw).ok_or_else(|| {
                Error::MalformedResponse(format!(
                    "asset {} field '{}' has unexpected value {}",
                    index, column.field, raw
                ))
            })?,
            None => match policy {
                MissingFieldPolicy::Fail => {
                    return Err(Error::MissingField { index, field: column.field });
                }
                MissingFieldPolicy::Skip => {
                    warn!("Skipping asset {}: missing field '{}'", index, column.field);
                    return Ok(None);
                }
                MissingFieldPolicy::Default => {
                    warn!("Asset {} is missing field '{}', leaving it empty", index, column.field);
                    column.kind.empty()
                }
            },
        };
        column.assign(&mut record, value);
    }

    Ok(Some(record))
}
