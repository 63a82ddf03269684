// Champion id resolution from Data Dragon's champion.json.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

use super::{ChampionId, ChampionMap, ChampionRecord};

#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("reference data is not a champion document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("champion {name:?} has non-numeric key {key:?}")]
    InvalidKey { name: String, key: String },

    #[error("champions {first:?} and {second:?} share id {id}")]
    DuplicateId {
        id: ChampionId,
        first: String,
        second: String,
    },
}

/// `{ "data": { "<name>": { "key": "<id>", ... }, ... } }`; other fields ignored.
#[derive(Debug, Deserialize)]
struct ChampionDocument {
    data: HashMap<String, ChampionEntry>,
}

#[derive(Debug, Deserialize)]
struct ChampionEntry {
    key: String,
}

/// Build the id -> champion mapping. The record name is the `data` map key,
/// which is the form roster names are normalized to.
pub fn resolve_champions(json: &str) -> Result<ChampionMap, ResolutionError> {
    let doc: ChampionDocument = serde_json::from_str(json)?;

    let mut champions = ChampionMap::new();
    for (name, entry) in doc.data {
        let Ok(id) = entry.key.trim().parse::<ChampionId>() else {
            return Err(ResolutionError::InvalidKey {
                name,
                key: entry.key,
            });
        };

        if let Some(existing) = champions.get(&id) {
            // Order the pair so the message is stable regardless of map order.
            let (first, second) = if existing.name <= name {
                (existing.name.clone(), name)
            } else {
                (name, existing.name.clone())
            };
            return Err(ResolutionError::DuplicateId { id, first, second });
        }
        champions.insert(id, ChampionRecord::new(id, name));
    }

    Ok(champions)
}
