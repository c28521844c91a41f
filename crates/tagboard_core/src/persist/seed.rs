//! Built-in dataset used when durable storage holds nothing yet.

use super::{PersistError, PersistResult};
use crate::codec::{parse_items, parse_taxonomy};
use crate::model::{Configuration, ItemDocument, Taxonomy};

pub const SEED_TAXONOMY: &str = "\
colors:
  - red
  - green
  - blue
  - yellow
materials:
  - wool
  - cotton
  - leather
  - waterproof nylon
seasons:
  - spring
  - summer
  - autumn
  - winter
";

pub const SEED_ITEMS: &str = "\
scarf:
  Tags:
    - red
    - wool
    - winter
raincoat:
  Tags:
    - yellow
    - waterproof nylon
    - autumn
sandals:
  Tags:
    - leather
    - summer
";

pub fn taxonomy() -> PersistResult<Taxonomy> {
    parse_taxonomy(SEED_TAXONOMY)
        .map(Option::unwrap_or_default)
        .map_err(PersistError::Seed)
}

pub fn items() -> PersistResult<ItemDocument> {
    parse_items(SEED_ITEMS)
        .map(Option::unwrap_or_default)
        .map_err(PersistError::Seed)
}

pub fn config() -> PersistResult<Configuration> {
    Ok(Configuration::with_defaults())
}
