use std::io::Read;
use std::path::Path;

use crate::input::InputError;
use crate::input::cache::open_maybe_gz;
use crate::model::scale::{ITEM_COUNT, Item};

/// One free-text block per HAMD item, in item order.
#[derive(Debug, Clone)]
pub struct ItemDescriptions {
    blocks: Vec<String>,
}

impl ItemDescriptions {
    pub fn parse(text: &str) -> Result<Self, InputError> {
        let normalized = text.replace("\r\n", "\n");
        let blocks: Vec<String> = normalized
            .split("\n\n")
            .map(|b| b.trim_matches('\n').to_string())
            .filter(|b| !b.trim().is_empty())
            .collect();
        if blocks.len() != ITEM_COUNT {
            return Err(InputError::Config(format!(
                "item description file must hold {} blank-line separated blocks, found {}",
                ITEM_COUNT,
                blocks.len()
            )));
        }
        Ok(Self { blocks })
    }

    pub fn block(&self, item: Item) -> &str {
        &self.blocks[item.index()]
    }

    // Blocks conventionally start with the item number, so the label prefix
    // reads as "HAMD01 ...".
    pub fn describe(&self, item: Item) -> String {
        format!("HAMD{}", self.block(item))
    }
}

pub fn load_item_descriptions(path: &Path) -> Result<ItemDescriptions, InputError> {
    let mut reader = open_maybe_gz(path)
        .map_err(|e| InputError::Config(format!("item descriptions unavailable: {e}")))?;
    let mut text = String::new();
    reader.read_to_string(&mut text).map_err(|e| {
        InputError::Config(format!(
            "item descriptions {} unreadable: {e}",
            path.display()
        ))
    })?;
    let descriptions = ItemDescriptions::parse(&text)?;
    tracing::debug!(path = %path.display(), "loaded item descriptions");
    Ok(descriptions)
}
