use serde::Serialize;

use crate::error::ModelKeyError;
use crate::locale::Locale;
use crate::registry::ProviderRegistry;
use crate::view::{selector_entries, ItemView, SelectorEntry};

/// One provider as shown by `modelkey list`.
#[derive(Debug, Serialize)]
pub struct ProviderCard {
    #[serde(flatten)]
    pub selector: SelectorEntry,
    pub item: ItemView,
}

pub struct ListCommand {
    pub json: bool,
}

impl ListCommand {
    pub fn execute(&self, registry: &ProviderRegistry, locale: Locale) -> Result<(), ModelKeyError> {
        println!("{}", self.render(registry, locale)?);
        Ok(())
    }

    fn render(&self, registry: &ProviderRegistry, locale: Locale) -> Result<String, ModelKeyError> {
        let cards = Self::cards(registry, locale);
        if self.json {
            return Ok(serde_json::to_string_pretty(&cards)?);
        }

        let mut out = String::new();
        for card in &cards {
            out.push_str(&format!(
                "  \x1b[1m{:<24}\x1b[0m \x1b[2m{:<16}\x1b[0m {}\n",
                card.selector.name, card.selector.key, card.item.hit
            ));
            if let Some(desc) = card.item.desc {
                out.push_str(&format!("  {:<24} {:<16} \x1b[2m{}\x1b[0m\n", "", "", desc));
            }
        }
        Ok(out)
    }

    fn cards(registry: &ProviderRegistry, locale: Locale) -> Vec<ProviderCard> {
        selector_entries(registry, locale)
            .into_iter()
            .zip(registry.list_ordered())
            .map(|(selector, descriptor)| ProviderCard {
                selector,
                item: ItemView::project(descriptor, locale),
            })
            .collect()
    }
}
