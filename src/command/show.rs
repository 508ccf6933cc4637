use std::collections::BTreeMap;

use crate::error::ModelKeyError;
use crate::form::SubmissionPayload;
use crate::locale::Locale;
use crate::registry::{ProviderKey, ProviderRegistry};
use crate::store::{obfuscate_token, FileCredentialStore};
use crate::view::ModalView;

/// Prints what is stored in the local credentials file, secrets masked.
pub struct ShowCommand;

impl ShowCommand {
    pub fn execute(
        &self,
        registry: &ProviderRegistry,
        store: &FileCredentialStore,
        locale: Locale,
    ) -> Result<(), ModelKeyError> {
        let stored = store.load()?;
        if stored.is_empty() {
            println!(
                "\n  \x1b[2mNo providers configured yet. Run `modelkey configure`.\x1b[0m\n"
            );
            return Ok(());
        }

        println!("\n  \x1b[2m{}\x1b[0m\n", store.path().display());
        for line in render(registry, &stored, locale) {
            println!("{}", line);
        }
        println!();
        Ok(())
    }
}

fn render(
    registry: &ProviderRegistry,
    stored: &BTreeMap<String, SubmissionPayload>,
    locale: Locale,
) -> Vec<String> {
    let mut lines = Vec::new();

    for descriptor in registry.list_ordered() {
        let Some(payload) = stored.get(descriptor.key.as_str()) else {
            continue;
        };
        let modal = ModalView::project(descriptor, locale);
        lines.push(format!("  \x1b[1;36m{}\x1b[0m", modal.title));

        for field in &modal.fields {
            if let Some(value) = payload.get(field.key) {
                let shown = if field.masked {
                    obfuscate_token(value)
                } else {
                    value.to_string()
                };
                lines.push(format!("    {:<20} {}", field.label, shown));
            }
        }
    }

    // written by another version, or hand-edited
    for (provider, payload) in stored {
        if provider.parse::<ProviderKey>().is_ok() {
            continue;
        }
        lines.push(format!("  \x1b[1;33m{}\x1b[0m \x1b[2m(unknown provider)\x1b[0m", provider));
        for (key, value) in payload.iter() {
            lines.push(format!("    {:<20} {}", key, obfuscate_token(value)));
        }
    }

    lines
}
