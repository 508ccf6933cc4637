//! The provider catalogue and its integrity checks.
//!
//! Add new providers in `catalog.rs`. They show up in the picker, the
//! `list` output and the `configure` flow with no other code changes.

use std::collections::HashSet;

use once_cell::sync::OnceCell;
use reqwest::Url;

use crate::error::{IntegrityError, RegistryError};
use crate::locale::{Locale, Text};

pub mod catalog;
pub mod descriptor;

pub use descriptor::{
    Color, FieldDescriptor, FieldType, Icon, Item, Link, Modal, ProviderDescriptor, ProviderKey,
    SelectOption, Selector,
};

static BUILTIN: OnceCell<ProviderRegistry> = OnceCell::new();

/// Ordered, read-only mapping from provider key to descriptor.
#[derive(Debug)]
pub struct ProviderRegistry {
    entries: Vec<ProviderDescriptor>,
}

impl ProviderRegistry {
    /// Checks every descriptor and builds the registry. Registration order is
    /// the order the picker shows.
    pub fn assemble(descriptors: Vec<ProviderDescriptor>) -> Result<Self, IntegrityError> {
        let mut seen = HashSet::new();
        for descriptor in &descriptors {
            if !seen.insert(descriptor.key) {
                return Err(IntegrityError::DuplicateProvider {
                    provider: descriptor.key,
                });
            }
            check_descriptor(descriptor)?;
        }

        tracing::debug!(providers = descriptors.len(), "provider registry assembled");
        Ok(Self {
            entries: descriptors,
        })
    }

    /// The built-in catalogue, assembled once per process.
    pub fn builtin() -> Result<&'static ProviderRegistry, IntegrityError> {
        BUILTIN.get_or_try_init(|| Self::assemble(catalog::builtin_descriptors()))
    }

    pub fn get(&self, key: ProviderKey) -> Result<&ProviderDescriptor, RegistryError> {
        self.entries
            .iter()
            .find(|descriptor| descriptor.key == key)
            .ok_or(RegistryError::NotFound(key))
    }

    pub fn list_ordered(&self) -> &[ProviderDescriptor] {
        &self.entries
    }

    pub fn keys(&self) -> impl Iterator<Item = ProviderKey> + '_ {
        self.entries.iter().map(|descriptor| descriptor.key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn check_descriptor(descriptor: &ProviderDescriptor) -> Result<(), IntegrityError> {
    let provider = descriptor.key;
    let modal = &descriptor.modal;

    let mut field_keys = HashSet::new();
    for field in &modal.fields {
        if !field_keys.insert(field.key) {
            return Err(IntegrityError::DuplicateField {
                provider,
                field: field.key.to_string(),
            });
        }
    }

    let mut validate_keys = HashSet::new();
    for key in &modal.validate_keys {
        if !validate_keys.insert(*key) {
            return Err(IntegrityError::DuplicateValidateKey {
                provider,
                field: key.to_string(),
            });
        }
        if !field_keys.contains(key) {
            return Err(IntegrityError::DanglingValidateKey {
                provider,
                field: key.to_string(),
            });
        }
    }

    for field in &modal.fields {
        match (field.required, validate_keys.contains(field.key)) {
            (true, false) => {
                return Err(IntegrityError::RequiredNotValidated {
                    provider,
                    field: field.key.to_string(),
                })
            }
            (false, true) => {
                return Err(IntegrityError::OptionalValidated {
                    provider,
                    field: field.key.to_string(),
                })
            }
            _ => {}
        }
        check_field(provider, field)?;
    }

    check_text(provider, "selector.name", &descriptor.selector.name)?;
    check_text(provider, "item.hit", &descriptor.item.hit)?;
    if let Some(desc) = &descriptor.item.desc {
        check_text(provider, "item.desc", desc)?;
    }
    check_text(provider, "modal.title", &modal.title)?;
    check_text(provider, "modal.link.label", &modal.link.label)?;

    let mut icons = vec![
        ("selector.icon", descriptor.selector.icon),
        ("modal.icon", modal.icon),
    ];
    for locale in Locale::ALL {
        icons.push(("item.title_icon", *descriptor.item.title_icon.resolve(locale)));
    }
    if let Some(icon) = descriptor.item.sub_title_icon {
        icons.push(("item.sub_title_icon", icon));
    }
    for (path, icon) in icons {
        if icon.0.trim().is_empty() {
            return Err(presentation(provider, path, "icon asset name is empty"));
        }
    }

    if let Some(color) = descriptor.item.bg_color {
        if !color.is_well_formed() {
            return Err(presentation(
                provider,
                "item.bg_color",
                &format!("`{}` is not a #RRGGBB color", color.0),
            ));
        }
    }

    if let Err(e) = Url::parse(modal.link.href) {
        return Err(presentation(provider, "modal.link.href", &e.to_string()));
    }

    Ok(())
}

fn check_field(provider: ProviderKey, field: &FieldDescriptor) -> Result<(), IntegrityError> {
    check_text(provider, &format!("fields.{}.label", field.key), &field.label)?;
    check_text(
        provider,
        &format!("fields.{}.placeholder", field.key),
        &field.placeholder,
    )?;

    if let FieldType::Select { options } = field.field_type {
        if options.is_empty() {
            return Err(IntegrityError::InvalidField {
                provider,
                field: field.key.to_string(),
                reason: "select field has no options".to_string(),
            });
        }
        for option in options {
            check_text(
                provider,
                &format!("fields.{}.options.{}", field.key, option.value),
                &option.label,
            )?;
        }
    }

    if let Some(default) = field.default_value {
        let checked = match default.trim() {
            "" => Err("value is blank".to_string()),
            value => field.check_value(value),
        };
        if let Err(reason) = checked {
            return Err(IntegrityError::InvalidField {
                provider,
                field: field.key.to_string(),
                reason: format!("default `{}` is rejected: {}", default, reason),
            });
        }
    }

    Ok(())
}

fn check_text(provider: ProviderKey, path: &str, text: &Text) -> Result<(), IntegrityError> {
    match text.missing_locales().first() {
        Some(locale) => Err(IntegrityError::MissingTranslation {
            provider,
            path: path.to_string(),
            locale: *locale,
        }),
        None => Ok(()),
    }
}

fn presentation(provider: ProviderKey, path: &str, reason: &str) -> IntegrityError {
    IntegrityError::InvalidPresentation {
        provider,
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::locale::LocaleMap;

    pub(crate) fn gemini_descriptor() -> ProviderDescriptor {
        ProviderDescriptor {
            key: ProviderKey::Gemini,
            selector: Selector {
                name: Text::uniform("Gemini"),
                icon: Icon("gemini"),
            },
            item: Item {
                title_icon: LocaleMap::uniform(Icon("gemini")),
                sub_title_icon: None,
                desc: None,
                bg_color: None,
                hit: Text::uniform("Build with Gemini"),
            },
            modal: Modal {
                title: Text::new("Gemini API Key", "Gemini API Key"),
                icon: Icon("gemini"),
                link: Link {
                    href: "https://ai.google.dev/",
                    label: Text::uniform("Get your API key from Google AI Studio"),
                },
                validate_keys: vec!["gemini_api_key"],
                fields: vec![FieldDescriptor::new(
                    FieldType::Secret,
                    "gemini_api_key",
                    Text::uniform("Gemini API Key"),
                    Text::new("Enter your API key here", "在此输入您的 API Key"),
                )],
            },
        }
    }

    #[test]
    fn test_builtin_registry_assembles() {
        let registry = ProviderRegistry::builtin().expect("built-in catalogue must be valid");
        assert_eq!(registry.len(), ProviderKey::ALL.len());
        let order: Vec<ProviderKey> = registry.keys().collect();
        assert_eq!(order, ProviderKey::ALL.to_vec(), "display order is registration order");
    }

    #[test]
    fn test_every_validate_key_has_a_field() {
        let registry = ProviderRegistry::builtin().unwrap();
        for descriptor in registry.list_ordered() {
            for key in &descriptor.modal.validate_keys {
                let matches = descriptor
                    .modal
                    .fields
                    .iter()
                    .filter(|field| field.key == *key)
                    .count();
                assert_eq!(matches, 1, "{}: `{}` must match exactly one field", descriptor.key, key);
            }
        }
    }

    #[test]
    fn test_every_locale_map_is_translated() {
        let registry = ProviderRegistry::builtin().unwrap();
        for descriptor in registry.list_ordered() {
            let mut texts = vec![
                descriptor.selector.name,
                descriptor.item.hit,
                descriptor.modal.title,
                descriptor.modal.link.label,
            ];
            texts.extend(descriptor.item.desc);
            for field in &descriptor.modal.fields {
                texts.push(field.label);
                texts.push(field.placeholder);
            }
            for text in texts {
                assert!(
                    text.missing_locales().is_empty(),
                    "{} has an untranslated entry: {:?}",
                    descriptor.key,
                    text
                );
            }
        }
    }

    #[test]
    fn test_get_and_not_found() {
        let registry = ProviderRegistry::assemble(vec![gemini_descriptor()]).unwrap();
        assert_eq!(registry.get(ProviderKey::Gemini).unwrap().key, ProviderKey::Gemini);
        assert_eq!(
            registry.get(ProviderKey::Openai).unwrap_err(),
            RegistryError::NotFound(ProviderKey::Openai)
        );
    }

    #[test]
    fn test_rejects_dangling_validate_key() {
        let mut descriptor = gemini_descriptor();
        descriptor.modal.validate_keys = vec!["gemini_api_key", "google_api_key"];
        let err = ProviderRegistry::assemble(vec![descriptor]).unwrap_err();
        assert_eq!(
            err,
            IntegrityError::DanglingValidateKey {
                provider: ProviderKey::Gemini,
                field: "google_api_key".into(),
            }
        );
    }

    #[test]
    fn test_rejects_duplicate_provider() {
        let err = ProviderRegistry::assemble(vec![gemini_descriptor(), gemini_descriptor()])
            .unwrap_err();
        assert_eq!(
            err,
            IntegrityError::DuplicateProvider {
                provider: ProviderKey::Gemini
            }
        );
    }

    #[test]
    fn test_rejects_duplicate_field_key() {
        let mut descriptor = gemini_descriptor();
        let field = descriptor.modal.fields[0];
        descriptor.modal.fields.push(field);
        assert!(matches!(
            ProviderRegistry::assemble(vec![descriptor]),
            Err(IntegrityError::DuplicateField { .. })
        ));
    }

    #[test]
    fn test_rejects_required_field_outside_validate_keys() {
        let mut descriptor = gemini_descriptor();
        descriptor.modal.validate_keys.clear();
        assert_eq!(
            ProviderRegistry::assemble(vec![descriptor]).unwrap_err(),
            IntegrityError::RequiredNotValidated {
                provider: ProviderKey::Gemini,
                field: "gemini_api_key".into(),
            }
        );
    }

    #[test]
    fn test_rejects_optional_field_in_validate_keys() {
        let mut descriptor = gemini_descriptor();
        descriptor.modal.fields[0] = descriptor.modal.fields[0].optional();
        assert!(matches!(
            ProviderRegistry::assemble(vec![descriptor]),
            Err(IntegrityError::OptionalValidated { .. })
        ));
    }

    #[test]
    fn test_rejects_missing_translation() {
        let mut descriptor = gemini_descriptor();
        descriptor.modal.fields[0].placeholder = Text::new("Enter your API key here", "");
        assert_eq!(
            ProviderRegistry::assemble(vec![descriptor]).unwrap_err(),
            IntegrityError::MissingTranslation {
                provider: ProviderKey::Gemini,
                path: "fields.gemini_api_key.placeholder".into(),
                locale: Locale::ZhHans,
            }
        );
    }

    #[test]
    fn test_rejects_select_default_outside_options() {
        const OPTIONS: &[SelectOption] = &[SelectOption {
            value: "hosted",
            label: Text::uniform("Hosted"),
        }];
        let mut descriptor = gemini_descriptor();
        descriptor.modal.fields.push(
            FieldDescriptor::new(
                FieldType::Select { options: OPTIONS },
                "api_type",
                Text::uniform("API type"),
                Text::uniform("Pick one"),
            )
            .optional()
            .default_value("self_hosted"),
        );
        assert!(matches!(
            ProviderRegistry::assemble(vec![descriptor]),
            Err(IntegrityError::InvalidField { field, .. }) if field == "api_type"
        ));
    }

    #[test]
    fn test_rejects_duplicate_validate_key() {
        let mut descriptor = gemini_descriptor();
        descriptor.modal.validate_keys = vec!["gemini_api_key", "gemini_api_key"];
        assert_eq!(
            ProviderRegistry::assemble(vec![descriptor]).unwrap_err(),
            IntegrityError::DuplicateValidateKey {
                provider: ProviderKey::Gemini,
                field: "gemini_api_key".into(),
            }
        );
    }

    #[test]
    fn test_rejects_select_without_options() {
        let mut descriptor = gemini_descriptor();
        descriptor.modal.fields.push(
            FieldDescriptor::new(
                FieldType::Select { options: &[] },
                "api_type",
                Text::uniform("API type"),
                Text::uniform("Pick one"),
            )
            .optional(),
        );
        assert_eq!(
            ProviderRegistry::assemble(vec![descriptor]).unwrap_err(),
            IntegrityError::InvalidField {
                provider: ProviderKey::Gemini,
                field: "api_type".into(),
                reason: "select field has no options".into(),
            }
        );
    }

    #[test]
    fn test_rejects_untranslated_option_label() {
        const OPTIONS: &[SelectOption] = &[SelectOption {
            value: "hosted",
            label: Text::new("Hosted", ""),
        }];
        let mut descriptor = gemini_descriptor();
        descriptor.modal.fields.push(
            FieldDescriptor::new(
                FieldType::Select { options: OPTIONS },
                "api_type",
                Text::uniform("API type"),
                Text::uniform("Pick one"),
            )
            .optional(),
        );
        assert_eq!(
            ProviderRegistry::assemble(vec![descriptor]).unwrap_err(),
            IntegrityError::MissingTranslation {
                provider: ProviderKey::Gemini,
                path: "fields.api_type.options.hosted".into(),
                locale: Locale::ZhHans,
            }
        );
    }

    #[test]
    fn test_rejects_empty_icon_name() {
        let mut descriptor = gemini_descriptor();
        descriptor.item.title_icon = LocaleMap::new(Icon("gemini"), Icon(" "));
        assert!(matches!(
            ProviderRegistry::assemble(vec![descriptor]),
            Err(IntegrityError::InvalidPresentation { path, .. }) if path == "item.title_icon"
        ));

        let mut descriptor = gemini_descriptor();
        descriptor.selector.icon = Icon("");
        assert!(matches!(
            ProviderRegistry::assemble(vec![descriptor]),
            Err(IntegrityError::InvalidPresentation { path, .. }) if path == "selector.icon"
        ));
    }

    #[test]
    fn test_rejects_malformed_url_default() {
        let mut descriptor = gemini_descriptor();
        descriptor.modal.fields.push(
            FieldDescriptor::new(
                FieldType::Url,
                "api_base",
                Text::uniform("API base"),
                Text::uniform("https://example.com/v1"),
            )
            .optional()
            .default_value("not a url"),
        );
        assert!(matches!(
            ProviderRegistry::assemble(vec![descriptor]),
            Err(IntegrityError::InvalidField { field, .. }) if field == "api_base"
        ));
    }

    #[test]
    fn test_rejects_default_failing_validator() {
        fn starts_with_v(value: &str) -> Result<(), String> {
            if value.starts_with('v') {
                Ok(())
            } else {
                Err("must start with `v`".to_string())
            }
        }

        let mut descriptor = gemini_descriptor();
        descriptor.modal.fields.push(
            FieldDescriptor::new(
                FieldType::Text,
                "api_version",
                Text::uniform("API version"),
                Text::uniform("v1"),
            )
            .optional()
            .default_value("2024-01")
            .validator(starts_with_v),
        );
        assert!(matches!(
            ProviderRegistry::assemble(vec![descriptor.clone()]),
            Err(IntegrityError::InvalidField { field, .. }) if field == "api_version"
        ));

        descriptor.modal.fields[1] = descriptor.modal.fields[1].default_value("v1");
        assert!(ProviderRegistry::assemble(vec![descriptor]).is_ok());
    }

    #[test]
    fn test_rejects_bad_presentation_values() {
        let mut descriptor = gemini_descriptor();
        descriptor.item.bg_color = Some(Color("blue"));
        assert!(matches!(
            ProviderRegistry::assemble(vec![descriptor]),
            Err(IntegrityError::InvalidPresentation { path, .. }) if path == "item.bg_color"
        ));

        let mut descriptor = gemini_descriptor();
        descriptor.modal.link.href = "not a url";
        assert!(matches!(
            ProviderRegistry::assemble(vec![descriptor]),
            Err(IntegrityError::InvalidPresentation { path, .. }) if path == "modal.link.href"
        ));
    }
}
