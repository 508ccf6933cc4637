//! Locale-resolved projections of a provider descriptor for the picker,
//! the provider card and the credential form. No logic beyond lookups.

use std::fmt;

use serde::Serialize;

use crate::locale::Locale;
use crate::registry::{Color, FieldType, Icon, ProviderDescriptor, ProviderKey, ProviderRegistry};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorEntry {
    pub key: ProviderKey,
    pub name: &'static str,
    pub icon: Icon,
}

impl fmt::Display for SelectorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name)
    }
}

/// Picker entries in registration order.
pub fn selector_entries(registry: &ProviderRegistry, locale: Locale) -> Vec<SelectorEntry> {
    registry
        .list_ordered()
        .iter()
        .map(|descriptor| SelectorEntry {
            key: descriptor.key,
            name: *descriptor.selector.name.resolve(locale),
            icon: descriptor.selector.icon,
        })
        .collect()
}

/// The provider key behind the picked entry.
pub fn pick(entries: &[SelectorEntry], index: usize) -> Option<ProviderKey> {
    entries.get(index).map(|entry| entry.key)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemView {
    pub key: ProviderKey,
    pub title_icon: Icon,
    pub sub_title_icon: Option<Icon>,
    pub desc: Option<&'static str>,
    pub bg_color: Option<Color>,
    pub hit: &'static str,
}

impl ItemView {
    pub fn project(descriptor: &ProviderDescriptor, locale: Locale) -> Self {
        let item = &descriptor.item;
        Self {
            key: descriptor.key,
            title_icon: *item.title_icon.resolve(locale),
            sub_title_icon: item.sub_title_icon,
            desc: item.desc.map(|desc| *desc.resolve(locale)),
            bg_color: item.bg_color,
            hit: *item.hit.resolve(locale),
        }
    }
}

/// Documentation link shown under the form title. Never validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkHint {
    pub href: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    pub value: &'static str,
    pub label: &'static str,
}

impl fmt::Display for OptionView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Secret,
    Url,
    Select { options: Vec<OptionView> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldView {
    pub key: &'static str,
    pub kind: FieldKind,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub required: bool,
    pub masked: bool,
    pub default_value: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModalView {
    pub provider: ProviderKey,
    pub title: &'static str,
    pub icon: Icon,
    pub link: LinkHint,
    pub fields: Vec<FieldView>,
}

impl ModalView {
    pub fn project(descriptor: &ProviderDescriptor, locale: Locale) -> Self {
        let modal = &descriptor.modal;
        let fields = modal
            .fields
            .iter()
            .map(|field| {
                let kind = match field.field_type {
                    FieldType::Text => FieldKind::Text,
                    FieldType::Secret => FieldKind::Secret,
                    FieldType::Url => FieldKind::Url,
                    FieldType::Select { options } => FieldKind::Select {
                        options: options
                            .iter()
                            .map(|option| OptionView {
                                value: option.value,
                                label: *option.label.resolve(locale),
                            })
                            .collect(),
                    },
                };
                FieldView {
                    key: field.key,
                    kind,
                    label: *field.label.resolve(locale),
                    placeholder: *field.placeholder.resolve(locale),
                    required: field.required,
                    masked: field.field_type.is_secret(),
                    default_value: field.default_value,
                }
            })
            .collect();

        Self {
            provider: descriptor.key,
            title: *modal.title.resolve(locale),
            icon: modal.icon,
            link: LinkHint {
                href: modal.link.href,
                label: *modal.link.label.resolve(locale),
            },
            fields,
        }
    }

    pub fn field(&self, key: &str) -> Option<&FieldView> {
        self.fields.iter().find(|field| field.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> &'static ProviderRegistry {
        ProviderRegistry::builtin().unwrap()
    }

    #[test]
    fn test_selector_entries_follow_registry_order() {
        let entries = selector_entries(registry(), Locale::En);
        let keys: Vec<ProviderKey> = entries.iter().map(|e| e.key).collect();
        assert_eq!(keys, ProviderKey::ALL.to_vec());
        assert_eq!(entries[0].to_string(), "OpenAI");
    }

    #[test]
    fn test_pick_emits_provider_key() {
        let entries = selector_entries(registry(), Locale::En);
        let last = entries.len() - 1;
        assert_eq!(pick(&entries, last), Some(ProviderKey::Gemini));
        assert_eq!(pick(&entries, entries.len()), None);
    }

    #[test]
    fn test_item_view_resolves_locale() {
        let openai = registry().get(ProviderKey::Openai).unwrap();
        let en = ItemView::project(openai, Locale::En);
        let zh = ItemView::project(openai, Locale::ZhHans);
        assert_eq!(en.hit, "Use your own OpenAI API key");
        assert_eq!(zh.hit, "使用您自己的 OpenAI API Key");
        assert_eq!(en.bg_color, Some(Color("#E5E7EB")));
        assert!(en.desc.is_some());
    }

    #[test]
    fn test_modal_view_for_gemini() {
        let gemini = registry().get(ProviderKey::Gemini).unwrap();
        let modal = ModalView::project(gemini, Locale::ZhHans);
        assert_eq!(modal.link.href, "https://ai.google.dev/");
        assert_eq!(modal.fields.len(), 1);

        let field = modal.field("gemini_api_key").unwrap();
        assert_eq!(field.kind, FieldKind::Secret);
        assert!(field.masked);
        assert!(field.required);
        assert_eq!(field.placeholder, "在此输入您的 API Key");
    }

    #[test]
    fn test_modal_view_select_options() {
        let hf = registry().get(ProviderKey::HuggingfaceHub).unwrap();
        let modal = ModalView::project(hf, Locale::En);
        let field = modal.field("huggingfacehub_api_type").unwrap();
        match &field.kind {
            FieldKind::Select { options } => {
                let values: Vec<&str> = options.iter().map(|o| o.value).collect();
                assert_eq!(values, vec!["hosted_inference_api"]);
            }
            other => panic!("expected a select field, got {:?}", other),
        }
        assert_eq!(field.default_value, Some("hosted_inference_api"));
    }

    #[test]
    fn test_field_view_serializes_with_type_tag() {
        let jina = registry().get(ProviderKey::Jina).unwrap();
        let modal = ModalView::project(jina, Locale::En);
        let json = serde_json::to_value(&modal.fields[0]).unwrap();
        assert_eq!(json["kind"]["type"], "secret");
        assert_eq!(json["key"], "api_key");
    }
}
