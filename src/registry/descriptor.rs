use std::fmt;
use std::str::FromStr;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::ModelKeyError;
use crate::locale::{LocaleMap, Text};

/// Every provider the catalogue knows about, in display order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum ProviderKey {
    Openai,
    Anthropic,
    AzureOpenai,
    Replicate,
    HuggingfaceHub,
    Chatglm,
    Openllm,
    Localai,
    Cohere,
    Jina,
    Gemini,
}

impl ProviderKey {
    pub const ALL: [ProviderKey; 11] = [
        ProviderKey::Openai,
        ProviderKey::Anthropic,
        ProviderKey::AzureOpenai,
        ProviderKey::Replicate,
        ProviderKey::HuggingfaceHub,
        ProviderKey::Chatglm,
        ProviderKey::Openllm,
        ProviderKey::Localai,
        ProviderKey::Cohere,
        ProviderKey::Jina,
        ProviderKey::Gemini,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKey::Openai => "openai",
            ProviderKey::Anthropic => "anthropic",
            ProviderKey::AzureOpenai => "azure_openai",
            ProviderKey::Replicate => "replicate",
            ProviderKey::HuggingfaceHub => "huggingface_hub",
            ProviderKey::Chatglm => "chatglm",
            ProviderKey::Openllm => "openllm",
            ProviderKey::Localai => "localai",
            ProviderKey::Cohere => "cohere",
            ProviderKey::Jina => "jina",
            ProviderKey::Gemini => "gemini",
        }
    }
}

impl fmt::Display for ProviderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ProviderKey {
    type Err = ModelKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProviderKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ModelKeyError::UnknownProvider(s.to_string()))
    }
}

/// Name of a renderable icon asset. Loading the asset is up to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Icon(pub &'static str);

/// `#RRGGBB` background color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Color(pub &'static str);

impl Color {
    pub fn is_well_formed(&self) -> bool {
        let hex = match self.0.strip_prefix('#') {
            Some(hex) => hex,
            None => return false,
        };
        hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: Text,
}

/// Input widget for a field. Also decides which built-in format check the
/// form engine applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    /// Masked on input and never echoed back in messages or logs.
    Secret,
    /// Absolute http(s) URL, e.g. a self-hosted server.
    Url,
    Select { options: &'static [SelectOption] },
}

impl FieldType {
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Secret => "secret",
            FieldType::Url => "url",
            FieldType::Select { .. } => "select",
        }
    }

    pub fn is_secret(&self) -> bool {
        matches!(self, FieldType::Secret)
    }
}

pub type Validator = fn(&str) -> Result<(), String>;

#[derive(Clone, Copy)]
pub struct FieldDescriptor {
    pub field_type: FieldType,
    pub key: &'static str,
    pub required: bool,
    pub label: Text,
    pub placeholder: Text,
    pub default_value: Option<&'static str>,
    pub validator: Option<Validator>,
}

impl FieldDescriptor {
    pub const fn new(field_type: FieldType, key: &'static str, label: Text, placeholder: Text) -> Self {
        Self {
            field_type,
            key,
            required: true,
            label,
            placeholder,
            default_value: None,
            validator: None,
        }
    }

    pub const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub const fn default_value(mut self, value: &'static str) -> Self {
        self.default_value = Some(value);
        self
    }

    pub const fn validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Format check for a non-blank, already trimmed value. The error is a
    /// short reason fit for showing next to the field.
    pub fn check_value(&self, value: &str) -> Result<(), String> {
        match self.field_type {
            FieldType::Url => {
                let url = Url::parse(value).map_err(|e| format!("not a valid URL ({})", e))?;
                if !matches!(url.scheme(), "http" | "https") {
                    return Err(format!("URL must use http or https, not `{}`", url.scheme()));
                }
            }
            FieldType::Select { options } => {
                if !options.iter().any(|option| option.value == value) {
                    return Err("not one of the available options".to_string());
                }
            }
            FieldType::Text | FieldType::Secret => {}
        }

        match self.validator {
            Some(validator) => validator(value),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("field_type", &self.field_type)
            .field("key", &self.key)
            .field("required", &self.required)
            .field("label", &self.label)
            .field("placeholder", &self.placeholder)
            .field("default_value", &self.default_value)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Selector {
    pub name: Text,
    pub icon: Icon,
}

#[derive(Debug, Clone, Copy)]
pub struct Item {
    pub title_icon: LocaleMap<Icon>,
    pub sub_title_icon: Option<Icon>,
    pub desc: Option<Text>,
    pub bg_color: Option<Color>,
    pub hit: Text,
}

#[derive(Debug, Clone, Copy)]
pub struct Link {
    pub href: &'static str,
    pub label: Text,
}

#[derive(Debug, Clone)]
pub struct Modal {
    pub title: Text,
    pub icon: Icon,
    pub link: Link,
    pub validate_keys: Vec<&'static str>,
    pub fields: Vec<FieldDescriptor>,
}

impl Modal {
    pub fn field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.key == key)
    }
}

/// Everything needed to present one provider and collect its credentials.
#[derive(Debug, Clone)]
pub struct ProviderDescriptor {
    pub key: ProviderKey,
    pub selector: Selector,
    pub item: Item,
    pub modal: Modal,
}
