//! Built-in provider descriptors.
//!
//! Field keys are whatever the backend expects for that provider. The form
//! engine never looks at them, so renaming a key here is the whole change.

use crate::locale::{LocaleMap, Text};
use crate::registry::descriptor::{
    Color, FieldDescriptor, FieldType, Icon, Item, Link, Modal, ProviderDescriptor, ProviderKey,
    SelectOption, Selector,
};

const API_KEY_LABEL: Text = Text::new("API Key", "API Key");
const API_KEY_PLACEHOLDER: Text = Text::new("Enter your API key here", "在此输入您的 API Key");
const SERVER_URL_LABEL: Text = Text::new("Server URL", "服务器 URL");

// Dedicated Inference Endpoints need an endpoint URL that only they use;
// the form has no conditional fields, so only the hosted API is offered.
const HF_API_TYPES: &[SelectOption] = &[SelectOption {
    value: "hosted_inference_api",
    label: Text::new("Hosted Inference API", "Hosted Inference API"),
}];

fn openai_key_format(value: &str) -> Result<(), String> {
    if value.starts_with("sk-") {
        Ok(())
    } else {
        Err("OpenAI API keys start with `sk-`".to_string())
    }
}

/// Every built-in provider, in display order.
pub fn builtin_descriptors() -> Vec<ProviderDescriptor> {
    vec![
        openai(),
        anthropic(),
        azure_openai(),
        replicate(),
        huggingface_hub(),
        chatglm(),
        openllm(),
        localai(),
        cohere(),
        jina(),
        gemini(),
    ]
}

fn openai() -> ProviderDescriptor {
    ProviderDescriptor {
        key: ProviderKey::Openai,
        selector: Selector {
            name: Text::uniform("OpenAI"),
            icon: Icon("openai"),
        },
        item: Item {
            title_icon: LocaleMap::uniform(Icon("openai-text")),
            sub_title_icon: None,
            desc: Some(Text::new(
                "Models provided by OpenAI, such as GPT-3.5-Turbo and GPT-4.",
                "OpenAI 提供的模型，例如 GPT-3.5-Turbo 和 GPT-4。",
            )),
            bg_color: Some(Color("#E5E7EB")),
            hit: Text::new("Use your own OpenAI API key", "使用您自己的 OpenAI API Key"),
        },
        modal: Modal {
            title: Text::new("OpenAI", "OpenAI"),
            icon: Icon("openai-text"),
            link: Link {
                href: "https://platform.openai.com/account/api-keys",
                label: Text::new("Get your API key from OpenAI", "从 OpenAI 获取 API Key"),
            },
            validate_keys: vec!["openai_api_key"],
            fields: vec![
                FieldDescriptor::new(
                    FieldType::Secret,
                    "openai_api_key",
                    API_KEY_LABEL,
                    API_KEY_PLACEHOLDER,
                )
                .validator(openai_key_format),
                FieldDescriptor::new(
                    FieldType::Text,
                    "openai_organization",
                    Text::new("Organization ID", "组织 ID"),
                    Text::new("Enter your Organization ID (optional)", "输入您的组织 ID（选填）"),
                )
                .optional(),
                FieldDescriptor::new(
                    FieldType::Url,
                    "openai_api_base",
                    Text::new("API Base", "API Base"),
                    Text::new(
                        "Enter a custom API base, e.g. https://api.openai.com (optional)",
                        "输入自定义 API Base，例如 https://api.openai.com（选填）",
                    ),
                )
                .optional(),
            ],
        },
    }
}

fn anthropic() -> ProviderDescriptor {
    ProviderDescriptor {
        key: ProviderKey::Anthropic,
        selector: Selector {
            name: Text::uniform("Anthropic"),
            icon: Icon("anthropic"),
        },
        item: Item {
            title_icon: LocaleMap::uniform(Icon("anthropic-text")),
            sub_title_icon: None,
            desc: Some(Text::new(
                "Powerful models from Anthropic, such as Claude 2 and Claude Instant.",
                "Anthropic 的强大模型，例如 Claude 2 和 Claude Instant。",
            )),
            bg_color: Some(Color("#F0F0EB")),
            hit: Text::new("Use your own Anthropic API key", "使用您自己的 Anthropic API Key"),
        },
        modal: Modal {
            title: Text::new("Anthropic", "Anthropic"),
            icon: Icon("anthropic-text"),
            link: Link {
                href: "https://console.anthropic.com/account/keys",
                label: Text::new("Get your API key from Anthropic", "从 Anthropic 获取 API Key"),
            },
            validate_keys: vec!["anthropic_api_key"],
            fields: vec![
                FieldDescriptor::new(
                    FieldType::Secret,
                    "anthropic_api_key",
                    API_KEY_LABEL,
                    API_KEY_PLACEHOLDER,
                ),
                FieldDescriptor::new(
                    FieldType::Url,
                    "anthropic_api_url",
                    Text::new("API URL", "API URL"),
                    Text::new("Enter a custom API URL (optional)", "输入自定义 API URL（选填）"),
                )
                .optional(),
            ],
        },
    }
}

fn azure_openai() -> ProviderDescriptor {
    ProviderDescriptor {
        key: ProviderKey::AzureOpenai,
        selector: Selector {
            name: Text::new("Azure OpenAI Service", "Azure OpenAI Service"),
            icon: Icon("azure-openai"),
        },
        item: Item {
            title_icon: LocaleMap::uniform(Icon("azure-openai-text")),
            sub_title_icon: Some(Icon("azure")),
            desc: Some(Text::new(
                "OpenAI models deployed on Microsoft Azure.",
                "部署在 Microsoft Azure 上的 OpenAI 模型。",
            )),
            bg_color: Some(Color("#EFF6FF")),
            hit: Text::new("Connect your Azure deployment", "连接您的 Azure 部署"),
        },
        modal: Modal {
            title: Text::new("Azure OpenAI Service", "Azure OpenAI Service"),
            icon: Icon("azure-openai-text"),
            link: Link {
                href: "https://azure.microsoft.com/en-us/products/ai-services/openai-service",
                label: Text::new(
                    "Get your API key from Azure",
                    "从 Azure 获取 API Key",
                ),
            },
            validate_keys: vec!["openai_api_base", "openai_api_key"],
            fields: vec![
                FieldDescriptor::new(
                    FieldType::Url,
                    "openai_api_base",
                    Text::new("API Endpoint URL", "API 域名"),
                    Text::new(
                        "Enter your endpoint, e.g. https://example.openai.azure.com/",
                        "输入您的 API 域名，例如 https://example.openai.azure.com/",
                    ),
                ),
                FieldDescriptor::new(
                    FieldType::Secret,
                    "openai_api_key",
                    API_KEY_LABEL,
                    API_KEY_PLACEHOLDER,
                ),
                FieldDescriptor::new(
                    FieldType::Text,
                    "openai_api_version",
                    Text::new("API Version", "API 版本"),
                    Text::new("e.g. 2023-12-01-preview (optional)", "例如 2023-12-01-preview（选填）"),
                )
                .optional()
                .default_value("2023-12-01-preview"),
            ],
        },
    }
}

fn replicate() -> ProviderDescriptor {
    ProviderDescriptor {
        key: ProviderKey::Replicate,
        selector: Selector {
            name: Text::uniform("Replicate"),
            icon: Icon("replicate"),
        },
        item: Item {
            title_icon: LocaleMap::uniform(Icon("replicate-text")),
            sub_title_icon: None,
            desc: None,
            bg_color: None,
            hit: Text::new("Run open-source models on Replicate", "在 Replicate 上运行开源模型"),
        },
        modal: Modal {
            title: Text::new("Replicate", "Replicate"),
            icon: Icon("replicate-text"),
            link: Link {
                href: "https://replicate.com/account/api-tokens",
                label: Text::new("Get your API token from Replicate", "从 Replicate 获取 API Token"),
            },
            validate_keys: vec!["replicate_api_token"],
            fields: vec![FieldDescriptor::new(
                FieldType::Secret,
                "replicate_api_token",
                Text::new("API Token", "API Token"),
                Text::new("Enter your API token here", "在此输入您的 API Token"),
            )],
        },
    }
}

fn huggingface_hub() -> ProviderDescriptor {
    ProviderDescriptor {
        key: ProviderKey::HuggingfaceHub,
        selector: Selector {
            name: Text::new("Hugging Face Hub", "Hugging Face Hub"),
            icon: Icon("huggingface"),
        },
        item: Item {
            title_icon: LocaleMap::uniform(Icon("huggingface-text")),
            sub_title_icon: None,
            desc: Some(Text::new(
                "Hosted inference or your own Inference Endpoints.",
                "托管推理服务或您自己的推理端点。",
            )),
            bg_color: Some(Color("#FEF9C3")),
            hit: Text::new("Use models from Hugging Face", "使用 Hugging Face 上的模型"),
        },
        modal: Modal {
            title: Text::new("Hugging Face Hub", "Hugging Face Hub"),
            icon: Icon("huggingface-text"),
            link: Link {
                href: "https://huggingface.co/settings/tokens",
                label: Text::new(
                    "Get your access token from Hugging Face",
                    "从 Hugging Face 获取 Access Token",
                ),
            },
            validate_keys: vec!["huggingfacehub_api_type", "huggingfacehub_api_token"],
            fields: vec![
                FieldDescriptor::new(
                    FieldType::Select {
                        options: HF_API_TYPES,
                    },
                    "huggingfacehub_api_type",
                    Text::new("Endpoint Type", "端点类型"),
                    Text::new("Select the endpoint type", "选择端点类型"),
                )
                .default_value("hosted_inference_api"),
                FieldDescriptor::new(
                    FieldType::Secret,
                    "huggingfacehub_api_token",
                    Text::new("Access Token", "Access Token"),
                    Text::new("Enter your access token here", "在此输入您的 Access Token"),
                ),
            ],
        },
    }
}

fn self_hosted(
    key: ProviderKey,
    name: &'static str,
    icon: &'static str,
    href: &'static str,
    url_key: &'static str,
) -> ProviderDescriptor {
    ProviderDescriptor {
        key,
        selector: Selector {
            name: Text::uniform(name),
            icon: Icon(icon),
        },
        item: Item {
            title_icon: LocaleMap::uniform(Icon(icon)),
            sub_title_icon: None,
            desc: Some(Text::new(
                "Connect a model server you host yourself.",
                "连接您自行部署的模型服务。",
            )),
            bg_color: Some(Color("#F3F4F6")),
            hit: Text::new("Self-hosted", "私有部署"),
        },
        modal: Modal {
            title: Text::uniform(name),
            icon: Icon(icon),
            link: Link {
                href,
                label: Text::new("How to deploy", "如何部署"),
            },
            validate_keys: vec![url_key],
            fields: vec![FieldDescriptor::new(
                FieldType::Url,
                url_key,
                SERVER_URL_LABEL,
                Text::new(
                    "Enter the server URL, e.g. http://192.168.1.100:8000",
                    "输入服务器 URL，例如 http://192.168.1.100:8000",
                ),
            )],
        },
    }
}

fn chatglm() -> ProviderDescriptor {
    self_hosted(
        ProviderKey::Chatglm,
        "ChatGLM",
        "chatglm",
        "https://github.com/THUDM/ChatGLM2-6B",
        "api_base",
    )
}

fn openllm() -> ProviderDescriptor {
    self_hosted(
        ProviderKey::Openllm,
        "OpenLLM",
        "openllm",
        "https://github.com/bentoml/OpenLLM",
        "server_url",
    )
}

fn localai() -> ProviderDescriptor {
    self_hosted(
        ProviderKey::Localai,
        "LocalAI",
        "localai",
        "https://github.com/go-skynet/LocalAI",
        "server_url",
    )
}

fn single_key(
    key: ProviderKey,
    name: &'static str,
    icon: &'static str,
    href: &'static str,
    field_key: &'static str,
) -> ProviderDescriptor {
    ProviderDescriptor {
        key,
        selector: Selector {
            name: Text::uniform(name),
            icon: Icon(icon),
        },
        item: Item {
            title_icon: LocaleMap::uniform(Icon(icon)),
            sub_title_icon: None,
            desc: None,
            bg_color: None,
            hit: Text::uniform(name),
        },
        modal: Modal {
            title: Text::uniform(name),
            icon: Icon(icon),
            link: Link {
                href,
                label: Text::new("Get your API key", "获取 API Key"),
            },
            validate_keys: vec![field_key],
            fields: vec![FieldDescriptor::new(
                FieldType::Secret,
                field_key,
                API_KEY_LABEL,
                API_KEY_PLACEHOLDER,
            )],
        },
    }
}

fn cohere() -> ProviderDescriptor {
    single_key(
        ProviderKey::Cohere,
        "Cohere",
        "cohere",
        "https://dashboard.cohere.com/api-keys",
        "api_key",
    )
}

fn jina() -> ProviderDescriptor {
    single_key(
        ProviderKey::Jina,
        "Jina",
        "jina",
        "https://jina.ai/embeddings/",
        "api_key",
    )
}

fn gemini() -> ProviderDescriptor {
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
                label: Text::new(
                    "Get your API key from Google AI Studio",
                    "从 Google AI Studio 获取 API Key",
                ),
            },
            validate_keys: vec!["gemini_api_key"],
            fields: vec![FieldDescriptor::new(
                FieldType::Secret,
                "gemini_api_key",
                Text::uniform("Gemini API Key"),
                API_KEY_PLACEHOLDER,
            )],
        },
    }
}
