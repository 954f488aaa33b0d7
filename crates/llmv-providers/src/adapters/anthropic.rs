//! Anthropic messages dialect

use super::{ProviderAdapter, authorize, has_stream_chunks, parse_json, post_json};
use crate::constants::{
    ANTHROPIC_VERSION, ANTHROPIC_VERSION_HEADER, FEATURE_MAX_TOKENS, MULTIMODAL_PROMPT,
    PROBE_IMAGE_MEDIA_TYPE, PROBE_IMAGE_PNG_BASE64, REASONING_ANSWER, REASONING_PROMPT,
    RESPONSIVENESS_MAX_TOKENS, RESPONSIVENESS_PROMPT, STREAMING_MAX_TOKENS, STREAMING_PROMPT,
    MODEL_LIST_LIMIT, TOOL_NAME, TOOL_PROMPT, VISION_PROMPT,
};
use crate::utils::{JsonExt, contains_code};
use llmv_domain::{Capability, ModelRef, ProbeError, ProbeKind, Provider, ProviderDialect};
use reqwest::{Client, RequestBuilder};
use serde_json::{Value, json};

/// Anthropic adapter
///
/// The messages API has no embeddings endpoint and no JSON response mode,
/// so those probes are reported unsupported without a request.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnthropicAdapter;

impl AnthropicAdapter {
    fn messages(model: &str, content: Value, max_tokens: u32) -> Value {
        json!({
            "model": model,
            "max_tokens": max_tokens,
            "messages": [{ "role": "user", "content": content }]
        })
    }

    fn image_content(text: &str) -> Value {
        json!([
            {
                "type": "image",
                "source": {
                    "type": "base64",
                    "media_type": PROBE_IMAGE_MEDIA_TYPE,
                    "data": PROBE_IMAGE_PNG_BASE64
                }
            },
            { "type": "text", "text": text }
        ])
    }

    fn feature_payload(model: &str, capability: &Capability) -> Result<Value, ProbeError> {
        let payload = match capability {
            Capability::ToolUse => {
                let mut payload = Self::messages(model, json!(TOOL_PROMPT), FEATURE_MAX_TOKENS);
                payload["tools"] = json!([{
                    "name": TOOL_NAME,
                    "description": "Get the current weather in a given location",
                    "input_schema": {
                        "type": "object",
                        "properties": {
                            "location": { "type": "string" },
                            "unit": { "type": "string", "enum": ["celsius", "fahrenheit"] }
                        },
                        "required": ["location"]
                    }
                }]);
                payload
            }
            Capability::Streaming => {
                let mut payload = Self::messages(model, json!(STREAMING_PROMPT), STREAMING_MAX_TOKENS);
                payload["stream"] = json!(true);
                payload
            }
            Capability::Vision => Self::messages(model, Self::image_content(VISION_PROMPT), FEATURE_MAX_TOKENS),
            Capability::Multimodal => {
                Self::messages(model, Self::image_content(MULTIMODAL_PROMPT), FEATURE_MAX_TOKENS)
            }
            Capability::Reasoning => Self::messages(model, json!(REASONING_PROMPT), FEATURE_MAX_TOKENS),
            Capability::CodeGeneration(language) => Self::messages(
                model,
                json!(format!(
                    "Write a {} function that returns the factorial of n. Reply with code only.",
                    language.display_name()
                )),
                FEATURE_MAX_TOKENS,
            ),
            Capability::Embeddings | Capability::JsonMode | Capability::Unknown(_) => {
                return Err(ProbeError::unsupported(format!(
                    "{capability} cannot be probed on the anthropic dialect"
                )));
            }
        };
        Ok(payload)
    }

    /// Concatenated text blocks of a messages response
    fn text(response: &Value) -> String {
        response
            .opt_array("content")
            .map(|blocks| {
                blocks
                    .iter()
                    .filter(|block| block.opt_str("type") == Some("text"))
                    .filter_map(|block| block.opt_str("text"))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default()
    }

    fn judge_feature(capability: &Capability, body: &str) -> Result<(), ProbeError> {
        if *capability == Capability::Streaming {
            return if has_stream_chunks(body, None) {
                Ok(())
            } else {
                Err(ProbeError::unsupported("no stream events received"))
            };
        }
        let response = parse_json(body)?;
        if !response.has_items("content") {
            return Err(ProbeError::malformed("messages response has no content"));
        }
        let exhibited = match capability {
            Capability::ToolUse => response
                .opt_array("content")
                .is_some_and(|blocks| blocks.iter().any(|b| b.opt_str("type") == Some("tool_use"))),
            Capability::Vision | Capability::Multimodal => !Self::text(&response).trim().is_empty(),
            Capability::Reasoning => Self::text(&response).contains(REASONING_ANSWER),
            Capability::CodeGeneration(language) => contains_code(&Self::text(&response), *language),
            _ => false,
        };
        if exhibited {
            Ok(())
        } else {
            Err(ProbeError::unsupported(format!("response does not exhibit {capability}")))
        }
    }
}

impl ProviderAdapter for AnthropicAdapter {
    fn dialect(&self) -> ProviderDialect {
        ProviderDialect::Anthropic
    }

    fn build_request(
        &self,
        client: &Client,
        provider: &Provider,
        target: &ModelRef,
        kind: &ProbeKind,
    ) -> Result<RequestBuilder, ProbeError> {
        let model = target.model_id.as_str();
        let request = match kind {
            ProbeKind::Existence => authorize(
                client.get(provider.endpoint(&format!("v1/models/{model}"))),
                provider,
            ),
            ProbeKind::Responsiveness => post_json(
                client,
                provider,
                "v1/messages",
                &Self::messages(model, json!(RESPONSIVENESS_PROMPT), RESPONSIVENESS_MAX_TOKENS),
            ),
            ProbeKind::Feature(capability) => {
                post_json(client, provider, "v1/messages", &Self::feature_payload(model, capability)?)
            }
        };
        Ok(request.header(ANTHROPIC_VERSION_HEADER, ANTHROPIC_VERSION))
    }

    fn parse_response(
        &self,
        target: &ModelRef,
        kind: &ProbeKind,
        body: &str,
    ) -> Result<(), ProbeError> {
        match kind {
            ProbeKind::Existence => {
                let response = parse_json(body)?;
                // aliases such as `-latest` resolve to a dated id
                match response.opt_str("id") {
                    Some(_) => Ok(()),
                    None => Err(ProbeError::malformed(format!(
                        "model lookup for '{}' returned no id",
                        target.model_id
                    ))),
                }
            }
            ProbeKind::Responsiveness => {
                if parse_json(body)?.has_items("content") {
                    Ok(())
                } else {
                    Err(ProbeError::malformed("messages response has no content"))
                }
            }
            ProbeKind::Feature(capability) => Self::judge_feature(capability, body),
        }
    }

    fn build_list_request(&self, client: &Client, provider: &Provider) -> RequestBuilder {
        authorize(client.get(provider.endpoint("v1/models")), provider)
            .query(&[("limit", MODEL_LIST_LIMIT)])
            .header(ANTHROPIC_VERSION_HEADER, ANTHROPIC_VERSION)
    }
}
