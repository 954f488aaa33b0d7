//! OpenAI-compatible dialect
//!
//! Covers OpenAI itself and the many gateways speaking the same API
//! (`/models`, `/chat/completions`, `/embeddings`).

use super::{ProviderAdapter, authorize, has_stream_chunks, model_ids, parse_json, post_json};
use crate::constants::{
    EMBEDDING_INPUT, FEATURE_MAX_TOKENS, JSON_MODE_PROMPT, MULTIMODAL_PROMPT,
    PROBE_IMAGE_MEDIA_TYPE, PROBE_IMAGE_PNG_BASE64, REASONING_ANSWER, REASONING_PROMPT,
    RESPONSIVENESS_MAX_TOKENS, RESPONSIVENESS_PROMPT, SSE_DONE, STREAMING_MAX_TOKENS,
    STREAMING_PROMPT, TOOL_NAME, TOOL_PROMPT, VISION_PROMPT,
};
use crate::utils::{JsonExt, contains_code};
use llmv_domain::{Capability, ModelRef, ProbeError, ProbeKind, Provider, ProviderDialect};
use reqwest::{Client, RequestBuilder};
use serde_json::{Value, json};

/// OpenAI-compatible adapter
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAiAdapter;

impl OpenAiAdapter {
    fn user_message(text: &str) -> Value {
        json!([{ "role": "user", "content": text }])
    }

    fn image_message(text: &str) -> Value {
        json!([{
            "role": "user",
            "content": [
                { "type": "text", "text": text },
                {
                    "type": "image_url",
                    "image_url": {
                        "url": format!("data:{PROBE_IMAGE_MEDIA_TYPE};base64,{PROBE_IMAGE_PNG_BASE64}")
                    }
                }
            ]
        }])
    }

    fn weather_tool() -> Value {
        json!([{
            "type": "function",
            "function": {
                "name": TOOL_NAME,
                "description": "Get the current weather in a given location",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "location": {
                            "type": "string",
                            "description": "The city and state, e.g. San Francisco, CA"
                        },
                        "unit": { "type": "string", "enum": ["celsius", "fahrenheit"] }
                    },
                    "required": ["location"]
                }
            }
        }])
    }

    fn chat(model: &str, messages: Value, max_tokens: u32) -> Value {
        json!({ "model": model, "messages": messages, "max_tokens": max_tokens })
    }

    fn feature_payload(model: &str, capability: &Capability) -> Result<Value, ProbeError> {
        let payload = match capability {
            Capability::ToolUse => {
                let mut payload = Self::chat(model, Self::user_message(TOOL_PROMPT), FEATURE_MAX_TOKENS);
                payload["tools"] = Self::weather_tool();
                payload["tool_choice"] = json!("auto");
                payload
            }
            Capability::Streaming => {
                let mut payload =
                    Self::chat(model, Self::user_message(STREAMING_PROMPT), STREAMING_MAX_TOKENS);
                payload["stream"] = json!(true);
                payload
            }
            Capability::Vision => Self::chat(model, Self::image_message(VISION_PROMPT), FEATURE_MAX_TOKENS),
            Capability::Multimodal => {
                Self::chat(model, Self::image_message(MULTIMODAL_PROMPT), FEATURE_MAX_TOKENS)
            }
            Capability::JsonMode => {
                let mut payload = Self::chat(model, Self::user_message(JSON_MODE_PROMPT), FEATURE_MAX_TOKENS);
                payload["response_format"] = json!({ "type": "json_object" });
                payload
            }
            Capability::Reasoning => {
                Self::chat(model, Self::user_message(REASONING_PROMPT), FEATURE_MAX_TOKENS)
            }
            Capability::CodeGeneration(language) => Self::chat(
                model,
                Self::user_message(&format!(
                    "Write a {} function that returns the factorial of n. Reply with code only.",
                    language.display_name()
                )),
                FEATURE_MAX_TOKENS,
            ),
            Capability::Embeddings => json!({ "model": model, "input": EMBEDDING_INPUT }),
            Capability::Unknown(name) => {
                return Err(ProbeError::unsupported(format!("unknown capability '{name}'")));
            }
        };
        Ok(payload)
    }

    /// Text of the first choice, if any
    fn completion_text(response: &Value) -> Option<&str> {
        response
            .opt_array("choices")?
            .first()?
            .get("message")?
            .opt_str("content")
    }

    fn judge_feature(capability: &Capability, body: &str) -> Result<(), ProbeError> {
        if *capability == Capability::Streaming {
            return if has_stream_chunks(body, Some(SSE_DONE)) {
                Ok(())
            } else {
                Err(ProbeError::unsupported("no stream chunks received"))
            };
        }

        let response = parse_json(body)?;
        if *capability == Capability::Embeddings {
            let dimensions = response
                .opt_array("data")
                .and_then(|data| data.first())
                .and_then(|item| item.opt_array("embedding"))
                .map_or(0, Vec::len);
            return if dimensions > 0 {
                Ok(())
            } else {
                Err(ProbeError::malformed("embeddings response carries no vector"))
            };
        }

        if !response.has_items("choices") {
            return Err(ProbeError::malformed("completion response has no choices"));
        }
        if *capability == Capability::ToolUse {
            let called = response
                .opt_array("choices")
                .and_then(|choices| choices.first())
                .and_then(|choice| choice.get("message"))
                .is_some_and(|message| message.has_items("tool_calls"));
            return if called {
                Ok(())
            } else {
                Err(ProbeError::unsupported("model answered without calling the tool"))
            };
        }

        let text = Self::completion_text(&response).unwrap_or_default();
        let exhibited = match capability {
            Capability::Vision | Capability::Multimodal => !text.trim().is_empty(),
            Capability::JsonMode => serde_json::from_str::<Value>(text.trim()).is_ok_and(|v| v.is_object()),
            Capability::Reasoning => text.contains(REASONING_ANSWER),
            Capability::CodeGeneration(language) => contains_code(text, *language),
            _ => false,
        };
        if exhibited {
            Ok(())
        } else {
            Err(ProbeError::unsupported(format!("response does not exhibit {capability}")))
        }
    }
}

impl ProviderAdapter for OpenAiAdapter {
    fn dialect(&self) -> ProviderDialect {
        ProviderDialect::OpenAiCompatible
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
            ProbeKind::Existence => authorize(client.get(provider.endpoint("models")), provider),
            ProbeKind::Responsiveness => post_json(
                client,
                provider,
                "chat/completions",
                &Self::chat(model, Self::user_message(RESPONSIVENESS_PROMPT), RESPONSIVENESS_MAX_TOKENS),
            ),
            ProbeKind::Feature(capability) => {
                let payload = Self::feature_payload(model, capability)?;
                let path = if *capability == Capability::Embeddings {
                    "embeddings"
                } else {
                    "chat/completions"
                };
                post_json(client, provider, path, &payload)
            }
        };
        Ok(request)
    }

    fn parse_response(
        &self,
        target: &ModelRef,
        kind: &ProbeKind,
        body: &str,
    ) -> Result<(), ProbeError> {
        match kind {
            ProbeKind::Existence => {
                if model_ids(body)?.iter().any(|id| *id == target.model_id) {
                    Ok(())
                } else {
                    Err(ProbeError::not_found(format!(
                        "model '{}' is not listed by the provider",
                        target.model_id
                    )))
                }
            }
            ProbeKind::Responsiveness => {
                if parse_json(body)?.has_items("choices") {
                    Ok(())
                } else {
                    Err(ProbeError::malformed("completion response has no choices"))
                }
            }
            ProbeKind::Feature(capability) => Self::judge_feature(capability, body),
        }
    }

    fn build_list_request(&self, client: &Client, provider: &Provider) -> RequestBuilder {
        authorize(client.get(provider.endpoint("models")), provider)
    }
}
