//! Provider Constants
//!
//! Constants specific to provider implementations. These are separated from
//! domain constants (which live in llmv-domain) and infrastructure constants.

// ============================================================================
// HTTP CONSTANTS
// ============================================================================

/// JSON content type
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Maximum idle pooled connections per host
pub const HTTP_MAX_IDLE_PER_HOST: usize = 10;

/// Idle pooled connection timeout in seconds
pub const HTTP_IDLE_TIMEOUT_SECS: u64 = 90;

/// TCP keep-alive in seconds
pub const HTTP_KEEPALIVE_SECS: u64 = 60;

/// Longest provider error body quoted in probe error messages
pub const ERROR_BODY_MAX_CHARS: usize = 200;

/// Header carrying API keys for `api_key_header` auth
pub const API_KEY_HEADER: &str = "x-api-key";

/// Header selecting the Anthropic API version
pub const ANTHROPIC_VERSION_HEADER: &str = "anthropic-version";

/// Anthropic API version sent with every request
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Page size requested from the Anthropic model listing
pub const MODEL_LIST_LIMIT: u32 = 1000;

// ============================================================================
// PROBE PAYLOAD CONSTANTS
// ============================================================================

/// Minimal prompt of the responsiveness probe
pub const RESPONSIVENESS_PROMPT: &str = "Hello, please respond with just the word 'pong'.";

/// Token budget of the responsiveness probe
pub const RESPONSIVENESS_MAX_TOKENS: u32 = 10;

/// Token budget of feature probes
pub const FEATURE_MAX_TOKENS: u32 = 256;

/// Token budget of the streaming probe
pub const STREAMING_MAX_TOKENS: u32 = 16;

/// Function exposed to the tool-use probe
pub const TOOL_NAME: &str = "get_current_weather";

/// Prompt that should trigger a call of [`TOOL_NAME`]
pub const TOOL_PROMPT: &str = "What is the weather like in New York? Use the provided tool.";

/// Prompt of the streaming probe
pub const STREAMING_PROMPT: &str = "Say 'hello' in 10 words.";

/// Prompt of the JSON mode probe
pub const JSON_MODE_PROMPT: &str =
    "Return a JSON object with keys 'name' and 'value'. Respond only with valid JSON.";

/// Prompt of the reasoning probe
pub const REASONING_PROMPT: &str = "What is 17 * 23? Think it through, then give the number.";

/// Expected answer of [`REASONING_PROMPT`]
pub const REASONING_ANSWER: &str = "391";

/// Prompt of the vision probe
pub const VISION_PROMPT: &str = "Describe this image in one short sentence.";

/// Prompt of the multimodal probe
pub const MULTIMODAL_PROMPT: &str =
    "What is the dominant color of this image, and what might an image of that color represent?";

/// Input of the embeddings probe
pub const EMBEDDING_INPUT: &str = "Hello world";

/// 1x1 red PNG used by image probes
pub const PROBE_IMAGE_PNG_BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

/// Media type of [`PROBE_IMAGE_PNG_BASE64`]
pub const PROBE_IMAGE_MEDIA_TYPE: &str = "image/png";

/// Server-sent event data prefix
pub const SSE_DATA_PREFIX: &str = "data:";

/// Server-sent event stream terminator used by OpenAI-compatible APIs
pub const SSE_DONE: &str = "[DONE]";
