//! Capability catalogue
//!
//! Feature probes are addressed through a closed [`Capability`] enum. Names
//! that do not match a known capability become [`Capability::Unknown`]
//! instead of silently reading as "absent", so configuration validation can
//! reject typos.

use crate::constants::{
    CAPABILITY_IMPORTANCE_CODE_GENERATION, CAPABILITY_IMPORTANCE_EMBEDDINGS,
    CAPABILITY_IMPORTANCE_JSON_MODE, CAPABILITY_IMPORTANCE_MEDIA, CAPABILITY_IMPORTANCE_REASONING,
    CAPABILITY_IMPORTANCE_TOOL_USE, CAPABILITY_IMPORTANCE_UNKNOWN,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Languages covered by code-generation probes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CodeLanguage {
    Python,
    Rust,
    Go,
    JavaScript,
    TypeScript,
    Java,
    Cpp,
}

impl CodeLanguage {
    /// Every supported language
    pub const ALL: [Self; 7] = [
        Self::Python,
        Self::Rust,
        Self::Go,
        Self::JavaScript,
        Self::TypeScript,
        Self::Java,
        Self::Cpp,
    ];

    /// Identifier used in capability names
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Rust => "rust",
            Self::Go => "go",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Java => "java",
            Self::Cpp => "cpp",
        }
    }

    /// Name used in probe prompts
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Python => "Python",
            Self::Rust => "Rust",
            Self::Go => "Go",
            Self::JavaScript => "JavaScript",
            Self::TypeScript => "TypeScript",
            Self::Java => "Java",
            Self::Cpp => "C++",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "python" | "py" => Some(Self::Python),
            "rust" | "rs" => Some(Self::Rust),
            "go" | "golang" => Some(Self::Go),
            "javascript" | "js" => Some(Self::JavaScript),
            "typescript" | "ts" => Some(Self::TypeScript),
            "java" => Some(Self::Java),
            "cpp" | "c++" => Some(Self::Cpp),
            _ => None,
        }
    }
}

/// A probe-able model capability
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Capability {
    /// Function/tool calling
    ToolUse,
    /// Server-sent event streaming
    Streaming,
    /// Image input
    Vision,
    /// Mixed image and text reasoning
    Multimodal,
    /// Embeddings endpoint
    Embeddings,
    /// JSON-constrained output
    JsonMode,
    /// Multi-step arithmetic reasoning
    Reasoning,
    /// Code generation in one language
    CodeGeneration(CodeLanguage),
    /// Name not recognised by this build
    Unknown(String),
}

impl Capability {
    /// Parse a capability name; never fails
    ///
    /// Matching ignores case and treats `-` and spaces as `_`.
    /// Code generation is written `code_generation:<language>`.
    pub fn parse(name: &str) -> Self {
        let normalized = name.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "tool_use" | "tools" | "function_calling" => Self::ToolUse,
            "streaming" | "stream" => Self::Streaming,
            "vision" => Self::Vision,
            "multimodal" => Self::Multimodal,
            "embeddings" | "embedding" => Self::Embeddings,
            "json_mode" | "json" => Self::JsonMode,
            "reasoning" => Self::Reasoning,
            other => other
                .strip_prefix("code_generation:")
                .or_else(|| other.strip_prefix("code:"))
                .and_then(CodeLanguage::parse)
                .map_or_else(|| Self::Unknown(name.trim().to_string()), Self::CodeGeneration),
        }
    }

    /// Relative importance in the capability score
    pub fn importance(&self) -> f64 {
        match self {
            Self::ToolUse => CAPABILITY_IMPORTANCE_TOOL_USE,
            Self::CodeGeneration(_) => CAPABILITY_IMPORTANCE_CODE_GENERATION,
            Self::Reasoning => CAPABILITY_IMPORTANCE_REASONING,
            Self::Streaming | Self::Vision | Self::Multimodal => CAPABILITY_IMPORTANCE_MEDIA,
            Self::JsonMode => CAPABILITY_IMPORTANCE_JSON_MODE,
            Self::Embeddings => CAPABILITY_IMPORTANCE_EMBEDDINGS,
            Self::Unknown(_) => CAPABILITY_IMPORTANCE_UNKNOWN,
        }
    }

    /// Whether this build knows how to probe the capability
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// Feature set probed when configuration does not name one
    pub fn default_probe_set() -> Vec<Self> {
        vec![
            Self::ToolUse,
            Self::Streaming,
            Self::JsonMode,
            Self::Reasoning,
            Self::CodeGeneration(CodeLanguage::Python),
            Self::CodeGeneration(CodeLanguage::Rust),
        ]
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ToolUse => f.write_str("tool_use"),
            Self::Streaming => f.write_str("streaming"),
            Self::Vision => f.write_str("vision"),
            Self::Multimodal => f.write_str("multimodal"),
            Self::Embeddings => f.write_str("embeddings"),
            Self::JsonMode => f.write_str("json_mode"),
            Self::Reasoning => f.write_str("reasoning"),
            Self::CodeGeneration(lang) => write!(f, "code_generation:{}", lang.as_str()),
            Self::Unknown(name) => f.write_str(name),
        }
    }
}

impl FromStr for Capability {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for Capability {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Capability> for String {
    fn from(value: Capability) -> Self {
        value.to_string()
    }
}

/// Value Object: Capability Probe Results
///
/// Tagged set of attempted capabilities and whether each passed. A
/// capability that was never attempted is absent, which is different from
/// one that was attempted and failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilityReport {
    probes: BTreeMap<Capability, bool>,
}

impl CapabilityReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the result of one feature probe
    pub fn record(&mut self, capability: Capability, passed: bool) {
        self.probes.insert(capability, passed);
    }

    /// Whether the capability was attempted and passed
    pub fn supports(&self, capability: &Capability) -> bool {
        self.probes.get(capability).copied().unwrap_or(false)
    }

    /// Whether the capability was attempted at all
    pub fn attempted(&self, capability: &Capability) -> bool {
        self.probes.contains_key(capability)
    }

    /// Passed capabilities in order
    pub fn supported(&self) -> impl Iterator<Item = &Capability> {
        self.probes
            .iter()
            .filter_map(|(capability, passed)| passed.then_some(capability))
    }

    /// All attempted capabilities with their result
    pub fn iter(&self) -> impl Iterator<Item = (&Capability, bool)> {
        self.probes.iter().map(|(capability, passed)| (capability, *passed))
    }

    /// Number of attempted probes
    pub fn attempted_count(&self) -> usize {
        self.probes.len()
    }

    /// Number of passed probes
    pub fn passed_count(&self) -> usize {
        self.probes.values().filter(|passed| **passed).count()
    }

    /// Whether nothing was attempted
    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Importance-weighted share of passed probes, `None` if nothing was attempted
    pub fn weighted_pass_ratio(&self) -> Option<f64> {
        let total: f64 = self.probes.keys().map(Capability::importance).sum();
        if total <= 0.0 {
            return None;
        }
        let passed: f64 = self
            .probes
            .iter()
            .filter(|(_, passed)| **passed)
            .map(|(capability, _)| capability.importance())
            .sum();
        Some(passed / total)
    }
}
