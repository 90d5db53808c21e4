//! Global Constants
//!
//! Centralized constants for configuration and tuning.

/// Input validation bounds, uniform across all artifact kinds
pub mod input {
    /// Minimum accepted free-text length (characters, after trimming)
    pub const MIN_CHARS: usize = 30;

    /// Upper bound to keep prompts inside model context limits
    pub const MAX_CHARS: usize = 20_000;
}

/// Model client defaults
pub mod model {
    /// Default chat-completion model
    pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

    /// Default API base URL
    pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

    /// Explicit request timeout instead of the HTTP client's implicit default
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

    /// Sampling temperature shared by all artifact kinds
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;

    /// Environment variable carrying the server-side credential
    pub const CREDENTIAL_ENV: &str = "OPENAI_API_KEY";
}

/// Embedded server defaults
pub mod server {
    pub const DEFAULT_BIND: &str = "0.0.0.0";

    pub const DEFAULT_PORT: u16 = 5000;
}

/// Serverless dispatch constants
pub mod serverless {
    /// Platform function path prefix, mapped 1:1 to the kind set
    pub const FUNCTION_PREFIX: &str = "/.netlify/functions";
}

/// Output token budgets per artifact kind
pub mod tokens {
    pub const ANALYSIS_MAX_TOKENS: u32 = 3000;

    pub const DOCUMENT_MAX_TOKENS: u32 = 4000;

    pub const STORIES_MAX_TOKENS: u32 = 2000;

    pub const GENERIC_MAX_TOKENS: u32 = 1500;
}
