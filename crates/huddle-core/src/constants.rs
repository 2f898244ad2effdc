/// Huddle: centralized constants.
/// Model identifiers, endpoints, wire strings and fixed messages live here.

// ─── Models ───────────────────────────────────────────────────────────────────

pub mod models {
    pub const DEFAULT_CLAUDE_MODEL: &str = "claude-3-5-sonnet-20241022";
}

// ─── API Endpoints ────────────────────────────────────────────────────────────

pub mod endpoints {
    pub const CLAUDE_BASE_URL: &str = "https://api.anthropic.com";
    pub const CLAUDE_API_VERSION: &str = "2023-06-01";
    pub const COLLABORATE_PATH: &str = "/api/agents/collaborate";
    pub const ROSTER_PATH: &str = "/api/agents/roster";
    pub const HEALTH_PATH: &str = "/health";
}

// ─── Default Settings ─────────────────────────────────────────────────────────

pub mod defaults {
    pub const MAX_TOKENS: u32 = 2000;
    pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
    pub const BIND_ADDR: &str = "127.0.0.1:3000";
}

// ─── Session Text ─────────────────────────────────────────────────────────────

pub mod session {
    /// Body substituted for a model reply when the call fails for any reason.
    pub const FALLBACK_MESSAGE: &str = "I encountered an error while processing. \
Please ensure the ANTHROPIC_API_KEY environment variable is set correctly.";

    /// Body of the single system message emitted when a session aborts.
    pub const SESSION_FAILURE_MESSAGE: &str =
        "An error occurred during the collaboration process.";

    /// Reserved author for session-level failure messages.
    pub const SYSTEM_AGENT: &str = "System";

    pub const CLOSING_DIRECTIVE: &str = "Based on the discussion so far, provide your expert input. \
Be specific, actionable, and build upon what others have said. Keep your response focused and valuable.";

    pub const SYNTHESIS_DIRECTIVE: &str =
        "Now synthesize all inputs into a coherent plan with clear next steps.";

    pub const DETAIL_DIRECTIVE: &str = "Provide a detailed technical implementation plan \
with specific steps, technologies, and code structure.";
}

// ─── Wire Format ──────────────────────────────────────────────────────────────

pub mod wire {
    pub const DATA_PREFIX: &str = "data: ";
    pub const FRAME_TERMINATOR: &str = "\n\n";
    pub const CONTENT_TYPE: &str = "text/event-stream";
    pub const CACHE_CONTROL: &str = "no-cache";
    pub const CONNECTION: &str = "keep-alive";
}

// ─── Config Paths ─────────────────────────────────────────────────────────────

pub mod paths {
    pub const CONFIG_DIR: &str = "huddle";
    pub const CONFIG_FILE: &str = "config.toml";
}
