pub mod sync {
    pub const DEBOUNCE_MS: u64 = 50;
    pub const USER_SENTINEL: &str = "{user}";
    pub const PATH_VARIABLE_PREFIX: char = ':';
    pub const MAX_SETTLE_ROUNDS: usize = 4;
    pub const MAX_RECONCILE_ROUNDS: usize = 4;
}

pub mod http {
    pub const DEFAULT_METHOD: &str = "GET";
    pub const METHODS: &[&str] = &["GET", "POST", "PUT", "PATCH", "DELETE"];
    pub const BODYLESS_METHODS: &[&str] = &["GET", "DELETE"];
}

pub mod form_paths {
    pub const URL: &str = "config.url";
    pub const METHOD: &str = "config.method";
    pub const PATH_VARIABLES: &str = "config.pathVariables";
    pub const HEADERS: &str = "config.headers";
    pub const QUERY_PARAMETERS: &str = "config.queryParameters";
    pub const BODY: &str = "config.body";
}

pub mod limits {
    pub const LOG_URL_LENGTH: usize = 160;
    pub const MAX_SUGGESTIONS: usize = 5;
}

pub mod env {
    pub const DEBOUNCE_MS: &str = "URLSYNC_DEBOUNCE_MS";
    pub const LOG_LEVEL: &str = "URLSYNC_LOG_LEVEL";
    pub const LOG_LEVEL_FALLBACK: &str = "LOG_LEVEL";
}
