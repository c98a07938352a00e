//! Field and event names shared by the logging macros and the test capture
//! layer.

// Operation envelope
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Signing
pub const FIELD_PATH: &str = "path";
pub const FIELD_SIDECAR: &str = "sidecar";
pub const FIELD_DIGEST: &str = "digest";
pub const FIELD_FILES_LEN: &str = "files_len";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
