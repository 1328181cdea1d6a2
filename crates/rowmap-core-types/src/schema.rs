//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Table an operation ran against
pub const FIELD_TABLE: &str = "table";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Canonical operation names
pub const OP_REGISTER: &str = "register_entity";
pub const OP_FIND_BY_ID: &str = "find_by_id";
pub const OP_SAVE: &str = "save";
pub const OP_DELETE: &str = "delete";
pub const OP_DELETE_BY_ID: &str = "delete_by_id";
pub const OP_TRANSACTION: &str = "transaction";
pub const OP_QUERY_ALL: &str = "query_all";
pub const OP_QUERY_COUNT: &str = "query_count";
pub const OP_CREATE_TABLE: &str = "create_table";
pub const OP_DROP_TABLE: &str = "drop_table";
