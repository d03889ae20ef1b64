/// Upper bound on rows returned by the per-user file listing
pub const USER_FILES_LIMIT: i64 = 50;

/// Path segment under the visibility prefix where uploads are stored
pub const UPLOADS_PATH: &str = "uploads";

/// Longest MIME type accepted for an upload (`user_files.file_type` column)
pub const MAX_CONTENT_TYPE_LEN: usize = 255;

// =============================================================================
// ACTIVITY LOG ACTIONS
// =============================================================================

pub const ACTION_USER_REGISTERED: &str = "USER_REGISTERED";
pub const ACTION_USER_LOGIN: &str = "USER_LOGIN";
pub const ACTION_USER_LOGOUT: &str = "USER_LOGOUT";
pub const ACTION_FILE_UPLOADED: &str = "FILE_UPLOADED";
