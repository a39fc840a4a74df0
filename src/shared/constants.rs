/// Multipart field carrying the uploaded file
pub const FILE_FIELD_NAME: &str = "file";

/// Returned when the upload has no `file` part
pub const NO_FILE_PART_MESSAGE: &str = "No file part in the request";

/// Returned when the `file` part has an empty filename
pub const NO_SELECTED_FILE_MESSAGE: &str = "No selected file";

/// Returned when the upload body is larger than `MAX_REQUEST_BODY_SIZE`
pub const UPLOAD_TOO_LARGE_MESSAGE: &str = "Upload exceeds the maximum request body size";

/// Media type of every download body; the gateway does not infer content types
pub const DOWNLOAD_MIME_TYPE: &str = "application/octet-stream";
