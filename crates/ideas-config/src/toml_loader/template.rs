//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> &'static str {
    r##"# Ideas client configuration
# Only override what you want to change -- missing fields use defaults.
# Environment variables IDEAS_ENDPOINT, IDEAS_PROJECT_ID,
# IDEAS_DATABASE_ID and IDEAS_COLLECTION_ID take precedence.

[backend]
# endpoint = "https://cloud.appwrite.io/v1"
# project_id = ""
# connect_timeout_secs = 10     # 1-60
# request_timeout_secs = 30     # 1-300

[ideas]
# database_id = ""
# collection_id = ""

[logging]
# level = "info"                # trace, debug, info, warn, error
"##
}
