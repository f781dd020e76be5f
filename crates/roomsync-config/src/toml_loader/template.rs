//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# roomsync configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[session]
# debounce_ms = 150          # 10-5000, quiet time before an edit is published
# min_room_code_len = 4      # 1-64
# announce_on_join = true    # greet newcomers with our presence and, if we wrote it, the buffer

[palette]
# colors = ["#e06c75", "#61afef", "#98c379", "#e5c07b", "#c678dd", "#56b6c2", "#d19a66", "#be5046"]

[relay]
url = "ws://127.0.0.1:8080"  # empty = local-only editing
# connect_timeout_secs = 15      # 1-120
# reconnect_delay_secs = 1       # 1-60
# max_reconnect_delay_secs = 30  # 1-600, >= reconnect_delay_secs

[logging]
# level = "info"             # trace, debug, info, warn, error
"##
    .to_string()
}
