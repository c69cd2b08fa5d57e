use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

use super::API_PREFIX;

fn base_join(base: &str, path: &str) -> String {
    let b = base.trim_end_matches('/');
    let p = path.trim_start_matches('/');
    format!("{}/{}", b, p)
}

fn enc(s: &str) -> String {
    utf8_percent_encode(s, NON_ALPHANUMERIC).to_string()
}

/// Command endpoint for a plugin: `POST {base}/api/plugin/{plugin_id}`.
pub fn plugin_command(base: &str, plugin_id: &str) -> String {
    base_join(base, &format!("{}/plugin/{}", API_PREFIX, enc(plugin_id)))
}

/// Push-message stream carrying the host's event bus.
pub fn push_stream(base: &str) -> String {
    base_join(base, &format!("{}/push", API_PREFIX))
}
