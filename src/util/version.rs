pub const APP_NAME: &str = "Landed Cost Calculator";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_TAG: Option<&str> = option_env!("GIT_TAG");

pub fn version_label() -> String {
    if let Some(tag) = GIT_TAG {
        tag.to_string()
    } else {
        format!("v{}", APP_VERSION)
    }
}

/// User agent sent with outbound requests.
pub fn user_agent() -> String {
    format!("landed-cost/{}", version_label().trim_start_matches(|ch: char| ch == 'v' || ch == 'V'))
}
