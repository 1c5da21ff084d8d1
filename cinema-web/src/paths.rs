//! Deployment base path handling.
///
/// `PUBLIC_URL` is read at compile time (e.g. `/tickets` when the storefront
/// is served from a subdirectory). Without it, paths are root-anchored.
const PUBLIC_URL: &str = match option_env!("PUBLIC_URL") {
    Some(base) => base,
    None => "",
};

/// URL of a static asset under the deployment base.
#[must_use]
pub fn asset_path(relative: &str) -> String {
    join_base(PUBLIC_URL, relative)
}

/// Absolute in-app href for a router path, for full-page navigations.
#[must_use]
pub fn app_href(route: &str) -> String {
    join_base(PUBLIC_URL, route)
}

/// Base path for the router, `None` when served from the root.
#[must_use]
pub fn router_base() -> Option<String> {
    trimmed_base(PUBLIC_URL)
}

fn join_base(base: &str, relative: &str) -> String {
    let rel = relative.trim_start_matches('/');
    match trimmed_base(base) {
        Some(base) => format!("{base}/{rel}"),
        None => format!("/{rel}"),
    }
}

fn trimmed_base(base: &str) -> Option<String> {
    let base = base.trim().trim_end_matches('/');
    (!base.is_empty()).then(|| base.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_paths_without_base() {
        assert_eq!(join_base("", "static/poster.png"), "/static/poster.png");
        assert_eq!(join_base("", "/login"), "/login");
        assert_eq!(trimmed_base(" / "), None);
    }

    #[test]
    fn prefixes_configured_base() {
        assert_eq!(join_base("/tickets/", "/login"), "/tickets/login");
        assert_eq!(trimmed_base("/tickets/"), Some(String::from("/tickets")));
    }

    #[test]
    fn defaults_follow_build_env() {
        if option_env!("PUBLIC_URL").is_none() {
            assert_eq!(router_base(), None);
            assert_eq!(app_href("/admin/dashboard"), "/admin/dashboard");
        }
    }
}
