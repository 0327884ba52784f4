use url::Url;

use crate::settings_schema::DiscordBranch;

const DISCORD_ROOT_DOMAIN: &str = "discord.com";

pub(crate) fn discord_app_url(branch: DiscordBranch) -> Result<Url, String> {
    let raw = format!("https://{}{}/app", branch.host_prefix(), DISCORD_ROOT_DOMAIN);
    Url::parse(&raw).map_err(|error| format!("Invalid Discord URL {raw}: {error}"))
}

pub(crate) fn is_same_origin(left: &Url, right: &Url) -> bool {
    left.scheme() == right.scheme()
        && left.host_str() == right.host_str()
        && left.port_or_known_default() == right.port_or_known_default()
}

// The bridge is only exposed to the Discord origin the window was opened on.
pub(crate) fn should_inject_desktop_bridge(app_url: &Url, page_url: &Url) -> bool {
    is_same_origin(app_url, page_url)
}

fn is_discord_host(host: &str) -> bool {
    host == DISCORD_ROOT_DOMAIN || host.ends_with(".discord.com")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NavigationDecision {
    Allow,
    OpenExternally,
    Block,
}

pub(crate) fn decide_navigation(target: &Url) -> NavigationDecision {
    // Local pages (splash) are served from tauri://localhost or http(s)://tauri.localhost.
    if target.host_str() == Some("tauri.localhost") {
        return NavigationDecision::Allow;
    }

    match target.scheme() {
        "https" if target.host_str().is_some_and(is_discord_host) => NavigationDecision::Allow,
        "http" | "https" | "mailto" => NavigationDecision::OpenExternally,
        "tauri" | "about" | "data" | "blob" => NavigationDecision::Allow,
        _ => NavigationDecision::Block,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(raw: &str) -> Url {
        Url::parse(raw).expect("valid url")
    }

    #[test]
    fn discord_app_url_maps_every_branch() {
        assert_eq!(
            discord_app_url(DiscordBranch::Stable).expect("url").as_str(),
            "https://discord.com/app"
        );
        assert_eq!(
            discord_app_url(DiscordBranch::Canary).expect("url").as_str(),
            "https://canary.discord.com/app"
        );
        assert_eq!(
            discord_app_url(DiscordBranch::Ptb).expect("url").as_str(),
            "https://ptb.discord.com/app"
        );
    }

    #[test]
    fn bridge_is_injected_only_on_matching_origin() {
        let app_url = url("https://canary.discord.com/app");
        assert!(should_inject_desktop_bridge(
            &app_url,
            &url("https://canary.discord.com/channels/@me")
        ));
        assert!(!should_inject_desktop_bridge(
            &app_url,
            &url("https://discord.com/app")
        ));
        assert!(!should_inject_desktop_bridge(
            &app_url,
            &url("http://canary.discord.com/app")
        ));
    }

    #[test]
    fn navigation_keeps_discord_inside_and_sends_other_sites_out() {
        assert_eq!(
            decide_navigation(&url("https://ptb.discord.com/login")),
            NavigationDecision::Allow
        );
        assert_eq!(
            decide_navigation(&url("https://github.com/")),
            NavigationDecision::OpenExternally
        );
        assert_eq!(
            decide_navigation(&url("https://notdiscord.com/")),
            NavigationDecision::OpenExternally
        );
        assert_eq!(
            decide_navigation(&url("file:///etc/passwd")),
            NavigationDecision::Block
        );
        assert_eq!(
            decide_navigation(&url("http://tauri.localhost/splash.html")),
            NavigationDecision::Allow
        );
    }
}
