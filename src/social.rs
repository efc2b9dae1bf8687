// ABOUTME: Social link normalization: turns pasted profile URLs into stored handles
// ABOUTME: Validates the host per platform and extracts the handle from the URL path

use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub platform: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocialLinkError {
    InvalidDomain(String),
    MissingHandle,
    InvalidUrl,
}

impl std::fmt::Display for SocialLinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SocialLinkError::InvalidDomain(platform) => {
                write!(f, "Please enter a valid {} URL", platform)
            }
            SocialLinkError::MissingHandle => write!(f, "Please enter a valid profile URL"),
            SocialLinkError::InvalidUrl => write!(f, "Please enter a valid URL"),
        }
    }
}

fn platform_domains(platform: &str) -> Option<&'static [&'static str]> {
    match platform {
        "twitter" => Some(&["twitter.com", "x.com"]),
        "instagram" => Some(&["instagram.com"]),
        "linkedin" => Some(&["linkedin.com"]),
        "github" => Some(&["github.com"]),
        "youtube" => Some(&["youtube.com"]),
        _ => None,
    }
}

fn has_scheme(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Normalize a single link value for `platform`. Empty input is returned unchanged,
/// as is a bare handle (no scheme, no path) on any platform but `website`, so
/// saved values survive being submitted again.
pub fn normalize_link(platform: &str, input: &str) -> Result<String, SocialLinkError> {
    if input.trim().is_empty() {
        return Ok(input.to_string());
    }

    if platform != "website" && !has_scheme(input) && !input.contains('/') {
        return Ok(input.to_string());
    }

    let url = if has_scheme(input) {
        Url::parse(input)
    } else {
        Url::parse(&format!("https://{}", input))
    }
    .map_err(|_| SocialLinkError::InvalidUrl)?;

    if platform != "website" {
        if let Some(domains) = platform_domains(platform) {
            let host = url.host_str().unwrap_or_default();
            let valid = domains
                .iter()
                .any(|domain| host == *domain || host == format!("www.{}", domain));
            if !valid {
                return Err(SocialLinkError::InvalidDomain(platform.to_string()));
            }
        }
    }

    if platform == "website" {
        let full = url.to_string();
        let stripped = full
            .strip_prefix("https://")
            .or_else(|| full.strip_prefix("http://"))
            .unwrap_or(&full);
        return Ok(stripped.to_string());
    }

    let parts: Vec<&str> = url
        .path()
        .split('/')
        .filter(|part| !part.is_empty())
        .collect();

    match parts.as_slice() {
        ["in", handle, ..] if platform == "linkedin" => Ok(handle.to_string()),
        [handle, ..] => Ok(handle.to_string()),
        [] => Err(SocialLinkError::MissingHandle),
    }
}

/// Normalize every link and drop the ones left empty.
pub fn normalize_links(links: &[SocialLink]) -> Result<Vec<SocialLink>, SocialLinkError> {
    links
        .iter()
        .filter(|link| !link.value.trim().is_empty())
        .map(|link| {
            Ok(SocialLink {
                platform: link.platform.clone(),
                value: normalize_link(&link.platform, link.value.trim())?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twitter_and_x_hosts() {
        assert_eq!(
            normalize_link("twitter", "https://twitter.com/jack").unwrap(),
            "jack"
        );
        assert_eq!(normalize_link("twitter", "x.com/jack/status/1").unwrap(), "jack");
        assert_eq!(
            normalize_link("twitter", "www.x.com/jack").unwrap(),
            "jack"
        );
    }

    #[test]
    fn test_wrong_domain_rejected() {
        let err = normalize_link("instagram", "https://twitter.com/jack").unwrap_err();
        assert_eq!(err, SocialLinkError::InvalidDomain("instagram".to_string()));
        assert_eq!(err.to_string(), "Please enter a valid instagram URL");
    }

    #[test]
    fn test_linkedin_in_prefix() {
        assert_eq!(
            normalize_link("linkedin", "linkedin.com/in/ada-lovelace").unwrap(),
            "ada-lovelace"
        );
        assert_eq!(
            normalize_link("linkedin", "linkedin.com/company").unwrap(),
            "company"
        );
    }

    #[test]
    fn test_website_keeps_full_url_without_scheme() {
        assert_eq!(
            normalize_link("website", "http://example.com/about").unwrap(),
            "example.com/about"
        );
        assert_eq!(normalize_link("website", "example.com").unwrap(), "example.com/");
    }

    #[test]
    fn test_bare_handles_kept() {
        assert_eq!(normalize_link("twitter", "alice").unwrap(), "alice");
        assert_eq!(normalize_link("instagram", "alice.smith").unwrap(), "alice.smith");
        assert_eq!(normalize_link("linkedin", "ada-lovelace").unwrap(), "ada-lovelace");
    }

    #[test]
    fn test_normalizing_twice_is_stable() {
        let inputs = [
            ("twitter", "https://x.com/jack"),
            ("linkedin", "linkedin.com/in/ada-lovelace"),
            ("website", "http://example.com/about"),
            ("website", "example.com"),
            ("tiktok", "tiktok.com/@dancer"),
        ];
        for (platform, input) in inputs {
            let once = normalize_link(platform, input).unwrap();
            assert_eq!(normalize_link(platform, &once).unwrap(), once);
        }
    }

    #[test]
    fn test_missing_handle() {
        assert_eq!(
            normalize_link("github", "https://github.com/"),
            Err(SocialLinkError::MissingHandle)
        );
    }

    #[test]
    fn test_unparseable_url() {
        assert_eq!(
            normalize_link("github", "http://"),
            Err(SocialLinkError::InvalidUrl)
        );
    }

    #[test]
    fn test_unknown_platform_takes_first_segment() {
        assert_eq!(
            normalize_link("tiktok", "tiktok.com/@dancer").unwrap(),
            "@dancer"
        );
    }

    #[test]
    fn test_normalize_links_drops_empty_values() {
        let links = vec![
            SocialLink {
                platform: "twitter".to_string(),
                value: "  ".to_string(),
            },
            SocialLink {
                platform: "github".to_string(),
                value: "github.com/rust-lang".to_string(),
            },
        ];
        let normalized = normalize_links(&links).unwrap();
        assert_eq!(
            normalized,
            vec![SocialLink {
                platform: "github".to_string(),
                value: "rust-lang".to_string(),
            }]
        );
    }
}
