//! Link validation.

use url::{Host, Url};

/// Predicate deciding whether the sheet's input may be confirmed.
pub type Validator = fn(&str) -> bool;

/// Default [`Validator`]: an absolute link with a plausible host.
///
/// Accepts `scheme://host...` where the host is `localhost`, an IP
/// address, or a domain with at least one dot. Whitespace anywhere makes
/// the input invalid, as does the empty string.
pub fn is_url(input: &str) -> bool {
    if input.is_empty() || input.chars().any(char::is_whitespace) || !input.contains("//") {
        return false;
    }

    let Ok(url) = Url::parse(input) else {
        return false;
    };

    match url.host() {
        Some(Host::Domain(domain)) => {
            domain.eq_ignore_ascii_case("localhost")
                || domain
                    .split_once('.')
                    .is_some_and(|(name, rest)| !name.is_empty() && rest.len() >= 2)
        }
        Some(Host::Ipv4(_) | Host::Ipv6(_)) => true,
        None => false,
    }
}
