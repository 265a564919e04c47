//! Site descriptors and navigation-URL construction.
//!
//! The built-in table mirrors each store's internal search endpoint plus the
//! CSS selectors for its product cards. Selector strings track live site
//! markup and are expected to go stale; treat them as sample configuration.

use serde::{Deserialize, Serialize};

/// One e-commerce site: search endpoint template and card selectors.
///
/// The runner receives these as an explicit slice, so tests can substitute
/// their own table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Display name, also used to derive the fallback host for relative links.
    pub name: String,
    /// Search URL template containing a `{query}` placeholder.
    pub search_url: String,
    /// Selector matching one product card in the results page.
    pub card_selector: String,
    /// Selector for the title element inside a card.
    pub title_selector: String,
    /// Selector for the price element inside a card.
    pub price_selector: String,
}

impl SiteConfig {
    /// Build the navigation URL for a query.
    ///
    /// Only spaces are encoded (`%20`); other characters pass through
    /// verbatim, matching what the site search endpoints accept.
    #[must_use]
    pub fn navigation_url(&self, query: &str) -> String {
        self.search_url
            .replace("{query}", &query.replace(' ', "%20"))
    }

    /// Host prefix used to absolutize relative links: `https://www.<name>.com.pe`.
    ///
    /// A heuristic, not a resolution: it produces a wrong host for any site
    /// whose domain does not follow this naming convention.
    #[must_use]
    pub fn fallback_base(&self) -> String {
        format!("https://www.{}.com.pe", self.name.to_lowercase())
    }

    /// Absolutize an extracted link: absolute URLs are kept as-is, anything
    /// else is prefixed with [`Self::fallback_base`].
    #[must_use]
    pub fn absolutize(&self, href: &str) -> String {
        if href.starts_with("http") {
            href.to_string()
        } else {
            format!("{}{}", self.fallback_base(), href)
        }
    }
}

/// The built-in site table.
#[must_use]
pub fn builtin_sites() -> Vec<SiteConfig> {
    vec![
        SiteConfig {
            name: "Sodimac".to_string(),
            search_url: "https://www.sodimac.com.pe/sodimac-pe/search?Ntt={query}".to_string(),
            card_selector: ".product-wrapper, .pod-item".to_string(),
            title_selector: ".product-title, .pod-title".to_string(),
            price_selector: ".price, .pod-price".to_string(),
        },
        SiteConfig {
            name: "Promart".to_string(),
            search_url: "https://www.promart.pe/search/?q={query}".to_string(),
            card_selector: ".product-item".to_string(),
            title_selector: ".product-name".to_string(),
            price_selector: ".best-price".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sodimac() -> SiteConfig {
        builtin_sites()
            .into_iter()
            .find(|s| s.name == "Sodimac")
            .unwrap()
    }

    #[test]
    fn navigation_url_encodes_spaces_only() {
        let url = sodimac().navigation_url("MARTILLO DE BOLA 16oz");
        assert_eq!(
            url,
            "https://www.sodimac.com.pe/sodimac-pe/search?Ntt=MARTILLO%20DE%20BOLA%2016oz"
        );
    }

    #[test]
    fn absolutize_prefixes_relative_paths() {
        let promart = builtin_sites()
            .into_iter()
            .find(|s| s.name == "Promart")
            .unwrap();
        assert_eq!(
            promart.absolutize("/p/123"),
            "https://www.promart.com.pe/p/123"
        );
    }

    #[test]
    fn absolutize_keeps_absolute_urls() {
        let link = "https://cdn.sodimac.com.pe/item/9";
        assert_eq!(sodimac().absolutize(link), link);
    }

    proptest! {
        #[test]
        fn absolutized_links_are_absolute(href in "(/[a-z0-9_-]{0,12}){0,4}") {
            let link = sodimac().absolutize(&href);
            prop_assert!(link.starts_with("http"));
            prop_assert!(url::Url::parse(&link).is_ok());
        }

        #[test]
        fn navigation_urls_contain_no_literal_space(query in "[A-Za-z0-9 ]{0,40}") {
            let url = sodimac().navigation_url(&query);
            prop_assert!(!url.contains(' '));
        }
    }
}
