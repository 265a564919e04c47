//! Card extraction over captured page content.
//!
//! Pure functions from an HTML string to product hits, so extraction is
//! testable without a browser. Selection happens in document order; the card
//! cap applies before per-card filtering.

use scraper::{ElementRef, Html, Selector};

use super::types::{PRICE_FALLBACK, ProductHit};
use crate::error::SiteError;
use crate::sites::SiteConfig;

/// Extract up to `max` product cards from rendered HTML.
///
/// Per card: a missing title element drops the card entirely; a missing or
/// empty price yields the `"N/A"` sentinel; a missing anchor falls back to
/// the navigation URL itself. Extracted links are absolutized via the site's
/// fallback host.
pub fn extract_cards(
    html: &str,
    site: &SiteConfig,
    nav_url: &str,
    max: usize,
) -> Result<Vec<ProductHit>, SiteError> {
    let card_sel = parse_selector(&site.card_selector)?;
    let title_sel = parse_selector(&site.title_selector)?;
    let price_sel = parse_selector(&site.price_selector)?;
    let anchor_sel = parse_selector("a")?;

    let document = Html::parse_document(html);
    let mut hits = Vec::new();

    for card in document.select(&card_sel).take(max) {
        let Some(title_el) = card.select(&title_sel).next() else {
            // No title, no record. Not worth a log line.
            continue;
        };

        let price = card
            .select(&price_sel)
            .next()
            .map(element_text)
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| PRICE_FALLBACK.to_string());

        let link = match card
            .select(&anchor_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
        {
            Some(href) => site.absolutize(href),
            None => nav_url.to_string(),
        };

        hits.push(ProductHit {
            source: site.name.clone(),
            title: element_text(title_el),
            price,
            link,
        });
    }

    Ok(hits)
}

fn parse_selector(raw: &str) -> Result<Selector, SiteError> {
    Selector::parse(raw).map_err(|_| SiteError::InvalidSelector {
        selector: raw.to_string(),
    })
}

/// Collect an element's text with whitespace collapsed, the way the sites'
/// padded markup needs it.
fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sites::builtin_sites;

    const NAV_URL: &str = "https://www.promart.pe/search/?q=MARTILLO";

    fn promart() -> SiteConfig {
        builtin_sites()
            .into_iter()
            .find(|s| s.name == "Promart")
            .unwrap()
    }

    fn card(title: Option<&str>, price: Option<&str>, href: Option<&str>) -> String {
        let mut body = String::from("<div class=\"product-item\">");
        if let Some(t) = title {
            body.push_str(&format!("<span class=\"product-name\">{t}</span>"));
        }
        if let Some(p) = price {
            body.push_str(&format!("<span class=\"best-price\">{p}</span>"));
        }
        if let Some(h) = href {
            body.push_str(&format!("<a href=\"{h}\">ver</a>"));
        }
        body.push_str("</div>");
        body
    }

    #[test]
    fn extracts_title_price_and_link() {
        let html = card(Some("Martillo de bola 16oz"), Some("S/ 39.90"), Some("/p/123"));
        let hits = extract_cards(&html, &promart(), NAV_URL, 3).unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].source, "Promart");
        assert_eq!(hits[0].title, "Martillo de bola 16oz");
        assert_eq!(hits[0].price, "S/ 39.90");
        assert_eq!(hits[0].link, "https://www.promart.com.pe/p/123");
    }

    #[test]
    fn missing_price_becomes_sentinel() {
        let html = card(Some("Martillo"), None, Some("/p/1"));
        let hits = extract_cards(&html, &promart(), NAV_URL, 3).unwrap();
        assert_eq!(hits[0].price, "N/A");
    }

    #[test]
    fn missing_anchor_falls_back_to_navigation_url() {
        let html = card(Some("Martillo"), Some("S/ 10"), None);
        let hits = extract_cards(&html, &promart(), NAV_URL, 3).unwrap();
        assert_eq!(hits[0].link, NAV_URL);
    }

    #[test]
    fn card_without_title_is_dropped() {
        let html = format!(
            "{}{}{}",
            card(Some("Primero"), Some("S/ 1"), Some("/p/1")),
            card(None, Some("S/ 2"), Some("/p/2")),
            card(Some("Tercero"), Some("S/ 3"), Some("/p/3")),
        );
        let hits = extract_cards(&html, &promart(), NAV_URL, 3).unwrap();

        let titles: Vec<_> = hits.iter().map(|h| h.title.as_str()).collect();
        assert_eq!(titles, ["Primero", "Tercero"]);
    }

    #[test]
    fn cap_applies_to_cards_in_document_order() {
        let html: String = (1..=5)
            .map(|i| card(Some(&format!("Item {i}")), Some("S/ 9"), Some("/p/x")))
            .collect();
        let hits = extract_cards(&html, &promart(), NAV_URL, 3).unwrap();

        let titles: Vec<_> = hits.iter().map(|h| h.title.as_str()).collect();
        assert_eq!(titles, ["Item 1", "Item 2", "Item 3"]);
    }

    #[test]
    fn absolute_links_pass_through() {
        let html = card(Some("Martillo"), Some("S/ 10"), Some("https://example.com/p/9"));
        let hits = extract_cards(&html, &promart(), NAV_URL, 3).unwrap();
        assert_eq!(hits[0].link, "https://example.com/p/9");
    }

    #[test]
    fn whitespace_heavy_markup_is_collapsed() {
        let html = card(Some("  Martillo\n   de   bola  "), Some(" S/\n 39.90 "), None);
        let hits = extract_cards(&html, &promart(), NAV_URL, 3).unwrap();
        assert_eq!(hits[0].title, "Martillo de bola");
        assert_eq!(hits[0].price, "S/ 39.90");
    }

    #[test]
    fn bad_selector_is_reported() {
        let mut site = promart();
        site.card_selector = ":::".to_string();
        let err = extract_cards("<div></div>", &site, NAV_URL, 3).unwrap_err();
        assert!(matches!(err, SiteError::InvalidSelector { .. }));
    }
}
