//! Built-in site adapters.

mod amazon;
mod blinkit;
mod flipkart;

pub use amazon::AMAZON;
pub use blinkit::BLINKIT;
pub use flipkart::FLIPKART;

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use scraper::Selector;

    use crate::SiteKey;

    #[test]
    fn test_all_selectors_compile() {
        for site in SiteKey::ALL {
            for css in site.adapter().selectors.all() {
                assert!(
                    Selector::parse(css).is_ok(),
                    "{} selector '{}' does not parse",
                    site,
                    css
                );
            }
        }
    }

    #[test]
    fn test_selector_sets_are_disjoint() {
        let mut seen = HashSet::new();
        for site in SiteKey::ALL {
            for css in site.adapter().selectors.all() {
                assert!(seen.insert(css), "selector '{}' shared by {}", css, site);
            }
        }
    }

    #[test]
    fn test_search_urls_are_site_specific() {
        let urls: HashSet<_> = SiteKey::ALL
            .iter()
            .map(|site| site.adapter().build_search_url("phone").unwrap())
            .collect();
        assert_eq!(urls.len(), SiteKey::ALL.len());
    }
}
