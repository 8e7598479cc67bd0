// src/services/listings.rs

//! Listing extraction service.
//!
//! Fetches the listings page and pulls one `Listing` out of every item that
//! carries an id attribute.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{Listing, ListingSelectors};
use crate::services::ListingSource;
use crate::utils::{clean_text, http};

/// Service for scraping listings from the configured page.
pub struct ListingCrawler {
    client: Client,
    url: String,
    selectors: ListingSelectors,
}

impl ListingCrawler {
    /// Create a new listing crawler for the given page.
    pub fn new(client: Client, url: impl Into<String>, selectors: ListingSelectors) -> Self {
        Self {
            client,
            url: url.into(),
            selectors,
        }
    }

    async fn fetch_page(&self) -> Result<Vec<Listing>> {
        let html = http::fetch_text(&self.client, &self.url).await?;
        let listings = parse_listings(&html, &self.selectors)?;
        log::info!("Fetched {} listings from {}", listings.len(), self.url);
        Ok(listings)
    }
}

#[async_trait]
impl ListingSource for ListingCrawler {
    async fn fetch_listings(&self) -> Result<Vec<Listing>> {
        self.fetch_page().await.map_err(AppError::fetch)
    }
}

/// Selectors compiled once per page.
struct CompiledSelectors<'a> {
    item: Selector,
    title: Selector,
    price: Selector,
    span: Selector,
    config: &'a ListingSelectors,
}

impl<'a> CompiledSelectors<'a> {
    fn new(config: &'a ListingSelectors) -> Result<Self> {
        Ok(Self {
            item: parse_selector(&config.item_selector)?,
            title: parse_selector(&config.title_selector)?,
            price: parse_selector(&config.price_selector)?,
            span: parse_selector("span")?,
            config,
        })
    }
}

/// Extract listings from a page in document order.
///
/// Items without the id attribute are skipped. Duplicate ids are kept.
pub fn parse_listings(html: &str, selectors: &ListingSelectors) -> Result<Vec<Listing>> {
    let compiled = CompiledSelectors::new(selectors)?;
    let document = Html::parse_document(html);

    let listings = document
        .select(&compiled.item)
        .filter_map(|item| parse_item(&item, &compiled))
        .collect();

    Ok(listings)
}

fn parse_item(item: &ElementRef, selectors: &CompiledSelectors) -> Option<Listing> {
    let id = item.value().attr(&selectors.config.id_attr)?;

    let title = item
        .select(&selectors.title)
        .map(|el| clean_text(&element_text(&el)))
        .collect::<Vec<_>>()
        .join(" ");

    let price = item
        .select(&selectors.price)
        .next()
        .and_then(|el| child_elements(el).next())
        .map(|el| clean_text(&element_text(&el)))
        .unwrap_or_default();

    let layout = labelled_value(item, selectors, &selectors.config.layout_label);
    let size = labelled_value(item, selectors, &selectors.config.size_label);

    Some(Listing {
        id: id.to_string(),
        title,
        price,
        layout,
        size,
    })
}

/// Find the span containing `label` and return the text of the last element
/// next to it, or an empty string when the label is absent.
fn labelled_value(item: &ElementRef, selectors: &CompiledSelectors, label: &str) -> String {
    item.select(&selectors.span)
        .filter(|span| element_text(span).contains(label))
        .last()
        .and_then(|span| span.parent())
        .and_then(ElementRef::wrap)
        .and_then(|parent| child_elements(parent).last())
        .map(|value| clean_text(&element_text(&value)))
        .unwrap_or_default()
}

fn child_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    el.children().filter_map(ElementRef::wrap)
}

fn element_text(el: &ElementRef) -> String {
    el.text().collect()
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
<html><body>
<ul>
  <li class="list-group-item" data-id="1001">
    <span class="prop-title-link">
      メゾン桜
    </span>
    <span class="prop-title-link">　201号室　</span>
    <div class="price"><strong>
      6.5万円
    </strong><small>管理費 3000円</small></div>
    <div class="spec"><span>間取り</span><span>	1K
    </span></div>
    <div class="spec"><span>専有面積</span><span>20.5㎡</span></div>
  </li>
  <li class="list-group-item">
    <span class="prop-title-link">Advertisement</span>
  </li>
  <li class="list-group-item" data-id="1002">
    <span class="prop-title-link">Casa Verde</span>
  </li>
</ul>
</body></html>
"#;

    #[test]
    fn test_parse_full_item() {
        let listings = parse_listings(PAGE, &ListingSelectors::default()).unwrap();
        assert_eq!(listings.len(), 2);

        let first = &listings[0];
        assert_eq!(first.id, "1001");
        assert_eq!(first.title, "メゾン桜 201号室");
        assert_eq!(first.price, "6.5万円");
        assert_eq!(first.layout, "1K");
        assert_eq!(first.size, "20.5㎡");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let listings = parse_listings(PAGE, &ListingSelectors::default()).unwrap();

        let second = &listings[1];
        assert_eq!(second.id, "1002");
        assert_eq!(second.title, "Casa Verde");
        assert_eq!(second.price, "");
        assert_eq!(second.layout, "");
        assert_eq!(second.size, "");
    }

    #[test]
    fn test_items_without_id_are_skipped() {
        let listings = parse_listings(PAGE, &ListingSelectors::default()).unwrap();
        assert!(listings.iter().all(|l| l.title != "Advertisement"));
    }

    #[test]
    fn test_duplicate_ids_are_kept_in_order() {
        let html = r#"
            <li class="list-group-item" data-id="9"><span class="prop-title-link">A</span></li>
            <li class="list-group-item" data-id="9"><span class="prop-title-link">B</span></li>
        "#;
        let listings = parse_listings(html, &ListingSelectors::default()).unwrap();
        let titles: Vec<&str> = listings.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn test_custom_selectors() {
        let html = r#"<div class="room" data-room="r1"><b class="name">Loft</b></div>"#;
        let selectors = ListingSelectors {
            item_selector: "div.room".to_string(),
            id_attr: "data-room".to_string(),
            title_selector: "b.name".to_string(),
            ..ListingSelectors::default()
        };

        let listings = parse_listings(html, &selectors).unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].id, "r1");
        assert_eq!(listings[0].title, "Loft");
    }

    #[test]
    fn test_parse_selector_invalid() {
        let selectors = ListingSelectors {
            item_selector: "[[invalid".to_string(),
            ..ListingSelectors::default()
        };
        assert!(matches!(
            parse_listings(PAGE, &selectors),
            Err(AppError::Selector { .. })
        ));
    }
}
