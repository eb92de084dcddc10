use mercado_core::error::AppError;
use mercado_core::models::{ExtractedDetail, NOT_AVAILABLE};
use mercado_core::traits::PageParser;
use scraper::{ElementRef, Html};

use crate::selectors;

/// Parses a MercadoLibre listing page into its commercial attributes.
///
/// Each field is located independently. Whatever is not found, or is found
/// but renders to empty text, becomes [`NOT_AVAILABLE`]. Parsing never fails.
#[derive(Debug, Clone, Default)]
pub struct ListingPageParser;

impl ListingPageParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse without going through the trait; infallible.
    pub fn parse_document(&self, html: &str) -> ExtractedDetail {
        let doc = Html::parse_document(html);

        ExtractedDetail {
            seller: or_na(first(&doc, &selectors::SELLER).map(stripped_text)),
            original_price: or_na(first(&doc, &selectors::ORIGINAL_PRICE).map(trimmed_text)),
            discounted_price: or_na(discounted_price(&doc)),
            discount_label: or_na(first(&doc, &selectors::DISCOUNT_LABEL).map(trimmed_text)),
            installment_plan: or_na(installment_plan(&doc)),
            interest_free_months: or_na(first(&doc, &selectors::INTEREST_FREE).map(stripped_text)),
            shipping_info: or_na(first(&doc, &selectors::SHIPPING).map(stripped_text)),
            units_sold: or_na(units_sold(&doc)),
            image_url: or_na(image_url(&doc)),
        }
    }
}

impl PageParser for ListingPageParser {
    fn parse(&self, html: &str) -> Result<ExtractedDetail, AppError> {
        Ok(self.parse_document(html))
    }
}

fn first<'a>(doc: &'a Html, selector: &scraper::Selector) -> Option<ElementRef<'a>> {
    doc.select(selector).next()
}

/// Every descendant text node trimmed, concatenated without separator.
fn stripped_text(el: ElementRef<'_>) -> String {
    el.text().map(str::trim).collect()
}

/// Full text content with outer whitespace removed.
fn trimmed_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn or_na(value: Option<String>) -> String {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// The fraction is only looked for inside the second price line.
fn discounted_price(doc: &Html) -> Option<String> {
    let container = first(doc, &selectors::PRICE_SECOND_LINE)?;
    container
        .select(&selectors::PRICE_FRACTION)
        .next()
        .map(trimmed_text)
}

fn installment_plan(doc: &Html) -> Option<String> {
    let text = stripped_text(first(doc, &selectors::PAYMENT)?);
    let caps = selectors::INSTALLMENTS.captures(&text)?;
    let qualifier = caps.get(3).map_or("", |m| m.as_str());
    let plan = format!("{}x {} {}", &caps[1], &caps[2], qualifier);
    Some(plan.trim_end().to_string())
}

fn units_sold(doc: &Html) -> Option<String> {
    let text: String = first(doc, &selectors::SUBTITLE)?.text().collect();
    let caps = selectors::UNITS_SOLD.captures(&text)?;
    Some(caps[1].to_string())
}

fn image_url(doc: &Html) -> Option<String> {
    first(doc, &selectors::GALLERY_IMAGE)?
        .value()
        .attr(selectors::IMAGE_SRC_ATTR)
        .map(str::to_string)
}
