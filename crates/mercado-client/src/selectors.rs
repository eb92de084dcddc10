//! Structural locators and text patterns for MercadoLibre listing pages.
//!
//! Update this file when the listing markup changes; each locator maps to
//! exactly one field of `ExtractedDetail`.

use std::sync::LazyLock;

use regex::Regex;
use scraper::Selector;

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css:?}: {e}"))
}

pub static SELLER: LazyLock<Selector> =
    LazyLock::new(|| selector("div.ui-pdp-seller__header__title"));

/// Strikethrough price shown before the discount.
pub static ORIGINAL_PRICE: LazyLock<Selector> = LazyLock::new(|| {
    selector(
        "s.andes-money-amount.ui-pdp-price__part.ui-pdp-price__original-value\
         .andes-money-amount--previous.andes-money-amount--cents-superscript\
         .andes-money-amount--compact",
    )
});

/// Container of the current price line; the fraction is looked up inside it.
pub static PRICE_SECOND_LINE: LazyLock<Selector> =
    LazyLock::new(|| selector("div.ui-pdp-price__second-line"));

pub static PRICE_FRACTION: LazyLock<Selector> =
    LazyLock::new(|| selector("span.andes-money-amount__fraction"));

pub static DISCOUNT_LABEL: LazyLock<Selector> =
    LazyLock::new(|| selector("span.ui-pdp-price__second-line__label"));

pub static PAYMENT: LazyLock<Selector> = LazyLock::new(|| selector("div.ui-pdp-payment"));

pub static INTEREST_FREE: LazyLock<Selector> =
    LazyLock::new(|| selector("span.ui-pdp-color--GREEN"));

pub static SHIPPING: LazyLock<Selector> = LazyLock::new(|| {
    selector("p.ui-pdp-color--BLACK.ui-pdp-family--REGULAR.ui-pdp-media__title")
});

/// Condition and sales subtitle, e.g. "Nuevo | +100 vendidos".
pub static SUBTITLE: LazyLock<Selector> = LazyLock::new(|| selector("span.ui-pdp-subtitle"));

pub static GALLERY_IMAGE: LazyLock<Selector> =
    LazyLock::new(|| selector("img.ui-pdp-image.ui-pdp-gallery__figure__image"));

pub const IMAGE_SRC_ATTR: &str = "src";

/// `<count>x <amount> [sin interés|con interés]`.
/// Groups: 1 = installment count, 2 = amount with currency sign, 3 = optional qualifier.
pub static INSTALLMENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)x\s*(\$[\d,.]+)\s*(sin interés|con interés)?")
        .unwrap_or_else(|e| panic!("invalid installments pattern: {e}"))
});

/// `<count> vendido(s)`. Group 1 = count.
pub static UNITS_SOLD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s+vendidos?").unwrap_or_else(|e| panic!("invalid units pattern: {e}"))
});
