//! Keyword heuristics for product recommendations and tone hints
//!
//! These run client-side: the recommendation table maps a previous purchase
//! to a complementary product, and the tone scan fills in tone/explanation
//! when the analysis backend only reports text and sentiment.

use serde::{Deserialize, Serialize};

/// A suggested complementary product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub name: String,
    pub description: String,
}

/// Map a comma-separated previous-purchases list to recommendations.
///
/// The CRM writes "None" for customers without purchase history; that and
/// empty entries produce no recommendations.
pub fn recommendations_for(previous_purchases: &str) -> Vec<Recommendation> {
    previous_purchases
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty() && !p.eq_ignore_ascii_case("none"))
        .map(recommend)
        .collect()
}

fn recommend(product: &str) -> Recommendation {
    let lower = product.to_lowercase();

    let (name, description) = if lower.contains("bag") {
        (
            "Travel Pillow".to_string(),
            "Since the customer bought a Bag, a Travel Pillow could be useful for comfort.".to_string(),
        )
    } else if lower.contains("grocer") {
        (
            "Snacks & Beverages".to_string(),
            "Groceries often pair with snacks or beverages that customers may enjoy.".to_string(),
        )
    } else if lower.contains("home essentials") {
        (
            "Cleaning Supplies".to_string(),
            "Home essentials buyers might also need reliable cleaning products.".to_string(),
        )
    } else if lower.contains("kitchen") {
        (
            "Cookware Set".to_string(),
            "Kitchenware customers may also be interested in advanced cookware.".to_string(),
        )
    } else if lower.contains("laptop") {
        (
            "Laptop Bag".to_string(),
            "Since they purchased a Laptop, a protective Laptop Bag could be helpful.".to_string(),
        )
    } else if lower.contains("phone") {
        (
            "Phone Case".to_string(),
            "A Phone purchase often goes with a protective Case.".to_string(),
        )
    } else if lower.contains("tablet") {
        (
            "Tablet Stand".to_string(),
            "A Tablet Stand could improve usability for a Tablet buyer.".to_string(),
        )
    } else if lower.contains("shoes") {
        (
            "Shoe Cleaner".to_string(),
            "Customers buying Shoes may also want Shoe Cleaner or Care Kits.".to_string(),
        )
    } else {
        (
            product.to_string(),
            format!(
                "Since the customer purchased {}, this product might interest them.",
                product
            ),
        )
    };

    Recommendation { name, description }
}

/// Tone label plus a short plain explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToneHint {
    pub tone: String,
    pub explanation: String,
}

const ANGRY_MARKERS: &[&str] = &["angry", "furious", "terrible", "worst", "unacceptable"];
const UPSET_MARKERS: &[&str] = &[
    "upset",
    "disappointed",
    "issue",
    "problem",
    "refund",
    "complaint",
    "delay",
];
const FRIENDLY_MARKERS: &[&str] = &["thank", "great", "happy", "love", "awesome", "wonderful"];
const POLITE_MARKERS: &[&str] = &["please", "kindly", "appreciate", "would you"];

/// Keyword scan of a transcript. Strong negatives win over pleasantries.
pub fn tone_hint(text: &str) -> ToneHint {
    let lower = text.to_lowercase();
    let contains_any = |markers: &[&str]| markers.iter().any(|m| lower.contains(m));

    let (tone, explanation) = if contains_any(ANGRY_MARKERS) {
        ("Angry", "Strong negative wording suggests the customer is angry.")
    } else if contains_any(UPSET_MARKERS) {
        ("Upset", "The customer raises a problem or complaint.")
    } else if contains_any(FRIENDLY_MARKERS) {
        ("Friendly", "Warm, appreciative wording throughout.")
    } else if contains_any(POLITE_MARKERS) {
        ("Polite", "Courteous phrasing without strong emotion.")
    } else {
        ("Neutral", "No strong tone markers detected.")
    };

    ToneHint {
        tone: tone.to_string(),
        explanation: explanation.to_string(),
    }
}
