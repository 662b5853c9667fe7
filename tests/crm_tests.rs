// Tests for the CRM customer record shapes.

use call_sense::{recommendations_for, Customer};

#[test]
fn test_customer_deserializes_sheet_columns() {
    let json = r#"{
        "Name": "Riya Sharma",
        "Email": "riyasharma12@email.com",
        "Phone": "+916123456789",
        "Product": "Electronics",
        "Invoice": "INV1012",
        "Date of Purchase": "2025-11-03",
        "Call Feedback": "Interested in EMI option",
        "Sentiment": "Neutral",
        "PreviousPurchases": "Laptop, Shoes"
    }"#;

    let customer: Customer = serde_json::from_str(json).unwrap();
    assert_eq!(customer.name.as_deref(), Some("Riya Sharma"));
    assert_eq!(customer.feedback.as_deref(), Some("Interested in EMI option"));
    assert_eq!(customer.previous_purchases.as_deref(), Some("Laptop, Shoes"));
}

#[test]
fn test_customer_accepts_spaced_purchases_column() {
    // Some exports keep the original "Previous Purchases" header
    let json = r#"{"Name": "Aarav Patel", "Previous Purchases": "Groceries"}"#;

    let customer: Customer = serde_json::from_str(json).unwrap();
    assert_eq!(customer.previous_purchases.as_deref(), Some("Groceries"));
    assert_eq!(customer.phone, None);
}

#[test]
fn test_customer_serializes_without_empty_fields() {
    let customer = Customer {
        name: Some("Meera Nair".to_string()),
        email: Some("meeranair7@email.com".to_string()),
        phone: None,
        product: None,
        invoice: None,
        purchase_date: None,
        feedback: None,
        sentiment: None,
        previous_purchases: None,
    };

    let json = serde_json::to_value(&customer).unwrap();
    assert_eq!(json["Name"], "Meera Nair");
    assert!(json.get("Phone").is_none(), "None fields are skipped");
}

#[test]
fn test_recommendations_from_customer_profile() {
    let json = r#"{"Name": "Isha Gupta", "PreviousPurchases": "Kitchenware, Phone"}"#;
    let customer: Customer = serde_json::from_str(json).unwrap();

    let recos = recommendations_for(customer.previous_purchases.as_deref().unwrap_or(""));
    assert_eq!(recos.len(), 2);
    assert_eq!(recos[0].name, "Cookware Set");
    assert_eq!(recos[1].name, "Phone Case");
}
