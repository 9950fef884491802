//! # Cart Items
//!
//! Request-scoped cart payloads sent by the frontend. Cart items are
//! parsed leniently: a bad price becomes 0, a bad quantity becomes 1 and a
//! missing title falls back to a placeholder name.

use crate::error::{ShopError, ShopResult};
use crate::order::{Currency, LineItem};
use serde_json::Value;

/// Display name used when a cart item has no title
pub const FALLBACK_TITLE: &str = "Product";

/// A single cart entry after coercion
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub title: String,
    /// Decimal price, always finite and >= 0
    pub price: f64,
    /// Always >= 1
    pub qty: u32,
    pub image: Option<String>,
}

impl CartItem {
    /// Coerce an arbitrary JSON value into a cart item
    pub fn from_value(value: &Value) -> Self {
        Self {
            title: non_blank_str(value.get("title")).unwrap_or_else(|| FALLBACK_TITLE.to_string()),
            price: coerce_price(value.get("price")),
            qty: coerce_quantity(value.get("qty")),
            image: non_blank_str(value.get("image")),
        }
    }

    /// Convert into a payment line item priced in minor units.
    ///
    /// Fails with `Validation` when the price or the line total does not
    /// fit in minor units.
    pub fn to_line_item(&self, currency: Currency) -> ShopResult<LineItem> {
        let unit_amount = currency.to_smallest_unit(self.price).ok_or_else(|| {
            ShopError::validation(format!("Price out of range for \"{}\"", self.title))
        })?;

        let line = LineItem {
            name: self.title.clone(),
            unit_amount,
            quantity: self.qty,
            image_url: self.image.clone(),
        };
        if line.total().is_none() {
            return Err(ShopError::validation(format!(
                "Line total out of range for \"{}\"",
                self.title
            )));
        }
        Ok(line)
    }
}

/// Extract the `cartItems` array from a checkout request body.
///
/// Fails when the field is missing, is not an array, or is empty.
pub fn parse_cart(body: &Value) -> ShopResult<Vec<CartItem>> {
    let items = body
        .get("cartItems")
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
        .ok_or_else(|| ShopError::validation("cartItems must be a non-empty array"))?;

    Ok(items.iter().map(CartItem::from_value).collect())
}

fn non_blank_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn coerce_price(value: Option<&Value>) -> f64 {
    let price = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    price.filter(|p| p.is_finite() && *p >= 0.0).unwrap_or(0.0)
}

fn coerce_quantity(value: Option<&Value>) -> u32 {
    let qty = match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate))
        }
        _ => None,
    };
    qty.map(|q| q.clamp(1, i64::from(u32::MAX)) as u32)
        .unwrap_or(1)
}

fn truncate(f: f64) -> Option<i64> {
    f.is_finite().then(|| f.trunc() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_shoe_line_item() {
        let item = CartItem::from_value(&json!({"title": "Shoe", "price": 19.99, "qty": 2}));
        let line = item.to_line_item(Currency::USD).unwrap();

        assert_eq!(line.name, "Shoe");
        assert_eq!(line.quantity, 2);
        assert_eq!(line.unit_amount, 1999);
        assert_eq!(line.image_url, None);
    }

    #[test]
    fn test_missing_qty_defaults_to_one() {
        let item = CartItem::from_value(&json!({"title": "Hat", "price": 5}));
        assert_eq!(item.qty, 1);
    }

    #[test]
    fn test_missing_price_is_zero() {
        let line = CartItem::from_value(&json!({"title": "Free sample", "qty": 3}))
            .to_line_item(Currency::USD)
            .unwrap();
        assert_eq!(line.unit_amount, 0);
        assert_eq!(line.quantity, 3);
    }

    #[test]
    fn test_quantity_coercion() {
        let qty = |v: Value| CartItem::from_value(&json!({ "qty": v })).qty;

        assert_eq!(qty(json!(0)), 1);
        assert_eq!(qty(json!(-4)), 1);
        assert_eq!(qty(json!(2.9)), 2);
        assert_eq!(qty(json!("3")), 3);
        assert_eq!(qty(json!("2.5")), 2);
        assert_eq!(qty(json!("lots")), 1);
        assert_eq!(qty(json!(null)), 1);
        assert_eq!(qty(json!([4])), 1);
    }

    #[test]
    fn test_price_coercion() {
        let cents = |v: Value| {
            CartItem::from_value(&json!({ "price": v }))
                .to_line_item(Currency::USD)
                .unwrap()
                .unit_amount
        };

        assert_eq!(cents(json!("12.50")), 1250);
        assert_eq!(cents(json!(0.1)), 10);
        assert_eq!(cents(json!(-3)), 0);
        assert_eq!(cents(json!("free")), 0);
        assert_eq!(cents(json!(true)), 0);
    }

    #[test]
    fn test_out_of_range_amounts_rejected() {
        let line = |v: Value| CartItem::from_value(&v).to_line_item(Currency::USD);

        assert!(matches!(line(json!({"price": 1e300})), Err(ShopError::Validation(_))));
        assert!(matches!(
            line(json!({"price": 1e17, "qty": 1000})),
            Err(ShopError::Validation(_))
        ));
        assert!(matches!(
            line(json!({"price": 1e14, "qty": 4_000_000_000u64})),
            Err(ShopError::Validation(_))
        ));
        assert_eq!(
            line(json!({"price": 1, "qty": 4_000_000_000u64})).unwrap().total(),
            Some(400_000_000_000)
        );
    }

    #[test]
    fn test_title_and_image_fallbacks() {
        let item = CartItem::from_value(&json!({"title": "   ", "image": "https://img/1.png"}));
        assert_eq!(item.title, FALLBACK_TITLE);
        assert_eq!(item.image.as_deref(), Some("https://img/1.png"));

        let item = CartItem::from_value(&json!({"image": ""}));
        assert_eq!(item.image, None);
    }

    #[test]
    fn test_parse_cart_rejects_missing_or_empty() {
        assert!(matches!(parse_cart(&json!({})), Err(ShopError::Validation(_))));
        assert!(matches!(
            parse_cart(&json!({"cartItems": []})),
            Err(ShopError::Validation(_))
        ));
        assert!(matches!(
            parse_cart(&json!({"cartItems": {"title": "Shoe"}})),
            Err(ShopError::Validation(_))
        ));
        assert!(matches!(parse_cart(&json!(null)), Err(ShopError::Validation(_))));
    }

    #[test]
    fn test_parse_cart_keeps_order() {
        let items = parse_cart(&json!({"cartItems": [{"title": "A"}, {"title": "B"}]})).unwrap();
        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["A", "B"]);
    }
}
