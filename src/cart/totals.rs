//! Client-side cart totals
//!
//! Only guest carts are priced here; for signed-in users the backend's
//! numbers are authoritative and this module is bypassed entirely.

use rust_decimal::Decimal;
use rusty_money::{iso, Money};

use super::types::{Cart, CartItem};
use crate::config::ClientOptions;

/// Recompute the aggregate fields of a cart from its items
///
/// Pure function of the item list and the pricing options: subtotal is the
/// sum of price times quantity, tax is a flat rate on the subtotal, shipping
/// is a flat fee waived above the free-shipping threshold, and the discount
/// slot stays zero until a coupon is applied server-side.
pub fn calculate_totals(items: Vec<CartItem>, options: &ClientOptions) -> Cart {
    let subtotal: Decimal = items
        .iter()
        .map(|item| item.price * Decimal::from(item.quantity))
        .sum();

    let tax_amount = subtotal * options.tax_rate;
    let shipping_amount = if subtotal >= options.free_shipping_threshold {
        Decimal::ZERO
    } else {
        options.flat_shipping_fee
    };
    let discount_amount = Decimal::ZERO;
    let total_amount = subtotal + tax_amount + shipping_amount - discount_amount;

    let total_items = items.iter().map(|item| item.quantity).sum();

    Cart {
        items,
        total_items,
        subtotal,
        tax_amount,
        shipping_amount,
        discount_amount,
        total_amount,
    }
}

/// Format an amount as Vietnamese dong for display
pub fn format_amount(amount: Decimal) -> String {
    Money::from_decimal(amount, iso::VND).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product_id: i64, quantity: u32, price: i64) -> CartItem {
        CartItem {
            id: product_id,
            user_id: 0,
            product_id,
            product: None,
            quantity,
            price: Decimal::from(price),
            size: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn empty_cart_has_flat_shipping_only() {
        let cart = calculate_totals(Vec::new(), &ClientOptions::default());
        assert_eq!(cart.total_items, 0);
        assert_eq!(cart.subtotal, Decimal::ZERO);
        assert_eq!(cart.tax_amount, Decimal::ZERO);
        // Flat fee applies to any subtotal at or below the threshold
        assert_eq!(cart.shipping_amount, Decimal::from(50_000));
    }

    #[test]
    fn single_item_example() {
        let cart = calculate_totals(vec![item(7, 1, 100_000)], &ClientOptions::default());
        assert_eq!(cart.total_items, 1);
        assert_eq!(cart.subtotal, Decimal::from(100_000));
        assert_eq!(cart.tax_amount, Decimal::from(10_000));
        assert_eq!(cart.shipping_amount, Decimal::from(50_000));
        assert_eq!(cart.discount_amount, Decimal::ZERO);
        assert_eq!(cart.total_amount, Decimal::from(160_000));
    }

    #[test]
    fn totals_are_idempotent() {
        let items = vec![item(1, 2, 75_000), item(2, 1, 120_000)];
        let first = calculate_totals(items, &ClientOptions::default());
        let second = calculate_totals(first.items.clone(), &ClientOptions::default());

        assert_eq!(first.total_items, second.total_items);
        assert_eq!(first.subtotal, second.subtotal);
        assert_eq!(first.tax_amount, second.tax_amount);
        assert_eq!(first.shipping_amount, second.shipping_amount);
        assert_eq!(first.total_amount, second.total_amount);
    }

    #[test]
    fn formats_amounts_as_dong() {
        let formatted = format_amount(Decimal::from(1_250_000));
        assert!(formatted.contains("250"));
        assert!(!formatted.is_empty());
    }

    #[test]
    fn free_shipping_boundary() {
        let options = ClientOptions::default();

        // Exactly at the threshold ships free
        let at = calculate_totals(vec![item(1, 1, 1_000_000)], &options);
        assert_eq!(at.shipping_amount, Decimal::ZERO);

        let below = calculate_totals(vec![item(1, 1, 999_999)], &options);
        assert_eq!(below.shipping_amount, Decimal::from(50_000));
    }
}
