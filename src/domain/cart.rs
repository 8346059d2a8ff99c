use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};

/// A monetary value in integer cents.
///
/// All cart arithmetic stays in whole cents; rendering as BRL happens only at
/// the display boundary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(pub u64);

impl Money {
    pub const ZERO: Self = Self(0);

    pub fn cents(&self) -> u64 {
        self.0
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Mul<u32> for Money {
    type Output = Self;
    fn mul(self, rhs: u32) -> Self::Output {
        Self(self.0 * u64::from(rhs))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reais = (self.0 / 100).to_string();
        let mut grouped = String::with_capacity(reais.len() + reais.len() / 3);
        for (i, ch) in reais.chars().enumerate() {
            if i > 0 && (reais.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }
        write!(f, "R$ {},{:02}", grouped, self.0 % 100)
    }
}

/// The kind of product a cart line refers to.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    Course,
    Ebook,
    Paper,
}

/// One purchasable line in the cart, keyed by product id.
///
/// Serialized camelCase: the persisted layout predates this crate and must
/// stay readable by older clients.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Money,
    pub quantity: u32,
    pub kind: ProductKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

/// A product about to enter the cart. Quantity is decided by the action, not
/// the product.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub price: Money,
    pub kind: ProductKind,
    pub thumbnail_url: Option<String>,
}

impl NewCartItem {
    fn with_quantity(self, quantity: u32) -> CartItem {
        CartItem {
            id: self.id,
            title: self.title,
            description: self.description,
            price: self.price,
            quantity,
            kind: self.kind,
            thumbnail_url: self.thumbnail_url,
        }
    }
}

/// Every mutation the cart understands.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    AddItem { item: NewCartItem, quantity: u32 },
    RemoveItem { id: String },
    UpdateQuantity { id: String, quantity: u32 },
    Clear,
    Load { items: Vec<CartItem> },
    SetOpen { open: bool },
    ToggleOpen,
}

/// The cart itself: line items in insertion order plus the drawer visibility
/// flag. Totals are derived on demand and never stored.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CartState {
    pub items: Vec<CartItem>,
    pub is_open: bool,
}

impl CartState {
    /// Applies one action and returns the next state.
    ///
    /// Item ids stay unique and present quantities stay >= 1; both hold by
    /// construction for every arm below.
    pub fn apply(mut self, action: CartAction) -> CartState {
        match action {
            CartAction::AddItem { item, quantity } => {
                let quantity = quantity.max(1);
                if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
                    // The entry already in the cart wins on metadata.
                    existing.quantity += quantity;
                } else {
                    self.items.push(item.with_quantity(quantity));
                }
                self
            }
            CartAction::RemoveItem { id } => {
                self.items.retain(|i| i.id != id);
                self
            }
            CartAction::UpdateQuantity { id, quantity } => {
                if quantity == 0 {
                    self.items.retain(|i| i.id != id);
                } else if let Some(item) = self.items.iter_mut().find(|i| i.id == id) {
                    item.quantity = quantity;
                }
                self
            }
            CartAction::Clear => {
                self.items.clear();
                self
            }
            CartAction::Load { items } => {
                self.items = items;
                self
            }
            CartAction::SetOpen { open } => {
                self.is_open = open;
                self
            }
            CartAction::ToggleOpen => {
                self.is_open = !self.is_open;
                self
            }
        }
    }

    /// Total number of units across all lines.
    pub fn count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Sum of price * quantity over all lines.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(|i| i.price * i.quantity).sum()
    }

    /// Currently equal to the subtotal; fees and discounts would land here.
    pub fn total(&self) -> Money {
        self.subtotal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(id: &str, price: u64) -> NewCartItem {
        NewCartItem {
            id: id.to_string(),
            title: format!("Course {id}"),
            description: None,
            price: Money(price),
            kind: ProductKind::Course,
            thumbnail_url: None,
        }
    }

    #[test]
    fn test_add_new_item() {
        let state = CartState::default().apply(CartAction::AddItem {
            item: course("c1", 1000),
            quantity: 2,
        });
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].quantity, 2);
    }

    #[test]
    fn test_add_existing_id_increments_quantity() {
        let mut incoming = course("c1", 9999);
        incoming.title = "Different metadata".to_string();

        let state = CartState::default()
            .apply(CartAction::AddItem {
                item: course("c1", 1000),
                quantity: 1,
            })
            .apply(CartAction::AddItem {
                item: incoming,
                quantity: 3,
            });

        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].quantity, 4);
        // The existing entry keeps its metadata.
        assert_eq!(state.items[0].price, Money(1000));
        assert_eq!(state.items[0].title, "Course c1");
    }

    #[test]
    fn test_add_zero_quantity_defaults_to_one() {
        let state = CartState::default().apply(CartAction::AddItem {
            item: course("c1", 1000),
            quantity: 0,
        });
        assert_eq!(state.items[0].quantity, 1);
    }

    #[test]
    fn test_remove_absent_id_is_noop() {
        let state = CartState::default()
            .apply(CartAction::AddItem {
                item: course("c1", 1000),
                quantity: 1,
            })
            .apply(CartAction::RemoveItem {
                id: "missing".to_string(),
            });
        assert_eq!(state.items.len(), 1);
    }

    #[test]
    fn test_update_quantity_sets_exact_value() {
        let state = CartState::default()
            .apply(CartAction::AddItem {
                item: course("c1", 1000),
                quantity: 5,
            })
            .apply(CartAction::UpdateQuantity {
                id: "c1".to_string(),
                quantity: 2,
            });
        assert_eq!(state.items[0].quantity, 2);
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let state = CartState::default()
            .apply(CartAction::AddItem {
                item: course("c1", 1000),
                quantity: 5,
            })
            .apply(CartAction::UpdateQuantity {
                id: "c1".to_string(),
                quantity: 0,
            });
        assert!(state.items.is_empty());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let state = CartState::default()
            .apply(CartAction::AddItem {
                item: course("c1", 1000),
                quantity: 1,
            })
            .apply(CartAction::Clear)
            .apply(CartAction::Clear);
        assert!(state.items.is_empty());
    }

    #[test]
    fn test_open_actions_do_not_touch_items() {
        let state = CartState::default()
            .apply(CartAction::AddItem {
                item: course("c1", 1000),
                quantity: 1,
            })
            .apply(CartAction::SetOpen { open: true })
            .apply(CartAction::ToggleOpen);
        assert!(!state.is_open);
        assert_eq!(state.items.len(), 1);
    }

    #[test]
    fn test_derived_totals() {
        let state = CartState::default()
            .apply(CartAction::AddItem {
                item: course("c1", 1000),
                quantity: 2,
            })
            .apply(CartAction::AddItem {
                item: course("c2", 500),
                quantity: 1,
            });
        assert_eq!(state.count(), 3);
        assert_eq!(state.subtotal(), Money(2500));
        assert_eq!(state.total(), Money(2500));
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money(2500).to_string(), "R$ 25,00");
        assert_eq!(Money(123_456_789).to_string(), "R$ 1.234.567,89");
        assert_eq!(Money(5).to_string(), "R$ 0,05");
    }

    #[test]
    fn test_cart_item_serde_round_trip() {
        let item = CartItem {
            id: "c1".to_string(),
            title: "Anatomy 101".to_string(),
            description: Some("Intro course".to_string()),
            price: Money(12990),
            quantity: 2,
            kind: ProductKind::Course,
            thumbnail_url: None,
        };
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"price\":12990"));
        let back: CartItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
