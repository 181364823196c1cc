//! Grocery list data model.
//!
//! The authoritative collection lives in the item store. These types describe
//! what the store hands out ([`GroceryItem`], [`Snapshot`]) and what screens
//! send back ([`ItemDraft`], [`ItemPatch`]).

use std::fmt;

use thiserror::Error;

/// Name of the store collection holding grocery documents.
pub const GROCERIES_COLLECTION: &str = "groceries";

/// Store-assigned document identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(String);

/// Validation errors returned when constructing [`ItemId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemIdValidationError {
    /// Identifier is empty.
    #[error("item id must not be empty")]
    Empty,
    /// Identifier contains a path separator or surrounding whitespace.
    #[error("item id must be a single trimmed path segment")]
    Malformed,
}

impl ItemId {
    /// Validate an identifier received from the store.
    ///
    /// # Examples
    /// ```
    /// use grocery_app::domain::ItemId;
    ///
    /// let id = ItemId::new("Xk2p9QmA1b").expect("valid id");
    /// assert_eq!(id.as_str(), "Xk2p9QmA1b");
    /// assert!(ItemId::new("a/b").is_err());
    /// ```
    pub fn new(value: impl Into<String>) -> Result<Self, ItemIdValidationError> {
        let raw = value.into();
        if raw.is_empty() {
            return Err(ItemIdValidationError::Empty);
        }
        if raw.trim() != raw || raw.contains('/') {
            return Err(ItemIdValidationError::Malformed);
        }
        Ok(Self(raw))
    }

    /// Borrow the identifier.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// A grocery document as delivered by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroceryItem {
    /// Store-assigned document id.
    pub id: ItemId,
    /// Display name; the list is ordered on it.
    pub name: String,
    /// Units to buy.
    pub quantity: u32,
}

/// Field values for an insert, or a full replacement on update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    /// Display name.
    pub name: String,
    /// Units to buy.
    pub quantity: u32,
}

impl ItemDraft {
    /// Build a draft from already-parsed values.
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }
}

/// Partial update keyed by id; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement quantity.
    pub quantity: Option<u32>,
}

impl ItemPatch {
    /// Whether the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.quantity.is_none()
    }

    /// Apply the patch to existing field values.
    pub fn apply_to(&self, draft: &mut ItemDraft) {
        if let Some(name) = &self.name {
            draft.name.clone_from(name);
        }
        if let Some(quantity) = self.quantity {
            draft.quantity = quantity;
        }
    }
}

impl From<ItemDraft> for ItemPatch {
    fn from(value: ItemDraft) -> Self {
        Self {
            name: Some(value.name),
            quantity: Some(value.quantity),
        }
    }
}

/// Ordering requested when subscribing to the collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ItemOrder {
    /// Ascending by `name`; ties broken by id.
    #[default]
    NameAscending,
}

impl ItemOrder {
    /// Document field the ordering is keyed on.
    pub const fn field(self) -> &'static str {
        match self {
            Self::NameAscending => "name",
        }
    }

    /// Sort items in place the way the store orders query results.
    ///
    /// Only store adapters call this; screens never reorder snapshots.
    pub fn sort(self, items: &mut [GroceryItem]) {
        match self {
            Self::NameAscending => items.sort_by(|left, right| {
                left.name
                    .as_bytes()
                    .cmp(right.name.as_bytes())
                    .then_with(|| left.id.cmp(&right.id))
            }),
        }
    }
}

/// Full, ordered result set delivered by one subscription notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot(Vec<GroceryItem>);

impl Snapshot {
    /// Wrap items already ordered by the store.
    pub fn new(items: Vec<GroceryItem>) -> Self {
        Self(items)
    }

    /// Borrow the ordered items.
    pub fn items(&self) -> &[GroceryItem] {
        &self.0
    }

    /// Take ownership of the ordered items.
    pub fn into_items(self) -> Vec<GroceryItem> {
        self.0
    }

    /// Number of items in the snapshot.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the snapshot holds no items.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Parse the quantity text field.
///
/// Surrounding whitespace is ignored; anything that is not a non-negative
/// integer in `u32` range yields `None`.
///
/// # Examples
/// ```
/// use grocery_app::domain::parse_quantity;
///
/// assert_eq!(parse_quantity(" 2 "), Some(2));
/// assert_eq!(parse_quantity("two"), None);
/// assert_eq!(parse_quantity("-1"), None);
/// ```
pub fn parse_quantity(text: &str) -> Option<u32> {
    text.trim().parse::<u32>().ok()
}
