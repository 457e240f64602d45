//! Order draft and category types.

use std::fmt;

use rust_decimal::Decimal;
use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::Date;

/// Stock quantity assumed when a draft does not state one.
pub const DEFAULT_STOCK_QUANTITY: i32 = 1;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Catalogue category of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Fiction,
    NonFiction,
    Technical,
    Children,
    Science,
    History,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 6] = [
        Category::Fiction,
        Category::NonFiction,
        Category::Technical,
        Category::Children,
        Category::Science,
        Category::History,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fiction => "Fiction",
            Self::NonFiction => "NonFiction",
            Self::Technical => "Technical",
            Self::Children => "Children",
            Self::Science => "Science",
            Self::History => "History",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A category exactly as submitted.
///
/// Unrecognised names are kept rather than failing deserialization so the
/// category rule can report them alongside every other violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmittedCategory {
    Known(Category),
    Unknown(String),
}

impl SubmittedCategory {
    pub fn from_name(name: &str) -> Self {
        match Category::parse(name) {
            Some(category) => Self::Known(category),
            None => Self::Unknown(name.to_string()),
        }
    }

    pub fn known(&self) -> Option<Category> {
        match self {
            Self::Known(category) => Some(*category),
            Self::Unknown(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(category) => category.as_str(),
            Self::Unknown(name) => name,
        }
    }
}

impl From<Category> for SubmittedCategory {
    fn from(category: Category) -> Self {
        Self::Known(category)
    }
}

impl Serialize for SubmittedCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SubmittedCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SubmittedCategoryVisitor)
    }
}

/// Accepts any JSON value. Names and in-range ordinals (declaration order)
/// become `Known`; everything else is kept as `Unknown` with its textual form.
struct SubmittedCategoryVisitor;

impl SubmittedCategoryVisitor {
    fn ordinal(value: i128) -> SubmittedCategory {
        usize::try_from(value)
            .ok()
            .and_then(|i| Category::ALL.get(i).copied())
            .map(SubmittedCategory::Known)
            .unwrap_or_else(|| SubmittedCategory::Unknown(value.to_string()))
    }
}

impl<'de> Visitor<'de> for SubmittedCategoryVisitor {
    type Value = SubmittedCategory;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a category name or ordinal")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(SubmittedCategory::from_name(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Self::ordinal(i128::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Self::ordinal(i128::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(SubmittedCategory::Unknown(v.to_string()))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(SubmittedCategory::Unknown(v.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(SubmittedCategory::Unknown(String::new()))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        self.visit_unit()
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(SubmittedCategory::Unknown("[array]".to_string()))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(SubmittedCategory::Unknown("{object}".to_string()))
    }
}

// ---------------------------------------------------------------------------
// Draft
// ---------------------------------------------------------------------------

/// An order-creation request awaiting validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub category: SubmittedCategory,
    pub price: Decimal,
    pub published_date: Date,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    #[serde(default = "default_stock_quantity")]
    pub stock_quantity: i32,
}

fn default_stock_quantity() -> i32 {
    DEFAULT_STOCK_QUANTITY
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn category_parse_is_case_insensitive() {
        assert_eq!(Category::parse("technical"), Some(Category::Technical));
        assert_eq!(Category::parse(" NonFiction "), Some(Category::NonFiction));
        assert_eq!(Category::parse("Poetry"), None);
    }

    #[test]
    fn unknown_category_is_preserved() {
        let submitted: SubmittedCategory = serde_json::from_value(json!("Poetry")).unwrap();
        assert_eq!(submitted, SubmittedCategory::Unknown("Poetry".to_string()));
        assert_eq!(submitted.known(), None);
        assert_eq!(serde_json::to_value(&submitted).unwrap(), json!("Poetry"));
    }

    #[test]
    fn numeric_category_maps_by_declaration_order() {
        let known: SubmittedCategory = serde_json::from_value(json!(2)).unwrap();
        assert_eq!(known, SubmittedCategory::Known(Category::Technical));

        let out_of_range: SubmittedCategory = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(out_of_range, SubmittedCategory::Unknown("42".to_string()));

        let negative: SubmittedCategory = serde_json::from_value(json!(-1)).unwrap();
        assert_eq!(negative.known(), None);
    }

    #[test]
    fn non_string_category_does_not_fail_the_draft() {
        for value in [json!(true), json!(null), json!(1.5), json!(["Fiction"]), json!({"name": "Fiction"})] {
            let draft: OrderDraft = serde_json::from_value(json!({
                "title": "Dune",
                "author": "Frank Herbert",
                "isbn": "0306406152",
                "category": value,
                "price": "12.50",
                "published_date": "1965-08-01"
            }))
            .unwrap();
            assert_eq!(draft.category.known(), None);
        }
    }

    #[test]
    fn draft_defaults_stock_quantity() {
        let draft: OrderDraft = serde_json::from_value(json!({
            "title": "Dune",
            "author": "Frank Herbert",
            "isbn": "0306406152",
            "category": "Fiction",
            "price": "12.50",
            "published_date": "1965-08-01"
        }))
        .unwrap();
        assert_eq!(draft.stock_quantity, DEFAULT_STOCK_QUANTITY);
        assert_eq!(draft.category.known(), Some(Category::Fiction));
        assert!(draft.cover_image_url.is_none());
    }
}
