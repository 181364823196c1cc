//! Wire types for the Identity Toolkit and Firestore REST APIs.
//!
//! Adapters decode into these DTOs first, then map into domain types in one
//! pass.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{GroceryItem, ItemDraft, ItemId, ItemPatch, parse_quantity};

/// Body of `accounts:signInWithPassword` and `accounts:signUp`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PasswordRequestDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
    pub(super) return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PasswordResponseDto {
    pub(super) id_token: String,
    #[serde(default)]
    pub(super) email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorEnvelopeDto {
    pub(super) error: ErrorDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorDto {
    #[serde(default)]
    pub(super) message: String,
    #[serde(default)]
    pub(super) status: Option<String>,
}

impl ErrorDto {
    /// Leading error code; Identity Toolkit appends detail after ` : `.
    pub(super) fn code(&self) -> &str {
        self.message
            .split_once(" : ")
            .map_or(self.message.as_str(), |(code, _)| code)
            .trim()
    }
}

/// Firestore typed value. Only the variants grocery documents use are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ValueDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) string_value: Option<String>,
    /// Firestore encodes 64-bit integers as JSON strings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) integer_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) double_value: Option<f64>,
}

impl ValueDto {
    fn string(value: &str) -> Self {
        Self {
            string_value: Some(value.to_owned()),
            ..Self::default()
        }
    }

    fn integer(value: u32) -> Self {
        Self {
            integer_value: Some(value.to_string()),
            ..Self::default()
        }
    }

    fn as_quantity(&self) -> Option<u32> {
        if let Some(text) = &self.integer_value {
            return parse_quantity(text);
        }
        // Whole doubles print without a fractional part.
        self.double_value
            .and_then(|value| parse_quantity(&value.to_string()))
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DocumentDto {
    #[serde(default, skip_serializing)]
    pub(super) name: String,
    #[serde(default)]
    pub(super) fields: BTreeMap<String, ValueDto>,
}

impl DocumentDto {
    pub(super) fn from_draft(draft: &ItemDraft) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert("name".to_owned(), ValueDto::string(&draft.name));
        fields.insert("quantity".to_owned(), ValueDto::integer(draft.quantity));
        Self {
            name: String::new(),
            fields,
        }
    }

    /// Fields present in the patch, paired with the update mask listing them.
    pub(super) fn from_patch(patch: &ItemPatch) -> (Self, Vec<&'static str>) {
        let mut fields = BTreeMap::new();
        let mut mask = Vec::new();
        if let Some(name) = &patch.name {
            fields.insert("name".to_owned(), ValueDto::string(name));
            mask.push("name");
        }
        if let Some(quantity) = patch.quantity {
            fields.insert("quantity".to_owned(), ValueDto::integer(quantity));
            mask.push("quantity");
        }
        (
            Self {
                name: String::new(),
                fields,
            },
            mask,
        )
    }

    /// Last path segment of the document resource name.
    pub(super) fn id(&self) -> Result<ItemId, String> {
        let segment = self.name.rsplit('/').next().unwrap_or_default();
        ItemId::new(segment).map_err(|err| format!("document `{}`: {err}", self.name))
    }

    pub(super) fn into_item(self) -> Result<GroceryItem, String> {
        let id = self.id()?;
        let name = self
            .fields
            .get("name")
            .and_then(|value| value.string_value.clone())
            .ok_or_else(|| format!("document {id} has no string `name` field"))?;
        let quantity = self
            .fields
            .get("quantity")
            .and_then(ValueDto::as_quantity)
            .ok_or_else(|| format!("document {id} has no non-negative integer `quantity`"))?;
        Ok(GroceryItem { id, name, quantity })
    }
}

/// Body of `documents:runQuery`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RunQueryRequestDto<'a> {
    pub(super) structured_query: StructuredQueryDto<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StructuredQueryDto<'a> {
    pub(super) from: [CollectionSelectorDto<'a>; 1],
    pub(super) order_by: [OrderDto<'a>; 1],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CollectionSelectorDto<'a> {
    pub(super) collection_id: &'a str,
}

#[derive(Serialize)]
pub(super) struct OrderDto<'a> {
    pub(super) field: FieldReferenceDto<'a>,
    pub(super) direction: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct FieldReferenceDto<'a> {
    pub(super) field_path: &'a str,
}

impl<'a> RunQueryRequestDto<'a> {
    pub(super) fn ordered_ascending(collection_id: &'a str, field_path: &'a str) -> Self {
        Self {
            structured_query: StructuredQueryDto {
                from: [CollectionSelectorDto { collection_id }],
                order_by: [OrderDto {
                    field: FieldReferenceDto { field_path },
                    direction: "ASCENDING",
                }],
            },
        }
    }
}

/// One element of the `runQuery` response array. Elements without a
/// document carry only progress metadata.
#[derive(Debug, Deserialize)]
pub(super) struct RunQueryResponseDto {
    #[serde(default)]
    pub(super) document: Option<DocumentDto>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn document(fields: serde_json::Value) -> DocumentDto {
        serde_json::from_value(json!({
            "name": "projects/demo/databases/(default)/documents/groceries/AbC123",
            "fields": fields,
        }))
        .expect("document decodes")
    }

    #[rstest]
    #[case("EMAIL_NOT_FOUND", "EMAIL_NOT_FOUND")]
    #[case(
        "WEAK_PASSWORD : Password should be at least 6 characters",
        "WEAK_PASSWORD"
    )]
    fn error_codes_drop_trailing_detail(#[case] message: &str, #[case] expected: &str) {
        let error = ErrorDto {
            message: message.to_owned(),
            status: None,
        };
        assert_eq!(error.code(), expected);
    }

    #[test]
    fn drafts_encode_typed_fields() {
        let encoded = serde_json::to_value(DocumentDto::from_draft(&ItemDraft::new("Milk", 2)))
            .expect("encodes");
        assert_eq!(
            encoded,
            json!({
                "fields": {
                    "name": { "stringValue": "Milk" },
                    "quantity": { "integerValue": "2" }
                }
            })
        );
    }

    #[test]
    fn patches_list_only_present_fields_in_the_mask() {
        let (body, mask) = DocumentDto::from_patch(&ItemPatch {
            name: None,
            quantity: Some(5),
        });
        assert_eq!(mask, vec!["quantity"]);
        assert_eq!(body.fields.len(), 1);
    }

    #[rstest]
    #[case(json!({ "integerValue": "3" }), Some(3))]
    #[case(json!({ "doubleValue": 4.0 }), Some(4))]
    #[case(json!({ "doubleValue": 1.5 }), None)]
    #[case(json!({ "integerValue": "-2" }), None)]
    #[case(json!({ "stringValue": "3" }), None)]
    fn quantities_decode_from_numeric_values(
        #[case] value: serde_json::Value,
        #[case] expected: Option<u32>,
    ) {
        let value: ValueDto = serde_json::from_value(value).expect("value decodes");
        assert_eq!(value.as_quantity(), expected);
    }

    #[test]
    fn documents_map_to_grocery_items() {
        let item = document(json!({
            "name": { "stringValue": "Milk" },
            "quantity": { "integerValue": "2" }
        }))
        .into_item()
        .expect("item");
        assert_eq!(item.id.as_str(), "AbC123");
        assert_eq!(item.name, "Milk");
        assert_eq!(item.quantity, 2);
    }

    #[test]
    fn documents_without_a_name_are_rejected() {
        let error = document(json!({ "quantity": { "integerValue": "2" } }))
            .into_item()
            .expect_err("missing name");
        assert!(error.contains("name"));
    }

    #[test]
    fn run_query_orders_by_the_requested_field() {
        let body = serde_json::to_value(RunQueryRequestDto::ordered_ascending("groceries", "name"))
            .expect("encodes");
        assert_eq!(
            body,
            json!({
                "structuredQuery": {
                    "from": [{ "collectionId": "groceries" }],
                    "orderBy": [{ "field": { "fieldPath": "name" }, "direction": "ASCENDING" }]
                }
            })
        );
    }
}
