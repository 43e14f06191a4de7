//! Draft normalization.
//!
//! Pure transformation from the service's raw draft into a validated
//! [`DraftOrder`]. No side effects: the same input always maps to the same
//! validated order or the same [`ValidationError`].

use vorder_core::types::{DraftOrder, LineItem, RawDraft, TransactionType};

use crate::error::{InvalidItem, ItemFault, ValidationError};

/// Validate and shape a raw draft into a [`DraftOrder`].
///
/// Fails with [`ValidationError::EmptyTranscript`] if the transcript is
/// absent or blank, [`ValidationError::NoItemsDetected`] if the draft has no
/// items, and [`ValidationError::InvalidLineItems`] listing *every* offending
/// item otherwise. The order total is always computed from the items; a
/// server-supplied total is ignored.
pub fn normalize(transcript: Option<&str>, raw: &RawDraft) -> Result<DraftOrder, ValidationError> {
    let transcript = match transcript {
        Some(t) if !t.trim().is_empty() => t,
        _ => return Err(ValidationError::EmptyTranscript),
    };

    let raw_items = match raw.items.as_deref() {
        Some(items) if !items.is_empty() => items,
        _ => return Err(ValidationError::NoItemsDetected),
    };

    let mut items = Vec::with_capacity(raw_items.len());
    let mut invalid = Vec::new();

    for (index, raw_item) in raw_items.iter().enumerate() {
        let mut faults = Vec::new();

        match raw_item.product_id {
            None => faults.push(ItemFault::MissingProductId),
            Some(id) if id <= 0 => faults.push(ItemFault::NonPositiveProductId),
            Some(_) => {}
        }

        let name = raw_item.name.as_deref().map(str::trim).unwrap_or("");
        if name.is_empty() {
            faults.push(ItemFault::EmptyName);
        }

        let quantity = raw_item.quantity.unwrap_or(0);
        if quantity <= 0 {
            faults.push(ItemFault::NonPositiveQuantity);
        } else if u32::try_from(quantity).is_err() {
            faults.push(ItemFault::QuantityOutOfRange);
        }

        let unit_price = raw_item.unit_price.unwrap_or(0.0);
        if unit_price <= 0.0 {
            faults.push(ItemFault::NonPositivePrice);
        }

        if faults.is_empty() {
            items.push(LineItem {
                product_id: raw_item.product_id.unwrap_or_default(),
                name: name.to_string(),
                // Range-checked above.
                quantity: u32::try_from(quantity).unwrap_or(u32::MAX),
                unit_price,
            });
        } else {
            invalid.push(InvalidItem {
                index,
                name: raw_item.name.clone(),
                faults,
            });
        }
    }

    // Collect every invalid item before failing so the caller can explain
    // precisely what went wrong.
    if !invalid.is_empty() {
        tracing::debug!(invalid_items = invalid.len(), "Draft failed validation");
        return Err(ValidationError::InvalidLineItems(invalid));
    }

    let transaction_type = raw
        .transaction_type
        .as_deref()
        .and_then(|t| t.parse::<TransactionType>().ok())
        .unwrap_or_default();

    let mut order = DraftOrder {
        umkm_id: raw.umkm_id.unwrap_or(0),
        transaction_type,
        supplier_id: raw.supplier_id,
        items,
        transcript: transcript.to_string(),
        total: 0.0,
    };
    order.recompute_total();

    tracing::debug!(
        items = order.items.len(),
        total = order.total,
        "Draft normalized"
    );
    Ok(order)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use vorder_core::types::RawLineItem;

    fn raw_item(id: i64, name: &str, qty: i64, price: f64) -> RawLineItem {
        RawLineItem {
            product_id: Some(id),
            name: Some(name.to_string()),
            quantity: Some(qty),
            unit_price: Some(price),
        }
    }

    fn raw_with_items(items: Vec<RawLineItem>) -> RawDraft {
        RawDraft {
            umkm_id: Some(1),
            transaction_type: Some("sale".to_string()),
            supplier_id: None,
            transcript: None,
            items: Some(items),
            total: None,
        }
    }

    #[test]
    fn test_scenario_a_single_item_draft() {
        let raw = raw_with_items(vec![raw_item(1, "Rice", 2, 10000.0)]);
        let order = normalize(Some("two rice"), &raw).unwrap();

        assert_eq!(order.umkm_id, 1);
        assert_eq!(order.transaction_type, TransactionType::Sale);
        assert_eq!(order.transcript, "two rice");
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].name, "Rice");
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(order.total, 20000.0);
    }

    #[test]
    fn test_scenario_b_empty_items_rejected() {
        let raw = raw_with_items(vec![]);
        let result = normalize(Some("two rice"), &raw);
        assert_eq!(result, Err(ValidationError::NoItemsDetected));
    }

    #[test]
    fn test_missing_items_rejected() {
        let raw = RawDraft::default();
        let result = normalize(Some("two rice"), &raw);
        assert_eq!(result, Err(ValidationError::NoItemsDetected));
    }

    #[test]
    fn test_absent_transcript_rejected() {
        let raw = raw_with_items(vec![raw_item(1, "Rice", 2, 10000.0)]);
        assert_eq!(normalize(None, &raw), Err(ValidationError::EmptyTranscript));
    }

    #[test]
    fn test_blank_transcript_rejected() {
        let raw = raw_with_items(vec![raw_item(1, "Rice", 2, 10000.0)]);
        assert_eq!(
            normalize(Some("   \t\n"), &raw),
            Err(ValidationError::EmptyTranscript)
        );
    }

    #[test]
    fn test_transcript_checked_before_items() {
        let raw = raw_with_items(vec![]);
        assert_eq!(normalize(Some(""), &raw), Err(ValidationError::EmptyTranscript));
    }

    #[test]
    fn test_server_total_is_ignored() {
        let mut raw = raw_with_items(vec![raw_item(1, "Rice", 2, 10000.0)]);
        raw.total = Some(999999.0);
        let order = normalize(Some("two rice"), &raw).unwrap();
        assert_eq!(order.total, 20000.0);
    }

    #[test]
    fn test_collects_all_invalid_items() {
        let raw = raw_with_items(vec![
            raw_item(1, "Rice", 2, 10000.0), // valid
            RawLineItem {
                product_id: None,
                name: Some("Sugar".to_string()),
                quantity: Some(0),
                unit_price: Some(5000.0),
            },
            RawLineItem {
                product_id: Some(-3),
                name: Some("".to_string()),
                quantity: Some(1),
                unit_price: Some(0.0),
            },
        ]);

        match normalize(Some("an order"), &raw) {
            Err(ValidationError::InvalidLineItems(invalid)) => {
                assert_eq!(invalid.len(), 2);

                assert_eq!(invalid[0].index, 1);
                assert_eq!(
                    invalid[0].faults,
                    vec![ItemFault::MissingProductId, ItemFault::NonPositiveQuantity]
                );

                assert_eq!(invalid[1].index, 2);
                assert_eq!(
                    invalid[1].faults,
                    vec![
                        ItemFault::NonPositiveProductId,
                        ItemFault::EmptyName,
                        ItemFault::NonPositivePrice
                    ]
                );
            }
            other => panic!("Expected InvalidLineItems, got {:?}", other),
        }
    }

    #[test]
    fn test_oversized_quantity_rejected_not_truncated() {
        let raw = raw_with_items(vec![raw_item(1, "Rice", u32::MAX as i64 + 2, 10000.0)]);
        match normalize(Some("a lot of rice"), &raw) {
            Err(ValidationError::InvalidLineItems(invalid)) => {
                assert_eq!(invalid.len(), 1);
                assert_eq!(invalid[0].faults, vec![ItemFault::QuantityOutOfRange]);
            }
            other => panic!("Expected InvalidLineItems, got {:?}", other),
        }

        // The largest representable quantity is still accepted.
        let raw = raw_with_items(vec![raw_item(1, "Rice", u32::MAX as i64, 1.0)]);
        let order = normalize(Some("a lot of rice"), &raw).unwrap();
        assert_eq!(order.items[0].quantity, u32::MAX);
    }

    #[test]
    fn test_duplicate_product_ids_kept_as_separate_entries() {
        let raw = raw_with_items(vec![
            raw_item(1, "Rice", 2, 10000.0),
            raw_item(1, "Rice", 1, 10000.0),
        ]);
        let order = normalize(Some("rice twice"), &raw).unwrap();
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.total, 30000.0);
    }

    #[test]
    fn test_purchase_draft_keeps_supplier() {
        let mut raw = raw_with_items(vec![raw_item(4, "Flour", 10, 8000.0)]);
        raw.transaction_type = Some("purchase".to_string());
        raw.supplier_id = Some(7);

        let order = normalize(Some("ten flour from supplier seven"), &raw).unwrap();
        assert_eq!(order.transaction_type, TransactionType::Purchase);
        assert_eq!(order.supplier_id, Some(7));
    }

    #[test]
    fn test_unknown_transaction_type_defaults_to_sale() {
        let mut raw = raw_with_items(vec![raw_item(1, "Rice", 1, 10000.0)]);
        raw.transaction_type = Some("barter".to_string());
        let order = normalize(Some("one rice"), &raw).unwrap();
        assert_eq!(order.transaction_type, TransactionType::Sale);
    }

    #[test]
    fn test_item_name_is_trimmed() {
        let raw = raw_with_items(vec![raw_item(1, "  Rice  ", 1, 10000.0)]);
        let order = normalize(Some("one rice"), &raw).unwrap();
        assert_eq!(order.items[0].name, "Rice");
    }

    #[test]
    fn test_normalize_is_idempotent_on_valid_output() {
        let raw = raw_with_items(vec![
            raw_item(1, "Rice", 2, 10000.0),
            raw_item(2, "Sugar", 1, 5000.0),
        ]);
        let first = normalize(Some("two rice one sugar"), &raw).unwrap();

        // Re-normalize the normalized order's own fields.
        let again = RawDraft {
            umkm_id: Some(first.umkm_id),
            transaction_type: Some(first.transaction_type.to_string()),
            supplier_id: first.supplier_id,
            transcript: Some(first.transcript.clone()),
            items: Some(
                first
                    .items
                    .iter()
                    .map(|i| RawLineItem {
                        product_id: Some(i.product_id),
                        name: Some(i.name.clone()),
                        quantity: Some(i.quantity as i64),
                        unit_price: Some(i.unit_price),
                    })
                    .collect(),
            ),
            total: Some(first.total),
        };
        let second = normalize(Some(&first.transcript), &again).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_same_input_same_output() {
        let raw = raw_with_items(vec![raw_item(1, "Rice", 2, 10000.0)]);
        let a = normalize(Some("two rice"), &raw);
        let b = normalize(Some("two rice"), &raw);
        assert_eq!(a, b);
    }
}
