use serde::{Deserialize, Serialize};

use robodepot_core::{DomainError, DomainResult, Entity, EntityKind, ItemId};

use crate::money::Money;

/// A stocked inventory line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    id: ItemId,
    name: String,
    category: String,
    quantity: u32,
    reorder_threshold: u32,
    unit_value: Money,
}

impl InventoryItem {
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        category: impl Into<String>,
        quantity: u32,
        reorder_threshold: u32,
        unit_value: Money,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category: category.into(),
            quantity,
            reorder_threshold,
            unit_value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn reorder_threshold(&self) -> u32 {
        self.reorder_threshold
    }

    pub fn unit_value(&self) -> Money {
        self.unit_value
    }

    /// Strictly below the reorder threshold.
    pub fn is_low_stock(&self) -> bool {
        self.quantity < self.reorder_threshold
    }

    /// Stock value: quantity × unit value.
    pub fn total_value(&self) -> Money {
        self.unit_value.times(self.quantity)
    }

    /// Apply already-validated changes. Returns whether anything differed.
    pub fn apply(&mut self, changes: &ItemChanges) -> bool {
        let before = self.clone();

        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(category) = &changes.category {
            self.category = category.clone();
        }
        if let Some(quantity) = changes.quantity {
            self.quantity = quantity;
        }
        if let Some(threshold) = changes.reorder_threshold {
            self.reorder_threshold = threshold;
        }
        if let Some(value) = changes.unit_value {
            self.unit_value = value;
        }

        *self != before
    }
}

impl Entity for InventoryItem {
    type Id = ItemId;
    const KIND: EntityKind = EntityKind::Item;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Partial update of an inventory item (unvalidated).
///
/// Counts are signed so a negative form value reaches validation instead of
/// failing somewhere upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<i64>,
    pub reorder_threshold: Option<i64>,
    pub unit_value: Option<f64>,
}

impl ItemPatch {
    pub fn quantity(quantity: i64) -> Self {
        Self {
            quantity: Some(quantity),
            ..Self::default()
        }
    }

    /// Validate every field before anything is merged.
    pub fn validate(self) -> DomainResult<ItemChanges> {
        Ok(ItemChanges {
            name: non_blank("name", self.name)?,
            category: non_blank("category", self.category)?,
            quantity: self.quantity.map(|q| count("quantity", q)).transpose()?,
            reorder_threshold: self
                .reorder_threshold
                .map(|t| count("reorder threshold", t))
                .transpose()?,
            unit_value: self.unit_value.map(Money::from_decimal).transpose()?,
        })
    }
}

fn non_blank(field: &str, value: Option<String>) -> DomainResult<Option<String>> {
    match value {
        Some(v) if v.trim().is_empty() => Err(DomainError::validation(format!("{field} cannot be empty"))),
        Some(v) => Ok(Some(v.trim().to_string())),
        None => Ok(None),
    }
}

fn count(field: &str, value: i64) -> DomainResult<u32> {
    if value < 0 {
        return Err(DomainError::validation(format!("{field} cannot be negative, got {value}")));
    }
    u32::try_from(value).map_err(|_| DomainError::validation(format!("{field} is too large: {value}")))
}

/// A validated `ItemPatch`; only this can be applied to an `InventoryItem`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemChanges {
    name: Option<String>,
    category: Option<String>,
    quantity: Option<u32>,
    reorder_threshold: Option<u32>,
    unit_value: Option<Money>,
}

impl ItemChanges {
    /// Names of the fields this change touches, in declaration order.
    pub fn fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name.is_some() {
            fields.push("name");
        }
        if self.category.is_some() {
            fields.push("category");
        }
        if self.quantity.is_some() {
            fields.push("quantity");
        }
        if self.reorder_threshold.is_some() {
            fields.push("reorderThreshold");
        }
        if self.unit_value.is_some() {
            fields.push("unitValue");
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn item(quantity: u32, threshold: u32) -> InventoryItem {
        InventoryItem::new(
            ItemId::new("I1").unwrap(),
            "Pallet wrap",
            "Packaging",
            quantity,
            threshold,
            Money::from_cents(1250),
        )
    }

    #[test]
    fn low_stock_is_strictly_below_threshold() {
        assert!(item(5, 10).is_low_stock());
        assert!(!item(10, 10).is_low_stock());
        assert!(!item(12, 10).is_low_stock());
    }

    #[test]
    fn quantity_patch_touches_only_quantity() {
        let mut i = item(5, 10);
        let before = i.clone();

        let changed = i.apply(&ItemPatch::quantity(12).validate().unwrap());

        assert!(changed);
        assert_eq!(i.quantity(), 12);
        assert_eq!(i.name(), before.name());
        assert_eq!(i.category(), before.category());
        assert_eq!(i.reorder_threshold(), before.reorder_threshold());
        assert_eq!(i.unit_value(), before.unit_value());
    }

    #[test]
    fn invalid_field_rejects_the_whole_patch() {
        let patch = ItemPatch {
            name: Some("Shrink wrap".to_string()),
            quantity: Some(-3),
            ..ItemPatch::default()
        };
        assert!(matches!(patch.validate(), Err(DomainError::Validation(_))));

        let too_big = ItemPatch::quantity(i64::from(u32::MAX) + 1);
        assert!(too_big.validate().is_err());

        let bad_value = ItemPatch {
            unit_value: Some(-1.0),
            ..ItemPatch::default()
        };
        assert!(bad_value.validate().is_err());
    }

    #[test]
    fn changes_list_touched_fields() {
        let changes = ItemPatch {
            quantity: Some(1),
            unit_value: Some(2.0),
            ..ItemPatch::default()
        }
        .validate()
        .unwrap();
        assert_eq!(changes.fields(), vec!["quantity", "unitValue"]);
    }

    #[test]
    fn deserializes_front_end_shape() {
        let json = r#"{"id":"I1","name":"Pallet wrap","category":"Packaging","quantity":5,"reorderThreshold":10,"unitValue":12.5}"#;
        let i: InventoryItem = serde_json::from_str(json).unwrap();
        assert_eq!(i, item(5, 10));
        assert_eq!(i.total_value(), Money::from_cents(6250));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: low stock iff quantity < threshold.
        #[test]
        fn low_stock_matches_definition(q in 0u32..1_000, t in 0u32..1_000) {
            prop_assert_eq!(item(q, t).is_low_stock(), q < t);
        }

        /// Property: a quantity patch never changes any other field.
        #[test]
        fn quantity_patch_preserves_other_fields(start in 0u32..1_000, q in 0i64..1_000) {
            let mut i = item(start, 10);
            let before = i.clone();
            i.apply(&ItemPatch::quantity(q).validate().unwrap());
            prop_assert_eq!(i.quantity() as i64, q);
            prop_assert_eq!(i.name(), before.name());
            prop_assert_eq!(i.category(), before.category());
            prop_assert_eq!(i.reorder_threshold(), before.reorder_threshold());
            prop_assert_eq!(i.unit_value(), before.unit_value());
        }
    }
}
