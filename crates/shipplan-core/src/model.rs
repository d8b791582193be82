use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::normalize;

/// One order-to-product line for a given shipping day.
///
/// Rows arrive already joined against product, container and product-group
/// reference data. Every classification attribute is optional; a missing
/// attribute simply never matches a predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub order_id: String,
    pub product_id: String,
    #[serde(default)]
    pub product_code: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub model_name: Option<String>,
    /// Units ordered. Signed so that bad upstream rows can be detected and
    /// clamped instead of rejected.
    pub order_quantity: i64,
    /// Units per physical container. Missing or non-positive means 1.
    #[serde(default)]
    pub capacity: Option<i64>,
    #[serde(default)]
    pub container_id: Option<String>,
    #[serde(default)]
    pub container_name: Option<String>,
    #[serde(default)]
    pub product_group_id: Option<String>,
    #[serde(default)]
    pub group_code: Option<String>,
    #[serde(default)]
    pub group_name: Option<String>,
}

impl OrderLine {
    /// Quantity used in arithmetic: never negative.
    pub fn effective_quantity(&self) -> u64 {
        self.order_quantity.max(0) as u64
    }

    /// Capacity used in arithmetic: never below 1.
    pub fn effective_capacity(&self) -> u64 {
        match self.capacity {
            Some(c) if c > 0 => c as u64,
            _ => 1,
        }
    }

    /// Containers this line occupies on its own: `ceil(quantity / capacity)`.
    pub fn containers(&self) -> u64 {
        self.effective_quantity().div_ceil(self.effective_capacity())
    }

    /// Model name trimmed and uppercased, if non-empty.
    pub fn normalized_model(&self) -> Option<String> {
        self.model_name.as_deref().and_then(normalize::normalize_code)
    }

    /// Group code trimmed and uppercased, if non-empty.
    pub fn normalized_group(&self) -> Option<String> {
        self.group_code.as_deref().and_then(normalize::normalize_code)
    }

    /// Copy of this line carrying a different quantity.
    pub fn with_quantity(&self, quantity: u64) -> OrderLine {
        OrderLine {
            order_quantity: quantity as i64,
            ..self.clone()
        }
    }

    /// Best label for display: model name, then product name, then code.
    pub fn display_label(&self) -> &str {
        match self.model_name.as_deref().map(str::trim) {
            Some(m) if !m.is_empty() => m,
            _ if !self.product_name.is_empty() => &self.product_name,
            _ => &self.product_code,
        }
    }
}

/// The upstream envelope: every order line for one customer on one day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentDay {
    pub date: NaiveDate,
    #[serde(default)]
    pub customer: Option<String>,
    pub lines: Vec<OrderLine>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::OrderLine;

    /// A bare line with only identity, quantity and capacity set.
    pub fn line(order_id: &str, quantity: i64, capacity: Option<i64>) -> OrderLine {
        OrderLine {
            order_id: order_id.into(),
            product_id: format!("p-{order_id}"),
            product_code: format!("CODE-{order_id}"),
            product_name: String::new(),
            model_name: None,
            order_quantity: quantity,
            capacity,
            container_id: None,
            container_name: None,
            product_group_id: None,
            group_code: None,
            group_name: None,
        }
    }

    pub fn with_container(mut l: OrderLine, name: &str) -> OrderLine {
        l.container_name = Some(name.into());
        l
    }

    pub fn with_model(mut l: OrderLine, model: &str) -> OrderLine {
        l.model_name = Some(model.into());
        l
    }

    pub fn with_group(mut l: OrderLine, group: &str) -> OrderLine {
        l.group_code = Some(group.into());
        l
    }
}
