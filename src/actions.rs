//! Window-action descriptors: instructions telling a client which view or
//! record to open next.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// `type` of every descriptor built here
pub const WINDOW_ACTION: &str = "ir.actions.act_window";

pub const REPAIR_ORDER_MODEL: &str = "repair.order";
pub const MRP_PRODUCTION_MODEL: &str = "mrp.production";

/// Where the client should open the view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ActionTarget {
    /// Replace the current view
    Current,
    /// Modal dialog
    New,
}

/// One `[field, operator, value]` filter clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainTerm(pub String, pub String, pub Value);

impl DomainTerm {
    pub fn new(field: impl Into<String>, operator: impl Into<String>, value: Value) -> Self {
        Self(field.into(), operator.into(), value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ActionDescriptor {
    #[serde(rename = "type")]
    #[schema(example = "ir.actions.act_window")]
    pub action_type: String,
    pub name: String,
    #[schema(example = "repair.order")]
    pub res_model: String,
    #[schema(example = "form")]
    pub view_mode: String,
    pub target: ActionTarget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub res_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[schema(value_type = Object)]
    pub domain: Vec<DomainTerm>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    #[schema(value_type = Object)]
    pub context: BTreeMap<String, Value>,
}

impl ActionDescriptor {
    fn window(res_model: &str, name: &str, view_mode: &str, target: ActionTarget) -> Self {
        Self {
            action_type: WINDOW_ACTION.to_string(),
            name: name.to_string(),
            res_model: res_model.to_string(),
            view_mode: view_mode.to_string(),
            target,
            res_id: None,
            domain: Vec::new(),
            context: BTreeMap::new(),
        }
    }

    /// Creation form shown as a modal; prefill it with [`with_default`](Self::with_default)
    pub fn create_form(res_model: &str, name: &str) -> Self {
        Self::window(res_model, name, "form", ActionTarget::New)
    }

    /// Opens `ids`: a single record goes straight to its form, anything else
    /// becomes a list filtered on those ids.
    pub fn open_records(res_model: &str, name: &str, ids: &[i32]) -> Self {
        match ids {
            [id] => {
                let mut action = Self::window(res_model, name, "form", ActionTarget::Current);
                action.res_id = Some(*id);
                action
            }
            _ => {
                let mut action = Self::window(res_model, name, "tree,form", ActionTarget::Current);
                action.domain = vec![DomainTerm::new("id", "in", json!(ids))];
                action
            }
        }
    }

    /// Adds a `default_<field>` context entry
    pub fn with_default(mut self, field: &str, value: Value) -> Self {
        self.context.insert(format!("default_{}", field), value);
        self
    }

    pub fn default_value(&self, field: &str) -> Option<&Value> {
        self.context.get(&format!("default_{}", field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_form_is_a_modal_form() {
        let action = ActionDescriptor::create_form(REPAIR_ORDER_MODEL, "Create Repair Order")
            .with_default("product_id", json!(7))
            .with_default("mrp_ids", json!([3]));

        assert_eq!(action.action_type, WINDOW_ACTION);
        assert_eq!(action.view_mode, "form");
        assert_eq!(action.target, ActionTarget::New);
        assert_eq!(action.res_id, None);
        assert_eq!(action.default_value("product_id"), Some(&json!(7)));
        assert_eq!(action.context.get("default_mrp_ids"), Some(&json!([3])));
    }

    #[test]
    fn single_record_opens_its_form() {
        let action = ActionDescriptor::open_records(MRP_PRODUCTION_MODEL, "Manufacturing Orders", &[12]);
        assert_eq!(action.view_mode, "form");
        assert_eq!(action.res_id, Some(12));
        assert!(action.domain.is_empty());
    }

    #[test]
    fn several_records_open_a_filtered_list() {
        let action =
            ActionDescriptor::open_records(MRP_PRODUCTION_MODEL, "Manufacturing Orders", &[4, 9]);
        assert_eq!(action.view_mode, "tree,form");
        assert_eq!(action.res_id, None);
        assert_eq!(action.domain, vec![DomainTerm::new("id", "in", json!([4, 9]))]);
    }

    #[test]
    fn serializes_with_wire_keys() {
        let action = ActionDescriptor::open_records(REPAIR_ORDER_MODEL, "Repair Orders", &[5]);
        let value = serde_json::to_value(&action).unwrap();

        assert_eq!(value["type"], "ir.actions.act_window");
        assert_eq!(value["res_model"], "repair.order");
        assert_eq!(value["target"], "current");
        assert_eq!(value["res_id"], 5);
        assert!(value.get("context").is_none());

        let list = ActionDescriptor::open_records(REPAIR_ORDER_MODEL, "Repair Orders", &[]);
        let value = serde_json::to_value(&list).unwrap();
        assert_eq!(value["domain"], json!([["id", "in", []]]));
    }
}
