//! User-defined variables and the actions that change them.

use crate::element::PropertyValue;
use crate::ids::{ActionId, PropertyId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStoreProperty {
    pub id: PropertyId,
    pub name: String,
    pub value: PropertyValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ActionOperation {
    /// Assign a fixed value
    Set { value: PropertyValue },
    /// Flip a boolean property
    Toggle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStoreAction {
    pub id: ActionId,
    pub name: String,
    pub property_id: PropertyId,
    pub operation: ActionOperation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStore {
    #[serde(default)]
    properties: Vec<UserStoreProperty>,
    #[serde(default)]
    actions: Vec<UserStoreAction>,
}

impl UserStore {
    pub fn properties(&self) -> &[UserStoreProperty] {
        &self.properties
    }

    pub fn actions(&self) -> &[UserStoreAction] {
        &self.actions
    }

    pub fn property(&self, id: &PropertyId) -> Option<&UserStoreProperty> {
        self.properties.iter().find(|property| &property.id == id)
    }

    pub fn property_by_name(&self, name: &str) -> Option<&UserStoreProperty> {
        self.properties.iter().find(|property| property.name == name)
    }

    pub fn add_property(&mut self, name: impl Into<String>, value: PropertyValue) -> PropertyId {
        let id = PropertyId::new();
        self.properties.push(UserStoreProperty {
            id: id.clone(),
            name: name.into(),
            value,
        });
        id
    }

    /// Remove a property together with every action targeting it
    pub fn remove_property(&mut self, id: &PropertyId) -> Option<UserStoreProperty> {
        let index = self.properties.iter().position(|property| &property.id == id)?;
        self.actions.retain(|action| &action.property_id != id);
        Some(self.properties.remove(index))
    }

    pub fn add_action(
        &mut self,
        name: impl Into<String>,
        property_id: PropertyId,
        operation: ActionOperation,
    ) -> Option<ActionId> {
        self.property(&property_id)?;

        let id = ActionId::new();
        self.actions.push(UserStoreAction {
            id: id.clone(),
            name: name.into(),
            property_id,
            operation,
        });
        Some(id)
    }

    /// Run an action against its property; false if either is missing
    pub fn run_action(&mut self, id: &ActionId) -> bool {
        let Some(action) = self.actions.iter().find(|action| &action.id == id) else {
            return false;
        };
        let Some(property) = self
            .properties
            .iter_mut()
            .find(|property| property.id == action.property_id)
        else {
            return false;
        };

        match &action.operation {
            ActionOperation::Set { value } => property.value = value.clone(),
            ActionOperation::Toggle => {
                let current = matches!(property.value, PropertyValue::Boolean(true));
                property.value = PropertyValue::Boolean(!current);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_action_flips_boolean() {
        let mut store = UserStore::default();
        let property = store.add_property("menuOpen", PropertyValue::Boolean(false));
        let action = store
            .add_action("Toggle menu", property.clone(), ActionOperation::Toggle)
            .unwrap();

        assert!(store.run_action(&action));
        assert_eq!(store.property(&property).unwrap().value, PropertyValue::Boolean(true));

        assert!(store.run_action(&action));
        assert_eq!(store.property(&property).unwrap().value, PropertyValue::Boolean(false));
    }

    #[test]
    fn test_action_requires_existing_property() {
        let mut store = UserStore::default();
        assert!(store
            .add_action("Nope", PropertyId::from("missing"), ActionOperation::Toggle)
            .is_none());
    }

    #[test]
    fn test_remove_property_drops_its_actions() {
        let mut store = UserStore::default();
        let property = store.add_property("title", PropertyValue::String("Hi".into()));
        store.add_action(
            "Reset",
            property.clone(),
            ActionOperation::Set {
                value: PropertyValue::String(String::new()),
            },
        );

        assert!(store.remove_property(&property).is_some());
        assert!(store.actions().is_empty());
        assert!(store.property_by_name("title").is_none());
    }
}
