/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Operator state carried between messages.
//!
//! Copy, Increment, Delta and Tail read the previous value of a field from
//! here. A decoder reset returns every entry to undefined.

use crate::operators::{DictionaryScope, DictionaryValue};
use std::collections::HashMap;

static UNDEFINED: DictionaryValue = DictionaryValue::Undefined;

/// Global and per-template operator dictionaries.
#[derive(Debug, Default)]
pub struct Dictionary {
    global: HashMap<String, DictionaryValue>,
    templates: HashMap<u32, HashMap<String, DictionaryValue>>,
    last_template_id: Option<u32>,
}

impl Dictionary {
    /// Creates an empty dictionary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears every entry back to undefined.
    pub fn reset(&mut self) {
        self.global.clear();
        self.templates.clear();
        self.last_template_id = None;
    }

    /// Returns the previous value of `key` in the given scope.
    #[must_use]
    pub fn get(&self, scope: DictionaryScope, template_id: u32, key: &str) -> &DictionaryValue {
        let entry = match scope {
            DictionaryScope::Global => self.global.get(key),
            DictionaryScope::Template => self
                .templates
                .get(&template_id)
                .and_then(|dict| dict.get(key)),
        };
        entry.unwrap_or(&UNDEFINED)
    }

    /// Stores the new previous value of `key` in the given scope.
    pub fn set(
        &mut self,
        scope: DictionaryScope,
        template_id: u32,
        key: &str,
        value: DictionaryValue,
    ) {
        let dict = match scope {
            DictionaryScope::Global => &mut self.global,
            DictionaryScope::Template => self.templates.entry(template_id).or_default(),
        };
        match dict.get_mut(key) {
            Some(slot) => *slot = value,
            None => {
                dict.insert(key.to_owned(), value);
            }
        }
    }

    /// Returns the template id of the previous message.
    #[must_use]
    pub const fn last_template_id(&self) -> Option<u32> {
        self.last_template_id
    }

    /// Records the template id of the current message.
    pub fn set_last_template_id(&mut self, id: u32) {
        self.last_template_id = Some(id);
    }
}
