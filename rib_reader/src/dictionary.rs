use derive_more::{Deref, Display, From};
use log::debug;
use rib_types::wire::REQUEST_CODE_COUNT;
use std::collections::HashMap;


#[derive(From, Deref, Display, PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct RequestCode(u8);

#[derive(From, Deref, Display, PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct StringCode(u32);

/// The tables behind binary dictionary coding.
///
/// One set is owned by each [`crate::Tokenizer`] and shared by all of its nested inputs,
/// so a code defined by an outer stream is visible inside an included one, and vice versa.
/// Defining a code again replaces its entry.
pub struct Dictionaries {
    requests: Vec<Option<String>>,
    strings: HashMap<StringCode, String>,
}

impl Default for Dictionaries {
    fn default() -> Self {
        Self {
            requests: vec![None; REQUEST_CODE_COUNT],
            strings: HashMap::default(),
        }
    }
}

impl Dictionaries {
    pub fn define_request(&mut self, code: RequestCode, name: String) {
        let slot = &mut self.requests[*code as usize];
        if let Some(prev) = slot {
            debug!("encoded request {code} redefined from {prev:?} to {name:?}");
        } else {
            debug!("encoded request {code} defined as {name:?}");
        }
        *slot = Some(name);
    }

    pub fn request(&self, code: RequestCode) -> Option<&str> {
        self.requests[*code as usize].as_deref()
    }

    pub fn define_string(&mut self, code: StringCode, literal: String) {
        if let Some(prev) = self.strings.get(&code) {
            debug!("encoded string {code} redefined from {prev:?} to {literal:?}");
        }
        self.strings.insert(code, literal);
    }

    pub fn string(&self, code: StringCode) -> Option<&str> {
        self.strings.get(&code).map(String::as_str)
    }
}
