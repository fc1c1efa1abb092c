// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Ordered serialization of descriptor lists.
//!
//! A list of mixed descriptors is written as
//!
//! ```json
//! [{"kind": "standard", "index": 0, "payload": {...}},
//!  {"kind": "closure",  "index": 1, "payload": {...}}]
//! ```
//!
//! Decoding sorts the entries by `index` (stable) before handing the list
//! out, so producers that group entries by kind still decode to source
//! order.

use serde::{Deserialize, Serialize};

use crate::model::parameter::{
    ClosureParameter, ParameterDescriptor, StandardParameter, TupleParameter,
};

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum EntryRef<'a> {
    Standard {
        index: usize,
        payload: &'a StandardParameter,
    },
    Tuple {
        index: usize,
        payload: &'a TupleParameter,
    },
    Closure {
        index: usize,
        payload: &'a ClosureParameter,
    },
}

impl<'a> EntryRef<'a> {
    fn new(index: usize, descriptor: &'a ParameterDescriptor) -> Self {
        match descriptor {
            ParameterDescriptor::Standard(payload) => EntryRef::Standard { index, payload },
            ParameterDescriptor::Tuple(payload) => EntryRef::Tuple { index, payload },
            ParameterDescriptor::Closure(payload) => EntryRef::Closure { index, payload },
        }
    }
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum Entry {
    Standard {
        index: usize,
        payload: StandardParameter,
    },
    Tuple {
        index: usize,
        payload: TupleParameter,
    },
    Closure {
        index: usize,
        payload: ClosureParameter,
    },
}

impl Entry {
    fn index(&self) -> usize {
        match self {
            Entry::Standard { index, .. } | Entry::Tuple { index, .. } | Entry::Closure { index, .. } => {
                *index
            }
        }
    }

    fn into_descriptor(self) -> ParameterDescriptor {
        match self {
            Entry::Standard { payload, .. } => ParameterDescriptor::Standard(payload),
            Entry::Tuple { payload, .. } => ParameterDescriptor::Tuple(payload),
            Entry::Closure { payload, .. } => ParameterDescriptor::Closure(payload),
        }
    }
}

/// `#[serde(with = "codec::ordered")]` adapter for `Vec<ParameterDescriptor>`.
pub mod ordered {
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{Entry, EntryRef};
    use crate::model::parameter::ParameterDescriptor;

    pub fn serialize<S: Serializer>(
        list: &[ParameterDescriptor],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(list.len()))?;
        for (index, descriptor) in list.iter().enumerate() {
            seq.serialize_element(&EntryRef::new(index, descriptor))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<ParameterDescriptor>, D::Error> {
        let mut entries = Vec::<Entry>::deserialize(deserializer)?;
        entries.sort_by_key(Entry::index);
        Ok(entries.into_iter().map(Entry::into_descriptor).collect())
    }
}

/// Encode a descriptor list to its ordered JSON form.
pub fn encode_list(list: &[ParameterDescriptor]) -> serde_json::Result<serde_json::Value> {
    ordered::serialize(list, serde_json::value::Serializer)
}

/// Decode an ordered JSON list, restoring source order.
pub fn decode_list(value: serde_json::Value) -> serde_json::Result<Vec<ParameterDescriptor>> {
    ordered::deserialize(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parameter::ParameterFields;
    use serde_json::json;

    fn standard(type_text: &str) -> ParameterDescriptor {
        ParameterDescriptor::Standard(StandardParameter {
            fields: ParameterFields::new(type_text),
            parameters: Vec::new(),
        })
    }

    fn mixed() -> Vec<ParameterDescriptor> {
        vec![
            standard("String"),
            ParameterDescriptor::Closure(ClosureParameter {
                fields: ParameterFields::new("() -> Void"),
                is_void_input: true,
                is_void_output: true,
                declaration_text: "() -> Void".to_string(),
                ..Default::default()
            }),
            ParameterDescriptor::Tuple(TupleParameter {
                fields: ParameterFields::new("(Int, Int)"),
                arguments: vec![standard("Int"), standard("Int")],
            }),
            standard("Bool"),
        ]
    }

    #[test]
    fn entries_carry_kind_and_index() {
        let value = encode_list(&mixed()).unwrap();
        let entries = value.as_array().unwrap();
        let tags: Vec<(&str, u64)> = entries
            .iter()
            .map(|e| (e["kind"].as_str().unwrap(), e["index"].as_u64().unwrap()))
            .collect();
        assert_eq!(
            tags,
            vec![("standard", 0), ("closure", 1), ("tuple", 2), ("standard", 3)]
        );
        assert_eq!(entries[0]["payload"]["type"], json!("String"));
        assert_eq!(
            entries[2]["payload"]["arguments"][1]["index"],
            json!(1)
        );
    }

    #[test]
    fn round_trip_preserves_order() {
        let list = mixed();
        let decoded = decode_list(encode_list(&list).unwrap()).unwrap();
        assert_eq!(decoded, list);
    }

    #[test]
    fn decoding_sorts_by_index() {
        // Entries grouped by kind, as a bucketing producer would write them.
        let mut value = encode_list(&mixed()).unwrap();
        let entries = value.as_array_mut().unwrap();
        entries.sort_by_key(|e| e["kind"].as_str().unwrap().to_string());
        let kinds: Vec<&str> = entries.iter().map(|e| e["kind"].as_str().unwrap()).collect();
        assert_eq!(kinds, vec!["closure", "standard", "standard", "tuple"]);

        let decoded = decode_list(value).unwrap();
        assert_eq!(decoded, mixed());
    }

    #[test]
    fn single_descriptor_is_adjacently_tagged() {
        let value = serde_json::to_value(standard("Int")).unwrap();
        assert_eq!(value["kind"], json!("standard"));
        assert_eq!(value["payload"]["type"], json!("Int"));
        assert!(value.get("index").is_none());
        let back: ParameterDescriptor = serde_json::from_value(value).unwrap();
        assert_eq!(back, standard("Int"));
    }
}
