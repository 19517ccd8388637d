use crate::versioning::value::{read_nullable_value, write_nullable_value};
use crate::versioning::{FieldSpec, TaggedValue, Version, VersionedRecord};
use crate::wire::{WireError, WireReader, WireWriter};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_PERSIST_WAN_REPLICATED_DATA: bool = true;

/// Configuration of a WAN consumer, the component that processes incoming WAN events on
/// this cluster. Usually paired with a custom publisher on the sending side.
///
/// `persist_wan_replicated_data` only exists on the wire from 3.11 on; streams negotiated
/// at an older version carry the first four fields and the flag keeps its default.
///
/// A property may be present with a null value; it is kept and travels as a null tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WanConsumerConfig {
    pub properties: BTreeMap<String, Option<TaggedValue>>,
    pub class_name: Option<String>,
    pub implementation: Option<TaggedValue>,
    pub persist_wan_replicated_data: bool,
}

impl Default for WanConsumerConfig {
    fn default() -> Self {
        Self {
            properties: BTreeMap::new(),
            class_name: None,
            implementation: None,
            persist_wan_replicated_data: DEFAULT_PERSIST_WAN_REPLICATED_DATA,
        }
    }
}

impl WanConsumerConfig {
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<TaggedValue>) -> Self {
        self.properties.insert(key.into(), Some(value.into()));
        self
    }

    pub fn with_null_property(mut self, key: impl Into<String>) -> Self {
        self.properties.insert(key.into(), None);
        self
    }

    /// Value of `key`, `None` when the key is missing or holds null.
    pub fn property(&self, key: &str) -> Option<&TaggedValue> {
        self.properties.get(key).and_then(Option::as_ref)
    }

    pub fn with_implementation(mut self, implementation: Option<TaggedValue>) -> Self {
        self.implementation = implementation;
        self
    }

    pub fn with_persist_wan_replicated_data(mut self, persist: bool) -> Self {
        self.persist_wan_replicated_data = persist;
        self
    }
}

const PROPERTIES: usize = 0;
const CLASS_NAME: usize = 1;
const IMPLEMENTATION: usize = 2;
const PERSIST_WAN_REPLICATED_DATA: usize = 3;

impl VersionedRecord for WanConsumerConfig {
    const RECORD_NAME: &'static str = "WanConsumerConfig";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::baseline("properties"),
        FieldSpec::baseline("className"),
        FieldSpec::baseline("implementation"),
        FieldSpec::since("persistWanReplicatedData", Version::V3_11),
    ];

    fn write_field(&self, index: usize, out: &mut WireWriter) {
        match index {
            PROPERTIES => {
                out.write_i32(self.properties.len() as i32);
                for (key, value) in &self.properties {
                    out.write_string(key);
                    write_nullable_value(out, value.as_ref());
                }
            }
            CLASS_NAME => out.write_nullable_string(self.class_name.as_deref()),
            IMPLEMENTATION => write_nullable_value(out, self.implementation.as_ref()),
            PERSIST_WAN_REPLICATED_DATA => out.write_bool(self.persist_wan_replicated_data),
            _ => unreachable!("WanConsumerConfig has {} fields", Self::FIELDS.len()),
        }
    }

    fn read_field(&mut self, index: usize, input: &mut WireReader) -> Result<(), WireError> {
        match index {
            PROPERTIES => {
                let count = input.read_i32()?;
                if count < 0 {
                    return Err(WireError::InvalidLength(count));
                }
                for _ in 0..count {
                    let key = input.read_string()?;
                    let value = read_nullable_value(input)?;
                    self.properties.insert(key, value);
                }
            }
            CLASS_NAME => self.class_name = input.read_nullable_string()?,
            IMPLEMENTATION => self.implementation = read_nullable_value(input)?,
            PERSIST_WAN_REPLICATED_DATA => {
                self.persist_wan_replicated_data = input.read_bool()?
            }
            _ => unreachable!("WanConsumerConfig has {} fields", Self::FIELDS.len()),
        }
        Ok(())
    }
}
