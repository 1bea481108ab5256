//! JSON description of a `.riv` file and its binary encoder.
//!
//! Records carry raw type and property keys. Every property written is
//! listed in the header's field table unless marked `unlisted`, which lets
//! fixtures exercise the runtime's handling of keys it cannot skip.

use serde::{Deserialize, Serialize};
use vizij_rive_codec::{BinaryWriter, FieldType, PropertyValue, RuntimeHeader, MAJOR_VERSION};

/// A property payload, written in JSON as `{"double": 1.5}` and so on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Value {
    Uint(u32),
    String(String),
    Double(f32),
    Color(u32),
    Bool(bool),
    Bytes(Vec<u8>),
}

impl Value {
    pub fn field_type(&self) -> FieldType {
        self.to_property_value().field_type()
    }

    pub fn to_property_value(&self) -> PropertyValue {
        match self {
            Value::Uint(v) => PropertyValue::Uint(*v),
            Value::String(v) => PropertyValue::String(v.clone()),
            Value::Double(v) => PropertyValue::Double(*v),
            Value::Color(v) => PropertyValue::Color(*v),
            Value::Bool(v) => PropertyValue::Bool(*v),
            Value::Bytes(v) => PropertyValue::Bytes(v.clone()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prop {
    pub key: u32,
    #[serde(flatten)]
    pub value: Value,
    /// Keep the key out of the header field table.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unlisted: bool,
}

/// One object record. `children` is only written for tree records
/// (animations and state machines).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "type")]
    pub type_key: u32,
    #[serde(default)]
    pub props: Vec<Prop>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Record>,
}

impl Record {
    pub fn new(type_key: u32) -> Self {
        Self {
            type_key,
            props: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn backboard() -> Self {
        Self::new(23)
    }

    pub fn prop(mut self, key: u32, value: Value) -> Self {
        self.props.push(Prop {
            key,
            value,
            unlisted: false,
        });
        self
    }

    /// Adds a property the header does not describe.
    pub fn unlisted(mut self, key: u32, value: Value) -> Self {
        self.props.push(Prop {
            key,
            value,
            unlisted: true,
        });
        self
    }

    pub fn uint(self, key: u32, value: u32) -> Self {
        self.prop(key, Value::Uint(value))
    }

    pub fn string(self, key: u32, value: impl Into<String>) -> Self {
        self.prop(key, Value::String(value.into()))
    }

    pub fn double(self, key: u32, value: f32) -> Self {
        self.prop(key, Value::Double(value))
    }

    pub fn color(self, key: u32, value: u32) -> Self {
        self.prop(key, Value::Color(value))
    }

    pub fn boolean(self, key: u32, value: bool) -> Self {
        self.prop(key, Value::Bool(value))
    }

    pub fn bytes(self, key: u32, value: Vec<u8>) -> Self {
        self.prop(key, Value::Bytes(value))
    }

    pub fn child(mut self, child: Record) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Record>) -> Self {
        self.children.extend(children);
        self
    }

    fn each_prop<'a>(&'a self, f: &mut dyn FnMut(&'a Prop)) {
        for prop in &self.props {
            f(prop);
        }
        for child in &self.children {
            child.each_prop(f);
        }
    }

    fn write_record(&self, writer: &mut BinaryWriter) {
        writer.write_var_uint(u64::from(self.type_key));
        for prop in &self.props {
            writer.write_var_uint(u64::from(prop.key));
            prop.value.to_property_value().write(writer);
        }
        writer.write_var_uint(0);
    }

    fn write_tree(&self, writer: &mut BinaryWriter) {
        self.write_record(writer);
        writer.write_var_uint(self.children.len() as u64);
        for child in &self.children {
            child.write_tree(writer);
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtboardDocument {
    /// Flat object records; the first is the artboard itself.
    pub objects: Vec<Record>,
    #[serde(default)]
    pub animations: Vec<Record>,
    #[serde(default)]
    pub state_machines: Vec<Record>,
}

impl ArtboardDocument {
    pub fn new(root: Record) -> Self {
        Self {
            objects: vec![root],
            ..Self::default()
        }
    }

    pub fn object(mut self, record: Record) -> Self {
        self.objects.push(record);
        self
    }

    pub fn animation(mut self, tree: Record) -> Self {
        self.animations.push(tree);
        self
    }

    pub fn state_machine(mut self, tree: Record) -> Self {
        self.state_machines.push(tree);
        self
    }
}

fn default_major() -> u32 {
    MAJOR_VERSION
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RivDocument {
    #[serde(default = "default_major")]
    pub major: u32,
    #[serde(default)]
    pub minor: u32,
    #[serde(default)]
    pub file_id: u32,
    #[serde(default = "Record::backboard")]
    pub backboard: Record,
    #[serde(default)]
    pub assets: Vec<Record>,
    #[serde(default)]
    pub artboards: Vec<ArtboardDocument>,
}

impl Default for RivDocument {
    fn default() -> Self {
        Self {
            major: MAJOR_VERSION,
            minor: 0,
            file_id: 0,
            backboard: Record::backboard(),
            assets: Vec::new(),
            artboards: Vec::new(),
        }
    }
}

impl RivDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn asset(mut self, record: Record) -> Self {
        self.assets.push(record);
        self
    }

    pub fn artboard(mut self, artboard: ArtboardDocument) -> Self {
        self.artboards.push(artboard);
        self
    }

    fn header(&self) -> RuntimeHeader {
        let mut header = RuntimeHeader::new(self.file_id);
        header.major_version = self.major;
        header.minor_version = self.minor;
        let mut list = |prop: &Prop| {
            if prop.unlisted {
                return;
            }
            if let Ok(key) = u16::try_from(prop.key) {
                header.set_field(key, prop.value.field_type());
            }
        };
        self.backboard.each_prop(&mut list);
        for record in &self.assets {
            record.each_prop(&mut list);
        }
        for artboard in &self.artboards {
            let trees = artboard.animations.iter().chain(&artboard.state_machines);
            for record in artboard.objects.iter().chain(trees) {
                record.each_prop(&mut list);
            }
        }
        header
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut writer = BinaryWriter::new();
        self.header().write(&mut writer);
        self.backboard.write_record(&mut writer);

        writer.write_var_uint(self.assets.len() as u64);
        for record in &self.assets {
            record.write_record(&mut writer);
        }

        writer.write_var_uint(self.artboards.len() as u64);
        for artboard in &self.artboards {
            writer.write_var_uint(artboard.objects.len() as u64);
            for record in &artboard.objects {
                record.write_record(&mut writer);
            }
            writer.write_var_uint(artboard.animations.len() as u64);
            for tree in &artboard.animations {
                tree.write_tree(&mut writer);
            }
            writer.write_var_uint(artboard.state_machines.len() as u64);
            for tree in &artboard.state_machines {
                tree.write_tree(&mut writer);
            }
        }
        writer.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn props_read_as_tagged_values() {
        let record: Record = serde_json::from_str(
            r#"{"type": 2, "props": [{"key": 4, "string": "node"}, {"key": 13, "double": 5.0}]}"#,
        )
        .unwrap();
        assert_eq!(record.type_key, 2);
        assert_eq!(record.props[0].value, Value::String("node".into()));
        assert_eq!(record.props[1].value, Value::Double(5.0));
        assert!(!record.props[1].unlisted);
    }

    #[test]
    fn empty_document_layout() {
        let bytes = RivDocument::new().encode();
        // fingerprint, 7, 0, 0, empty key list, backboard record, 0 assets, 0 artboards
        assert_eq!(bytes, b"RIVE\x07\x00\x00\x00\x17\x00\x00\x00".to_vec());
    }

    #[test]
    fn unlisted_keys_stay_out_of_the_table() {
        let doc = RivDocument::new().artboard(ArtboardDocument::new(
            Record::new(1).string(4, "a").unlisted(900, Value::Uint(1)),
        ));
        let header = doc.header();
        assert_eq!(header.property_field_type(4), Some(FieldType::String));
        assert_eq!(header.property_field_type(900), None);
    }
}
