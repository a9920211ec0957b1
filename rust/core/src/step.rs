// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ISO-10303-21 (STEP Part 21) encoding of entities and attribute values.

use crate::entity::{Entity, EntityHandle};
use crate::schema::IfcSchemaVersion;
use crate::value::AttributeValue;
use std::fmt::Write;

/// Header section contents of a Part 21 file
#[derive(Debug, Clone)]
pub struct StepHeader {
    pub description: String,
    pub file_name: String,
    pub time_stamp: String,
    pub author: String,
    pub organization: String,
    pub preprocessor: String,
    pub originating_system: String,
}

impl Default for StepHeader {
    fn default() -> Self {
        Self {
            description: "ViewDefinition [CoordinationView]".to_string(),
            file_name: String::new(),
            time_stamp: String::new(),
            author: String::new(),
            organization: String::new(),
            preprocessor: concat!("ifc-export ", env!("CARGO_PKG_VERSION")).to_string(),
            originating_system: String::new(),
        }
    }
}

impl StepHeader {
    /// Write the HEADER section
    pub fn write(&self, schema: IfcSchemaVersion, out: &mut String) {
        out.push_str("HEADER;\n");
        let _ = writeln!(
            out,
            "FILE_DESCRIPTION(({}),'2;1');",
            encode_string(&self.description)
        );
        let _ = writeln!(
            out,
            "FILE_NAME({},{},({}),({}),{},{},'');",
            encode_string(&self.file_name),
            encode_string(&self.time_stamp),
            encode_string(&self.author),
            encode_string(&self.organization),
            encode_string(&self.preprocessor),
            encode_string(&self.originating_system),
        );
        let _ = writeln!(out, "FILE_SCHEMA(('{}'));", schema.as_str());
        out.push_str("ENDSEC;\n");
    }
}

/// Encode one entity instance line: `#12=IFCDIRECTION((0.,0.,1.));`
pub fn encode_entity(handle: EntityHandle, entity: &Entity, out: &mut String) {
    let _ = write!(out, "{}={}(", handle, entity.ifc_type.as_str());
    for (i, attr) in entity.attributes.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        encode_value(attr, out);
    }
    out.push_str(");\n");
}

/// Encode an attribute value
pub fn encode_value(value: &AttributeValue, out: &mut String) {
    match value {
        AttributeValue::EntityRef(h) => {
            let _ = write!(out, "{}", h);
        }
        AttributeValue::String(s) => out.push_str(&encode_string(s)),
        AttributeValue::Integer(i) => {
            let _ = write!(out, "{}", i);
        }
        AttributeValue::Float(f) => out.push_str(&encode_real(*f)),
        AttributeValue::Boolean(b) => out.push_str(if *b { ".T." } else { ".F." }),
        AttributeValue::Enum(e) => {
            let _ = write!(out, ".{}.", e);
        }
        AttributeValue::List(items) => {
            out.push('(');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                encode_value(item, out);
            }
            out.push(')');
        }
        AttributeValue::Typed(name, inner) => {
            let _ = write!(out, "{}(", name);
            encode_value(inner, out);
            out.push(')');
        }
        AttributeValue::Null => out.push('$'),
        AttributeValue::Derived => out.push('*'),
    }
}

/// Encode a REAL. Part 21 requires a decimal point in every real literal.
pub fn encode_real(value: f64) -> String {
    if !value.is_finite() {
        return "0.".to_string();
    }
    // Avoid writing "-0."
    let value = if value == 0.0 { 0.0 } else { value };
    let s = format!("{}", value);
    if s.contains('.') {
        s
    } else {
        format!("{}.", s)
    }
}

/// Encode a STRING literal, escaping quotes, backslashes and non-ASCII
/// characters with the `\X2\...\X0\` control directive.
pub fn encode_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    let mut wide = String::new();
    for ch in s.chars() {
        if ch.is_ascii() && !ch.is_ascii_control() {
            if !wide.is_empty() {
                let _ = write!(out, "\\X2\\{}\\X0\\", wide);
                wide.clear();
            }
            match ch {
                '\'' => out.push_str("''"),
                '\\' => out.push_str("\\\\"),
                _ => out.push(ch),
            }
        } else {
            let mut buf = [0u16; 2];
            for unit in ch.encode_utf16(&mut buf) {
                let _ = write!(wide, "{:04X}", unit);
            }
        }
    }
    if !wide.is_empty() {
        let _ = write!(out, "\\X2\\{}\\X0\\", wide);
    }
    out.push('\'');
    out
}
