use crate::libs::schema::TableSchema;
use crate::libs::value::{Record, Value};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;

pub const CREATED_AT: &str = "created_at";
pub const PRODUCT_ID: &str = "product_id";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// HTML input kind a column is edited with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Number,
    Date,
    Time,
    Text,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Number => "number",
            InputKind::Date => "date",
            InputKind::Time => "time",
            InputKind::Text => "text",
        }
    }

    /// Kind guessed from a runtime value, used only when no schema column
    /// is known for the field.
    pub fn for_value(value: &Value) -> Self {
        match value {
            Value::Number(_) => InputKind::Number,
            _ => InputKind::Text,
        }
    }
}

/// Maps a backend type tag to an input kind. First match wins, so
/// `DATETIME` is a date and `TIMESTAMP` a time.
pub fn get_input_type(sql_type: &str) -> InputKind {
    if sql_type.contains("INT") {
        return InputKind::Number;
    }
    if sql_type.contains("DECIMAL") || sql_type.contains("FLOAT") {
        return InputKind::Number;
    }
    if sql_type.contains("DATE") {
        return InputKind::Date;
    }
    if sql_type.contains("TIME") {
        return InputKind::Time;
    }
    InputKind::Text
}

/// `order_item_id` -> `Order Item Id`.
pub fn format_label(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub kind: InputKind,
    pub required: bool,
    pub placeholder: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Add,
    Edit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub kind: FormKind,
    pub fields: Vec<FormField>,
}

impl Form {
    pub fn title(&self) -> &'static str {
        match self.kind {
            FormKind::Add => "Add New Record",
            FormKind::Edit => "Edit Record",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.kind {
            FormKind::Add => "Save Record",
            FormKind::Edit => "Save Changes",
        }
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Values as the form would submit them untouched.
    pub fn initial_values(&self) -> FormValues {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.value.clone().unwrap_or_default()))
            .collect()
    }
}

/// Submitted field values, all strings, in form order.
pub type FormValues = IndexMap<String, String>;

/// One input per schema column except `created_at`-like ones, in column order.
/// Primary key columns are kept.
pub fn build_add_form(table: &TableSchema) -> Form {
    let fields = table
        .columns
        .iter()
        .filter(|col| !col.name.contains(CREATED_AT))
        .map(|col| {
            let label = format_label(&col.name);
            FormField {
                name: col.name.clone(),
                placeholder: Some(format!("Enter {}", label.to_lowercase())),
                label,
                kind: get_input_type(&col.sql_type),
                required: !col.nullable,
                value: None,
            }
        })
        .collect();
    Form {
        kind: FormKind::Add,
        fields,
    }
}

/// One pre-filled input per record key except the primary key and
/// `created_at`. Input kinds come from the schema when the column is known
/// there; the value itself only pre-fills.
pub fn build_edit_form(record: &Record, primary_key: &str, schema: Option<&TableSchema>) -> Form {
    let fields = record
        .iter()
        .filter(|(key, _)| key.as_str() != primary_key && key.as_str() != CREATED_AT)
        .map(|(key, value)| {
            let kind = schema
                .and_then(|t| t.column(key))
                .map(|col| get_input_type(&col.sql_type))
                .unwrap_or_else(|| InputKind::for_value(value));
            FormField {
                name: key.clone(),
                label: format_label(key),
                kind,
                required: false,
                placeholder: None,
                value: Some(value.to_input_text()),
            }
        })
        .collect();
    Form {
        kind: FormKind::Edit,
        fields,
    }
}

pub fn timestamp(now: DateTime<Utc>) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}

/// Body of a create request: every value as a string, `created_at` stamped,
/// a non-empty `product_id` coerced to an integer.
pub fn creation_payload(values: &FormValues, now: DateTime<Utc>) -> Record {
    let mut record: Record = values
        .iter()
        .map(|(k, v)| (k.clone(), Value::from(v.as_str())))
        .collect();
    record.insert(CREATED_AT.to_string(), Value::String(timestamp(now)));
    if let Some(raw) = values.get(PRODUCT_ID).filter(|v| !v.is_empty()) {
        record.insert(PRODUCT_ID.to_string(), Value::integer_from_text(raw));
    }
    record
}

/// Body of an update request. The identifier captured when the form was
/// opened always wins over whatever the form holds under the key column.
pub fn update_payload(values: &FormValues, primary_key: &str, identifier: &Value) -> Record {
    let mut record: Record = values
        .iter()
        .map(|(k, v)| (k.clone(), Value::from(v.as_str())))
        .collect();
    record.insert(primary_key.to_string(), identifier.clone());
    record
}
