use serde::{Deserialize, Serialize};

use crudkit_core::{FieldKind, FieldSpec, Schema};

/// A student enrolled on a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub name: String,
    #[serde(serialize_with = "crudkit_core::number::serialize")]
    pub age: f64,
    pub course: String,
}

impl Schema for Student {
    const KIND: &'static str = "Student";
    const COLLECTION: &'static str = "students";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("name", FieldKind::String),
        FieldSpec::required("age", FieldKind::Number),
        FieldSpec::required("course", FieldKind::String),
    ];
}
