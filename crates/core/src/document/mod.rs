pub mod id;
pub mod kind;
pub mod model;
pub mod rules;
pub mod validate;

pub use id::{DocumentId, EntityRef};
pub use kind::{EntityKind, Labels, Status};
pub use model::{fields, Document, Fields, MEDIA_REFERENCES};
pub use validate::{validate_fields, validate_fields_at, FieldViolation, WriteMode};
