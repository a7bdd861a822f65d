use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::id::DocumentId;
use super::kind::{EntityKind, Status};

/// Document body: field name to JSON value, as stored.
pub type Fields = serde_json::Map<String, Value>;

/// JSON keys used on the wire and in storage.
pub mod fields {
    pub const NAME: &str = "nombre";
    pub const DESCRIPTION: &str = "descripcion";
    pub const STATUS: &str = "estado";
    pub const SLOGAN: &str = "slogan";
    pub const IMAGE: &str = "imagen";

    pub const SERIAL: &str = "serial";
    pub const TITLE: &str = "titulo";
    pub const SYNOPSIS: &str = "sinopsis";
    pub const URL: &str = "url";
    pub const RELEASE_YEAR: &str = "anioEstreno";
    pub const PRIMARY_GENRE: &str = "generoPrincipal";
    pub const PRIMARY_DIRECTOR: &str = "directorPrincipal";
    pub const STUDIO: &str = "productora";
    pub const TYPE: &str = "tipo";

    pub const CREATED_AT: &str = "fechaCreacion";
    pub const UPDATED_AT: &str = "fechaActualizacion";
}

/// The four foreign keys of a media record, in the order they are checked.
pub const MEDIA_REFERENCES: [(&str, EntityKind); 4] = [
    (fields::PRIMARY_GENRE, EntityKind::Genre),
    (fields::PRIMARY_DIRECTOR, EntityKind::Director),
    (fields::STUDIO, EntityKind::Studio),
    (fields::TYPE, EntityKind::MediaType),
];

/// A stored catalog document.
///
/// Serializes flat: `id`, the body fields, then the two timestamps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub id: DocumentId,
    #[serde(skip)]
    pub kind: EntityKind,
    #[serde(flatten)]
    pub fields: Fields,
    #[serde(rename = "fechaCreacion")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "fechaActualizacion")]
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    /// Status of a simple entity. Documents without a recognised status
    /// are never considered active.
    pub fn status(&self) -> Option<Status> {
        match self.get_str(fields::STATUS)? {
            "activo" => Some(Status::Active),
            "inactivo" => Some(Status::Inactive),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status() == Some(Status::Active)
    }
}
