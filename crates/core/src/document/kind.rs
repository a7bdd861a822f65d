use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::model::fields;

/// The five document collections held by the catalog.
///
/// Genre, Director, Studio and MediaType are the "simple" reference
/// entities; Media is the catalog record that points at one of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Genre,
    Director,
    Studio,
    MediaType,
    Media,
}

/// Response messages for one entity kind, as the admin UI expects them.
#[derive(Debug)]
pub struct Labels {
    /// Noun with article, e.g. "el género".
    pub singular: &'static str,
    /// Plural noun with article, e.g. "los géneros".
    pub plural: &'static str,
    pub not_found: &'static str,
    pub deleted: &'static str,
    /// Name collision on create or update. Media collide on serial or url
    /// instead, see [`EntityKind::conflict_message`].
    pub already_exists: Option<&'static str>,
    /// A media reference into this kind is missing or inactive. Nothing
    /// references media.
    pub invalid_reference: Option<&'static str>,
}

const GENRE_LABELS: Labels = Labels {
    singular: "el género",
    plural: "los géneros",
    not_found: "Género no encontrado",
    deleted: "Género eliminado correctamente",
    already_exists: Some("El género ya existe"),
    invalid_reference: Some("Género no válido o inactivo"),
};

const DIRECTOR_LABELS: Labels = Labels {
    singular: "el director",
    plural: "los directores",
    not_found: "Director no encontrado",
    deleted: "Director eliminado correctamente",
    already_exists: Some("El director ya existe"),
    invalid_reference: Some("Director no válido o inactivo"),
};

const STUDIO_LABELS: Labels = Labels {
    singular: "la productora",
    plural: "las productoras",
    not_found: "Productora no encontrada",
    deleted: "Productora eliminada correctamente",
    already_exists: Some("La productora ya existe"),
    invalid_reference: Some("Productora no válida o inactiva"),
};

const MEDIA_TYPE_LABELS: Labels = Labels {
    singular: "el tipo",
    plural: "los tipos",
    not_found: "Tipo no encontrado",
    deleted: "Tipo eliminado correctamente",
    already_exists: Some("El tipo ya existe"),
    invalid_reference: Some("Tipo no válido o inactivo"),
};

const MEDIA_LABELS: Labels = Labels {
    singular: "la producción",
    plural: "las producciones",
    not_found: "Producción no encontrada",
    deleted: "Producción eliminada correctamente",
    already_exists: None,
    invalid_reference: None,
};

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Genre,
        EntityKind::Director,
        EntityKind::Studio,
        EntityKind::MediaType,
        EntityKind::Media,
    ];

    /// Collection name, which is also the resource segment under `/api`.
    pub fn collection(self) -> &'static str {
        match self {
            EntityKind::Genre => "generos",
            EntityKind::Director => "directores",
            EntityKind::Studio => "productoras",
            EntityKind::MediaType => "tipos",
            EntityKind::Media => "medias",
        }
    }

    /// Whether this is one of the name/status reference entities.
    pub fn is_simple(self) -> bool {
        !matches!(self, EntityKind::Media)
    }

    /// Fields whose values must be unique across the collection.
    pub fn unique_fields(self) -> &'static [&'static str] {
        match self {
            EntityKind::Media => &[fields::SERIAL, fields::URL],
            _ => &[fields::NAME],
        }
    }

    pub fn labels(self) -> &'static Labels {
        match self {
            EntityKind::Genre => &GENRE_LABELS,
            EntityKind::Director => &DIRECTOR_LABELS,
            EntityKind::Studio => &STUDIO_LABELS,
            EntityKind::MediaType => &MEDIA_TYPE_LABELS,
            EntityKind::Media => &MEDIA_LABELS,
        }
    }

    /// Message reported when `field` collides with another document.
    pub fn conflict_message(self, field: &str) -> &'static str {
        match self.labels().already_exists {
            Some(message) => message,
            None if field == fields::URL => "La URL ya existe",
            None => "El serial ya existe",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown collection `{0}`")]
pub struct UnknownCollection(pub String);

impl FromStr for EntityKind {
    type Err = UnknownCollection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.collection() == s)
            .ok_or_else(|| UnknownCollection(s.to_string()))
    }
}

/// Lifecycle gate on simple entities: only active ones may be newly
/// referenced by a media record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    #[serde(rename = "activo")]
    Active,
    #[serde(rename = "inactivo")]
    Inactive,
}

impl Status {
    pub const VALUES: [&'static str; 2] = ["activo", "inactivo"];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Active => "activo",
            Status::Inactive => "inactivo",
        }
    }
}
