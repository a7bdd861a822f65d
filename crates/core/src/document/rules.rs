/// Declarative field rules, one table per entity kind.
///
/// Messages are the ones the admin UI displays verbatim.
use super::kind::{EntityKind, Status};
use super::model::fields;

/// Earliest release year a media record may carry.
pub const FIRST_RELEASE_YEAR: i64 = 1888;

#[derive(Debug)]
pub struct FieldRule {
    pub field: &'static str,
    /// Message reported when the field is absent. `None` marks it optional.
    pub required: Option<&'static str>,
    pub check: Check,
}

#[derive(Debug)]
pub enum Check {
    /// Trimmed string with a length bound in characters.
    Text {
        min: usize,
        max: usize,
        too_short: &'static str,
        too_long: &'static str,
    },
    /// `http://` or `https://` URL.
    Url { invalid: &'static str },
    /// One of a fixed set of values, filled with `default` when absent.
    OneOf {
        values: &'static [&'static str],
        default: Option<&'static str>,
        invalid: &'static str,
    },
    /// Integer year between `min` and the current year.
    Year {
        min: i64,
        invalid: &'static str,
        too_early: &'static str,
        too_late: &'static str,
    },
    /// Id of a document in another collection. Only presence is checked
    /// here; existence and status are the reference validator's job.
    Reference(EntityKind),
}

const NAME: FieldRule = FieldRule {
    field: fields::NAME,
    required: Some("El nombre es obligatorio"),
    check: Check::Text {
        min: 3,
        max: 100,
        too_short: "El nombre debe tener al menos 3 caracteres",
        too_long: "El nombre no puede exceder los 100 caracteres",
    },
};

const DESCRIPTION: FieldRule = FieldRule {
    field: fields::DESCRIPTION,
    required: Some("La descripción es obligatoria"),
    check: Check::Text {
        min: 3,
        max: 500,
        too_short: "La descripción debe tener al menos 3 caracteres",
        too_long: "La descripción no puede exceder los 500 caracteres",
    },
};

const STATUS: FieldRule = FieldRule {
    field: fields::STATUS,
    required: Some("El estado es obligatorio"),
    check: Check::OneOf {
        values: &Status::VALUES,
        default: Some("activo"),
        invalid: "El estado debe ser activo o inactivo",
    },
};

const IMAGE_URL: FieldRule = FieldRule {
    field: fields::IMAGE,
    required: None,
    check: Check::Url {
        invalid: "La imagen debe ser una URL válida",
    },
};

const SLOGAN: FieldRule = FieldRule {
    field: fields::SLOGAN,
    required: Some("El slogan es obligatorio"),
    check: Check::Text {
        min: 3,
        max: 100,
        too_short: "El slogan debe tener al menos 3 caracteres",
        too_long: "El slogan no puede exceder los 100 caracteres",
    },
};

static GENRE: [FieldRule; 4] = [NAME, DESCRIPTION, STATUS, IMAGE_URL];

static DIRECTOR: [FieldRule; 2] = [NAME, STATUS];

static STUDIO: [FieldRule; 5] = [NAME, DESCRIPTION, STATUS, SLOGAN, IMAGE_URL];

static MEDIA_TYPE: [FieldRule; 3] = [NAME, DESCRIPTION, STATUS];

static MEDIA: [FieldRule; 10] = [
    FieldRule {
        field: fields::SERIAL,
        required: Some("El serial es obligatorio"),
        check: Check::Text {
            min: 3,
            max: 100,
            too_short: "El serial debe tener al menos 3 caracteres",
            too_long: "El serial no puede exceder los 100 caracteres",
        },
    },
    FieldRule {
        field: fields::TITLE,
        required: Some("El título es obligatorio"),
        check: Check::Text {
            min: 3,
            max: 100,
            too_short: "El título debe tener al menos 3 caracteres",
            too_long: "El título no puede exceder los 100 caracteres",
        },
    },
    FieldRule {
        field: fields::SYNOPSIS,
        required: Some("La sinopsis es obligatoria"),
        check: Check::Text {
            min: 3,
            max: 500,
            too_short: "La sinopsis debe tener al menos 3 caracteres",
            too_long: "La sinopsis no puede exceder los 500 caracteres",
        },
    },
    FieldRule {
        field: fields::URL,
        required: Some("La URL es obligatoria"),
        check: Check::Text {
            min: 3,
            max: 500,
            too_short: "La URL debe tener al menos 3 caracteres",
            too_long: "La URL no puede exceder los 500 caracteres",
        },
    },
    FieldRule {
        field: fields::IMAGE,
        required: Some("La imagen es obligatoria"),
        check: Check::Text {
            min: 3,
            max: 500,
            too_short: "La imagen debe tener al menos 3 caracteres",
            too_long: "La imagen no puede exceder los 500 caracteres",
        },
    },
    FieldRule {
        field: fields::RELEASE_YEAR,
        required: Some("El año de estreno es obligatorio"),
        check: Check::Year {
            min: FIRST_RELEASE_YEAR,
            invalid: "Año de estreno inválido",
            too_early: "El año de estreno debe ser posterior a 1888",
            too_late: "El año de estreno no puede ser mayor que el año actual",
        },
    },
    FieldRule {
        field: fields::PRIMARY_GENRE,
        required: Some("El género principal es obligatorio"),
        check: Check::Reference(EntityKind::Genre),
    },
    FieldRule {
        field: fields::PRIMARY_DIRECTOR,
        required: Some("El director principal es obligatorio"),
        check: Check::Reference(EntityKind::Director),
    },
    FieldRule {
        field: fields::STUDIO,
        required: Some("La productora es obligatoria"),
        check: Check::Reference(EntityKind::Studio),
    },
    FieldRule {
        field: fields::TYPE,
        required: Some("El tipo es obligatorio"),
        check: Check::Reference(EntityKind::MediaType),
    },
];

/// The rule table for `kind`, in the order violations are reported.
pub fn rules_for(kind: EntityKind) -> &'static [FieldRule] {
    match kind {
        EntityKind::Genre => &GENRE,
        EntityKind::Director => &DIRECTOR,
        EntityKind::Studio => &STUDIO,
        EntityKind::MediaType => &MEDIA_TYPE,
        EntityKind::Media => &MEDIA,
    }
}
