//! Delivery areas and the governorates that group them.

use marketdesk_core::{AppError, AppResult, Language, RecordId};
use serde::{Deserialize, Serialize};

use crate::resource::{MutationKind, Record, Resource, ResourceInput};
use crate::view::{FieldValue, Queryable};

/// Minimum number of vertices in a delivery polygon.
pub const POLYGON_MIN_POINTS: usize = 3;

/// One polygon vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl LatLng {
    /// Creates a validated coordinate.
    pub fn new(lat: f64, lng: f64) -> AppResult<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(AppError::Validation(format!(
                "latitude {lat} must be within [-90, 90]"
            )));
        }

        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(AppError::Validation(format!(
                "longitude {lng} must be within [-180, 180]"
            )));
        }

        Ok(Self { lat, lng })
    }
}

/// Validates an ordered polygon boundary.
pub fn validate_polygon(points: &[LatLng]) -> AppResult<()> {
    if points.len() < POLYGON_MIN_POINTS {
        return Err(AppError::Validation(format!(
            "polygon must have at least {POLYGON_MIN_POINTS} points"
        )));
    }

    for point in points {
        LatLng::new(point.lat, point.lng)?;
    }

    Ok(())
}

/// Governorate lookup row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Governorate {
    /// Record identifier.
    pub id: RecordId,
    /// English name.
    pub name: String,
    /// Arabic name.
    #[serde(default)]
    pub name_ar: Option<String>,
}

impl Governorate {
    /// Returns the name in the requested language, falling back to English.
    #[must_use]
    pub fn localized_name(&self, language: Language) -> &str {
        match language {
            Language::Ar => self.name_ar.as_deref().unwrap_or(self.name.as_str()),
            Language::En => self.name.as_str(),
        }
    }
}

/// Resolves a governorate display name by id.
#[must_use]
pub fn governorate_name(
    governorates: &[Governorate],
    id: RecordId,
    language: Language,
) -> Option<&str> {
    governorates
        .iter()
        .find(|governorate| governorate.id == id)
        .map(|governorate| governorate.localized_name(language))
}

/// Searchable governorate fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GovernorateField {
    /// English name.
    Name,
    /// Arabic name.
    NameAr,
}

impl Queryable for Governorate {
    type Field = GovernorateField;

    fn search_fields() -> &'static [GovernorateField] {
        &[GovernorateField::Name, GovernorateField::NameAr]
    }

    fn field_value(&self, field: GovernorateField) -> FieldValue {
        match field {
            GovernorateField::Name => FieldValue::text(self.name.as_str()),
            GovernorateField::NameAr => FieldValue::optional_text(self.name_ar.as_deref()),
        }
    }
}

impl Record for Governorate {
    const LABEL: &'static str = "governorate";

    fn id(&self) -> RecordId {
        self.id
    }
}

/// Delivery area inside a governorate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    /// Record identifier.
    pub id: RecordId,
    /// Area name.
    pub name: String,
    /// Parent governorate.
    pub governorate_id: RecordId,
    /// Ordered boundary vertices.
    #[serde(default)]
    pub polygon: Vec<LatLng>,
}

impl Area {
    /// Returns whether the stored boundary is a usable polygon.
    #[must_use]
    pub fn has_valid_polygon(&self) -> bool {
        validate_polygon(&self.polygon).is_ok()
    }
}

/// Searchable and sortable area fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaField {
    /// Area name.
    Name,
    /// Parent governorate id.
    GovernorateId,
    /// Vertex count.
    PointCount,
}

impl Queryable for Area {
    type Field = AreaField;

    fn search_fields() -> &'static [AreaField] {
        &[AreaField::Name]
    }

    fn field_value(&self, field: AreaField) -> FieldValue {
        match field {
            AreaField::Name => FieldValue::text(self.name.as_str()),
            AreaField::GovernorateId => FieldValue::Number(self.governorate_id.value() as f64),
            AreaField::PointCount => FieldValue::Number(self.polygon.len() as f64),
        }
    }
}

impl Record for Area {
    const LABEL: &'static str = "area";

    fn id(&self) -> RecordId {
        self.id
    }
}

/// Area form payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaInput {
    /// Area name.
    pub name: String,
    /// Parent governorate.
    pub governorate_id: RecordId,
    /// Ordered boundary vertices.
    pub polygon: Vec<LatLng>,
}

impl ResourceInput for AreaInput {
    fn validate(&self, _kind: MutationKind) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("name is required".to_owned()));
        }

        if self.governorate_id.value() <= 0 {
            return Err(AppError::Validation(
                "a saved governorate must be selected".to_owned(),
            ));
        }

        validate_polygon(&self.polygon)
    }
}

impl Resource for Area {
    type Input = AreaInput;

    fn provisional(id: RecordId, input: &AreaInput) -> Self {
        Self {
            id,
            name: input.name.trim().to_owned(),
            governorate_id: input.governorate_id,
            polygon: input.polygon.clone(),
        }
    }

    fn merged(&self, input: &AreaInput) -> Self {
        Self::provisional(self.id, input)
    }
}
