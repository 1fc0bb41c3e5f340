use marketdesk_core::{AppError, AppResult, RecordId};
use serde::{Deserialize, Serialize};

use crate::resource::{MutationKind, Record, Resource, ResourceInput};
use crate::view::{FieldValue, Queryable};

/// Supplier subscription plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Record identifier.
    pub id: RecordId,
    /// Plan name.
    pub name: String,
    /// Monthly price.
    pub price_per_month: f64,
    /// Maximum clients a supplier may serve on this plan.
    pub max_clients: u32,
    /// Whether the plan was negotiated for a single supplier.
    #[serde(default)]
    pub is_custom: bool,
    /// Whether suppliers can pick the plan.
    #[serde(default)]
    pub is_active: bool,
}

/// Searchable and sortable plan fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanField {
    /// Plan name.
    Name,
    /// Monthly price.
    PricePerMonth,
    /// Client cap.
    MaxClients,
    /// Custom/standard facet.
    IsCustom,
    /// Active facet.
    IsActive,
}

impl Queryable for Plan {
    type Field = PlanField;

    fn search_fields() -> &'static [PlanField] {
        &[PlanField::Name]
    }

    fn field_value(&self, field: PlanField) -> FieldValue {
        match field {
            PlanField::Name => FieldValue::text(self.name.as_str()),
            PlanField::PricePerMonth => FieldValue::Number(self.price_per_month),
            PlanField::MaxClients => FieldValue::Number(f64::from(self.max_clients)),
            PlanField::IsCustom => FieldValue::Bool(self.is_custom),
            PlanField::IsActive => FieldValue::Bool(self.is_active),
        }
    }
}

impl Record for Plan {
    const LABEL: &'static str = "plan";

    fn id(&self) -> RecordId {
        self.id
    }
}

/// Plan form payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanInput {
    /// Plan name.
    pub name: String,
    /// Monthly price.
    pub price_per_month: f64,
    /// Maximum clients.
    pub max_clients: u32,
    /// Custom plan flag.
    pub is_custom: bool,
    /// Active flag.
    pub is_active: bool,
}

impl ResourceInput for PlanInput {
    fn validate(&self, _kind: MutationKind) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("name is required".to_owned()));
        }

        if !self.price_per_month.is_finite() || self.price_per_month < 0.0 {
            return Err(AppError::Validation(
                "price_per_month must be greater than or equal to zero".to_owned(),
            ));
        }

        if self.max_clients == 0 {
            return Err(AppError::Validation(
                "max_clients must be greater than zero".to_owned(),
            ));
        }

        Ok(())
    }
}

impl Resource for Plan {
    type Input = PlanInput;

    fn provisional(id: RecordId, input: &PlanInput) -> Self {
        Self {
            id,
            name: input.name.trim().to_owned(),
            price_per_month: input.price_per_month,
            max_clients: input.max_clients,
            is_custom: input.is_custom,
            is_active: input.is_active,
        }
    }

    fn merged(&self, input: &PlanInput) -> Self {
        Self::provisional(self.id, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(price: f64, max_clients: u32) -> PlanInput {
        PlanInput {
            name: "Starter".to_owned(),
            price_per_month: price,
            max_clients,
            is_custom: false,
            is_active: true,
        }
    }

    #[test]
    fn free_plan_is_valid() {
        assert!(input(0.0, 10).validate(MutationKind::Create).is_ok());
    }

    #[test]
    fn negative_price_is_rejected() {
        assert!(input(-1.0, 10).validate(MutationKind::Create).is_err());
        assert!(input(f64::NAN, 10).validate(MutationKind::Create).is_err());
    }

    #[test]
    fn zero_client_cap_is_rejected() {
        assert!(input(100.0, 0).validate(MutationKind::Update).is_err());
    }
}
