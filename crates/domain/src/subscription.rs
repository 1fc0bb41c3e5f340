//! Supplier subscriptions and the requests that create them.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use marketdesk_core::{AppError, AppResult, RecordId};
use serde::{Deserialize, Serialize};

use crate::resource::{MutationKind, Record, Resource, ResourceInput};
use crate::upload::{UploadFile, UploadRule};
use crate::view::{FieldValue, Queryable};

/// Id and display name of a related record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    /// Related record id.
    pub id: RecordId,
    /// Related record display name.
    #[serde(default)]
    pub name: String,
}

/// Subscription lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Currently entitles the supplier.
    Active,
    /// Ran past its end date.
    Expired,
    /// Ended early by an administrator.
    Cancelled,
}

impl SubscriptionStatus {
    /// Returns the stable wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
        }
    }
}

impl FromStr for SubscriptionStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "expired" => Ok(Self::Expired),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(AppError::Validation(format!(
                "unknown subscription status '{value}'"
            ))),
        }
    }
}

/// Supplier subscription to a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Record identifier.
    pub id: RecordId,
    /// Subscribed supplier.
    pub supplier: NamedRef,
    /// Subscribed plan.
    pub plan: NamedRef,
    /// Lifecycle status.
    pub status: SubscriptionStatus,
    /// First day covered.
    pub start_date: NaiveDate,
    /// Last day covered.
    pub end_date: NaiveDate,
}

impl Subscription {
    /// Returns days left on `today`, zero once the end date has passed.
    #[must_use]
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        (self.end_date - today).num_days().max(0)
    }
}

/// Searchable and sortable subscription fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionField {
    /// Supplier name.
    Supplier,
    /// Plan name.
    Plan,
    /// Status facet.
    Status,
    /// Start date.
    StartDate,
    /// End date.
    EndDate,
}

impl Queryable for Subscription {
    type Field = SubscriptionField;

    fn search_fields() -> &'static [SubscriptionField] {
        &[SubscriptionField::Supplier, SubscriptionField::Plan]
    }

    fn field_value(&self, field: SubscriptionField) -> FieldValue {
        match field {
            SubscriptionField::Supplier => FieldValue::text(self.supplier.name.as_str()),
            SubscriptionField::Plan => FieldValue::text(self.plan.name.as_str()),
            SubscriptionField::Status => FieldValue::text(self.status.as_str()),
            SubscriptionField::StartDate => FieldValue::Date(self.start_date),
            SubscriptionField::EndDate => FieldValue::Date(self.end_date),
        }
    }
}

impl Record for Subscription {
    const LABEL: &'static str = "subscription";

    fn id(&self) -> RecordId {
        self.id
    }
}

/// Subscription edit payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionInput {
    /// Subscribed supplier.
    pub supplier_id: RecordId,
    /// Subscribed plan.
    pub plan_id: RecordId,
    /// Plan name shown until the backend answers.
    #[serde(skip)]
    pub plan_name: Option<String>,
    /// Lifecycle status.
    pub status: SubscriptionStatus,
    /// First day covered.
    pub start_date: NaiveDate,
    /// Last day covered.
    pub end_date: NaiveDate,
    /// Receipt attached to a manual subscription; sent as multipart when present.
    #[serde(skip)]
    pub payment_proof: Option<UploadFile>,
}

impl ResourceInput for SubscriptionInput {
    fn validate(&self, _kind: MutationKind) -> AppResult<()> {
        if self.end_date < self.start_date {
            return Err(AppError::Validation(
                "end_date must not be before start_date".to_owned(),
            ));
        }

        if let Some(proof) = &self.payment_proof {
            UploadRule::PAYMENT_PROOF.admits(proof)?;
        }

        Ok(())
    }

    fn upload(&self) -> Option<(&'static str, &UploadFile)> {
        self.payment_proof
            .as_ref()
            .map(|proof| ("payment_proof", proof))
    }
}

impl Resource for Subscription {
    type Input = SubscriptionInput;

    fn provisional(id: RecordId, input: &SubscriptionInput) -> Self {
        Self {
            id,
            supplier: NamedRef {
                id: input.supplier_id,
                name: String::new(),
            },
            plan: NamedRef {
                id: input.plan_id,
                name: input.plan_name.clone().unwrap_or_default(),
            },
            status: input.status,
            start_date: input.start_date,
            end_date: input.end_date,
        }
    }

    fn merged(&self, input: &SubscriptionInput) -> Self {
        let supplier = if self.supplier.id == input.supplier_id {
            self.supplier.clone()
        } else {
            NamedRef {
                id: input.supplier_id,
                name: String::new(),
            }
        };
        let plan = match (&input.plan_name, self.plan.id == input.plan_id) {
            (Some(name), _) => NamedRef {
                id: input.plan_id,
                name: name.clone(),
            },
            (None, true) => self.plan.clone(),
            (None, false) => NamedRef {
                id: input.plan_id,
                name: String::new(),
            },
        };

        Self {
            id: self.id,
            supplier,
            plan,
            status: input.status,
            start_date: input.start_date,
            end_date: input.end_date,
        }
    }
}

/// Review status of a subscription request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Awaiting an administrator decision.
    Pending,
    /// Accepted; a subscription was issued.
    Approved,
    /// Declined.
    Rejected,
}

impl RequestStatus {
    /// Returns the stable wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Applies a review decision. Only pending requests can be decided.
    pub fn decide(self, decision: ReviewDecision) -> AppResult<Self> {
        match self {
            Self::Pending => Ok(match decision {
                ReviewDecision::Approve => Self::Approved,
                ReviewDecision::Reject => Self::Rejected,
            }),
            decided => Err(AppError::Conflict(format!(
                "request is already {}",
                decided.as_str()
            ))),
        }
    }
}

/// Administrator decision on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    /// Accept the request.
    Approve,
    /// Decline the request.
    Reject,
}

impl ReviewDecision {
    /// Returns the endpoint segment for this decision.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

/// Supplier request to subscribe to a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRequest {
    /// Record identifier.
    pub id: RecordId,
    /// Requesting supplier.
    pub supplier: NamedRef,
    /// Requested plan.
    pub plan: NamedRef,
    /// Review status.
    pub status: RequestStatus,
    /// Number of months requested.
    pub months_requested: u32,
    /// URL of the uploaded payment proof.
    #[serde(default)]
    pub payment_proof: Option<String>,
    /// Reason given when the request was rejected.
    #[serde(default)]
    pub rejection_reason: Option<String>,
    /// Submission time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl SubscriptionRequest {
    /// Returns a copy with the decision applied.
    pub fn decided(&self, decision: ReviewDecision, reason: Option<&str>) -> AppResult<Self> {
        let status = self.status.decide(decision)?;
        let rejection_reason = match decision {
            ReviewDecision::Reject => reason
                .map(str::trim)
                .filter(|reason| !reason.is_empty())
                .map(str::to_owned),
            ReviewDecision::Approve => None,
        };

        Ok(Self {
            status,
            rejection_reason,
            ..self.clone()
        })
    }

    /// Returns the decisions still available for this request.
    #[must_use]
    pub fn available_decisions(&self) -> &'static [ReviewDecision] {
        match self.status {
            RequestStatus::Pending => &[ReviewDecision::Approve, ReviewDecision::Reject],
            RequestStatus::Approved | RequestStatus::Rejected => &[],
        }
    }
}

/// Searchable and sortable request fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionRequestField {
    /// Supplier name.
    Supplier,
    /// Plan name.
    Plan,
    /// Status facet.
    Status,
    /// Requested months.
    MonthsRequested,
    /// Submission time.
    CreatedAt,
}

impl Queryable for SubscriptionRequest {
    type Field = SubscriptionRequestField;

    fn search_fields() -> &'static [SubscriptionRequestField] {
        &[
            SubscriptionRequestField::Supplier,
            SubscriptionRequestField::Plan,
        ]
    }

    fn field_value(&self, field: SubscriptionRequestField) -> FieldValue {
        match field {
            SubscriptionRequestField::Supplier => FieldValue::text(self.supplier.name.as_str()),
            SubscriptionRequestField::Plan => FieldValue::text(self.plan.name.as_str()),
            SubscriptionRequestField::Status => FieldValue::text(self.status.as_str()),
            SubscriptionRequestField::MonthsRequested => {
                FieldValue::Number(f64::from(self.months_requested))
            }
            SubscriptionRequestField::CreatedAt => self
                .created_at
                .map_or(FieldValue::Missing, FieldValue::Timestamp),
        }
    }
}

impl Record for SubscriptionRequest {
    const LABEL: &'static str = "subscription request";

    fn id(&self) -> RecordId {
        self.id
    }
}
