//! Autoscaling policy records.
//!
//! # Responsibility
//! - Describe one scaling policy with its step adjustments and alarms.
//! - Offer getter/setter pairs and consuming fluent setters for chaining.
//!
//! # Invariants
//! - Every scalar field is optional; an unset field is `None`.
//! - List fields are never absent: an unpopulated list reads back empty and
//!   can be mutated in place.
//! - Equality and hashing cover every field.
//!
//! Documented service constraints (not checked locally): group and policy
//! names 1-255 chars, policy ARN 1-1600, policy type 1-64, aggregation type
//! 1-32, all restricted to XML character data.

use crate::model::{DisplayDouble, RecordFormatter};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// Policy type values accepted by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyType {
    SimpleScaling,
    StepScaling,
}

impl PolicyType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SimpleScaling => "SimpleScaling",
            Self::StepScaling => "StepScaling",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "SimpleScaling" => Some(Self::SimpleScaling),
            "StepScaling" => Some(Self::StepScaling),
            _ => None,
        }
    }
}

/// How `ScalingAdjustment` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdjustmentType {
    ChangeInCapacity,
    ExactCapacity,
    PercentChangeInCapacity,
}

impl AdjustmentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ChangeInCapacity => "ChangeInCapacity",
            Self::ExactCapacity => "ExactCapacity",
            Self::PercentChangeInCapacity => "PercentChangeInCapacity",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "ChangeInCapacity" => Some(Self::ChangeInCapacity),
            "ExactCapacity" => Some(Self::ExactCapacity),
            "PercentChangeInCapacity" => Some(Self::PercentChangeInCapacity),
            _ => None,
        }
    }
}

/// Aggregation applied to the CloudWatch metric of a step policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricAggregationType {
    Minimum,
    Maximum,
    Average,
}

impl MetricAggregationType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minimum => "Minimum",
            Self::Maximum => "Maximum",
            Self::Average => "Average",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "Minimum" => Some(Self::Minimum),
            "Maximum" => Some(Self::Maximum),
            "Average" => Some(Self::Average),
            _ => None,
        }
    }
}

impl From<PolicyType> for String {
    fn from(value: PolicyType) -> Self {
        value.as_str().to_string()
    }
}

impl From<AdjustmentType> for String {
    fn from(value: AdjustmentType) -> Self {
        value.as_str().to_string()
    }
}

impl From<MetricAggregationType> for String {
    fn from(value: MetricAggregationType) -> Self {
        value.as_str().to_string()
    }
}

/// One step of a step-scaling policy.
///
/// Bounds are relative to the alarm threshold. A missing lower bound means
/// negative infinity, a missing upper bound positive infinity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StepAdjustment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metric_interval_lower_bound: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metric_interval_upper_bound: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scaling_adjustment: Option<i32>,
}

impl StepAdjustment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metric_interval_lower_bound(&self) -> Option<f64> {
        self.metric_interval_lower_bound
    }

    pub fn set_metric_interval_lower_bound(&mut self, value: Option<f64>) {
        self.metric_interval_lower_bound = value;
    }

    pub fn with_metric_interval_lower_bound(mut self, value: f64) -> Self {
        self.metric_interval_lower_bound = Some(value);
        self
    }

    pub fn metric_interval_upper_bound(&self) -> Option<f64> {
        self.metric_interval_upper_bound
    }

    pub fn set_metric_interval_upper_bound(&mut self, value: Option<f64>) {
        self.metric_interval_upper_bound = value;
    }

    pub fn with_metric_interval_upper_bound(mut self, value: f64) -> Self {
        self.metric_interval_upper_bound = Some(value);
        self
    }

    /// Capacity change applied when the metric falls inside the interval.
    pub fn scaling_adjustment(&self) -> Option<i32> {
        self.scaling_adjustment
    }

    pub fn set_scaling_adjustment(&mut self, value: Option<i32>) {
        self.scaling_adjustment = value;
    }

    pub fn with_scaling_adjustment(mut self, value: i32) -> Self {
        self.scaling_adjustment = Some(value);
        self
    }
}

// Bounds compare by bit pattern so that `Eq` and `Hash` agree (NaN == NaN).
impl PartialEq for StepAdjustment {
    fn eq(&self, other: &Self) -> bool {
        self.metric_interval_lower_bound.map(f64::to_bits)
            == other.metric_interval_lower_bound.map(f64::to_bits)
            && self.metric_interval_upper_bound.map(f64::to_bits)
                == other.metric_interval_upper_bound.map(f64::to_bits)
            && self.scaling_adjustment == other.scaling_adjustment
    }
}

impl Eq for StepAdjustment {}

impl Hash for StepAdjustment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.metric_interval_lower_bound
            .map(f64::to_bits)
            .hash(state);
        self.metric_interval_upper_bound
            .map(f64::to_bits)
            .hash(state);
        self.scaling_adjustment.hash(state);
    }
}

impl Display for StepAdjustment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut record = RecordFormatter::begin(f)?;
        record.optional(
            "MetricIntervalLowerBound",
            self.metric_interval_lower_bound.map(DisplayDouble),
        )?;
        record.optional(
            "MetricIntervalUpperBound",
            self.metric_interval_upper_bound.map(DisplayDouble),
        )?;
        record.optional("ScalingAdjustment", self.scaling_adjustment)?;
        record.finish()
    }
}

/// A CloudWatch alarm attached to a policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Alarm {
    #[serde(
        rename = "AlarmName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    alarm_name: Option<String>,
    #[serde(rename = "AlarmARN", default, skip_serializing_if = "Option::is_none")]
    alarm_arn: Option<String>,
}

impl Alarm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alarm_name(&self) -> Option<&str> {
        self.alarm_name.as_deref()
    }

    pub fn set_alarm_name(&mut self, value: Option<String>) {
        self.alarm_name = value;
    }

    pub fn with_alarm_name(mut self, value: impl Into<String>) -> Self {
        self.alarm_name = Some(value.into());
        self
    }

    pub fn alarm_arn(&self) -> Option<&str> {
        self.alarm_arn.as_deref()
    }

    pub fn set_alarm_arn(&mut self, value: Option<String>) {
        self.alarm_arn = value;
    }

    pub fn with_alarm_arn(mut self, value: impl Into<String>) -> Self {
        self.alarm_arn = Some(value.into());
        self
    }
}

impl Display for Alarm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut record = RecordFormatter::begin(f)?;
        record.optional("AlarmName", self.alarm_name.as_deref())?;
        record.optional("AlarmARN", self.alarm_arn.as_deref())?;
        record.finish()
    }
}

/// An autoscaling policy as returned by `DescribePolicies`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScalingPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auto_scaling_group_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    policy_name: Option<String>,
    #[serde(rename = "PolicyARN", default, skip_serializing_if = "Option::is_none")]
    policy_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    policy_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    adjustment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_adjustment_step: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_adjustment_magnitude: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scaling_adjustment: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cooldown: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    step_adjustments: Vec<StepAdjustment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metric_aggregation_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    estimated_instance_warmup: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    alarms: Vec<Alarm>,
}

impl ScalingPolicy {
    /// Creates an empty policy: every field unset, both lists empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the Auto Scaling group the policy belongs to.
    pub fn auto_scaling_group_name(&self) -> Option<&str> {
        self.auto_scaling_group_name.as_deref()
    }

    pub fn set_auto_scaling_group_name(&mut self, value: Option<String>) {
        self.auto_scaling_group_name = value;
    }

    pub fn with_auto_scaling_group_name(mut self, value: impl Into<String>) -> Self {
        self.auto_scaling_group_name = Some(value.into());
        self
    }

    pub fn policy_name(&self) -> Option<&str> {
        self.policy_name.as_deref()
    }

    pub fn set_policy_name(&mut self, value: Option<String>) {
        self.policy_name = value;
    }

    pub fn with_policy_name(mut self, value: impl Into<String>) -> Self {
        self.policy_name = Some(value.into());
        self
    }

    /// Amazon Resource Name of the policy.
    pub fn policy_arn(&self) -> Option<&str> {
        self.policy_arn.as_deref()
    }

    pub fn set_policy_arn(&mut self, value: Option<String>) {
        self.policy_arn = value;
    }

    pub fn with_policy_arn(mut self, value: impl Into<String>) -> Self {
        self.policy_arn = Some(value.into());
        self
    }

    /// `SimpleScaling` or `StepScaling`; see [`PolicyType`].
    pub fn policy_type(&self) -> Option<&str> {
        self.policy_type.as_deref()
    }

    pub fn set_policy_type(&mut self, value: Option<String>) {
        self.policy_type = value;
    }

    pub fn with_policy_type(mut self, value: impl Into<String>) -> Self {
        self.policy_type = Some(value.into());
        self
    }

    /// How `scaling_adjustment` is interpreted; see [`AdjustmentType`].
    pub fn adjustment_type(&self) -> Option<&str> {
        self.adjustment_type.as_deref()
    }

    pub fn set_adjustment_type(&mut self, value: Option<String>) {
        self.adjustment_type = value;
    }

    pub fn with_adjustment_type(mut self, value: impl Into<String>) -> Self {
        self.adjustment_type = Some(value.into());
        self
    }

    /// Superseded by `min_adjustment_magnitude`; kept for older responses.
    pub fn min_adjustment_step(&self) -> Option<i32> {
        self.min_adjustment_step
    }

    pub fn set_min_adjustment_step(&mut self, value: Option<i32>) {
        self.min_adjustment_step = value;
    }

    pub fn with_min_adjustment_step(mut self, value: i32) -> Self {
        self.min_adjustment_step = Some(value);
        self
    }

    /// Minimum number of instances to scale by for
    /// `PercentChangeInCapacity` adjustments.
    pub fn min_adjustment_magnitude(&self) -> Option<i32> {
        self.min_adjustment_magnitude
    }

    pub fn set_min_adjustment_magnitude(&mut self, value: Option<i32>) {
        self.min_adjustment_magnitude = value;
    }

    pub fn with_min_adjustment_magnitude(mut self, value: i32) -> Self {
        self.min_adjustment_magnitude = Some(value);
        self
    }

    /// Positive values add capacity, negative values remove it.
    pub fn scaling_adjustment(&self) -> Option<i32> {
        self.scaling_adjustment
    }

    pub fn set_scaling_adjustment(&mut self, value: Option<i32>) {
        self.scaling_adjustment = value;
    }

    pub fn with_scaling_adjustment(mut self, value: i32) -> Self {
        self.scaling_adjustment = Some(value);
        self
    }

    /// Seconds after a scaling activity before the next one may start.
    pub fn cooldown(&self) -> Option<i32> {
        self.cooldown
    }

    pub fn set_cooldown(&mut self, value: Option<i32>) {
        self.cooldown = value;
    }

    pub fn with_cooldown(mut self, value: i32) -> Self {
        self.cooldown = Some(value);
        self
    }

    pub fn step_adjustments(&self) -> &[StepAdjustment] {
        &self.step_adjustments
    }

    pub fn step_adjustments_mut(&mut self) -> &mut Vec<StepAdjustment> {
        &mut self.step_adjustments
    }

    /// Replaces the step adjustments; `None` clears them.
    pub fn set_step_adjustments(&mut self, value: Option<Vec<StepAdjustment>>) {
        self.step_adjustments = value.unwrap_or_default();
    }

    /// Appends one step adjustment.
    pub fn with_step_adjustment(mut self, value: StepAdjustment) -> Self {
        self.step_adjustments.push(value);
        self
    }

    /// Replaces the step adjustments.
    pub fn with_step_adjustments(
        mut self,
        values: impl IntoIterator<Item = StepAdjustment>,
    ) -> Self {
        self.step_adjustments = values.into_iter().collect();
        self
    }

    /// See [`MetricAggregationType`].
    pub fn metric_aggregation_type(&self) -> Option<&str> {
        self.metric_aggregation_type.as_deref()
    }

    pub fn set_metric_aggregation_type(&mut self, value: Option<String>) {
        self.metric_aggregation_type = value;
    }

    pub fn with_metric_aggregation_type(mut self, value: impl Into<String>) -> Self {
        self.metric_aggregation_type = Some(value.into());
        self
    }

    /// Seconds until a new instance contributes to the metrics.
    pub fn estimated_instance_warmup(&self) -> Option<i32> {
        self.estimated_instance_warmup
    }

    pub fn set_estimated_instance_warmup(&mut self, value: Option<i32>) {
        self.estimated_instance_warmup = value;
    }

    pub fn with_estimated_instance_warmup(mut self, value: i32) -> Self {
        self.estimated_instance_warmup = Some(value);
        self
    }

    pub fn alarms(&self) -> &[Alarm] {
        &self.alarms
    }

    pub fn alarms_mut(&mut self) -> &mut Vec<Alarm> {
        &mut self.alarms
    }

    /// Replaces the alarms; `None` clears them.
    pub fn set_alarms(&mut self, value: Option<Vec<Alarm>>) {
        self.alarms = value.unwrap_or_default();
    }

    /// Appends one alarm.
    pub fn with_alarm(mut self, value: Alarm) -> Self {
        self.alarms.push(value);
        self
    }

    /// Replaces the alarms.
    pub fn with_alarms(mut self, values: impl IntoIterator<Item = Alarm>) -> Self {
        self.alarms = values.into_iter().collect();
        self
    }
}

impl Display for ScalingPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut record = RecordFormatter::begin(f)?;
        record.optional("AutoScalingGroupName", self.auto_scaling_group_name())?;
        record.optional("PolicyName", self.policy_name())?;
        record.optional("PolicyARN", self.policy_arn())?;
        record.optional("PolicyType", self.policy_type())?;
        record.optional("AdjustmentType", self.adjustment_type())?;
        record.optional("MinAdjustmentStep", self.min_adjustment_step)?;
        record.optional("MinAdjustmentMagnitude", self.min_adjustment_magnitude)?;
        record.optional("ScalingAdjustment", self.scaling_adjustment)?;
        record.optional("Cooldown", self.cooldown)?;
        record.list("StepAdjustments", &self.step_adjustments)?;
        record.optional("MetricAggregationType", self.metric_aggregation_type())?;
        record.optional("EstimatedInstanceWarmup", self.estimated_instance_warmup)?;
        record.list("Alarms", &self.alarms)?;
        record.finish()
    }
}

/// A page of policies from `DescribePolicies`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribePoliciesResult {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scaling_policies: Vec<ScalingPolicy>,
    /// Present when more policies are available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl Display for DescribePoliciesResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut record = RecordFormatter::begin(f)?;
        record.list("ScalingPolicies", &self.scaling_policies)?;
        record.optional("NextToken", self.next_token.as_deref())?;
        record.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{AdjustmentType, Alarm, PolicyType, ScalingPolicy, StepAdjustment};

    #[test]
    fn display_omits_unset_scalars_but_keeps_lists() {
        let policy = ScalingPolicy::new().with_policy_name("scale-out");
        assert_eq!(
            policy.to_string(),
            "{PolicyName: scale-out,StepAdjustments: [],Alarms: []}"
        );
    }

    #[test]
    fn display_renders_nested_records() {
        let policy = ScalingPolicy::new()
            .with_cooldown(300)
            .with_step_adjustment(
                StepAdjustment::new()
                    .with_metric_interval_lower_bound(0.0)
                    .with_scaling_adjustment(2),
            )
            .with_alarm(Alarm::new().with_alarm_name("high-cpu"));
        assert_eq!(
            policy.to_string(),
            "{Cooldown: 300,StepAdjustments: [{MetricIntervalLowerBound: 0.0,ScalingAdjustment: 2}],Alarms: [{AlarmName: high-cpu}]}"
        );
    }

    #[test]
    fn value_enums_round_trip_wire_names() {
        assert_eq!(
            PolicyType::from_wire(PolicyType::StepScaling.as_str()),
            Some(PolicyType::StepScaling)
        );
        assert_eq!(AdjustmentType::from_wire("Bogus"), None);
        let policy = ScalingPolicy::new().with_adjustment_type(AdjustmentType::ExactCapacity);
        assert_eq!(policy.adjustment_type(), Some("ExactCapacity"));
    }

    #[test]
    fn nan_bounds_compare_equal_to_themselves() {
        let step = StepAdjustment::new().with_metric_interval_upper_bound(f64::NAN);
        assert_eq!(step, step.clone());
    }
}
