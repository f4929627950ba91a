//! Autoscaling shape unmarshallers.
//!
//! List members are wrapped as `<List><member>..</member></List>`. The bare
//! list element resets the field to an empty list, each `member` appends.

use crate::model::scaling_policy::{Alarm, DescribePoliciesResult, ScalingPolicy, StepAdjustment};
use crate::transform::simple::{DoubleUnmarshaller, IntegerUnmarshaller, StringUnmarshaller};
use crate::transform::{unmarshall_record, StaxContext, UnmarshallError, Unmarshaller};
use std::io::BufRead;

#[derive(Debug, Clone, Copy, Default)]
pub struct StepAdjustmentUnmarshaller;

impl Unmarshaller<StepAdjustment> for StepAdjustmentUnmarshaller {
    fn unmarshall<R: BufRead>(
        &self,
        context: &mut StaxContext<R>,
    ) -> Result<StepAdjustment, UnmarshallError> {
        unmarshall_record(context, StepAdjustment::new(), |context, target, step| {
            if context.test_expression("MetricIntervalLowerBound", target) {
                step.set_metric_interval_lower_bound(Some(DoubleUnmarshaller.unmarshall(context)?));
            } else if context.test_expression("MetricIntervalUpperBound", target) {
                step.set_metric_interval_upper_bound(Some(DoubleUnmarshaller.unmarshall(context)?));
            } else if context.test_expression("ScalingAdjustment", target) {
                step.set_scaling_adjustment(Some(IntegerUnmarshaller.unmarshall(context)?));
            }
            Ok(())
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AlarmUnmarshaller;

impl Unmarshaller<Alarm> for AlarmUnmarshaller {
    fn unmarshall<R: BufRead>(&self, context: &mut StaxContext<R>) -> Result<Alarm, UnmarshallError> {
        unmarshall_record(context, Alarm::new(), |context, target, alarm| {
            if context.test_expression("AlarmName", target) {
                alarm.set_alarm_name(Some(StringUnmarshaller.unmarshall(context)?));
            } else if context.test_expression("AlarmARN", target) {
                alarm.set_alarm_arn(Some(StringUnmarshaller.unmarshall(context)?));
            }
            Ok(())
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScalingPolicyUnmarshaller;

impl Unmarshaller<ScalingPolicy> for ScalingPolicyUnmarshaller {
    fn unmarshall<R: BufRead>(
        &self,
        context: &mut StaxContext<R>,
    ) -> Result<ScalingPolicy, UnmarshallError> {
        unmarshall_record(context, ScalingPolicy::new(), |context, target, policy| {
            if context.test_expression("AutoScalingGroupName", target) {
                policy.set_auto_scaling_group_name(Some(StringUnmarshaller.unmarshall(context)?));
            } else if context.test_expression("PolicyName", target) {
                policy.set_policy_name(Some(StringUnmarshaller.unmarshall(context)?));
            } else if context.test_expression("PolicyARN", target) {
                policy.set_policy_arn(Some(StringUnmarshaller.unmarshall(context)?));
            } else if context.test_expression("PolicyType", target) {
                policy.set_policy_type(Some(StringUnmarshaller.unmarshall(context)?));
            } else if context.test_expression("AdjustmentType", target) {
                policy.set_adjustment_type(Some(StringUnmarshaller.unmarshall(context)?));
            } else if context.test_expression("MinAdjustmentStep", target) {
                policy.set_min_adjustment_step(Some(IntegerUnmarshaller.unmarshall(context)?));
            } else if context.test_expression("MinAdjustmentMagnitude", target) {
                policy.set_min_adjustment_magnitude(Some(IntegerUnmarshaller.unmarshall(context)?));
            } else if context.test_expression("ScalingAdjustment", target) {
                policy.set_scaling_adjustment(Some(IntegerUnmarshaller.unmarshall(context)?));
            } else if context.test_expression("Cooldown", target) {
                policy.set_cooldown(Some(IntegerUnmarshaller.unmarshall(context)?));
            } else if context.test_expression("StepAdjustments", target) {
                policy.step_adjustments_mut().clear();
            } else if context.test_expression("StepAdjustments/member", target) {
                let step = StepAdjustmentUnmarshaller.unmarshall(context)?;
                policy.step_adjustments_mut().push(step);
            } else if context.test_expression("MetricAggregationType", target) {
                policy.set_metric_aggregation_type(Some(StringUnmarshaller.unmarshall(context)?));
            } else if context.test_expression("EstimatedInstanceWarmup", target) {
                policy.set_estimated_instance_warmup(Some(IntegerUnmarshaller.unmarshall(context)?));
            } else if context.test_expression("Alarms", target) {
                policy.alarms_mut().clear();
            } else if context.test_expression("Alarms/member", target) {
                let alarm = AlarmUnmarshaller.unmarshall(context)?;
                policy.alarms_mut().push(alarm);
            }
            Ok(())
        })
    }
}

/// Decodes a `DescribePolicies` response page.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescribePoliciesResultUnmarshaller;

impl Unmarshaller<DescribePoliciesResult> for DescribePoliciesResultUnmarshaller {
    fn unmarshall<R: BufRead>(
        &self,
        context: &mut StaxContext<R>,
    ) -> Result<DescribePoliciesResult, UnmarshallError> {
        unmarshall_record(
            context,
            DescribePoliciesResult::default(),
            |context, target, result| {
                if context.test_expression("ScalingPolicies", target) {
                    result.scaling_policies.clear();
                } else if context.test_expression("ScalingPolicies/member", target) {
                    let policy = ScalingPolicyUnmarshaller.unmarshall(context)?;
                    result.scaling_policies.push(policy);
                } else if context.test_expression("NextToken", target) {
                    result.next_token = Some(StringUnmarshaller.unmarshall(context)?);
                }
                Ok(())
            },
        )
    }
}
