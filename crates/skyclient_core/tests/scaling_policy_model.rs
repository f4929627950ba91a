use skyclient_core::model::scaling_policy::{AdjustmentType, MetricAggregationType, PolicyType};
use skyclient_core::{Alarm, DescribePoliciesResult, ScalingPolicy, StepAdjustment};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

fn full_policy() -> ScalingPolicy {
    ScalingPolicy::new()
        .with_auto_scaling_group_name("web-asg")
        .with_policy_name("scale-out")
        .with_policy_arn("arn:aws:autoscaling:us-east-1:123456789012:scalingPolicy:abc")
        .with_policy_type(PolicyType::StepScaling)
        .with_adjustment_type(AdjustmentType::ChangeInCapacity)
        .with_min_adjustment_step(1)
        .with_min_adjustment_magnitude(2)
        .with_scaling_adjustment(3)
        .with_cooldown(300)
        .with_step_adjustment(
            StepAdjustment::new()
                .with_metric_interval_lower_bound(0.0)
                .with_metric_interval_upper_bound(10.5)
                .with_scaling_adjustment(1),
        )
        .with_metric_aggregation_type(MetricAggregationType::Average)
        .with_estimated_instance_warmup(120)
        .with_alarm(
            Alarm::new()
                .with_alarm_name("high-cpu")
                .with_alarm_arn("arn:aws:cloudwatch:us-east-1:123456789012:alarm:high-cpu"),
        )
}

#[test]
fn every_field_reads_back_what_was_set() {
    let policy = full_policy();

    assert_eq!(policy.auto_scaling_group_name(), Some("web-asg"));
    assert_eq!(policy.policy_name(), Some("scale-out"));
    assert_eq!(
        policy.policy_arn(),
        Some("arn:aws:autoscaling:us-east-1:123456789012:scalingPolicy:abc")
    );
    assert_eq!(policy.policy_type(), Some("StepScaling"));
    assert_eq!(policy.adjustment_type(), Some("ChangeInCapacity"));
    assert_eq!(policy.min_adjustment_step(), Some(1));
    assert_eq!(policy.min_adjustment_magnitude(), Some(2));
    assert_eq!(policy.scaling_adjustment(), Some(3));
    assert_eq!(policy.cooldown(), Some(300));
    assert_eq!(policy.metric_aggregation_type(), Some("Average"));
    assert_eq!(policy.estimated_instance_warmup(), Some(120));
    assert_eq!(policy.step_adjustments().len(), 1);
    assert_eq!(
        policy.step_adjustments()[0].metric_interval_upper_bound(),
        Some(10.5)
    );
    assert_eq!(policy.alarms()[0].alarm_name(), Some("high-cpu"));
}

#[test]
fn setters_replace_and_clear_values() {
    let mut policy = ScalingPolicy::new();
    policy.set_policy_name(Some("first".to_string()));
    policy.set_policy_name(Some("second".to_string()));
    assert_eq!(policy.policy_name(), Some("second"));

    policy.set_cooldown(Some(60));
    policy.set_cooldown(None);
    assert_eq!(policy.cooldown(), None);
}

#[test]
fn unpopulated_lists_read_back_empty_and_mutable() {
    let mut policy = ScalingPolicy::new();
    assert!(policy.step_adjustments().is_empty());
    assert!(policy.alarms().is_empty());

    policy.alarms_mut().push(Alarm::new().with_alarm_name("queue-depth"));
    policy
        .step_adjustments_mut()
        .push(StepAdjustment::new().with_scaling_adjustment(-1));
    assert_eq!(policy.alarms().len(), 1);
    assert_eq!(policy.step_adjustments()[0].scaling_adjustment(), Some(-1));
}

#[test]
fn list_setters_replace_append_and_clear() {
    let first = Alarm::new().with_alarm_name("a");
    let second = Alarm::new().with_alarm_name("b");

    let policy = ScalingPolicy::new()
        .with_alarm(first.clone())
        .with_alarm(second.clone());
    assert_eq!(policy.alarms(), &[first.clone(), second.clone()]);

    let policy = policy.with_alarms(vec![second.clone()]);
    assert_eq!(policy.alarms(), &[second]);

    let mut policy = policy;
    policy.set_alarms(None);
    assert!(policy.alarms().is_empty());

    policy.set_step_adjustments(Some(vec![StepAdjustment::new().with_scaling_adjustment(4)]));
    assert_eq!(policy.step_adjustments().len(), 1);
    policy.set_step_adjustments(None);
    assert!(policy.step_adjustments().is_empty());

    let policy = policy.with_step_adjustments(
        [1, 2, 3].map(|step| StepAdjustment::new().with_scaling_adjustment(step)),
    );
    assert_eq!(policy.step_adjustments()[2].scaling_adjustment(), Some(3));
}

#[test]
fn equal_records_hash_identically() {
    let left = full_policy();
    let right = full_policy();
    assert_eq!(left, right);
    assert_eq!(hash_of(&left), hash_of(&right));

    let different = full_policy().with_cooldown(301);
    assert_ne!(left, different);

    let mut set = HashSet::new();
    set.insert(left);
    set.insert(right);
    assert_eq!(set.len(), 1);
}

#[test]
fn unset_list_equals_explicitly_empty_list() {
    let mut explicit = ScalingPolicy::new();
    explicit.set_step_adjustments(Some(Vec::new()));
    assert_eq!(explicit, ScalingPolicy::new());
    assert_eq!(hash_of(&explicit), hash_of(&ScalingPolicy::new()));
}

#[test]
fn clone_is_equal_but_independent() {
    let original = full_policy();
    let mut copy = original.clone();
    assert_eq!(copy, original);

    copy.alarms_mut().clear();
    copy.set_policy_name(Some("changed".to_string()));
    assert_eq!(original.alarms().len(), 1);
    assert_eq!(original.policy_name(), Some("scale-out"));
    assert_ne!(copy, original);
}

#[test]
fn step_adjustment_equality_compares_bounds_bitwise() {
    let nan = StepAdjustment::new().with_metric_interval_lower_bound(f64::NAN);
    assert_eq!(nan, nan.clone());
    assert_eq!(hash_of(&nan), hash_of(&nan.clone()));

    let positive = StepAdjustment::new().with_metric_interval_lower_bound(0.0);
    let negative = StepAdjustment::new().with_metric_interval_lower_bound(-0.0);
    assert_ne!(positive, negative);
}

#[test]
fn display_lists_fields_in_wire_order() {
    let rendered = full_policy().to_string();
    assert!(rendered.starts_with("{AutoScalingGroupName: web-asg,PolicyName: scale-out,"));
    assert!(rendered.contains(",Cooldown: 300,StepAdjustments: [{"));
    assert!(rendered.contains("MetricAggregationType: Average,EstimatedInstanceWarmup: 120,"));
    assert!(rendered.ends_with("}]}"));
    assert_eq!(ScalingPolicy::new().to_string(), "{StepAdjustments: [],Alarms: []}");
}

#[test]
fn serialization_uses_service_field_names() {
    let json = serde_json::to_value(full_policy()).unwrap();
    assert_eq!(json["AutoScalingGroupName"], "web-asg");
    assert_eq!(
        json["PolicyARN"],
        "arn:aws:autoscaling:us-east-1:123456789012:scalingPolicy:abc"
    );
    assert_eq!(json["StepAdjustments"][0]["MetricIntervalUpperBound"], 10.5);
    assert_eq!(json["Alarms"][0]["AlarmName"], "high-cpu");
    assert!(json["Alarms"][0].get("AlarmARN").is_some());

    let empty = serde_json::to_value(ScalingPolicy::new()).unwrap();
    assert_eq!(empty, serde_json::json!({}));
}

#[test]
fn deserialization_defaults_missing_lists() {
    let policy: ScalingPolicy =
        serde_json::from_str(r#"{"PolicyName":"scale-in","Cooldown":60}"#).unwrap();
    assert_eq!(policy.policy_name(), Some("scale-in"));
    assert_eq!(policy.cooldown(), Some(60));
    assert!(policy.step_adjustments().is_empty());
}

#[test]
fn describe_policies_result_renders_pages() {
    let page = DescribePoliciesResult {
        scaling_policies: vec![ScalingPolicy::new().with_policy_name("a")],
        next_token: Some("token-2".to_string()),
    };
    assert_eq!(
        page.to_string(),
        "{ScalingPolicies: [{PolicyName: a,StepAdjustments: [],Alarms: []}],NextToken: token-2}"
    );
}
