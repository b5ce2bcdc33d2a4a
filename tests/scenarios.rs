//! End-to-end allocation scenarios.

use u_credit::allocation::{allocate, ExclusionReason, OVERFLOW_LABEL, PROMOTED_LABEL};
use u_credit::rule::{CombinedLimit, Group, GroupedRule, Rule, TieredRule};
use u_credit::subject::Subject;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn ab() -> Vec<Subject> {
    vec![Subject::new("A", 90.0, 2.0), Subject::new("B", 80.0, 2.0)]
}

#[test]
fn grouped_without_caps_includes_everything() {
    init_tracing();
    let rule = Rule::Grouped(GroupedRule::default().with_group(Group::named("g", ["A", "B"])));
    let r = allocate(&ab(), &rule);

    assert!(approx(r.score, 340.0));
    assert!(approx(r.max_score, 400.0));
    assert!(approx(r.credits, 4.0));
    assert_eq!(r.excluded().count(), 0);
}

#[test]
fn group_cap_keeps_higher_grade() {
    let rule = Rule::Grouped(
        GroupedRule::default().with_group(Group::named("g", ["A", "B"]).with_cap(2.0)),
    );
    let r = allocate(&ab(), &rule);

    assert!(r.is_included("A"));
    assert_eq!(r.entry("B").unwrap().reason, Some(ExclusionReason::CapExceeded));
    assert!(approx(r.credits, 2.0));
    assert!(approx(r.score, 180.0));
}

#[test]
fn tiered_promotion_then_overflow() {
    let subjects = vec![Subject::new("C", 70.0, 2.0), Subject::new("D", 60.0, 2.0)];
    let rule = Rule::Tiered(TieredRule::default().with_other_priority_cap(2.0));
    let r = allocate(&subjects, &rule);

    let c = r.entry("C").unwrap().contribution.clone().unwrap();
    assert_eq!(c.label, PROMOTED_LABEL);
    assert!(approx(c.weight, 1.0));

    let d = r.entry("D").unwrap().contribution.clone().unwrap();
    assert_eq!(d.label, OVERFLOW_LABEL);
    assert!(approx(d.multiplier, 0.1));
    assert!(approx(d.points, 12.0));
}

#[test]
fn combined_limit_spans_groups() {
    let subjects = vec![
        Subject::new("X1", 90.0, 2.0),
        Subject::new("Y1", 85.0, 1.0),
        Subject::new("Y2", 80.0, 1.0),
    ];
    let rule = Rule::Grouped(
        GroupedRule::default()
            .with_group(Group::named("G1", ["X1"]))
            .with_group(Group::named("G2", ["Y1", "Y2"]))
            .with_combined_limit(CombinedLimit::new("shared", ["G1", "G2"], 3.0)),
    );
    let r = allocate(&subjects, &rule);

    assert!(approx(r.credits, 3.0));
    assert_eq!(r.included().count(), 2);
    assert!(!r.is_included("Y2"));
}

#[test]
fn every_subject_reported_once() {
    init_tracing();
    let subjects = vec![
        Subject::new("A", 90.0, 2.0),
        Subject::new("B", 80.0, 2.0),
        Subject::new("C", 70.0, 2.0),
        Subject::new("D", 60.0, 2.0),
    ];
    let rule = Rule::Grouped(
        GroupedRule::default()
            .with_group(Group::named("g", ["A", "B"]).with_cap(2.0))
            .with_other_weight(0.5)
            .with_total_cap(4.0),
    );
    let r = allocate(&subjects, &rule);

    assert_eq!(r.breakdown.len(), subjects.len());
    for s in &subjects {
        assert_eq!(r.breakdown.iter().filter(|e| e.subject == s.name).count(), 1);
    }
    for e in r.excluded() {
        assert!(e.reason.is_some());
    }
    for e in r.included() {
        assert!(e.contribution.is_some());
        assert!(e.text.contains(&e.subject));
    }
}

#[cfg(feature = "serde")]
mod json {
    use super::*;

    #[test]
    fn physics_style_rule_document() {
        let rule = Rule::from_json_str(
            r#"{
                "type": "tiered",
                "priorityKeywords": ["物理学"],
                "priorityWeight": 2,
                "priorityCreditCap": 4,
                "otherPriorityCap": 2
            }"#,
        )
        .unwrap();

        let subjects = vec![
            Subject::new("物理学 １", 90.0, 2.0),
            Subject::new("物理学２", 70.0, 2.0),
            Subject::new("物理学３", 60.0, 2.0),
            Subject::new("English", 95.0, 2.0),
        ];
        let r = allocate(&subjects, &rule);

        // Pool: 物理学1 (180), 物理学2 (140), 物理学3 (120), English promoted (95).
        // Priority cap 4 admits the first two; the rest overflow.
        assert!(r.is_included("物理学 １"));
        assert!(r.is_included("物理学２"));
        let expected = 90.0 * 2.0 * 2.0
            + 70.0 * 2.0 * 2.0
            + 60.0 * 2.0 * 2.0 * 0.1
            + 95.0 * 2.0 * 1.0 * 0.1;
        assert!(approx(r.score, expected));
        assert!(approx(r.credits, 8.0));
    }

    #[test]
    fn loose_transcript_and_rule_documents() {
        let subjects: Vec<Subject> = serde_json::from_str(
            r#"[
                { "name": "A", "grade": "90", "credits": 2 },
                { "name": 7, "grade": 80, "credits": null }
            ]"#,
        )
        .unwrap();
        let rule = Rule::from_json_str(
            r#"{
                "type": "grouped",
                "totalCap": null,
                "groups": [{ "name": "g", "subjects": ["A"], "cap": "4" }]
            }"#,
        )
        .unwrap();
        let r = allocate(&subjects, &rule);

        assert!(approx(r.score, 180.0));
        assert_eq!(r.breakdown.len(), 2);
        assert_eq!(r.breakdown[1].subject, "");
        assert_eq!(r.breakdown[1].reason, Some(ExclusionReason::NoMatchingGroup));
    }

    #[test]
    fn result_serializes_camel_case() {
        let rule = Rule::Grouped(GroupedRule::default().with_group(Group::named("g", ["A"])));
        let r = allocate(&ab(), &rule);
        let json = serde_json::to_value(&r).unwrap();

        assert!(json.get("maxScore").is_some());
        assert_eq!(json["breakdown"][0]["status"], "included");
        assert_eq!(json["breakdown"][1]["reason"], "noMatchingGroup");
        assert_eq!(json["breakdown"][1]["text"], "B: belongs to no group");
        assert!(json["breakdown"][0].get("reason").is_none());
    }
}
