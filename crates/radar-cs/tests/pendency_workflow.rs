//! End-to-end checks through the public facade: wire JSON in, ranked radar out.

use chrono::{DateTime, TimeZone, Utc};
use radar_cs::workflows::intake::SnapshotImporter;
use radar_cs::workflows::pendencies::{
    CsmFilter, PendencyConfig, PendencyEngine, PendingKind, PortfolioSnapshot, Urgency,
};
use serde_json::json;

fn evaluation_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap()
}

fn portfolio() -> PortfolioSnapshot {
    SnapshotImporter::from_value(json!({
        "accounts": [
            {
                "id": "acc-clean",
                "name": "Clean Co",
                "csm": "Bruno",
                "healthScore": 91,
                "website": "https://clean.example.com",
                "industry": "SaaS",
                "employees": 80,
                "updatedAt": "2025-09-29T10:00:00Z",
                "internalKickoff": {
                    "customerSituation": "a", "painPoints": "b", "expectedOutcomes": "c"
                }
            },
            {
                "id": "acc-renewal",
                "name": "Renewal Co",
                "csm": "Ana",
                "health_score": "88",
                "website": "https://renewal.example.com",
                "industry": "Varejo",
                "employees": "250",
                "contract_end": "2025-11-15",
                "updated_at": "2025-09-30T08:00:00",
                "internal_kickoff": {
                    "customer_situation": "a", "pain_points": "b", "expected_outcomes": "c"
                }
            },
            {
                "id": "acc-critical",
                "name": "Critical Co",
                "csm": "Ana",
                "healthScore": 82,
                "status": "Crítico",
                "website": "https://critical.example.com",
                "industry": "Indústria",
                "employees": 40,
                "updatedAt": "2025-09-30T00:00:00Z",
                "internalKickoff": {
                    "customerSituation": "a", "painPoints": "b", "expectedOutcomes": "c"
                }
            },
            {
                "id": "acc-gaps",
                "name": "Gaps Co",
                "csm": "Bruno",
                "healthScore": 90,
                "industry": "Saúde",
                "updatedAt": "2025-09-30T00:00:00Z",
                "internalKickoff": {
                    "customerSituation": "a", "painPoints": "b", "expectedOutcomes": "c"
                }
            }
        ],
        "activities": [
            { "accountId": "acc-clean", "activityDate": "2025-09-28", "status": "completed" },
            { "account_id": "acc-renewal", "activity_date": "2025-09-30", "status": "completed" },
            { "account_id": "acc-gaps", "created_at": "2025-09-25T12:00:00Z" }
        ],
        "tasks": [
            { "accountId": "acc-clean", "createdAt": "2025-09-20", "dueDate": "2025-10-10" }
        ]
    }))
    .expect("portfolio parses")
}

#[test]
fn radar_ranks_accounts_and_counts_items() {
    let snapshot = portfolio();
    let report = PendencyEngine::new(PendencyConfig::default()).evaluate(
        snapshot.view(),
        &CsmFilter::All,
        evaluation_time(),
    );

    let order: Vec<_> = report
        .accounts_with_pendencies
        .iter()
        .map(|entry| entry.account.id.as_str())
        .collect();
    assert_eq!(order, vec!["acc-critical", "acc-renewal", "acc-gaps"]);

    let critical = &report.accounts_with_pendencies[0];
    assert_eq!(critical.urgency_level, Urgency::Red);
    assert_eq!(critical.total_pending, 2);

    let renewal = &report.accounts_with_pendencies[1];
    assert_eq!(renewal.urgency_level, Urgency::Orange);
    assert_eq!(renewal.pending_items[0].kind, PendingKind::Renewal);
    assert_eq!(renewal.pending_items[0].description, "Renova em 45 dias");

    let gaps = &report.accounts_with_pendencies[2];
    assert_eq!(gaps.urgency_level, Urgency::Yellow);
    assert_eq!(gaps.pending_items[0].description, "Faltam: Website, Funcionários");

    assert_eq!(report.summary.total_accounts_with_pending, 3);
    assert_eq!(report.summary.urgent_count, 2);
    assert_eq!(report.summary.due_soon_count, 1);
    assert_eq!(report.summary.attention_count, 1);
}

#[test]
fn owner_filter_is_a_subset_of_the_full_radar() {
    let snapshot = portfolio();
    let engine = PendencyEngine::default();
    let everyone = engine.evaluate(snapshot.view(), &CsmFilter::parse(Some("all")), evaluation_time());
    let ana = engine.evaluate(snapshot.view(), &CsmFilter::parse(Some("Ana")), evaluation_time());

    assert_eq!(ana.summary.total_accounts_with_pending, 2);
    for entry in &ana.accounts_with_pendencies {
        assert_eq!(entry.account.csm.as_deref(), Some("Ana"));
        assert!(everyone.accounts_with_pendencies.contains(entry));
    }
    assert_eq!(snapshot.csms(), vec!["Ana".to_string(), "Bruno".to_string()]);
}

#[test]
fn report_json_uses_the_dashboard_field_names() {
    let snapshot = portfolio();
    let report = PendencyEngine::default().evaluate(
        snapshot.view(),
        &CsmFilter::parse(Some("Bruno")),
        evaluation_time(),
    );
    let payload = serde_json::to_value(&report).expect("report serializes");

    assert_eq!(
        payload["summary"],
        json!({
            "totalAccountsWithPending": 1,
            "urgentCount": 0,
            "dueSoonCount": 0,
            "attentionCount": 1
        })
    );
    let entry = &payload["accountsWithPendencies"][0];
    assert_eq!(entry["urgencyLevel"], "yellow");
    assert_eq!(entry["totalPending"], 1);
    assert_eq!(entry["pendingItems"][0]["type"], "missing_data");
    assert_eq!(entry["pendingItems"][0]["actionUrl"], "/accounts/acc-gaps");
    assert!(entry["pendingItems"][0].get("daysOverdue").is_none());
}
