use chrono::{TimeZone, Utc};
use radar_cs::workflows::intake::{AccountCsvImporter, SnapshotImportError, SnapshotImporter};
use radar_cs::workflows::pendencies::{
    CsmFilter, PendencyEngine, PendingKind, PortfolioSnapshot, Urgency,
};
use std::io::Cursor;

#[test]
fn csv_accounts_flow_into_the_radar() {
    let csv = "id;name;csm;industry;website;employees;health_score;updated_at\n\
acc-1;Acme;Ana;Varejo;https://acme.example.com;120;75;2025-09-30\n\
acc-2;Globex;Ana;;;;88;2025-09-30\n\
;Sem id;Ana;;;;;\n";

    let import = AccountCsvImporter::from_reader(Cursor::new(csv)).expect("import succeeds");
    assert_eq!(import.imported, 2);
    assert_eq!(import.errors, 1);
    assert_eq!(import.details, vec!["Linha 4: id ou nome ausente".to_string()]);

    let snapshot = PortfolioSnapshot {
        accounts: import.accounts,
        ..PortfolioSnapshot::default()
    };
    let now = Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap();
    let report = PendencyEngine::default().evaluate(snapshot.view(), &CsmFilter::All, now);

    let acme = report
        .accounts_with_pendencies
        .iter()
        .find(|entry| entry.account.id == "acc-1")
        .expect("acme listed");
    assert!(acme
        .pending_items
        .iter()
        .any(|item| item.kind == PendingKind::HealthScore && item.urgency == Urgency::Red));

    let globex = report
        .accounts_with_pendencies
        .iter()
        .find(|entry| entry.account.id == "acc-2")
        .expect("globex listed");
    let missing = globex
        .pending_items
        .iter()
        .find(|item| item.kind == PendingKind::MissingData)
        .expect("missing data item");
    assert_eq!(missing.description, "Faltam: Website, Indústria, Funcionários");
}

#[test]
fn exported_snapshot_round_trips_through_the_json_importer() {
    let csv = "id,name,csm,contract_start\nacc-1,Acme,Ana,2025-09-20\n";
    let import = AccountCsvImporter::from_reader(Cursor::new(csv)).expect("import succeeds");
    let snapshot = PortfolioSnapshot {
        accounts: import.accounts,
        ..PortfolioSnapshot::default()
    };

    let path = std::env::temp_dir().join(format!("radar-cs-portfolio-{}.json", std::process::id()));
    std::fs::write(&path, serde_json::to_vec(&snapshot).expect("encode")).expect("write");
    let reloaded = SnapshotImporter::from_path(&path).expect("reload");
    std::fs::remove_file(&path).ok();

    assert_eq!(reloaded.accounts, snapshot.accounts);
    assert_eq!(reloaded.onboarding.progress("acc-1").stats.total, 8);
}

#[test]
fn unreadable_inputs_surface_import_errors() {
    let err = SnapshotImporter::from_path("/definitely/not/here.json").expect_err("missing file");
    assert!(matches!(err, SnapshotImportError::Io(_)));

    let err = AccountCsvImporter::from_reader(Cursor::new("nome;cnpj\nAcme;1\n"))
        .expect_err("no id column");
    assert!(err.to_string().contains("id, name"));
}
