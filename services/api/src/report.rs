use crate::infra::parse_kind;
use chrono::{DateTime, Utc};
use clap::Args;
use radar_cs::config::AppConfig;
use radar_cs::error::AppError;
use radar_cs::session::{Role, Session};
use radar_cs::workflows::intake::{AccountCsvImporter, SnapshotImporter};
use radar_cs::workflows::pendencies::{
    parse_instant, CsmFilter, PendencyEngine, PendencyListing, PendingKind, PortfolioSnapshot,
};
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct PendencyReportArgs {
    /// Portfolio export (JSON) to evaluate
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
    /// CSM whose accounts to evaluate ("all" for every owner)
    #[arg(long)]
    pub(crate) csm: Option<String>,
    /// Only list accounts with this pendency type (e.g. renewal, missing_data)
    #[arg(long, value_parser = parse_kind)]
    pub(crate) kind: Option<PendingKind>,
    /// Evaluation instant, RFC 3339 or YYYY-MM-DD (defaults to now)
    #[arg(long, value_parser = parse_instant)]
    pub(crate) now: Option<DateTime<Utc>>,
    /// Session file; its owner becomes the default CSM filter
    #[arg(long)]
    pub(crate) session: Option<PathBuf>,
    /// Print every pending item under each account
    #[arg(long)]
    pub(crate) details: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AccountIntakeArgs {
    /// Accounts CSV export (';' or ',' delimited)
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Write the resulting portfolio JSON here instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct SessionInitArgs {
    /// Where to write the session file
    #[arg(long)]
    pub(crate) output: PathBuf,
    #[arg(long)]
    pub(crate) user_id: String,
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long)]
    pub(crate) email: String,
    /// admin, manager, csm or viewer
    #[arg(long, value_parser = parse_role)]
    pub(crate) role: Role,
    #[arg(long)]
    pub(crate) organization_id: Option<String>,
}

fn parse_role(raw: &str) -> Result<Role, String> {
    Role::parse(raw).ok_or_else(|| format!("unknown role '{raw}' (admin, manager, csm, viewer)"))
}

pub(crate) fn run_pendency_report(args: PendencyReportArgs) -> Result<(), AppError> {
    let PendencyReportArgs {
        snapshot,
        csm,
        kind,
        now,
        session,
        details,
    } = args;

    let config = AppConfig::load()?;
    let portfolio = SnapshotImporter::from_path(&snapshot)?;
    let filter = match (csm, session) {
        (Some(csm), _) => CsmFilter::parse(Some(&csm)),
        (None, Some(path)) => Session::load(path)?.csm_filter(),
        (None, None) => CsmFilter::All,
    };
    let now = now.unwrap_or_else(Utc::now);

    let engine = PendencyEngine::new(config.portfolio.pendencies);
    let report = engine.evaluate(portfolio.view(), &filter, now);
    let listing = PendencyListing::from_report(&report, kind);
    info!(
        snapshot = %snapshot.display(),
        accounts = portfolio.accounts.len(),
        listed = listing.accounts_with_pendencies.len(),
        "pendency report rendered"
    );

    print!("{}", render_pendency_report(&listing, &filter, details));
    Ok(())
}

pub(crate) fn render_pendency_report(
    listing: &PendencyListing,
    filter: &CsmFilter,
    details: bool,
) -> String {
    let mut out = String::new();
    let owner = match filter {
        CsmFilter::All => "todos os CSMs".to_string(),
        CsmFilter::Owner(owner) => owner.clone(),
    };
    let _ = writeln!(out, "Pendency radar");
    let _ = writeln!(
        out,
        "Evaluated {} for {}",
        listing.evaluated_at.format("%Y-%m-%d %H:%M UTC"),
        owner
    );

    let summary = &listing.summary;
    let _ = writeln!(
        out,
        "\n{} accounts with pending items | {} urgent | {} due soon | {} attention",
        summary.total_accounts_with_pending,
        summary.urgent_count,
        summary.due_soon_count,
        summary.attention_count
    );

    if !listing.kind_breakdown.is_empty() {
        let _ = writeln!(out, "\nBy type");
        for entry in &listing.kind_breakdown {
            let _ = writeln!(out, "- {}: {} accounts", entry.kind_label, entry.accounts);
        }
    }

    if let Some(kind) = listing.kind {
        let _ = writeln!(out, "\nFiltered to: {}", kind.label());
    }

    if listing.accounts_with_pendencies.is_empty() {
        let _ = writeln!(out, "\nNo pending items.");
        return out;
    }

    let _ = writeln!(out, "\nAccounts");
    for entry in &listing.accounts_with_pendencies {
        let _ = writeln!(
            out,
            "- [{}] {} ({}) | {} pending | CSM {}",
            entry.urgency_level.label(),
            entry.account.name,
            entry.account.id,
            entry.total_pending,
            entry.account.csm.as_deref().unwrap_or("-")
        );

        if details {
            for item in &entry.pending_items {
                let overdue = match item.days_overdue {
                    Some(days) => format!(" (+{days}d)"),
                    None => String::new(),
                };
                let _ = writeln!(
                    out,
                    "    * [{}] {}: {}{}",
                    item.urgency.label(),
                    item.title,
                    item.description,
                    overdue
                );
                if let Some(url) = &item.action_url {
                    let _ = writeln!(out, "      {}", url);
                }
            }
        }
    }

    out
}

pub(crate) fn run_account_intake(args: AccountIntakeArgs) -> Result<(), AppError> {
    let import = AccountCsvImporter::from_path(&args.csv)?;
    eprintln!(
        "Imported {} accounts ({} errors, {} duplicates)",
        import.imported, import.errors, import.duplicates
    );
    for detail in &import.details {
        eprintln!("- {}", detail);
    }

    let snapshot = PortfolioSnapshot {
        accounts: import.accounts,
        ..PortfolioSnapshot::default()
    };
    let payload = serde_json::to_string_pretty(&snapshot).map_err(std::io::Error::other)?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, payload)?;
            info!(output = %path.display(), "portfolio written");
        }
        None => println!("{}", payload),
    }
    Ok(())
}

pub(crate) fn run_session_init(args: SessionInitArgs) -> Result<(), AppError> {
    let session = Session {
        user_id: args.user_id,
        name: args.name,
        email: args.email,
        role: args.role,
        organization_id: args.organization_id,
    };
    session.save(&args.output)?;
    println!(
        "Session saved to {} ({}, default filter: {})",
        args.output.display(),
        session.role.label(),
        session.default_csm_filter()
    );
    Ok(())
}
