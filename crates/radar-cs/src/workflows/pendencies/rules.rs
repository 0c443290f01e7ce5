use chrono::{DateTime, Utc};

use super::config::PendencyConfig;
use super::domain::{
    days_between, is_blank, Account, Activity, PendingItem, PendingKind, Task, Urgency,
};
use super::onboarding::OnboardingProgress;

const HEALTH_REVIEW_DAYS: i64 = 7;
const ONBOARDING_WINDOW_DAYS: i64 = 21;
const ONBOARDING_TARGET_DAYS: i64 = 14;
const ACTIVITY_CADENCE_DAYS: i64 = 14;
const CRITICAL_CONTACT_DAYS: i64 = 7;
const RENEWAL_HORIZON_DAYS: i64 = 90;

/// Everything a rule may look at for one account.
pub(crate) struct AccountScope<'a> {
    pub account: &'a Account,
    pub activities: Vec<&'a Activity>,
    pub tasks: Vec<&'a Task>,
    pub now: DateTime<Utc>,
}

pub(crate) fn evaluate_account(
    scope: &AccountScope<'_>,
    onboarding: &dyn OnboardingProgress,
    config: &PendencyConfig,
) -> Vec<PendingItem> {
    [
        health_score(scope, config),
        onboarding_completion(scope, onboarding),
        regular_activity(scope),
        spiced(scope.account),
        overdue_items(scope),
        critical_contact(scope, config),
        contract_renewal(scope),
        missing_data(scope.account),
    ]
    .into_iter()
    .flatten()
    .collect()
}

pub(crate) fn health_score(scope: &AccountScope<'_>, config: &PendencyConfig) -> Option<PendingItem> {
    let account = scope.account;
    let action_url = Some(account.deep_link(Some("health")));

    if config.is_default_score(account.health_score) {
        return Some(PendingItem {
            kind: PendingKind::HealthScore,
            urgency: Urgency::Red,
            title: "Primeira avaliação necessária".to_string(),
            description: "Cliente com Health Score padrão/indefinido".to_string(),
            days_overdue: None,
            action_url,
        });
    }

    let evaluated_at = account
        .health_evaluated_at
        .or_else(|| account.last_touched_at())?;
    let days = days_between(evaluated_at, scope.now);

    (days > HEALTH_REVIEW_DAYS).then(|| PendingItem {
        kind: PendingKind::HealthScore,
        urgency: Urgency::tiered(days, 14, 10),
        title: "Avaliação de Health Score pendente".to_string(),
        description: format!("Última avaliação há {days} dias"),
        days_overdue: Some(days - HEALTH_REVIEW_DAYS),
        action_url,
    })
}

pub(crate) fn onboarding_completion(
    scope: &AccountScope<'_>,
    onboarding: &dyn OnboardingProgress,
) -> Option<PendingItem> {
    let account = scope.account;
    let days = days_between(account.contract_start?, scope.now);

    if !(0..=ONBOARDING_WINDOW_DAYS).contains(&days) {
        return None;
    }

    let stats = onboarding.stats(&account.id);
    if stats.percentage >= 100 {
        return None;
    }

    Some(PendingItem {
        kind: PendingKind::Onboarding,
        urgency: Urgency::tiered(days, ONBOARDING_TARGET_DAYS, 10),
        title: "Onboarding incompleto".to_string(),
        description: format!(
            "{}/{} itens concluídos ({}%)",
            stats.completed, stats.total, stats.percentage
        ),
        days_overdue: (days > ONBOARDING_TARGET_DAYS).then(|| days - ONBOARDING_TARGET_DAYS),
        action_url: Some(account.deep_link(Some("onboarding"))),
    })
}

pub(crate) fn regular_activity(scope: &AccountScope<'_>) -> Option<PendingItem> {
    let account = scope.account;
    let action_url = Some(account.deep_link(Some("activities")));

    if scope.activities.is_empty() && scope.tasks.is_empty() {
        return Some(PendingItem {
            kind: PendingKind::Activity,
            urgency: Urgency::Red,
            title: "Nenhuma atividade registrada".to_string(),
            description: "Conta sem nenhum registro de interação".to_string(),
            days_overdue: None,
            action_url,
        });
    }

    // Records without any timestamp cannot prove recency; they are skipped.
    let most_recent = scope
        .activities
        .iter()
        .filter_map(|activity| activity.contact_at())
        .chain(scope.tasks.iter().filter_map(|task| task.created_at))
        .max()?;
    let days = days_between(most_recent, scope.now);

    (days > ACTIVITY_CADENCE_DAYS).then(|| PendingItem {
        kind: PendingKind::Activity,
        urgency: Urgency::tiered(days, 20, 17),
        title: "Sem atividade recente".to_string(),
        description: format!("Última interação há {days} dias"),
        days_overdue: Some(days - ACTIVITY_CADENCE_DAYS),
        action_url,
    })
}

pub(crate) fn spiced(account: &Account) -> Option<PendingItem> {
    let Some(kickoff) = &account.internal_kickoff else {
        return Some(PendingItem {
            kind: PendingKind::Spiced,
            urgency: Urgency::Orange,
            title: "SPICED não preenchido".to_string(),
            description: "Informações de kickoff ausentes".to_string(),
            days_overdue: None,
            action_url: Some(account.deep_link(None)),
        });
    };

    let missing = kickoff.missing_spi();
    if missing.is_empty() {
        return None;
    }

    Some(PendingItem {
        kind: PendingKind::Spiced,
        urgency: Urgency::Orange,
        title: "SPICED incompleto".to_string(),
        description: format!("Faltam: {}", missing.join(", ")),
        days_overdue: None,
        action_url: Some(account.deep_link(None)),
    })
}

pub(crate) fn overdue_items(scope: &AccountScope<'_>) -> Option<PendingItem> {
    let overdue_tasks = scope
        .tasks
        .iter()
        .filter(|task| task.is_overdue(scope.now))
        .count();
    let overdue_activities = scope
        .activities
        .iter()
        .filter(|activity| activity.is_overdue(scope.now))
        .count();
    let total = overdue_tasks + overdue_activities;

    (total > 0).then(|| PendingItem {
        kind: PendingKind::Overdue,
        urgency: Urgency::Red,
        title: format!("{total} item(ns) atrasado(s)"),
        description: format!("{overdue_tasks} tarefas, {overdue_activities} atividades"),
        days_overdue: None,
        action_url: Some(scope.account.deep_link(Some("tasks"))),
    })
}

pub(crate) fn critical_contact(
    scope: &AccountScope<'_>,
    config: &PendencyConfig,
) -> Option<PendingItem> {
    let account = scope.account;
    if account.status.as_deref() != Some(config.critical_status.as_str()) {
        return None;
    }

    let action_url = Some(account.deep_link(Some("activities")));
    if scope.activities.is_empty() {
        return Some(PendingItem {
            kind: PendingKind::CriticalContact,
            urgency: Urgency::Red,
            title: "Conta crítica sem contato".to_string(),
            description: "Status crítico requer contato semanal".to_string(),
            days_overdue: None,
            action_url,
        });
    }

    let last_contact = scope
        .activities
        .iter()
        .filter_map(|activity| activity.contact_at())
        .max()?;
    let days = days_between(last_contact, scope.now);

    (days > CRITICAL_CONTACT_DAYS).then(|| PendingItem {
        kind: PendingKind::CriticalContact,
        urgency: if days > 10 {
            Urgency::Red
        } else {
            Urgency::Orange
        },
        title: "Contato semanal necessário".to_string(),
        description: format!("Status crítico - último contato há {days} dias"),
        days_overdue: Some(days - CRITICAL_CONTACT_DAYS),
        action_url,
    })
}

pub(crate) fn contract_renewal(scope: &AccountScope<'_>) -> Option<PendingItem> {
    let account = scope.account;
    let days = days_between(scope.now, account.contract_end?);

    if days <= 0 || days > RENEWAL_HORIZON_DAYS {
        return None;
    }

    let urgency = if days < 30 {
        Urgency::Red
    } else if days < 60 {
        Urgency::Orange
    } else {
        Urgency::Yellow
    };

    Some(PendingItem {
        kind: PendingKind::Renewal,
        urgency,
        title: "Renovação se aproximando".to_string(),
        description: format!("Renova em {days} dias"),
        days_overdue: None,
        action_url: Some(account.deep_link(None)),
    })
}

pub(crate) fn missing_data(account: &Account) -> Option<PendingItem> {
    let mut missing = Vec::new();
    if is_blank(account.website.as_deref()) {
        missing.push("Website");
    }
    if is_blank(account.industry.as_deref()) {
        missing.push("Indústria");
    }
    if account.employees.unwrap_or(0) == 0 {
        missing.push("Funcionários");
    }

    if missing.is_empty() {
        return None;
    }

    Some(PendingItem {
        kind: PendingKind::MissingData,
        urgency: Urgency::Yellow,
        title: "Dados incompletos".to_string(),
        description: format!("Faltam: {}", missing.join(", ")),
        days_overdue: None,
        action_url: Some(account.deep_link(None)),
    })
}
