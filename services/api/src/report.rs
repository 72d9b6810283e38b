use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use bankability::diagnostic::scoring::{format_amount, Alert, AlertLevel, Ratio};
use bankability::diagnostic::{
    Analysis, DiagnosticService, DisabledNotifier, ScoringEngine, SubmissionPolicy,
};
use bankability::error::AppError;
use chrono::{Local, NaiveDate};
use clap::Args;

use crate::infra::read_form;

#[derive(Args, Debug)]
pub(crate) struct DiagnoseArgs {
    /// JSON file holding the flat form export (field name to value)
    #[arg(long)]
    pub(crate) form: PathBuf,
    /// Evaluation date for the schedule analysis (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print the raw analysis as JSON instead of the text report
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_diagnose(args: DiagnoseArgs) -> Result<(), AppError> {
    let DiagnoseArgs { form, today, json } = args;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let form = read_form(&form)?;

    // Operators scoring an export on behalf of the applicant are not asked for consent.
    let policy = SubmissionPolicy {
        require_consent: false,
        presentation_delay: Duration::ZERO,
        ..SubmissionPolicy::default()
    };
    let service = DiagnosticService::new(
        ScoringEngine::default(),
        Arc::new(DisabledNotifier),
        policy,
    );
    service.validate(&form)?;

    let analysis = service.engine().analyze_form(&form, today);
    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print!("{}", render_report(&analysis, today));
    }

    Ok(())
}

fn push_alerts(out: &mut String, alerts: &[Alert]) {
    for alert in alerts {
        let marker = match alert.level {
            AlertLevel::Danger => "!!",
            AlertLevel::Warning => "!",
        };
        let _ = writeln!(out, "    {marker} {}", alert.message);
    }
}

fn ratio_text(ratio: Ratio, percent: bool) -> String {
    match ratio.value() {
        Some(value) if percent => format!("{:.1}%", value * 100.0),
        Some(value) => format!("{value:.2}"),
        None => "n/a".to_string(),
    }
}

pub(crate) fn render_report(analysis: &Analysis, today: NaiveDate) -> String {
    let score = &analysis.global_score;
    let mut out = String::new();

    let _ = writeln!(out, "Bankability diagnostic ({today})");
    let _ = writeln!(
        out,
        "{} - {}/{} points ({:.0}%)",
        score.diagnostic.label, score.total_score, score.max_score, score.percentage
    );
    let _ = writeln!(out, "{}", score.diagnostic.message);
    let _ = writeln!(out, "Recommandation: {}", score.diagnostic.recommendation);
    for alert in &score.critical_alerts {
        let _ = writeln!(out, "  !! {alert}");
    }

    let breakdown = &score.breakdown;
    let _ = writeln!(out, "\nScore breakdown");
    for (label, points, max) in [
        ("Délai d'exécution", breakdown.delay, 10),
        ("Maître d'ouvrage", breakdown.client, 10),
        ("Capacité technique", breakdown.technical_capacity, 20),
        ("Marge prévisionnelle", breakdown.margin, 15),
        ("Ratios financiers", breakdown.financial_ratios, 20),
        ("Endettement bancaire", breakdown.bank_debt, 15),
        ("Garanties", breakdown.collateral, 10),
    ] {
        let _ = writeln!(out, "  - {label}: {points}/{max}");
    }

    let _ = writeln!(out, "\nDetails");
    match &analysis.delay {
        Some(delay) => {
            let _ = writeln!(
                out,
                "  Délai [{}] {} ({:.0}% consommé): {}",
                delay.signal.label(),
                delay.category,
                delay.ratio * 100.0,
                delay.message
            );
        }
        None => {
            let _ = writeln!(out, "  Délai: dates du marché non renseignées");
        }
    }

    let coherence = &analysis.amount_coherence;
    let _ = writeln!(
        out,
        "  Montant demandé: plafond {}{}",
        format_amount(coherence.max_credit),
        if coherence.coherent { "" } else { " (incohérent)" }
    );
    push_alerts(&mut out, &coherence.alerts);

    let client = &analysis.client;
    let _ = writeln!(
        out,
        "  Maître d'ouvrage: {} (fiabilité {})",
        client.label, client.reliability
    );
    push_alerts(&mut out, &client.alerts);

    let capacity = &analysis.technical_capacity;
    let _ = writeln!(
        out,
        "  Capacité technique [{}] {}: ratio {}, indice {}",
        capacity.diagnostic.signal.label(),
        capacity.diagnostic.label,
        ratio_text(capacity.capacity_ratio, false),
        ratio_text(capacity.capacity_index, false)
    );

    let margin = &analysis.margin;
    let _ = writeln!(
        out,
        "  Marge [{}] {} ({:.1}%): {}",
        margin.signal.label(),
        format_amount(margin.margin),
        margin.margin_rate,
        margin.message
    );
    if let Some(alert) = &margin.structure_alert {
        push_alerts(&mut out, std::slice::from_ref(alert));
    }

    let ratios = &analysis.financial_ratios;
    for (label, indicator, percent) in [
        ("Autonomie financière", &ratios.equity_ratio, true),
        ("Capacité de remboursement", &ratios.repayment_capacity, false),
        ("Rentabilité", &ratios.profitability, true),
        ("Liquidité générale", &ratios.liquidity, false),
    ] {
        let signal = indicator.signal.map(|signal| signal.label()).unwrap_or("-");
        let _ = writeln!(
            out,
            "  {label} [{signal}] {}: {}",
            ratio_text(indicator.value, percent),
            indicator.message
        );
    }

    let trend = &analysis.revenue_trend;
    let _ = writeln!(
        out,
        "  Évolution du CA [{}]: {}",
        trend.signal.map(|signal| signal.label()).unwrap_or("-"),
        trend.message
    );

    let debt = &analysis.bank_debt;
    let _ = writeln!(
        out,
        "  Endettement [{}]: utilisation des lignes {}",
        debt.signal.label(),
        debt.utilization_rate
            .map(|rate| format!("{rate:.0}%"))
            .unwrap_or_else(|| "n/a".to_string())
    );
    push_alerts(&mut out, &debt.alerts);

    let collateral = &analysis.collateral;
    let _ = writeln!(
        out,
        "  Garanties [{}]: {} soit {:.0}% du montant demandé",
        collateral.signal.label(),
        format_amount(collateral.total_coverage),
        collateral.coverage_pct
    );

    if let Some(message) = &analysis.domiciliation.message {
        let _ = writeln!(
            out,
            "  Domiciliation [{}]: {message}",
            analysis.domiciliation.signal.label()
        );
    }

    out
}
