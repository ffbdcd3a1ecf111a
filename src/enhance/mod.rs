//! Enhancement pipeline
//!
//! Turns raw initiatives into enhanced initiatives carrying synthetic but
//! reproducible operational metadata: team, milestones, lifecycle history,
//! updates, resources and impact reports.
//!
//! The pipeline is pure. All variation comes from a generator seeded by the
//! initiative id, and all dates are offsets from a caller-supplied reference
//! instant, so enhancing the same records against the same instant always
//! yields identical output.

pub mod catalog;
pub mod seed;

pub use seed::{seed_for, SeededRng};

use crate::model::{
    Budget, EnhancedInitiative, ImpactReport, Initiative, InitiativeStatus, Milestone,
    ProjectUpdate, Resource, StatusChange, TeamMember,
};
use catalog::{
    CURRENCY, MILESTONE_TITLES, REPORT_SUMMARIES, RESOURCES, STATUS_NOTES, TEAM_NAMES,
    TEAM_ROLES, UPDATE_MESSAGES,
};
use chrono::{DateTime, Datelike, Duration, Utc};
use tracing::debug;

/// Bounds on generated sub-entity counts (inclusive)
pub const TEAM_SIZE: (usize, usize) = (1, 4);
pub const MILESTONE_COUNT: (usize, usize) = (2, 4);
pub const UPDATE_COUNT: (usize, usize) = (1, 4);
pub const RESOURCE_COUNT: (usize, usize) = (1, 3);
pub const REPORT_COUNT: (usize, usize) = (0, 2);

/// Enhance every record, preserving order
pub fn enhance_initiatives(
    records: &[Initiative],
    reference: DateTime<Utc>,
) -> Vec<EnhancedInitiative> {
    let enhanced: Vec<EnhancedInitiative> = records
        .iter()
        .map(|record| enhance_initiative(record, reference))
        .collect();
    debug!("Enhanced {} initiatives", enhanced.len());
    enhanced
}

/// Enhance a single record
pub fn enhance_initiative(record: &Initiative, reference: DateTime<Utc>) -> EnhancedInitiative {
    let uid = record.uid.as_str();
    let mut rng = SeededRng::for_id(uid);

    let status = *rng.pick(&InitiativeStatus::ALL);
    let start_date = reference - Duration::days(rng.days(30, 365));
    let end_date = start_date + Duration::days(rng.days(90, 720));
    let progress = progress_for(status, &mut rng);

    let allocated = rng.between(10, 500) * 1_000;
    let spent = allocated * u64::from(progress) / 100;
    let budget = Budget {
        allocated,
        spent,
        currency: CURRENCY.to_string(),
    };

    let team_members = team_for(uid, &mut rng);
    let milestones = milestones_for(uid, status, start_date, end_date, reference, &mut rng);
    let status_history = history_for(status, start_date, &mut rng);
    let updates = updates_for(uid, &team_members, reference, &mut rng);
    let resources = resources_for(uid, &mut rng);
    let impact_reports = reports_for(uid, record.impact_score(), reference, &mut rng);

    EnhancedInitiative {
        initiative: record.clone(),
        seed: rng.seed(),
        status,
        start_date,
        end_date,
        progress,
        budget,
        team_members,
        milestones,
        status_history,
        updates,
        resources,
        impact_reports,
    }
}

fn progress_for(status: InitiativeStatus, rng: &mut SeededRng) -> u8 {
    let (min, max) = match status {
        InitiativeStatus::Planning => (0, 15),
        InitiativeStatus::Implementation => (15, 50),
        InitiativeStatus::Active => (40, 85),
        InitiativeStatus::Completed => (100, 100),
        InitiativeStatus::Evaluation => (90, 100),
    };
    rng.between(min, max) as u8
}

fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

fn team_for(uid: &str, rng: &mut SeededRng) -> Vec<TeamMember> {
    let size = rng.count(TEAM_SIZE.0, TEAM_SIZE.1);
    let offset = rng.index(TEAM_NAMES.len());

    (0..size)
        .map(|i| {
            let name = TEAM_NAMES[(offset + i) % TEAM_NAMES.len()];
            TeamMember {
                id: format!("{}-member-{}", uid, i + 1),
                name: name.to_string(),
                role: TEAM_ROLES[i % TEAM_ROLES.len()].to_string(),
                avatar_initials: initials(name),
            }
        })
        .collect()
}

fn milestones_for(
    uid: &str,
    status: InitiativeStatus,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    reference: DateTime<Utc>,
    rng: &mut SeededRng,
) -> Vec<Milestone> {
    let count = rng.count(MILESTONE_COUNT.0, MILESTONE_COUNT.1);
    let span = (end - start).num_days().max(1);
    let finished = matches!(
        status,
        InitiativeStatus::Completed | InitiativeStatus::Evaluation
    );

    (0..count)
        .map(|i| {
            let due_date = start + Duration::days(span * (i as i64 + 1) / (count as i64 + 1));
            Milestone {
                id: format!("{}-milestone-{}", uid, i + 1),
                title: MILESTONE_TITLES[i].to_string(),
                due_date,
                completed: finished || due_date <= reference,
            }
        })
        .collect()
}

fn history_for(
    status: InitiativeStatus,
    start: DateTime<Utc>,
    rng: &mut SeededRng,
) -> Vec<StatusChange> {
    let mut changed_at = start;
    InitiativeStatus::ALL[..=status.ordinal()]
        .iter()
        .enumerate()
        .map(|(i, step)| {
            if i > 0 {
                changed_at += Duration::days(rng.days(7, 45));
            }
            StatusChange {
                status: *step,
                changed_at,
                note: STATUS_NOTES[step.ordinal()].to_string(),
            }
        })
        .collect()
}

fn updates_for(
    uid: &str,
    team: &[TeamMember],
    reference: DateTime<Utc>,
    rng: &mut SeededRng,
) -> Vec<ProjectUpdate> {
    let count = rng.count(UPDATE_COUNT.0, UPDATE_COUNT.1);
    let mut updates: Vec<ProjectUpdate> = (0..count)
        .map(|i| ProjectUpdate {
            id: format!("{}-update-{}", uid, i + 1),
            author: team[i % team.len()].name.clone(),
            message: rng.pick(&UPDATE_MESSAGES).to_string(),
            posted_at: reference - Duration::days(rng.days(0, 60)),
        })
        .collect();
    // newest first
    updates.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));
    updates
}

fn resources_for(uid: &str, rng: &mut SeededRng) -> Vec<Resource> {
    let count = rng.count(RESOURCE_COUNT.0, RESOURCE_COUNT.1);
    let offset = rng.index(RESOURCES.len());

    (0..count)
        .map(|i| {
            let (name, kind) = RESOURCES[(offset + i) % RESOURCES.len()];
            let slug = name.to_ascii_lowercase().replace(' ', "-");
            Resource {
                id: format!("{}-resource-{}", uid, i + 1),
                name: name.to_string(),
                kind: kind.to_string(),
                url: format!("/resources/{}/{}", uid, slug),
            }
        })
        .collect()
}

fn reports_for(
    uid: &str,
    impact_score: f64,
    reference: DateTime<Utc>,
    rng: &mut SeededRng,
) -> Vec<ImpactReport> {
    let count = rng.count(REPORT_COUNT.0, REPORT_COUNT.1);
    let quarter = (reference.month0() / 3) as i32;

    (0..count)
        .map(|i| {
            // walk back one quarter per report
            let back = quarter - 1 - i as i32;
            let year = reference.year() + back.div_euclid(4);
            let period = format!("Q{} {}", back.rem_euclid(4) + 1, year);
            let factor = rng.between(60, 120) as f64 / 100.0;
            ImpactReport {
                id: format!("{}-report-{}", uid, i + 1),
                period,
                summary: rng.pick(&REPORT_SUMMARIES).to_string(),
                metric_value: (impact_score * factor * 10.0).round() / 10.0,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("Amara Okafor"), "AO");
        assert_eq!(initials("mei lin"), "ML");
    }

    #[test]
    fn test_history_ends_at_current_status() {
        for uid in ["a", "b", "c", "d", "e", "f", "g"] {
            let enhanced = enhance_initiative(&Initiative::new(uid, "Acme", "T"), reference());
            let last = enhanced.status_history.last().unwrap();
            assert_eq!(last.status, enhanced.status);
            assert_eq!(enhanced.status_history.len(), enhanced.status.ordinal() + 1);
            assert_eq!(enhanced.status_history[0].changed_at, enhanced.start_date);
        }
    }

    #[test]
    fn test_progress_matches_status() {
        for i in 0..50 {
            let enhanced = enhance_initiative(
                &Initiative::new(format!("p-{}", i), "Acme", "T"),
                reference(),
            );
            match enhanced.status {
                InitiativeStatus::Completed => assert_eq!(enhanced.progress, 100),
                InitiativeStatus::Planning => assert!(enhanced.progress <= 15),
                _ => assert!(enhanced.progress <= 100),
            }
            assert!(enhanced.budget.spent <= enhanced.budget.allocated);
            assert!(enhanced.end_date > enhanced.start_date);
        }
    }

    #[test]
    fn test_report_periods_precede_reference_quarter() {
        for i in 0..30 {
            let enhanced = enhance_initiative(
                &Initiative::new(format!("r-{}", i), "Acme", "T").with_impact_score(50.0),
                reference(),
            );
            let periods: Vec<&str> =
                enhanced.impact_reports.iter().map(|r| r.period.as_str()).collect();
            match periods.len() {
                0 => {}
                1 => assert_eq!(periods, vec!["Q1 2024"]),
                _ => assert_eq!(periods, vec!["Q1 2024", "Q4 2023"]),
            }
        }
    }

    #[test]
    fn test_updates_newest_first() {
        for i in 0..20 {
            let enhanced = enhance_initiative(
                &Initiative::new(format!("u-{}", i), "Acme", "T"),
                reference(),
            );
            for pair in enhanced.updates.windows(2) {
                assert!(pair[0].posted_at >= pair[1].posted_at);
            }
        }
    }
}
