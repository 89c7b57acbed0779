use anyhow::{Context, Result};
use colored::Colorize;

use interviewloop_core::{SessionSnapshot, Speaker};
use interviewloop_db::{Database, InterviewFilter, InterviewRecord};

use crate::interview::format_duration;

pub fn handle_history(
    domain: Option<String>,
    level: Option<String>,
    limit: usize,
    user: Option<String>,
    json: bool,
) -> Result<()> {
    let db = Database::open().context("Failed to open database")?;
    let filter = InterviewFilter {
        user_id: user,
        domain,
        level,
        limit: Some(limit),
    };
    let records = db.interviews().list(&filter)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else if records.is_empty() {
        println!("{}", "No interviews found.".dimmed());
    } else {
        print_history_table(&records);
    }

    Ok(())
}

fn print_history_table(records: &[InterviewRecord]) {
    println!(
        "{:<17} {:<12} {:<12} {:<12} {:<6} {:<9} {:<6} {}",
        "STARTED".dimmed(),
        "DOMAIN".dimmed(),
        "LEVEL".dimmed(),
        "STATUS".dimmed(),
        "SCORE".dimmed(),
        "ACCURACY".dimmed(),
        "COINS".dimmed(),
        "DURATION".dimmed(),
    );

    for r in records {
        let started = r.started_at.format("%Y-%m-%d %H:%M").to_string();
        let status = match r.status.as_str() {
            "finished" => r.status.bright_green().to_string(),
            _ => r.status.bright_yellow().to_string(),
        };
        let score = r
            .authenticity_score
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        let accuracy = r
            .technical_accuracy
            .map(|a| format!("{:.0}%", a * 100.0))
            .unwrap_or_else(|| "-".to_string());
        let coins = r
            .coins_awarded
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        let duration = r
            .ended_at
            .map(|end| {
                let secs = (end - r.started_at).num_milliseconds() as f64 / 1000.0;
                format_duration(secs.max(0.0))
            })
            .unwrap_or_else(|| "...".to_string());

        println!(
            "{:<17} {:<12} {:<12} {:<12} {:<6} {:<9} {:<6} {}",
            started, r.domain, r.level, status, score, accuracy, coins, duration
        );
    }
}

pub fn handle_show(id: &str, json: bool) -> Result<()> {
    let db = Database::open().context("Failed to open database")?;
    let record = db
        .interviews()
        .get(id)?
        .with_context(|| format!("No interview with id {}", id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    let snapshot: SessionSnapshot = serde_json::from_str(&record.transcript)
        .with_context(|| format!("Stored transcript for {} is unreadable", id))?;
    print_interview_detail(&record, &snapshot);
    Ok(())
}

fn print_interview_detail(record: &InterviewRecord, snapshot: &SessionSnapshot) {
    println!("{}", "=== Interview Detail ===".bright_blue().bold());
    println!("{}  {}", "ID:".dimmed(), record.id);
    println!("{}  {}", "User:".dimmed(), record.user_id);
    println!(
        "{}  {}",
        "Started:".dimmed(),
        record.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("{}  {} / {}", "Topic:".dimmed(), record.domain, record.level);
    println!("{}  {}", "Status:".dimmed(), record.status);
    if let Some(score) = record.authenticity_score {
        println!("{}  {}/100", "Score:".dimmed(), score);
    }
    if let Some(coins) = record.coins_awarded {
        println!("{}  {}", "Coins:".dimmed(), coins);
    }
    println!();

    for line in transcript_lines(snapshot) {
        println!("{}", line);
    }
}

/// One `Speaker: text` line per turn, in order
fn transcript_lines(snapshot: &SessionSnapshot) -> Vec<String> {
    snapshot
        .turns
        .iter()
        .map(|turn| {
            let label = format!("{}:", turn.speaker.label());
            let label = match turn.speaker {
                Speaker::Interviewer => label.bright_blue().bold(),
                Speaker::Candidate => label.bright_green().bold(),
            };
            format!("{} {}", label, turn.text)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use interviewloop_core::{SessionStatus, Turn};

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot {
            id: "int-1".to_string(),
            domain: "Python".to_string(),
            level: "beginner".to_string(),
            turns: vec![
                Turn::question("Python/beginner/0", "What is a tuple?"),
                Turn::answer("An immutable sequence", Some("Python/beginner/0".to_string()), None),
            ],
            status: SessionStatus::InProgress,
            final_score: None,
            technical_accuracy: None,
            final_verdict: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    #[test]
    fn test_transcript_lines_follow_turn_order() {
        colored::control::set_override(false);
        let lines = transcript_lines(&snapshot());
        assert_eq!(
            lines,
            vec![
                "Interviewer: What is a tuple?".to_string(),
                "Candidate: An immutable sequence".to_string(),
            ]
        );
    }

    #[test]
    fn test_stored_transcript_reads_back_as_snapshot() {
        let db = Database::open_in_memory().unwrap();
        let snapshot = snapshot();
        let record = InterviewRecord {
            id: snapshot.id.clone(),
            user_id: "local".to_string(),
            domain: snapshot.domain.clone(),
            level: snapshot.level.clone(),
            status: snapshot.status.to_string(),
            authenticity_score: None,
            technical_accuracy: None,
            classification: None,
            coins_awarded: None,
            transcript: serde_json::to_string(&snapshot).unwrap(),
            started_at: snapshot.started_at,
            ended_at: None,
        };
        db.interviews().save(&record).unwrap();

        let stored = db.interviews().get("int-1").unwrap().unwrap();
        let parsed: SessionSnapshot = serde_json::from_str(&stored.transcript).unwrap();
        assert_eq!(parsed.turns.len(), 2);
        assert_eq!(parsed.turns[1].speaker, Speaker::Candidate);
    }
}
