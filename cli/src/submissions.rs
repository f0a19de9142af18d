//! `surveyor submissions`: list stored answer sets, newest first.

use anyhow::{Context, Result};
use std::io::Write;
use std::time::Duration;
use surveyor_core::sink::{SubmissionRecord, SubmissionSink};
use surveyor_db::SqliteSubmissionStore;

/// How often `--follow` re-reads the table. Writers in other processes do not
/// reach this process's feed, so following polls.
const FOLLOW_INTERVAL: Duration = Duration::from_secs(1);

pub async fn run_submissions_command(database_url: &str, json: bool, follow: bool) -> Result<()> {
    let store = SqliteSubmissionStore::connect(database_url)
        .await
        .with_context(|| format!("Failed to open submission store at {database_url}"))?;

    let records = store.list_all().await?;
    let mut stdout = std::io::stdout();
    if json {
        writeln!(stdout, "{}", serde_json::to_string_pretty(&records)?)?;
    } else if records.is_empty() && !follow {
        writeln!(stdout, "No submissions yet.")?;
    } else {
        for record in &records {
            write!(stdout, "{}", format_record(record))?;
        }
    }

    if !follow {
        return Ok(());
    }

    let mut newest = records.first().map_or(0, |r| r.id);
    let mut ticker = tokio::time::interval(FOLLOW_INTERVAL);
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => return Ok(()),
        }

        let fresh = newer_than(store.list_all().await?, newest);
        for record in fresh.iter().rev() {
            if json {
                writeln!(stdout, "{}", serde_json::to_string(record)?)?;
            } else {
                write!(stdout, "{}", format_record(record))?;
            }
        }
        stdout.flush()?;
        if let Some(first) = fresh.first() {
            newest = first.id;
        }
    }
}

/// Records with an id above `id`, still newest first.
fn newer_than(records: Vec<SubmissionRecord>, id: i64) -> Vec<SubmissionRecord> {
    records.into_iter().take_while(|r| r.id > id).collect()
}

pub fn format_record(record: &SubmissionRecord) -> String {
    let mut out = format!(
        "#{}  {}\n",
        record.id,
        record.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    for (question_id, answer) in record.answers.iter() {
        out.push_str(&format!("  {question_id}: {answer}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use surveyor_core::answer::AnswerSet;

    fn record(id: i64, answers: AnswerSet) -> SubmissionRecord {
        SubmissionRecord {
            id,
            answers,
            created_at: "2025-07-13T09:30:00Z".parse().unwrap(),
        }
    }

    #[test]
    fn test_format_record() {
        let answers = [("Q1", "foo"), ("Q2", "Cat, Dog")].into_iter().collect();
        assert_eq!(
            format_record(&record(7, answers)),
            "#7  2025-07-13 09:30:00 UTC\n  Q1: foo\n  Q2: Cat, Dog\n"
        );
    }

    #[test]
    fn test_newer_than() {
        let records = vec![
            record(3, AnswerSet::new()),
            record(2, AnswerSet::new()),
            record(1, AnswerSet::new()),
        ];
        let ids: Vec<_> = newer_than(records, 1).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }
}
