//! Report rendering
//!
//! Text layout (tab separated, one row per task, then the totals):
//!
//! ```text
//!         FIFO
//!     Task 1      aborted
//!     Task 2      6   1   17%
//!     Total       6   1   17%
//! aborted tasks: 1
//! deadlocks resolved: 1
//! ```

use std::fmt;

use serde::Serialize;

use crate::domain::{RunReport, TaskStatus, TaskSummary, TraceEvent};

/// `Display` wrapper producing the text table
pub struct TextReport<'a>(pub &'a RunReport);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(f, "\t\t{}", report.manager.heading())?;

        for task in &report.tasks {
            write_task(f, task)?;
        }

        writeln!(
            f,
            "\tTotal   \t{}\t{}\t{:.0}%",
            report.total_turnaround, report.total_waiting, report.wait_percent
        )?;
        writeln!(f, "aborted tasks: {}", report.aborted_tasks)?;
        writeln!(f, "deadlocks resolved: {}", report.deadlocks_resolved)
    }
}

fn write_task(f: &mut fmt::Formatter<'_>, task: &TaskSummary) -> fmt::Result {
    if task.is_aborted() {
        return writeln!(f, "\tTask {}  \taborted", task.task);
    }
    match task.turnaround {
        Some(turnaround) => writeln!(
            f,
            "\tTask {}  \t{}\t{}\t{:.0}%",
            task.task,
            turnaround,
            task.waiting,
            task.wait_percent.unwrap_or(0.0)
        ),
        None => writeln!(f, "\tTask {}  \tunfinished ({})", task.task, task.status),
    }
}

/// Render the text table
pub fn render_text(report: &RunReport) -> String {
    TextReport(report).to_string()
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    report: &'a RunReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<&'a [TraceEvent]>,
}

/// Render the report as pretty JSON, with the event trace when one was kept
pub fn render_json(report: &RunReport, trace: Option<&[TraceEvent]>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport { report, trace })
}
