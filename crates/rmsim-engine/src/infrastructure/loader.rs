//! Schedule loader
//!
//! # Format
//!
//! ```text
//! T R c1 .. cR              header: tasks, resource types, capacities
//!
//! initiate  1 1 4           <kind> <task> <a> <b>
//! request   1 1 1
//! terminate 1 0 0
//!                           blank line(s) end a group
//! initiate  2 1 4
//! ...
//! ```
//!
//! Header numbers may span several lines. Task and resource numbers are
//! 1-based in the file and 0-based in the returned [`Schedule`]. For
//! `compute`, `a` is the cycle count; for `terminate`, `a` and `b` are
//! ignored. Activity ids follow input order.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use super::config::SimulationConfig;
use crate::domain::{Activity, ActivityGroup, ActivityKind, ResourceId, Schedule, TaskId, Units};

/// Schedule loading errors (line numbers are 1-based)
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// File could not be read
    #[error("failed to read schedule {}", path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Input ended before the header was complete
    #[error("input ended before the header (tasks, resource types, capacities) was complete")]
    MissingHeader,

    /// Extra token after the last header number
    #[error("line {line}: unexpected `{token}` after the header")]
    UnexpectedToken {
        /// Line number
        line: usize,
        /// Offending token
        token: String,
    },

    /// Field is not a non-negative integer in range
    #[error("line {line}: `{token}` is not a valid number")]
    InvalidNumber {
        /// Line number
        line: usize,
        /// Offending token
        token: String,
    },

    /// Activity keyword not recognised
    #[error("line {line}: unknown activity `{kind}`")]
    UnknownActivity {
        /// Line number
        line: usize,
        /// Offending keyword
        kind: String,
    },

    /// Activity line without exactly four fields
    #[error("line {line}: expected 4 fields, found {found}")]
    WrongFieldCount {
        /// Line number
        line: usize,
        /// Fields present
        found: usize,
    },

    /// Task number outside `1..=T`
    #[error("line {line}: task {task} is outside 1..={tasks}")]
    TaskOutOfRange {
        /// Line number
        line: usize,
        /// Task number as written
        task: usize,
        /// Declared population
        tasks: usize,
    },

    /// Resource number outside `1..=R`
    #[error("line {line}: resource {resource} is outside 1..={resources}")]
    ResourceOutOfRange {
        /// Line number
        line: usize,
        /// Resource number as written
        resource: usize,
        /// Declared resource types
        resources: usize,
    },

    /// A configured limit was exceeded
    #[error("too many {what}: {actual} (limit {limit})")]
    LimitExceeded {
        /// What was counted
        what: &'static str,
        /// Configured limit
        limit: usize,
        /// Value found
        actual: usize,
    },
}

/// Read and parse a schedule file
pub fn load_schedule_file(
    path: impl AsRef<Path>,
    config: &SimulationConfig,
) -> Result<Schedule, ScheduleError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ScheduleError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let schedule = parse_schedule(&text, config)?;
    debug!(
        path = %path.display(),
        tasks = schedule.task_count(),
        resources = schedule.resource_count(),
        groups = schedule.group_count(),
        activities = schedule.activity_count(),
        "schedule loaded"
    );
    Ok(schedule)
}

/// Parse a schedule from text
pub fn parse_schedule(text: &str, config: &SimulationConfig) -> Result<Schedule, ScheduleError> {
    let mut lines = text.lines().enumerate().map(|(index, line)| (index + 1, line));
    let header = read_header(&mut lines, config)?;

    let mut groups = Vec::new();
    let mut current = Vec::new();
    let mut next_id = 0;

    for (line, content) in lines {
        if content.trim().is_empty() {
            if !current.is_empty() {
                push_group(&mut groups, std::mem::take(&mut current), config)?;
            }
            continue;
        }
        current.push(parse_activity(line, content, next_id, &header)?);
        next_id += 1;
    }
    if !current.is_empty() {
        push_group(&mut groups, current, config)?;
    }

    Ok(Schedule::new(header.tasks, header.capacities, groups))
}

struct Header {
    tasks: usize,
    capacities: Vec<Units>,
}

fn read_header<'a, I>(lines: &mut I, config: &SimulationConfig) -> Result<Header, ScheduleError>
where
    I: Iterator<Item = (usize, &'a str)>,
{
    let mut tasks = None;
    let mut resources = None;
    let mut capacities = Vec::new();

    for (line, content) in lines.by_ref() {
        for token in content.split_whitespace() {
            match (tasks, resources) {
                (None, _) => {
                    let count = parse_field(line, token)?;
                    check_limit("tasks", count, config.max_tasks)?;
                    tasks = Some(count);
                }
                (Some(_), None) => {
                    let count = parse_field(line, token)?;
                    check_limit("resource types", count, config.max_resource_types)?;
                    resources = Some(count);
                }
                (Some(_), Some(count)) if capacities.len() < count => {
                    capacities.push(parse_field(line, token)?);
                }
                (Some(_), Some(_)) => {
                    return Err(ScheduleError::UnexpectedToken {
                        line,
                        token: token.to_string(),
                    });
                }
            }
        }

        if let (Some(tasks), Some(count)) = (tasks, resources) {
            if capacities.len() == count {
                return Ok(Header { tasks, capacities });
            }
        }
    }

    Err(ScheduleError::MissingHeader)
}

fn parse_activity(
    line: usize,
    content: &str,
    id: usize,
    header: &Header,
) -> Result<Activity, ScheduleError> {
    let fields: Vec<&str> = content.split_whitespace().collect();
    let [keyword, task, a, b] = fields[..] else {
        return Err(ScheduleError::WrongFieldCount {
            line,
            found: fields.len(),
        });
    };

    let task_number: usize = parse_field(line, task)?;
    if task_number == 0 || task_number > header.tasks {
        return Err(ScheduleError::TaskOutOfRange {
            line,
            task: task_number,
            tasks: header.tasks,
        });
    }

    let resource = |field: &str| -> Result<ResourceId, ScheduleError> {
        let number: usize = parse_field(line, field)?;
        let resources = header.capacities.len();
        if number == 0 || number > resources {
            return Err(ScheduleError::ResourceOutOfRange {
                line,
                resource: number,
                resources,
            });
        }
        Ok(ResourceId::new(number - 1))
    };

    let kind = match keyword {
        "initiate" => ActivityKind::Initiate {
            resource: resource(a)?,
            claim: parse_field(line, b)?,
        },
        "request" => ActivityKind::Request {
            resource: resource(a)?,
            units: parse_field(line, b)?,
        },
        "compute" => ActivityKind::Compute {
            cycles: parse_field(line, a)?,
        },
        "release" => ActivityKind::Release {
            resource: resource(a)?,
            units: parse_field(line, b)?,
        },
        "terminate" => ActivityKind::Terminate,
        other => {
            return Err(ScheduleError::UnknownActivity {
                line,
                kind: other.to_string(),
            });
        }
    };

    Ok(Activity::new(id, TaskId::new(task_number - 1), kind))
}

fn push_group(
    groups: &mut Vec<ActivityGroup>,
    activities: Vec<Activity>,
    config: &SimulationConfig,
) -> Result<(), ScheduleError> {
    check_limit("activities in one group", activities.len(), config.max_group_len)?;
    check_limit("groups", groups.len() + 1, config.max_groups)?;
    groups.push(ActivityGroup::new(activities));
    Ok(())
}

fn parse_field<T: FromStr>(line: usize, token: &str) -> Result<T, ScheduleError> {
    token.parse().map_err(|_| ScheduleError::InvalidNumber {
        line,
        token: token.to_string(),
    })
}

fn check_limit(what: &'static str, actual: usize, limit: usize) -> Result<(), ScheduleError> {
    if actual > limit {
        Err(ScheduleError::LimitExceeded {
            what,
            limit,
            actual,
        })
    } else {
        Ok(())
    }
}
