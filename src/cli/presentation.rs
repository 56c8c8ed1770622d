//! Presentation: replay step formatters (text, json).

use crate::error::ApiError;
use crate::namespace::MemoryNode;
use crate::replay::StepReport;
use crate::tree::{Connection, Snapshot};
use owo_colors::OwoColorize;
use serde::Serialize;

/// Serializable view of one vertex
#[derive(Debug, Clone, Serialize)]
pub struct VertexView {
    pub name: String,
    pub identity: String,
    pub path: String,
    pub is_container: bool,
    pub suppressed: bool,
}

/// Serializable view of one replay step
#[derive(Debug, Clone, Serialize)]
pub struct StepView {
    pub step: usize,
    pub command: String,
    pub root: String,
    pub changed: bool,
    pub levels: Vec<Vec<Vec<VertexView>>>,
    pub connections: Vec<Connection>,
}

impl StepView {
    pub fn from_report(step: usize, report: &StepReport) -> Self {
        let (levels, connections) = match &report.changes {
            Some(snapshot) => (level_views(snapshot), snapshot.connections()),
            None => (Vec::new(), Vec::new()),
        };
        Self {
            step,
            command: report.command.clone(),
            root: report.root.to_string(),
            changed: report.changes.is_some(),
            levels,
            connections,
        }
    }
}

fn level_views(snapshot: &Snapshot<MemoryNode>) -> Vec<Vec<Vec<VertexView>>> {
    snapshot
        .levels()
        .iter()
        .map(|level| {
            level
                .iter()
                .map(|group| {
                    group
                        .iter()
                        .filter_map(|id| {
                            snapshot.vertex(*id).map(|vertex| VertexView {
                                name: vertex.name.clone(),
                                identity: vertex.identity.to_string(),
                                path: format!("/{}", snapshot.path_of(*id).join("/")),
                                is_container: vertex.is_container,
                                suppressed: vertex.suppressed,
                            })
                        })
                        .collect()
                })
                .collect()
        })
        .collect()
}

/// Format replay steps as JSON
pub fn format_steps_json(reports: &[StepReport]) -> Result<String, ApiError> {
    let views: Vec<StepView> = reports
        .iter()
        .enumerate()
        .map(|(i, report)| StepView::from_report(i + 1, report))
        .collect();
    serde_json::to_string_pretty(&views)
        .map_err(|e| ApiError::InvalidArgument(format!("Failed to serialize steps: {}", e)))
}

/// Format replay steps as text, one block per step
///
/// Sibling groups are separated by `|`. Directories end in `/`; suppressed
/// vertices are shown as `~name` references.
pub fn format_steps_text(reports: &[StepReport], color: bool) -> String {
    let mut blocks = Vec::with_capacity(reports.len());

    for (i, report) in reports.iter().enumerate() {
        let mut lines = vec![format!(
            "[{}] {}  (root #{})",
            i + 1,
            report.command,
            report.root.short()
        )];

        let Some(snapshot) = &report.changes else {
            lines.push("    No change to tree".to_string());
            blocks.push(lines.join("\n"));
            continue;
        };

        for (depth, level) in level_views(snapshot).iter().enumerate() {
            let groups: Vec<String> = level
                .iter()
                .map(|group| {
                    group
                        .iter()
                        .map(|vertex| format_vertex(vertex, color))
                        .collect::<Vec<_>>()
                        .join("  ")
                })
                .collect();
            lines.push(format!("    L{}: {}", depth, groups.join(" | ")));
        }

        let references = snapshot.suppressed_count();
        lines.push(format!(
            "    {} vertex(es) to redraw, {} reference(s)",
            snapshot.len() - references,
            references
        ));
        blocks.push(lines.join("\n"));
    }

    blocks.join("\n\n")
}

fn format_vertex(vertex: &VertexView, color: bool) -> String {
    let short: String = vertex.identity.chars().take(8).collect();
    let label = if vertex.is_container {
        format!("{}/", vertex.name)
    } else {
        vertex.name.clone()
    };

    match (vertex.suppressed, color) {
        (true, true) => format!("~{}#{}", label, short).dimmed().to_string(),
        (true, false) => format!("~{}#{}", label, short),
        (false, true) if vertex.is_container => format!("{}#{}", label.bold(), short),
        (false, true) => format!("{}#{}", label.green(), short),
        (false, false) => format!("{}#{}", label, short),
    }
}
