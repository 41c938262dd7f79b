//! Greedy selection of scored content under the working token budget

use tracing::debug;

use super::budget::{estimate_json_tokens, estimate_tokens, summarize_file, working_budget};
use super::output::{SelectedClass, SelectedFile, SelectedFunction};
use super::relevance::{ScoreKey, Scored};
use crate::index::ContentIndex;

#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub files: Vec<SelectedFile>,
    pub functions: Vec<SelectedFunction>,
    pub classes: Vec<SelectedClass>,
    /// Estimated tokens of everything selected
    pub tokens: usize,
}

/// Walk items by descending score, filling 80% of `max_tokens`.
///
/// Equal scores keep the order of `scored`. Functions and classes are taken
/// only when they fit; a file that does not fit is summarized into the
/// remaining budget instead.
pub fn select(scored: &[Scored], index: &ContentIndex, max_tokens: usize) -> Selection {
    let budget = working_budget(max_tokens);

    let mut ranked: Vec<&Scored> = scored.iter().collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));

    let mut selection = Selection::default();
    let mut total = 0usize;

    for item in ranked {
        if total >= budget {
            break;
        }

        match &item.key {
            ScoreKey::Function(key) => {
                let Some(record) = index.functions.get(key) else {
                    continue;
                };
                let cost = estimate_json_tokens(record);
                if total.saturating_add(cost) <= budget {
                    selection.functions.push(SelectedFunction::from(record));
                    total += cost;
                }
            }
            ScoreKey::Class(key) => {
                let Some(record) = index.classes.get(key) else {
                    continue;
                };
                let cost = estimate_json_tokens(record);
                if total.saturating_add(cost) <= budget {
                    selection.classes.push(SelectedClass::from(record));
                    total += cost;
                }
            }
            ScoreKey::File(path) => {
                let Some(content) = index.files.get(path) else {
                    continue;
                };
                let cost = estimate_tokens(content);
                if total.saturating_add(cost) <= budget {
                    selection.files.push(SelectedFile {
                        path: path.clone(),
                        content: content.clone(),
                        relevance: item.score,
                        summarized: false,
                    });
                    total += cost;
                } else {
                    let summary = summarize_file(content, budget - total);
                    total = total.saturating_add(estimate_tokens(&summary));
                    selection.files.push(SelectedFile {
                        path: path.clone(),
                        content: summary,
                        relevance: item.score,
                        summarized: true,
                    });
                }
            }
        }
    }

    debug!(
        "Selected {} files, {} functions, {} classes ({} of {} tokens)",
        selection.files.len(),
        selection.functions.len(),
        selection.classes.len(),
        total,
        budget
    );

    selection.tokens = total;
    selection
}
