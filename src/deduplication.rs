// 🔍 Deduplication Engine - collapse repeated (student, college) rows
//
// A district export can list the same application more than once. The last
// occurrence in file order wins; earlier ones are dropped without error.

use crate::normalize::NormalizedRow;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

// ============================================================================
// DUPLICATE MATCH RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateMatch {
    /// Line of the row that was discarded
    pub dropped_line: usize,

    /// Line of the row that superseded it
    pub kept_line: usize,

    pub student_number: String,

    /// CEEB code, or lower-cased college name when the code is empty
    pub college_key: String,
}

#[derive(Debug, Clone, Default)]
pub struct Deduplicated {
    /// Surviving rows, in their original relative order
    pub rows: Vec<NormalizedRow>,

    pub duplicates: Vec<DuplicateMatch>,
}

// ============================================================================
// DEDUPLICATION ENGINE
// ============================================================================

pub struct DeduplicationEngine;

impl DeduplicationEngine {
    pub fn new() -> Self {
        DeduplicationEngine
    }

    /// Keep the last row of every (student_number, college_key) group
    pub fn deduplicate(&self, rows: Vec<NormalizedRow>) -> Deduplicated {
        let keys: Vec<(String, String)> = rows
            .iter()
            .map(|row| (row.student_number.clone(), row.college_key()))
            .collect();

        let mut last_index: HashMap<&(String, String), usize> = HashMap::new();
        for (index, key) in keys.iter().enumerate() {
            last_index.insert(key, index);
        }

        let mut duplicates = Vec::new();
        let mut survivors = Vec::with_capacity(last_index.len());

        for (index, row) in rows.iter().enumerate() {
            let key = &keys[index];
            let winner = last_index[key];

            if winner == index {
                survivors.push(row.clone());
            } else {
                let kept_line = rows[winner].line;
                debug!(
                    dropped_line = row.line,
                    kept_line,
                    student_number = %key.0,
                    college_key = %key.1,
                    "duplicate application row superseded"
                );
                duplicates.push(DuplicateMatch {
                    dropped_line: row.line,
                    kept_line,
                    student_number: key.0.clone(),
                    college_key: key.1.clone(),
                });
            }
        }

        if !duplicates.is_empty() {
            info!(
                dropped = duplicates.len(),
                kept = survivors.len(),
                "collapsed duplicate application rows"
            );
        }

        Deduplicated {
            rows: survivors,
            duplicates,
        }
    }
}

impl Default for DeduplicationEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
