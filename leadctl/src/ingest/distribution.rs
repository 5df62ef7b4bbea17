//! Balanced round-robin partitioning of leads across agents.

use crate::db::models::Agent;
use crate::errors::{Error, Result};
use crate::ingest::validator::LeadRecord;
use crate::types::{AgentId, BatchId};
use uuid::Uuid;

/// Every distribution uses exactly this many agents
pub const AGENTS_PER_BATCH: usize = 5;

/// One lead bound to its owning agent, in original record order
#[derive(Debug, Clone)]
pub struct Assignment {
    pub record: LeadRecord,
    pub agent_id: AgentId,
}

/// Per-agent share of one distribution, in agent order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentShare {
    pub agent_id: AgentId,
    pub item_count: usize,
}

/// The deterministic outcome of partitioning one upload
#[derive(Debug, Clone)]
pub struct DistributionPlan {
    /// Freshly generated, shared by every assignment of this operation
    pub batch_id: BatchId,
    pub assignments: Vec<Assignment>,
    pub base_items_per_agent: usize,
    pub agents_with_extra_item: usize,
    pub shares: Vec<AgentShare>,
}

impl DistributionPlan {
    pub fn total_items(&self) -> usize {
        self.assignments.len()
    }
}

/// Partition `records` across the first [`AGENTS_PER_BATCH`] agents of the
/// supplied directory.
///
/// Contiguous, order-preserving slices: with `base = N / 5` and
/// `remainder = N % 5`, agent *i* receives `base + 1` records if
/// `i < remainder`, else `base`. The first `remainder` agents in directory
/// order get the extra record, so the split is reproducible for the same
/// input. Concatenating the per-agent slices in agent order reproduces the
/// original sequence.
pub fn distribute(records: Vec<LeadRecord>, agents: &[Agent]) -> Result<DistributionPlan> {
    if agents.is_empty() {
        return Err(Error::NoAgents);
    }
    if agents.len() < AGENTS_PER_BATCH {
        return Err(Error::InsufficientAgents { available: agents.len() });
    }

    let selected = &agents[..AGENTS_PER_BATCH];
    let base = records.len() / AGENTS_PER_BATCH;
    let remainder = records.len() % AGENTS_PER_BATCH;

    let mut assignments = Vec::with_capacity(records.len());
    let mut shares = Vec::with_capacity(AGENTS_PER_BATCH);
    let mut remaining = records.into_iter();

    for (i, agent) in selected.iter().enumerate() {
        let item_count = base + usize::from(i < remainder);
        shares.push(AgentShare {
            agent_id: agent.id,
            item_count,
        });
        for record in remaining.by_ref().take(item_count) {
            assignments.push(Assignment {
                record,
                agent_id: agent.id,
            });
        }
    }
    debug_assert!(remaining.next().is_none());

    Ok(DistributionPlan {
        batch_id: Uuid::new_v4(),
        assignments,
        base_items_per_agent: base,
        agents_with_extra_item: remainder,
        shares,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn agents(n: usize) -> Vec<Agent> {
        (0..n)
            .map(|i| Agent {
                id: Uuid::new_v4(),
                name: format!("agent-{i}"),
                created_at: Utc::now(),
            })
            .collect()
    }

    fn leads(n: usize) -> Vec<LeadRecord> {
        (0..n)
            .map(|i| LeadRecord {
                first_name: format!("lead-{i}"),
                phone: format!("555{i:04}"),
                notes: String::new(),
            })
            .collect()
    }

    #[test]
    fn zero_agents_is_its_own_error() {
        assert!(matches!(distribute(leads(10), &[]).unwrap_err(), Error::NoAgents));
    }

    #[test]
    fn fewer_than_five_agents_reports_the_shortfall() {
        match distribute(leads(10), &agents(4)).unwrap_err() {
            Error::InsufficientAgents { available } => assert_eq!(available, 4),
            other => panic!("expected InsufficientAgents, got {other:?}"),
        }
    }

    #[test]
    fn twelve_records_split_three_three_two_two_two() {
        let directory = agents(5);
        let plan = distribute(leads(12), &directory).unwrap();

        assert_eq!(plan.total_items(), 12);
        assert_eq!(plan.base_items_per_agent, 2);
        assert_eq!(plan.agents_with_extra_item, 2);
        let counts: Vec<usize> = plan.shares.iter().map(|s| s.item_count).collect();
        assert_eq!(counts, vec![3, 3, 2, 2, 2]);
        // The extra items go to the first agents in directory order
        assert_eq!(plan.shares[0].agent_id, directory[0].id);
        assert_eq!(plan.shares[1].agent_id, directory[1].id);
    }

    #[test]
    fn five_records_give_each_agent_exactly_one() {
        let plan = distribute(leads(5), &agents(5)).unwrap();
        assert_eq!(plan.base_items_per_agent, 1);
        assert_eq!(plan.agents_with_extra_item, 0);
        assert!(plan.shares.iter().all(|s| s.item_count == 1));
    }

    #[test]
    fn only_the_first_five_agents_participate() {
        let directory = agents(8);
        let plan = distribute(leads(10), &directory).unwrap();

        let used: Vec<AgentId> = plan.shares.iter().map(|s| s.agent_id).collect();
        let expected: Vec<AgentId> = directory[..5].iter().map(|a| a.id).collect();
        assert_eq!(used, expected);
    }

    #[test]
    fn concatenated_slices_reproduce_the_original_order() {
        for n in [5usize, 6, 7, 11, 23] {
            let plan = distribute(leads(n), &agents(5)).unwrap();
            let names: Vec<String> = plan.assignments.iter().map(|a| a.record.first_name.clone()).collect();
            let expected: Vec<String> = (0..n).map(|i| format!("lead-{i}")).collect();
            assert_eq!(names, expected, "order broken for n={n}");
        }
    }

    #[test]
    fn counts_are_balanced_for_all_small_sizes() {
        for n in 1usize..=31 {
            let plan = distribute(leads(n), &agents(5)).unwrap();
            let base = n / 5;
            let remainder = n % 5;

            let total: usize = plan.shares.iter().map(|s| s.item_count).sum();
            assert_eq!(total, n);
            for (i, share) in plan.shares.iter().enumerate() {
                let expected = base + usize::from(i < remainder);
                assert_eq!(share.item_count, expected, "agent {i} for n={n}");
            }
            let extras = plan.shares.iter().filter(|s| s.item_count == base + 1).count();
            if remainder > 0 {
                assert_eq!(extras, remainder);
            }
        }
    }

    #[test]
    fn assignments_follow_the_shares() {
        let plan = distribute(leads(12), &agents(5)).unwrap();
        let mut cursor = 0;
        for share in &plan.shares {
            for assignment in &plan.assignments[cursor..cursor + share.item_count] {
                assert_eq!(assignment.agent_id, share.agent_id);
            }
            cursor += share.item_count;
        }
        assert_eq!(cursor, plan.assignments.len());
    }
}
