//! Greedy two-budget batch splitting

use super::budget::TokenBudget;
use super::types::{Batch, ItemCost};
use tracing::debug;

/// Partition `items` into contiguous batches that respect both token budgets.
///
/// Each batch starts with `system_overhead` input tokens already charged. An
/// item is appended to the open batch unless doing so would push either running
/// total past its budget, in which case the open batch is closed first. An item
/// that exceeds a budget on its own still gets a batch of its own, so batches
/// are never empty and every item is placed exactly once, in order.
pub fn split_batches<T, F>(items: Vec<T>, budget: &TokenBudget, mut cost: F) -> Vec<Batch<T>>
where
    F: FnMut(&T) -> ItemCost,
{
    let overhead = u64::from(budget.system_overhead);
    let input_budget = u64::from(budget.input_budget);
    let output_budget = u64::from(budget.output_budget);

    let mut batches: Vec<Batch<T>> = Vec::new();
    let mut current: Vec<T> = Vec::new();
    let mut cur_input = overhead;
    let mut cur_output = 0u64;

    for item in items {
        let ItemCost {
            input_tokens,
            output_tokens,
        } = cost(&item);
        let input_tokens = u64::from(input_tokens);
        let output_tokens = u64::from(output_tokens);

        let overflows = cur_input + input_tokens > input_budget
            || cur_output + output_tokens > output_budget;

        if overflows && !current.is_empty() {
            batches.push(Batch {
                index: batches.len(),
                items: std::mem::take(&mut current),
                input_tokens: cur_input,
                output_tokens: cur_output,
            });
            cur_input = overhead;
            cur_output = 0;
        }

        if current.is_empty()
            && (overhead + input_tokens > input_budget || output_tokens > output_budget)
        {
            debug!(
                "Item needs {} input / {} output tokens, over budget {} / {}; sending it alone",
                overhead + input_tokens,
                output_tokens,
                input_budget,
                output_budget
            );
        }

        cur_input += input_tokens;
        cur_output += output_tokens;
        current.push(item);
    }

    if !current.is_empty() {
        batches.push(Batch {
            index: batches.len(),
            items: current,
            input_tokens: cur_input,
            output_tokens: cur_output,
        });
    }

    batches
}
