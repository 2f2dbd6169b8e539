//! Prompt templates for the deliberation phases

use crate::deliberation::agent_id::AgentId;
use crate::deliberation::entities::{Critique, Solution};
use std::fmt::Write as _;

/// Templates for generating prompts at each phase
///
/// System prompts carry the agent's identity (`Agent {id} in a council of
/// {total} agents`). User turns carry the task and every peer artifact the
/// phase reads.
pub struct DeliberationPrompt;

impl DeliberationPrompt {
    /// System prompt for the Generate phase
    pub fn generation_system(agent: AgentId, total: u32) -> String {
        format!(
            r#"You are Agent {agent} in a council of {total} agents. You have been given a task to solve.

Provide your solution to the task. Be thorough but concise. Focus on correctness and clarity.

Do not reference other agents or solutions. You are working independently."#
        )
    }

    /// System prompt for a discussion round
    pub fn discussion_system(agent: AgentId, total: u32) -> String {
        format!(
            r#"You are Agent {agent} in a council of {total} agents.

Review all solutions and provide your critique. For each solution OTHER than your own:
- Identify strengths
- Identify weaknesses or potential issues
- Suggest improvements if applicable

Be constructive and objective. Your goal is to help identify the best solution."#
        )
    }

    /// System prompt for the Vote phase
    pub fn voting_system(agent: AgentId, total: u32) -> String {
        format!(
            r#"You are Agent {agent} in a council of {total} agents. You have seen all solutions and the discussion.

Rank all solutions EXCEPT YOUR OWN from best to worst. You CANNOT vote for your own solution (Solution {agent}).

Respond with a JSON object in this exact format:
{{
  "rankings": [X, Y, ...],
  "reasoning": "Brief explanation of your ranking"
}}

Where X is the agent number of your top choice, Y is your second choice, etc.
Do not include your own agent number ({agent}) in the rankings."#
        )
    }

    /// User turn for a discussion round: the task and every solution
    pub fn discussion_request(task: &str, solutions: &[Solution]) -> String {
        let mut prompt = String::new();
        write_task(&mut prompt, task);
        write_solutions(&mut prompt, solutions);
        prompt
    }

    /// User turn for the Vote phase: task, solutions, discussion and a reminder
    pub fn voting_request(
        agent: AgentId,
        task: &str,
        solutions: &[Solution],
        critiques: &[Critique],
    ) -> String {
        let mut prompt = String::new();
        write_task(&mut prompt, task);
        write_solutions(&mut prompt, solutions);

        if !critiques.is_empty() {
            prompt.push_str("## Discussion\n\n");
            for critique in critiques {
                let _ = writeln!(prompt, "### Agent {}'s Critique", critique.agent_id);
                prompt.push_str(&critique.content);
                prompt.push_str("\n\n");
            }
        }

        let _ = writeln!(
            prompt,
            "Now provide your vote. Remember: you are Agent {agent} and cannot vote for your own solution."
        );
        prompt
    }
}

fn write_task(prompt: &mut String, task: &str) {
    prompt.push_str("## Task\n");
    prompt.push_str(task);
    prompt.push_str("\n\n");
}

fn write_solutions(prompt: &mut String, solutions: &[Solution]) {
    prompt.push_str("## Solutions\n\n");
    for solution in solutions {
        let _ = writeln!(
            prompt,
            "### Solution {id} (Agent {id})",
            id = solution.agent_id
        );
        prompt.push_str(&solution.content);
        prompt.push_str("\n\n");
    }
}
