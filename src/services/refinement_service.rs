//! Conversational refinement over an existing narrative. The model returns a
//! structured partial update; the merge edits section content only and never
//! section membership.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::{
    AggregatedInputs, ChatMessage, ChatRole, GeneratedNarrative, GenerationSettings,
    ParsedInputData, SectionId,
};
use crate::services::llm_service::LlmService;

/// Refinement keeps only the tail of the conversation; older messages are
/// dropped outright, with no sliding summarization.
const HISTORY_WINDOW: usize = 6;

/// Fixed user-facing reply when the model's response cannot be parsed. This
/// is a non-fatal outcome: the narrative is left untouched.
pub const REFINE_APOLOGY: &str =
    "I'm sorry, I couldn't apply that change. Could you try rephrasing your request?";

/// Shape the model is instructed to reply with.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefinementReply {
    message: String,
    #[serde(default)]
    affected_sections: Vec<String>,
    #[serde(default)]
    updated_sections: HashMap<String, String>,
}

#[derive(Debug)]
pub enum RefineOutcome {
    Applied {
        narrative: GeneratedNarrative,
        assistant_message: String,
        affected_sections: Vec<SectionId>,
    },
    /// The response was not parseable JSON. User-facing, non-fatal.
    ParseFailure { assistant_message: String },
}

pub async fn refine_narrative(
    llm_service: Arc<LlmService>,
    current: &GeneratedNarrative,
    history: &[ChatMessage],
    user_message: &str,
    parsed: &[ParsedInputData],
    settings: &GenerationSettings,
) -> Result<RefineOutcome, AppError> {
    info!(
        "Refining narrative with {} sections ({} history messages)",
        current.sections.len(),
        history.len()
    );

    let prompt = build_refinement_prompt(current, history, user_message, parsed);
    let raw = llm_service.generate_completion(prompt).await?;

    let Some(body) = extract_json_object(&raw) else {
        warn!("Refinement response contained no balanced JSON object");
        return Ok(RefineOutcome::ParseFailure {
            assistant_message: REFINE_APOLOGY.to_string(),
        });
    };

    let reply: RefinementReply = match serde_json::from_str(body) {
        Ok(reply) => reply,
        Err(e) => {
            warn!("Failed to parse refinement response as JSON: {}", e);
            return Ok(RefineOutcome::ParseFailure {
                assistant_message: REFINE_APOLOGY.to_string(),
            });
        }
    };

    let (narrative, affected_sections) = apply_reply(current, &reply, settings);
    Ok(RefineOutcome::Applied {
        narrative,
        assistant_message: reply.message,
        affected_sections,
    })
}

/// Merge the structured update into the current narrative: existing order is
/// preserved, untouched sections stay verbatim, and keys not already present
/// in the narrative are ignored. The output id set always equals the input
/// id set.
fn apply_reply(
    current: &GeneratedNarrative,
    reply: &RefinementReply,
    settings: &GenerationSettings,
) -> (GeneratedNarrative, Vec<SectionId>) {
    let updates: HashMap<SectionId, &String> = reply
        .updated_sections
        .iter()
        .filter_map(|(key, content)| Some((SectionId::from_key(key)?, content)))
        .collect();

    let sections = current
        .sections
        .iter()
        .map(|section| {
            let mut section = section.clone();
            if let Some(content) = updates.get(&section.id) {
                section.content = (*content).clone();
            }
            section
        })
        .collect();

    let present = current.section_ids();
    let mut affected: Vec<SectionId> = Vec::new();
    for key in &reply.affected_sections {
        if let Some(id) = SectionId::from_key(key) {
            if present.contains(&id) && !affected.contains(&id) {
                affected.push(id);
            }
        }
    }

    (
        GeneratedNarrative::from_sections(sections, settings.clone()),
        affected,
    )
}

fn build_refinement_prompt(
    current: &GeneratedNarrative,
    history: &[ChatMessage],
    user_message: &str,
    parsed: &[ParsedInputData],
) -> String {
    let inputs = AggregatedInputs::from_parsed(parsed);

    let mut prompt = String::new();
    prompt.push_str(
        "You are revising an investor letter based on the manager's request. \
         The current draft follows.\n\nCURRENT LETTER:\n",
    );
    prompt.push_str(&GeneratedNarrative::rejoin(&current.sections));
    prompt.push_str("\n\n");

    if inputs.has_reference_data() {
        prompt.push_str("DATA REFERENCE (do not invent figures beyond these):\n");
        if let Some(performance) = &inputs.performance {
            prompt.push_str(&format!(
                "- {}: fund {:.2}%, benchmark {:.2}%, alpha {:.2}%\n",
                performance.period,
                performance.fund_return,
                performance.benchmark_return,
                performance.alpha
            ));
        }
        if let Some(attribution) = &inputs.attribution {
            for item in attribution
                .contributors
                .iter()
                .chain(attribution.detractors.iter())
            {
                prompt.push_str(&format!("- {}: {:+.2}%\n", item.name, item.contribution));
            }
        }
        prompt.push('\n');
    }

    let recent = &history[history.len().saturating_sub(HISTORY_WINDOW)..];
    if !recent.is_empty() {
        prompt.push_str("CONVERSATION SO FAR:\n");
        for message in recent {
            let speaker = match message.role {
                ChatRole::User => "USER",
                ChatRole::Assistant => "ASSISTANT",
            };
            prompt.push_str(&format!("{}: {}\n", speaker, message.content));
        }
        prompt.push('\n');
    }

    prompt.push_str(&format!("NEW REQUEST:\n{}\n\n", user_message));

    prompt.push_str(
        "Respond with a single JSON object and nothing else, with exactly these three keys:\n\
         {\"message\": string, \"affectedSections\": array of section ids, \
         \"updatedSections\": object mapping section id to its full replacement content}\n\
         Valid section ids: performanceOverview, attributionAnalysis, keyEvents, forwardOutlook.\n\
         \"updatedSections\" must contain the complete rewritten markdown content for every \
         section you change, and must omit sections you did not change.",
    );

    prompt
}

/// Locate the first balanced `{...}` region of the raw response. Counts raw
/// braces without string-literal awareness, matching the documented source
/// behavior.
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let mut depth = 0usize;
    for (offset, c) in raw[start..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&raw[start..start + offset + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}
