//! Compiles the generation prompt from aggregated input data and user
//! settings. Emission order is fixed and part of the contract: identity
//! header, classifier guidance, tone, format, optional user context, data
//! block, one instruction block per enabled section, closing constraints.

use crate::models::{
    AggregatedInputs, AttributionItem, GenerationSettings, LetterFormat, ParsedInputData,
    SectionId, SectionToggles, Tone,
};
use crate::services::classifier;

fn tone_instruction(tone: Tone) -> &'static str {
    match tone {
        Tone::Conservative => {
            "TONE: Conservative. Use measured, risk-aware language; acknowledge \
             uncertainty and avoid superlatives."
        }
        Tone::Neutral => {
            "TONE: Neutral. Use balanced, factual language without promotional phrasing."
        }
        Tone::Optimistic => {
            "TONE: Optimistic. Use confident, forward-leaning language while staying \
             grounded in the figures provided."
        }
    }
}

fn format_instruction(format: LetterFormat) -> &'static str {
    match format {
        LetterFormat::ExecutiveSummary => {
            "FORMAT: Executive summary. Keep each section to 2-4 sentences; the whole \
             letter should fit on a single page."
        }
        LetterFormat::FullLetter => {
            "FORMAT: Full letter. Write 1-2 substantial paragraphs per section."
        }
    }
}

fn section_instruction(id: SectionId) -> &'static str {
    match id {
        SectionId::PerformanceOverview => {
            "Summarize the fund's return for the period against the benchmark and the \
             alpha achieved. Reference volatility, Sharpe ratio, or drawdown figures \
             only if they appear in the data above."
        }
        SectionId::AttributionAnalysis => {
            "Discuss what drove the period's result: the top contributors and \
             detractors listed above, with their contributions, and any sector or \
             weighting context provided."
        }
        SectionId::KeyEvents => {
            "Cover notable portfolio and organizational developments for the period: \
             position changes, process updates, and team news drawn from the manager \
             commentary."
        }
        SectionId::ForwardOutlook => {
            "Describe positioning and expectations going into the next period, \
             consistent with the tone requested and without forecasting specific \
             returns."
        }
    }
}

/// Build the full generation prompt.
///
/// When `regenerate` is set, only that section is treated as enabled for this
/// call; the settings map is untouched. Optional data fields contribute one
/// line each or are omitted entirely; nothing is ever emitted for an absent
/// value.
pub fn build_generation_prompt(
    parsed: &[ParsedInputData],
    settings: &GenerationSettings,
    regenerate: Option<SectionId>,
) -> String {
    let inputs = AggregatedInputs::from_parsed(parsed);
    let toggles = match regenerate {
        Some(id) => SectionToggles::only(id),
        None => settings.sections,
    };

    let mut prompt = String::new();

    prompt.push_str(&format!(
        "You are drafting an investor letter for \"{}\", a {}, reporting on {}.\n\n",
        settings.fund_name, settings.fund_type, settings.reporting_period
    ));

    prompt.push_str(&classifier::fund_type_guidance(&settings.fund_type));
    prompt.push_str("\n\n");

    prompt.push_str(tone_instruction(settings.tone));
    prompt.push('\n');
    prompt.push_str(format_instruction(settings.format));
    prompt.push_str("\n\n");

    if let Some(context) = settings.user_context.as_deref() {
        if !context.trim().is_empty() {
            prompt.push_str("ADDITIONAL CONTEXT FROM THE MANAGER:\n");
            prompt.push_str(context.trim());
            prompt.push_str("\n\n");
        }
    }

    push_data_block(&mut prompt, &inputs);

    prompt.push_str("SECTIONS TO WRITE (use these exact second-level headings, in this order):\n\n");
    for id in SectionId::ALL {
        if !toggles.is_enabled(id) {
            continue;
        }
        prompt.push_str(&format!("## {}\n", id.canonical_title()));
        prompt.push_str(section_instruction(id));
        prompt.push_str("\n\n");
    }

    prompt.push_str(
        "WRITING CONSTRAINTS:\n\
         - Write in the first-person plural (\"we\", \"our\").\n\
         - Use only the figures provided above; never invent numbers.\n\
         - Do not write any preamble; start directly with the first \"## \" heading.\n\
         - Begin every section with its \"## \" heading exactly as listed.",
    );

    prompt
}

fn push_data_block(prompt: &mut String, inputs: &AggregatedInputs) {
    if let Some(performance) = &inputs.performance {
        prompt.push_str("PERFORMANCE DATA:\n");
        prompt.push_str(&format!("- Period: {}\n", performance.period));
        prompt.push_str(&format!("- Fund Return: {:.2}%\n", performance.fund_return));
        prompt.push_str(&format!(
            "- Benchmark Return: {:.2}%\n",
            performance.benchmark_return
        ));
        prompt.push_str(&format!("- Alpha: {:.2}%\n", performance.alpha));
        if let Some(volatility) = performance.volatility {
            prompt.push_str(&format!("- Volatility: {:.2}%\n", volatility));
        }
        if let Some(sharpe) = performance.sharpe {
            prompt.push_str(&format!("- Sharpe Ratio: {:.2}\n", sharpe));
        }
        if let Some(max_drawdown) = performance.max_drawdown {
            prompt.push_str(&format!("- Max Drawdown: {:.2}%\n", max_drawdown));
        }
        if let Some(ytd) = performance.ytd_return {
            prompt.push_str(&format!("- YTD Return: {:.2}%\n", ytd));
        }
        if let Some(since_inception) = performance.since_inception {
            prompt.push_str(&format!("- Since Inception: {:.2}%\n", since_inception));
        }
        prompt.push('\n');
    }

    if let Some(attribution) = &inputs.attribution {
        if !attribution.contributors.is_empty() {
            prompt.push_str("TOP CONTRIBUTORS:\n");
            for item in &attribution.contributors {
                prompt.push_str(&attribution_line(item));
            }
            prompt.push('\n');
        }
        if !attribution.detractors.is_empty() {
            prompt.push_str("TOP DETRACTORS:\n");
            for item in &attribution.detractors {
                prompt.push_str(&attribution_line(item));
            }
            prompt.push('\n');
        }
    }

    if !inputs.commentary.is_empty() {
        prompt.push_str("MANAGER COMMENTARY:\n");
        prompt.push_str(&inputs.commentary);
        prompt.push_str("\n\n");
    }
}

fn attribution_line(item: &AttributionItem) -> String {
    let mut line = format!("- {}: {:+.2}%", item.name, item.contribution);
    if let Some(weight) = item.weight {
        line.push_str(&format!(" (weight {:.1}%)", weight));
    }
    if let Some(sector) = &item.sector {
        line.push_str(&format!(", {}", sector));
    }
    line.push('\n');
    line
}
