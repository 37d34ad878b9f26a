//! Prompt templates.

use overthink_core::AnalysisInput;
use overthink_rate_limit::AnalysisVariant;

const EXTRACTION: &str = "You are an AI assistant that extracts key events and their outcomes from videos.

Analyze the provided video and identify the key events and their corresponding outcomes.
Each entry describes one event and its outcome.
If you cannot determine specific events, provide a general summary of what is happening in the video as the only entry.

Respond with ONLY valid JSON of the form {\"eventsAndOutcomes\": [\"...\"]}.";

const ANALYSIS_DEVILS_ADVOCATE: &str = "You are a witty AI assistant that analyzes daily videos and provides insightful perspectives. You have a talent for playing devil's advocate.

Based on the event details provided, generate a witty analysis consisting of three sections:
- Went Well: Highlight the positive aspects and successes. Then, provide a devil's advocate take that pokes holes in the success in a humorous way.
- Could Have Gone Better: Analyze what could have been improved. Then, provide a devil's advocate take that humorously justifies why it was actually for the best.
- Conclusion: Summarize the daily video with a witty conclusion that leaves the user with a fresh perspective.

Respond with ONLY valid JSON of the form
{\"wentWell\": {\"main\": \"...\", \"devilsAdvocate\": \"...\"}, \"couldHaveGoneBetter\": {\"main\": \"...\", \"devilsAdvocate\": \"...\"}, \"conclusion\": \"...\"}";

const ANALYSIS_PLAIN: &str = "You are a witty AI assistant that analyzes daily videos and provides insightful perspectives.

Based on the event details provided, generate a witty analysis consisting of three sections:
- Went Well: Highlight the positive aspects and successes.
- Could Have Gone Better: Analyze what could have been improved, with humor.
- Conclusion: Summarize the daily video with a witty conclusion that leaves the user with a fresh perspective.

Respond with ONLY valid JSON of the form
{\"wentWell\": {\"main\": \"...\"}, \"couldHaveGoneBetter\": {\"main\": \"...\"}, \"conclusion\": \"...\"}";

const SCENARIOS: &str = "You are an expert at overthinking and coming up with hilarious, absurd, and imaginative alternative scenarios.
Based on the following events, generate two distinct \"what if\" scenarios. Let your imagination run wild.

Respond with ONLY valid JSON of the form {\"scenario1\": \"...\", \"scenario2\": \"...\"}.";

/// Extraction instructions, sent alongside the video.
pub(crate) fn extraction() -> &'static str {
    EXTRACTION
}

/// Analysis prompt for the variant and input.
pub(crate) fn analysis(variant: AnalysisVariant, input: &AnalysisInput) -> String {
    let template = match variant {
        AnalysisVariant::Plain => ANALYSIS_PLAIN,
        AnalysisVariant::DevilsAdvocate => ANALYSIS_DEVILS_ADVOCATE,
    };
    let mut prompt = format!("{}\n\nEvent Details: {}", template, input.event_details);
    if let Some(outcome) = &input.outcome_details {
        prompt.push_str("\n\nOutcome Details: ");
        prompt.push_str(outcome);
    }
    prompt
}

/// Scenario prompt for the event text.
pub(crate) fn scenarios(event_details: &str) -> String {
    format!("{}\n\nEvents:\n{}", SCENARIOS, event_details)
}

/// Image prompt for a scenario; the uploaded video travels with it.
pub(crate) fn image(scenario: &str) -> String {
    format!(
        "Using the people and context from the provided video, generate an image that vividly represents the following scenario: \"{}\"",
        scenario
    )
}
