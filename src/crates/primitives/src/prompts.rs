//! Prompt construction for the toolkit operations
//!
//! Each builder returns a system message describing the expected JSON shape
//! followed by a human message carrying the input.

use crate::actions::AvailableAction;
use crate::toolkit::{SummaryFormat, SummaryLength, SummaryOptions};
use llm::Message;
use serde_json::Value;

const JSON_ONLY: &str = "Respond with JSON only. Do not add commentary.";

fn pretty(value: &impl serde::Serialize) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| String::from("null"))
}

pub fn extraction(text: &str, schema: &Value) -> Vec<Message> {
    vec![
        Message::system(format!(
            "Extract structured data from the user's text. \
             Return a JSON value matching this schema:\n{}\n\
             Use null for fields that are not present. {}",
            pretty(schema),
            JSON_ONLY
        )),
        Message::human(text),
    ]
}

pub fn validation<R: AsRef<str>>(data: &Value, rules: &[R]) -> Vec<Message> {
    let rules = rules
        .iter()
        .enumerate()
        .map(|(i, rule)| format!("{}. {}", i + 1, rule.as_ref()))
        .collect::<Vec<_>>()
        .join("\n");

    vec![
        Message::system(format!(
            "Check the user's data against these rules:\n{}\n\
             Return {{\"valid\": boolean, \"errors\": [string]}} with one entry \
             in errors per violated rule. {}",
            rules, JSON_ONLY
        )),
        Message::human(pretty(data)),
    ]
}

pub fn summary(text: &str, options: &SummaryOptions) -> Vec<Message> {
    let length = match options.length {
        SummaryLength::Short => "one or two sentences",
        SummaryLength::Medium => "one paragraph",
        SummaryLength::Long => "several paragraphs",
    };
    let format = match options.format {
        SummaryFormat::Paragraph => "prose",
        SummaryFormat::Bullets => "bullet points joined by newlines",
    };
    let focus = options
        .focus
        .as_deref()
        .map(|focus| format!(" Focus on: {}.", focus))
        .unwrap_or_default();

    vec![
        Message::system(format!(
            "Summarize the user's text in {} written as {}.{}\n\
             Return {{\"summary\": string, \"key_points\": [string]}}. {}",
            length, format, focus, JSON_ONLY
        )),
        Message::human(text),
    ]
}

pub fn decision(context: &str, actions: &[AvailableAction]) -> Vec<Message> {
    vec![
        Message::system(format!(
            "Choose the single best action for the situation the user describes.\n\
             Available actions:\n{}\n\
             Return {{\"action\": string, \"parameters\": object, \
             \"reasoning\": string, \"confidence\": number between 0 and 1}}. \
             The action must be one of the names above. {}",
            pretty(&actions),
            JSON_ONLY
        )),
        Message::human(context),
    ]
}
