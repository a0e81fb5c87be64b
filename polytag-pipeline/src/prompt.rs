use crate::taxonomy::Taxonomy;
use crate::template::Template;
use polytag_web::ExtractedText;

/// Rendered instruction text, ready for the inference service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptText {
    pub template: Template,
    pub body: String,
}

/// Render `excerpt` into `template`. Pure: the excerpt is the only input.
pub fn build_prompt(template: Template, excerpt: &ExtractedText) -> PromptText {
    let text = excerpt.text();
    let body = match template {
        Template::Pairs => pair_prompt(&text),
        Template::Taxonomy => taxonomy_prompt(&text),
    };
    PromptText { template, body }
}

fn pair_prompt(text: &str) -> String {
    format!(
        r#""{text}"
Summarize the text focusing on the main topic or issue it addresses and the primary politician involved.
Specifically, identify the central subject (such as healthcare, economy, foreign policy, etc.) in 1 or 2 words max and the first and last name of the key political figure discussed (only 1 politician).
Please always provide the output in this format with only one pair:

{{topic}}:{{politician name}}
"#
    )
}

fn taxonomy_prompt(text: &str) -> String {
    format!(
        r#""{text}"
Classify the text above into exactly one of the following policy categories:
{labels}

Respond with only the category label, spelled exactly as listed, and nothing else.
"#,
        labels = Taxonomy::prompt_list()
    )
}
