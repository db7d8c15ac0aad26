//! Prompt scaffolding for the command-backed provider.

use super::SummaryRequest;

pub const SYSTEM_PROMPT: &str = "You are a senior engineer documenting a codebase. \
Answer with the summary text only, no preamble and no markdown fences.";

/// Render a request into the prompt sent to the model.
pub fn render(request: &SummaryRequest) -> String {
    match request {
        SummaryRequest::File { name, content } => format!(
            "Summarize the purpose and functionality of this source file in at \
most three sentences.\n\nFile: {name}\n<<<\n{content}\n>>>"
        ),
        SummaryRequest::Folder { name, summaries } => {
            let mut prompt = format!(
                "The following summaries describe the files inside the folder \
`{name}`. Write one concise sentence describing the folder's primary purpose.\n"
            );
            for summary in summaries {
                prompt.push_str("\n- ");
                prompt.push_str(summary);
            }
            prompt
        }
        SummaryRequest::Repository { name, folders, readme } => {
            let mut prompt = format!(
                "Write a short description of the repository `{name}`: one \
sentence stating its purpose, then a single paragraph describing how it works, \
based on the folder summaries below.\n"
            );
            for folder in folders {
                prompt.push_str(&format!("\n{}: {}", folder.name, folder.summary));
            }
            if !readme.is_empty() {
                prompt.push_str("\n\nExisting README:\n<<<\n");
                prompt.push_str(readme);
                prompt.push_str("\n>>>");
            }
            prompt
        }
    }
}
