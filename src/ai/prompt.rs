//! Reusable prompts using Handlebars for templating. Handlebars runs in
//! strict mode with no custom helpers registered, so model output rendered
//! into a template stays inert text.

use std::fmt;

use handlebars::Handlebars;

#[derive(Debug)]
pub enum Prompt {
    FollowUp,
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

const FOLLOW_UP_PROMPT: &str = r"
You are answering follow-up questions about the output of a document
understanding task. Answer concisely using only the OUTPUT below and the
conversation so far.

OUTPUT:
{{{output}}}

{{#each history}}
{{role}}: {{{content}}}
{{/each}}
user: {{{question}}}
assistant:";

pub fn templates<'a>() -> Handlebars<'a> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry
        .register_template_string(&Prompt::FollowUp.to_string(), FOLLOW_UP_PROMPT)
        .expect("Failed to register template");
    registry
}
