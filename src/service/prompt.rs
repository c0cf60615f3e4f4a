/// Messages at or under this many characters (after trimming) are treated as greetings.
const GREETING_MAX_CHARS: usize = 5;
/// Greeting replies are cut down to this many words.
pub const GREETING_MAX_WORDS: usize = 10;
/// Output-length hint passed upstream for greetings.
const GREETING_MAX_OUTPUT_TOKENS: u32 = 40;

const DETAILED_INSTRUCTION: &str = "Give a detailed, descriptive, and engaging answer. \
                                    You can be witty and roast the user if appropriate, \
                                    but keep it fun and not mean-spirited: ";
const GREETING_INSTRUCTION: &str = "Reply to this short greeting in a friendly, witty tone: ";
const GREETING_BREVITY: &str = "\nKeep the answer to one short sentence.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Greeting,
    Detailed,
}

impl PromptKind {
    pub fn classify(message: &str) -> Self {
        if message.trim().chars().count() <= GREETING_MAX_CHARS {
            PromptKind::Greeting
        } else {
            PromptKind::Detailed
        }
    }
}

/// The text sent upstream, plus the generation hints that go with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub text: String,
    pub max_output_tokens: Option<u32>,
}

impl Prompt {
    pub fn for_message(message: &str) -> Self {
        match PromptKind::classify(message) {
            PromptKind::Greeting => Self {
                kind: PromptKind::Greeting,
                text: format!("{GREETING_INSTRUCTION}{message}{GREETING_BREVITY}"),
                max_output_tokens: Some(GREETING_MAX_OUTPUT_TOKENS),
            },
            PromptKind::Detailed => Self {
                kind: PromptKind::Detailed,
                text: format!("{DETAILED_INSTRUCTION}{message}"),
                max_output_tokens: None,
            },
        }
    }

    /// Applies the post-processing this prompt kind calls for to an upstream reply.
    pub fn finish(&self, reply: String) -> String {
        match self.kind {
            PromptKind::Greeting => truncate_words(&reply, GREETING_MAX_WORDS),
            PromptKind::Detailed => reply,
        }
    }
}

/// Keeps the first `max_words` words; appends `...` only if anything was dropped.
pub fn truncate_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        return text.to_string();
    }
    format!("{}...", words[..max_words].join(" "))
}
