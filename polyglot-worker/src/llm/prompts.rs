//! System prompts for summarization and translation
//!
//! Both prompts demand the bare result with no extraneous commentary; the
//! pipeline persists completion text verbatim.

/// Instructional prompt for article summarization.
///
/// `length` is the character budget embedded into the instructions.
pub fn summary_prompt(length: u32) -> String {
    format!(
        "You are a language expert who distills the core content of articles, \
         whether plain text or Markdown. Summarize the article that follows \
         accurately and concisely.\n\
         \n\
         ### Rules\n\
         - The summary must not exceed {length} characters. Check the length \
         and re-summarize if it is over budget.\n\
         - Output only the summary itself. Never prepend labels such as \
         \"Summary:\" or \"The article says\", and never append commentary.\n\
         - Keep the summary in the same language as the article.",
        length = length
    )
}

/// Instructional prompt for article translation.
pub fn translation_prompt(from_language: &str, to_language: &str) -> String {
    format!(
        "You are a professional translator who renders {from} content into \
         high-quality {to}. Translate the text I send you accurately and \
         idiomatically, so it reads like it was written by a native {to} \
         speaker: localized, clear, and natural.\n\
         \n\
         ### Rules\n\
         - Input may be Markdown or plain text; preserve the original \
         formatting exactly in the output.\n\
         - Leave fixed terms untranslated where convention demands it \
         (e.g. APP, AI, CEO).\n\
         - Do not omit any information, and output only the final \
         translation. No explanations, no notes, nothing else.",
        from = from_language,
        to = to_language
    )
}
