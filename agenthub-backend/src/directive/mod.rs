//! Directive tag parsing.
//!
//! A completion may embed one bracketed tag such as `[EXCHANGE:USD|TRY]`.
//! Each agent kind has exactly one grammar: a case-sensitive prefix and a
//! fixed field count. One matcher per grammar is compiled on first use; a
//! tag with the right prefix but the wrong field count never matches, so
//! malformed structured output falls through to the raw completion.

use crate::agents::AgentKind;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// A structured instruction extracted from a completion. Immutable once
/// parsed; at most one per completion is acted upon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub kind: AgentKind,
    pub fields: Vec<String>,
}

struct TagGrammar {
    kind: AgentKind,
    prefix: &'static str,
    field_count: usize,
}

/// Every tag grammar the model is taught. Kinds absent here (calculator,
/// assistant) answer in free text and never produce a directive.
const GRAMMARS: &[TagGrammar] = &[
    TagGrammar { kind: AgentKind::Weather, prefix: "WEATHER", field_count: 1 },
    TagGrammar { kind: AgentKind::Translator, prefix: "TRANSLATE", field_count: 3 },
    TagGrammar { kind: AgentKind::News, prefix: "NEWS", field_count: 3 },
    TagGrammar { kind: AgentKind::Wikipedia, prefix: "WIKI", field_count: 2 },
    TagGrammar { kind: AgentKind::Exchange, prefix: "EXCHANGE", field_count: 2 },
    TagGrammar { kind: AgentKind::Dictionary, prefix: "DEFINE", field_count: 1 },
    TagGrammar { kind: AgentKind::IpLocation, prefix: "LOCATE", field_count: 1 },
    TagGrammar { kind: AgentKind::Crypto, prefix: "CRYPTO", field_count: 2 },
    TagGrammar { kind: AgentKind::Sports, prefix: "FIXTURES", field_count: 1 },
    TagGrammar { kind: AgentKind::Qr, prefix: "QR", field_count: 1 },
    TagGrammar { kind: AgentKind::WebSummary, prefix: "SUMMARIZE", field_count: 1 },
    TagGrammar { kind: AgentKind::Trivia, prefix: "TRIVIA", field_count: 1 },
    TagGrammar { kind: AgentKind::Video, prefix: "VIDEO", field_count: 1 },
    TagGrammar { kind: AgentKind::Book, prefix: "BOOK", field_count: 1 },
    TagGrammar { kind: AgentKind::Movie, prefix: "MOVIE", field_count: 1 },
    TagGrammar { kind: AgentKind::Music, prefix: "MUSIC", field_count: 1 },
    TagGrammar { kind: AgentKind::Podcast, prefix: "PODCAST", field_count: 1 },
    TagGrammar { kind: AgentKind::Game, prefix: "GAME", field_count: 1 },
    TagGrammar { kind: AgentKind::Recipe, prefix: "RECIPE", field_count: 1 },
];

static MATCHERS: Lazy<HashMap<AgentKind, Regex>> = Lazy::new(|| {
    GRAMMARS
        .iter()
        .map(|grammar| {
            let fields = vec![r"([^|\[\]]+)"; grammar.field_count].join(r"\|");
            let pattern = format!(r"\[{}:{}\]", grammar.prefix, fields);
            let regex = Regex::new(&pattern)
                .unwrap_or_else(|e| panic!("invalid tag pattern for {}: {}", grammar.kind, e));
            (grammar.kind, regex)
        })
        .collect()
});

/// Extract the directive for `kind` from a completion, if one is present.
///
/// `None` means "the model answered directly" and is not an error; the raw
/// completion is used verbatim as the reply.
pub fn parse(kind: AgentKind, completion: &str) -> Option<Directive> {
    let matcher = MATCHERS.get(&kind)?;
    let captures = matcher.captures(completion)?;

    let fields = (1..captures.len())
        .map(|i| captures[i].trim().to_string())
        .collect();

    Some(Directive { kind, fields })
}
