//! The eight dimension scorers.
//!
//! A prompt is scanned once ([`PromptSignals::scan`]): one case-insensitive
//! pass over the prose vocabulary, one case-sensitive pass over code tokens,
//! and a few byte-level counts. Every scorer is then a closed-form function
//! of those counts returning a value in `[0, 1]`.
//!
//! The free functions scan their input on their own and exist for callers
//! that want a single dimension.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use aho_corasick::{AhoCorasick, MatchKind};
use regex::Regex;

/// Characters per token, the usual rough ratio for English prose and code.
const CHARS_PER_TOKEN: f64 = 4.0;
/// Token count at which the logarithmic curve bends.
const TOKEN_SCALE: f64 = 150.0;
/// Token count that scores 1.0.
const TOKEN_SATURATION: f64 = 20_000.0;
/// Message count at which conversation depth scores 0.5 past the first turn.
const CONVERSATION_HALF_DEPTH: f64 = 11.0;
/// Question count that moves the question score by one e-fold.
const QUESTION_SCALE: f64 = 4.0;
/// System prompt token scale for the length term.
const SYSTEM_PROMPT_SCALE: f64 = 50.0;
const SYSTEM_PROMPT_SATURATION: f64 = 2_000.0;
/// Longer text is never a bare greeting.
const GREETING_MAX_BYTES: usize = 40;

const ANALYTICAL: &[&str] = &[
    "analyze", "analyse", "analysis", "compare", "comparison", "contrast", "evaluate", "assess",
    "tradeoff", "tradeoffs", "trade-off", "trade-offs", "pros and cons", "implication",
    "implications", "justify", "critique", "architecture", "optimize", "optimise", "why",
];

const CHAIN_OF_THOUGHT: &[&str] = &[
    "step by step",
    "step-by-step",
    "step by-step",
    "step-by step",
    "think carefully",
    "think through",
    "think hard",
    "walk through",
    "walk me through",
    "reason through",
    "reasoning through",
    "show your work",
    "show your reasoning",
    "explain your reasoning",
];

const DEBUGGING: &[&str] = &[
    "debug", "debugging", "bug", "bugs", "error", "errors", "exception", "exceptions",
    "stack trace", "stack traces", "stacktrace", "stacktraces", "crash", "crashes", "crashing",
    "segfault", "panic", "panics", "panicked", "root cause", "regression", "failing", "broken",
];

const SEQUENCE: &[&str] = &[
    "first", "firstly", "second", "secondly", "third", "thirdly", "then", "next", "after that",
    "afterwards", "finally", "lastly", "subsequently",
];

const REQUIREMENT: &[&str] = &[
    "must", "should", "need to", "needs to", "require", "requires", "required", "ensure",
    "make sure", "also", "and", "with", "including", "without",
];

const CONSTRAINT: &[&str] = &[
    "must", "never", "always", "should", "shall", "do not", "don't", "only", "require",
    "required", "forbidden", "strictly", "role is", "you are",
];

/// Matched as word prefixes so inflections count. Spellings of one verb
/// share a slot.
const BUILD_VERBS: &[&[&str]] = &[
    &["implement"],
    &["deploy"],
    &["integrate"],
    &["build"],
    &["create"],
    &["set up", "setup"],
    &["configure"],
    &["migrate"],
    &["refactor"],
    &["test"],
    &["write"],
    &["design"],
];

const FILE_EXTENSIONS: &[&str] = &[
    "rs", "py", "js", "ts", "tsx", "jsx", "go", "java", "kt", "c", "cc", "cpp", "h", "hpp", "rb",
    "php", "cs", "swift", "sql", "sh", "toml", "yaml", "yml", "json",
];

/// Case-sensitive.
const CODE_TOKENS: &[&str] = &[
    "fn", "def", "class", "function", "async", "await", "const", "let", "var", "struct", "impl",
    "enum", "trait", "interface", "import", "lambda", "elif", "else", "switch", "catch", "void",
    "println", "printf", "SELECT", "INSERT", "if (", "if(", "for (", "for(", "while (", "while(",
    "console.log", "=>", "::",
];

const INTERROGATIVES: &[&str] = &[
    "who", "what", "when", "where", "why", "how", "which", "can", "could", "would", "should", "is",
    "are", "does", "do", "did", "will",
];

static RE_GREETING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:hi|hello|hey|yo|ok|okay|k|thanks|thank you|thx|ty|yes|no|yep|yeah|nope|sure|cool|nice|great|got it|sounds good|bye|goodbye|good (?:morning|afternoon|evening|night))(?: there| again| so much| a lot)?$",
    )
    .expect("greeting pattern is valid")
});

static PROSE: LazyLock<Vocabulary> = LazyLock::new(|| {
    let mut terms: BTreeMap<String, Term> = BTreeMap::new();
    let families = [
        (Family::Analytical, ANALYTICAL),
        (Family::ChainOfThought, CHAIN_OF_THOUGHT),
        (Family::Debugging, DEBUGGING),
        (Family::Sequence, SEQUENCE),
        (Family::Requirement, REQUIREMENT),
        (Family::Constraint, CONSTRAINT),
    ];
    for (family, words) in families {
        for word in words {
            terms.entry(word.to_ascii_lowercase()).or_default().families |= family.bit();
        }
    }
    for (verb, spellings) in BUILD_VERBS.iter().enumerate() {
        for spelling in *spellings {
            let term = terms.entry(spelling.to_string()).or_default();
            term.families |= Family::BuildVerb.bit();
            term.verb = Some(verb as u8);
        }
    }
    for extension in FILE_EXTENSIONS {
        terms.entry(format!(".{extension}")).or_default().families |= Family::FileExtension.bit();
    }
    Vocabulary::compile(terms, true)
});

static CODE: LazyLock<Vocabulary> = LazyLock::new(|| {
    let terms = CODE_TOKENS
        .iter()
        .map(|token| {
            let term = Term {
                families: Family::CodeKeyword.bit(),
                ..Term::default()
            };
            (token.to_string(), term)
        })
        .collect();
    Vocabulary::compile(terms, false)
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Analytical,
    ChainOfThought,
    Debugging,
    Sequence,
    Requirement,
    Constraint,
    BuildVerb,
    FileExtension,
    CodeKeyword,
}

impl Family {
    const ALL: [Family; 9] = [
        Family::Analytical,
        Family::ChainOfThought,
        Family::Debugging,
        Family::Sequence,
        Family::Requirement,
        Family::Constraint,
        Family::BuildVerb,
        Family::FileExtension,
        Family::CodeKeyword,
    ];

    const fn bit(self) -> u16 {
        1 << self as u16
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Term {
    families: u16,
    verb: Option<u8>,
    /// The pattern starts or ends with a word character, so the match must
    /// sit on a word boundary on that side.
    word_start: bool,
    word_end: bool,
}

/// Per-family hit counts from one vocabulary pass.
#[derive(Debug, Clone, Copy, Default)]
struct Hits {
    counts: [usize; Family::ALL.len()],
    /// Bit per distinct build verb.
    verbs: u16,
}

impl Hits {
    fn get(&self, family: Family) -> usize {
        self.counts[family as usize]
    }

    fn distinct_verbs(&self) -> usize {
        self.verbs.count_ones() as usize
    }

    fn record(&mut self, families: u16, verb: Option<u8>) {
        for family in Family::ALL {
            if families & family.bit() != 0 {
                self.counts[family as usize] += 1;
            }
        }
        if let Some(verb) = verb {
            self.verbs |= 1 << verb;
        }
    }
}

struct Vocabulary {
    matcher: AhoCorasick,
    terms: Vec<Term>,
}

impl Vocabulary {
    fn compile(terms: BTreeMap<String, Term>, ascii_case_insensitive: bool) -> Self {
        let (patterns, terms): (Vec<String>, Vec<Term>) = terms
            .into_iter()
            .map(|(pattern, mut term)| {
                term.word_start = pattern.bytes().next().is_some_and(is_word_byte);
                term.word_end = pattern.bytes().last().is_some_and(is_word_byte);
                (pattern, term)
            })
            .unzip();

        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(ascii_case_insensitive)
            .match_kind(MatchKind::LeftmostLongest)
            .build(&patterns)
            .expect("vocabulary patterns are valid");
        Self { matcher, terms }
    }

    fn scan(&self, text: &str) -> Hits {
        let bytes = text.as_bytes();
        let mut hits = Hits::default();

        for found in self.matcher.find_iter(text) {
            let term = &self.terms[found.pattern().as_usize()];
            let (start, end) = (found.start(), found.end());

            let clean_start = if term.families & Family::FileExtension.bit() != 0 {
                start > 0 && is_stem_byte(bytes[start - 1])
            } else {
                !term.word_start || start == 0 || !is_word_byte(bytes[start - 1])
            };
            if !clean_start {
                continue;
            }

            let clean_end = !term.word_end || end == bytes.len() || !is_word_byte(bytes[end]);
            // Build verbs are prefixes; every other family needs the whole word.
            let families = if clean_end {
                term.families
            } else {
                term.families & Family::BuildVerb.bit()
            };
            if families != 0 {
                hits.record(families, term.verb);
            }
        }
        hits
    }
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Characters that may precede a file extension: `src/lib.rs`, `my-app.ts`.
fn is_stem_byte(b: u8) -> bool {
    is_word_byte(b) || b == b'-' || b == b'/'
}

/// `per_match` for each hit, capped at `cap`.
fn capped(count: usize, per_match: f64, cap: f64) -> f64 {
    (count as f64 * per_match).min(cap)
}

fn estimate_tokens(chars: usize) -> f64 {
    chars as f64 / CHARS_PER_TOKEN
}

fn token_score(chars: usize) -> f64 {
    let tokens = estimate_tokens(chars);
    let score = (1.0 + tokens / TOKEN_SCALE).ln() / (1.0 + TOKEN_SATURATION / TOKEN_SCALE).ln();
    score.clamp(0.0, 1.0)
}

fn is_greeting(text: &str) -> bool {
    let normalized = text
        .trim()
        .trim_end_matches(|c: char| matches!(c, '.' | '!' | '?' | ',') || c.is_whitespace());
    if normalized.is_empty() {
        return true;
    }
    normalized.len() <= GREETING_MAX_BYTES && RE_GREETING.is_match(&normalized.to_lowercase())
}

/// `1.`, `2)`, `-`, `*` or `•`, then whitespace, then content.
fn is_list_item(line: &[u8]) -> bool {
    let line = line.trim_ascii_start();
    let rest = match line {
        [b'-' | b'*', rest @ ..] => rest,
        [0xE2, 0x80, 0xA2, rest @ ..] => rest,
        _ => {
            let digits = line.iter().take_while(|b| b.is_ascii_digit()).count();
            match line.get(digits).copied() {
                Some(b'.' | b')') if digits > 0 => &line[digits + 1..],
                _ => return false,
            }
        }
    };
    rest.first().is_some_and(|b| b.is_ascii_whitespace()) && !rest.trim_ascii().is_empty()
}

fn trim_non_alphanumeric(word: &[u8]) -> &[u8] {
    let start = word
        .iter()
        .position(u8::is_ascii_alphanumeric)
        .unwrap_or(word.len());
    let end = word
        .iter()
        .rposition(u8::is_ascii_alphanumeric)
        .map_or(start, |i| i + 1);
    &word[start..end]
}

/// Sentences whose first word is an interrogative.
fn interrogative_sentences(bytes: &[u8]) -> usize {
    bytes
        .split(|&b| matches!(b, b'.' | b'!' | b'?' | b'\n'))
        .filter_map(|sentence| {
            sentence
                .split(|b| b.is_ascii_whitespace())
                .find(|word| !word.is_empty())
        })
        .map(trim_non_alphanumeric)
        .filter(|word| {
            INTERROGATIVES
                .iter()
                .any(|q| q.as_bytes().eq_ignore_ascii_case(word))
        })
        .count()
}

/// Everything the prompt scorers read, gathered in one scan.
#[derive(Debug, Clone, Default)]
pub struct PromptSignals {
    chars: usize,
    words: usize,
    fences: usize,
    question_marks: usize,
    interrogative_sentences: usize,
    list_items: usize,
    /// Commas and semicolons.
    separators: usize,
    greeting: bool,
    prose: Hits,
    code: Hits,
}

impl PromptSignals {
    pub fn scan(prompt: &str) -> Self {
        let bytes = prompt.as_bytes();
        Self {
            chars: prompt.chars().count(),
            words: prompt.split_ascii_whitespace().count(),
            fences: prompt.matches("```").count(),
            question_marks: bytes.iter().filter(|&&b| b == b'?').count(),
            interrogative_sentences: interrogative_sentences(bytes),
            list_items: bytes.split(|&b| b == b'\n').filter(|l| is_list_item(l)).count(),
            separators: bytes.iter().filter(|&&b| b == b',' || b == b';').count(),
            greeting: is_greeting(prompt),
            prose: PROSE.scan(prompt),
            code: CODE.scan(prompt),
        }
    }

    /// Logarithmic in the estimated token count.
    ///
    /// About 0.30 at 500 tokens and above 0.85 past 10,000 tokens.
    pub fn token_count(&self) -> f64 {
        token_score(self.chars)
    }

    /// Fenced blocks, programming keywords, and source file mentions.
    pub fn code_presence(&self) -> f64 {
        let blocks = self.fences.div_ceil(2);
        let fenced = if blocks == 0 {
            0.0
        } else {
            (0.5 + 0.1 * (blocks - 1) as f64).min(0.6)
        };

        let keywords = capped(self.code.get(Family::CodeKeyword), 0.08, 0.4);
        let files = capped(self.prose.get(Family::FileExtension), 0.15, 0.3);

        (fenced + keywords + files).min(1.0)
    }

    /// Analytical, chain-of-thought, and debugging vocabulary.
    pub fn reasoning_markers(&self) -> f64 {
        let analytical = capped(self.prose.get(Family::Analytical), 0.12, 0.4);
        let chain = capped(self.prose.get(Family::ChainOfThought), 0.25, 0.4);
        let debugging = capped(self.prose.get(Family::Debugging), 0.1, 0.3);
        (analytical + chain + debugging).min(1.0)
    }

    /// 1.0 for a bare greeting or acknowledgement, falling with length and
    /// with every stated requirement.
    pub fn simple_indicators(&self) -> f64 {
        if self.greeting {
            return 1.0;
        }
        let length_factor = 1.0 / (1.0 + self.words as f64 / 8.0);
        let requirements = self.prose.get(Family::Requirement) + self.separators;
        let score = length_factor / (1.0 + 0.2 * requirements as f64);
        score.clamp(0.0, 1.0)
    }

    /// Sequencing words, list items, and several distinct build verbs.
    pub fn multi_step_patterns(&self) -> f64 {
        let sequence = capped(self.prose.get(Family::Sequence), 0.15, 0.5);
        let list = if self.list_items >= 2 {
            capped(self.list_items, 0.1, 0.4)
        } else {
            0.0
        };
        let verbs = self.prose.distinct_verbs();
        let build = if verbs >= 2 {
            capped(verbs, 0.1, 0.4)
        } else {
            0.0
        };
        (sequence + list + build).min(1.0)
    }

    /// Saturating in the number of questions asked.
    ///
    /// A question is a `?` or a sentence that opens with an interrogative,
    /// whichever count is higher. Five questions score above 0.7.
    pub fn question_count(&self) -> f64 {
        let questions = self.question_marks.max(self.interrogative_sentences) as f64;
        1.0 - (-questions / QUESTION_SCALE).exp()
    }
}

pub fn token_count(text: &str) -> f64 {
    token_score(text.chars().count())
}

pub fn code_presence(text: &str) -> f64 {
    PromptSignals::scan(text).code_presence()
}

pub fn reasoning_markers(text: &str) -> f64 {
    PromptSignals::scan(text).reasoning_markers()
}

pub fn simple_indicators(text: &str) -> f64 {
    PromptSignals::scan(text).simple_indicators()
}

pub fn multi_step_patterns(text: &str) -> f64 {
    PromptSignals::scan(text).multi_step_patterns()
}

pub fn question_count(text: &str) -> f64 {
    PromptSignals::scan(text).question_count()
}

/// Length and behavioural-constraint density of the system prompt.
pub fn system_prompt_signals(system_prompt: Option<&str>) -> f64 {
    let Some(prompt) = system_prompt.map(str::trim).filter(|p| !p.is_empty()) else {
        return 0.0;
    };

    let tokens = estimate_tokens(prompt.chars().count());
    let length = ((1.0 + tokens / SYSTEM_PROMPT_SCALE).ln()
        / (1.0 + SYSTEM_PROMPT_SATURATION / SYSTEM_PROMPT_SCALE).ln())
    .min(1.0);

    let words = prompt.split_whitespace().count().max(1) as f64;
    let constraints = PROSE.scan(prompt).get(Family::Constraint) as f64;
    // Ten constraint words per hundred saturates.
    let density = (constraints * 100.0 / words / 10.0).min(1.0);

    (0.5 * length + 0.5 * density).clamp(0.0, 1.0)
}

/// Zero for a single message, about 0.45 at ten, above 0.8 at fifty.
pub fn conversation_depth(message_count: Option<usize>) -> f64 {
    let n = message_count.unwrap_or(0);
    if n <= 1 {
        return 0.0;
    }
    let prior = (n - 1) as f64;
    prior / (prior + CONVERSATION_HALF_DEPTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_unit_range(v: f64) -> bool {
        (0.0..=1.0).contains(&v)
    }

    #[test]
    fn token_count_tracks_length_logarithmically() {
        assert!(token_count("hello") < 0.05);
        let mid = token_count(&"word ".repeat(400)); // 2000 chars, ~500 tokens
        assert!((0.25..=0.35).contains(&mid), "got {mid}");
        let long = token_count(&"x".repeat(40_000)); // ~10,000 tokens
        assert!(long > 0.85, "got {long}");
        assert_eq!(token_count(&"x".repeat(400_000)), 1.0);
        assert_eq!(token_count(""), 0.0);
    }

    #[test]
    fn code_presence_is_zero_for_prose() {
        assert_eq!(code_presence("Tell me a story about a dragon who loves tea."), 0.0);
    }

    #[test]
    fn code_presence_counts_each_signal_family() {
        let fenced = code_presence("```\nsome text\n```");
        assert!((fenced - 0.5).abs() < 1e-9);

        let keywords = code_presence("async fn fetch() => await the result");
        assert!(keywords > 0.0 && keywords <= 0.4);

        let files = code_presence("look at main.rs and lib.rs");
        assert!((files - 0.3).abs() < 1e-9);

        let everything = code_presence(
            "```rust\nasync fn main() { let x = foo::bar().await; }\n```\nalso see src/lib.rs, util.py and app.ts",
        );
        assert!(everything > 0.9 && everything <= 1.0);
    }

    #[test]
    fn code_keywords_are_case_sensitive() {
        assert_eq!(code_presence("Let me know. Else we wait."), 0.0);
        assert!(code_presence("SELECT name FROM users") > 0.0);
        assert_eq!(code_presence("select a restaurant"), 0.0);
    }

    #[test]
    fn file_extension_needs_a_stem() {
        assert_eq!(PROSE.scan("files ending in .rs").get(Family::FileExtension), 0);
        assert_eq!(PROSE.scan("see src/lib.rs.").get(Family::FileExtension), 1);
        assert_eq!(PROSE.scan("export to data.jsonl").get(Family::FileExtension), 0);
        assert_eq!(PROSE.scan("my-app.ts and Main.JAVA").get(Family::FileExtension), 2);
    }

    #[test]
    fn vocabulary_matches_whole_words_only() {
        let hits = PROSE.scan("Android classification: rebuild the contest sandwich");
        assert_eq!(hits.get(Family::Requirement), 0);
        assert_eq!(hits.distinct_verbs(), 0);
        assert_eq!(CODE.scan("classification, letter, defer").get(Family::CodeKeyword), 0);
    }

    #[test]
    fn build_verbs_match_inflections() {
        let hits = PROSE.scan("Testing the builder, then tests and builds again");
        assert_eq!(hits.distinct_verbs(), 2);
        assert_eq!(hits.get(Family::BuildVerb), 4);
        assert_eq!(PROSE.scan("set up and setup").distinct_verbs(), 1);
    }

    #[test]
    fn reasoning_markers_detects_analysis_and_debugging() {
        assert_eq!(reasoning_markers("hello there"), 0.0);
        assert!(reasoning_markers("Compare the trade-offs of these approaches") > 0.2);
        assert!(reasoning_markers("Think through this step by step") > 0.35);
        let debugging = reasoning_markers("Help me debug this crash, the stack trace shows an error");
        assert!(debugging >= 0.3);
    }

    #[test]
    fn simple_indicators_recognizes_greetings() {
        for greeting in ["hello", "Hello!", "ok", "thanks", "Thank you.", "yes", "hi there"] {
            assert_eq!(simple_indicators(greeting), 1.0, "{greeting}");
        }
    }

    #[test]
    fn simple_indicators_falls_for_long_requirement_heavy_text() {
        let short = simple_indicators("what is rust");
        let long = simple_indicators(
            "Build a REST service that must support pagination, should cache responses, \
             needs to validate input and also ensure authentication with OAuth, \
             including rate limiting and structured logging without any downtime.",
        );
        assert!(short > 0.5);
        assert!(long < 0.3, "got {long}");
    }

    #[test]
    fn multi_step_zero_for_atomic_requests() {
        assert_eq!(multi_step_patterns("Fix the typo in the heading"), 0.0);
    }

    #[test]
    fn multi_step_detects_sequences_lists_and_build_verbs() {
        assert!(multi_step_patterns("First do this, then do that, finally wrap up") > 0.4);
        assert!(multi_step_patterns("1. parse\n2. validate\n3. store") > 0.25);
        assert!(multi_step_patterns("• parse\n  - validate\n* store") > 0.25);
        assert!(multi_step_patterns("Implement the API, deploy it, and integrate billing") > 0.25);
        // A single build verb alone is not a plan.
        assert_eq!(multi_step_patterns("implement a linked list"), 0.0);
    }

    #[test]
    fn list_items_need_content_after_the_marker() {
        assert!(is_list_item(b"  12) ship it"));
        assert!(is_list_item("\u{2022} bullet".as_bytes()));
        assert!(!is_list_item(b"-"));
        assert!(!is_list_item(b"3.14 is pi"));
        assert!(!is_list_item(b"-dash"));
    }

    #[test]
    fn question_count_saturates() {
        assert_eq!(question_count("The sky is blue."), 0.0);
        let one = question_count("Why is the sky blue?");
        let five = question_count("Why? How? When? Where? Who?");
        let many = question_count(&"Really? ".repeat(20));
        assert!(one > 0.1 && one < 0.3);
        assert!(five > 0.7);
        assert!(many > five && many <= 1.0);
    }

    #[test]
    fn question_count_sees_interrogatives_without_marks() {
        assert!(question_count("how do I reverse a string in python") > 0.0);
        assert!(question_count("\"What\" is this. WHERE does it go") > 0.3);
    }

    #[test]
    fn system_prompt_signals_absent_is_zero() {
        assert_eq!(system_prompt_signals(None), 0.0);
        assert_eq!(system_prompt_signals(Some("   ")), 0.0);
    }

    #[test]
    fn system_prompt_signals_grows_with_constraints() {
        let plain =
            system_prompt_signals(Some("Help the user with their questions about cooking."));
        let strict = system_prompt_signals(Some(
            "Your role is a compliance reviewer. You must always cite sources. \
             Never speculate. Only answer from the provided documents.",
        ));
        assert!(plain > 0.0);
        assert!(strict > plain);
        assert!(strict <= 1.0);
    }

    #[test]
    fn conversation_depth_matches_anchor_points() {
        assert_eq!(conversation_depth(None), 0.0);
        assert_eq!(conversation_depth(Some(0)), 0.0);
        assert_eq!(conversation_depth(Some(1)), 0.0);
        assert!((conversation_depth(Some(10)) - 0.45).abs() < 0.01);
        assert!(conversation_depth(Some(50)) > 0.8);
        assert!(conversation_depth(Some(10_000)) < 1.0);
    }

    #[test]
    fn every_scorer_stays_in_unit_range() {
        let samples = [
            "",
            "hi",
            "?????????????????????????????",
            "```a``` ```b``` ```c``` ```d```",
            "héllo wörld • first 日本語 ¿qué? ünïcode.rs",
            &"fn main() => :: async await ".repeat(200),
            &"First then next finally 1. a\n2. b\n- c\n".repeat(50),
            &"must never always only ".repeat(100),
        ];
        for text in samples {
            let signals = PromptSignals::scan(text);
            assert!(in_unit_range(signals.token_count()));
            assert!(in_unit_range(signals.code_presence()));
            assert!(in_unit_range(signals.reasoning_markers()));
            assert!(in_unit_range(signals.simple_indicators()));
            assert!(in_unit_range(signals.multi_step_patterns()));
            assert!(in_unit_range(signals.question_count()));
            assert!(in_unit_range(system_prompt_signals(Some(text))));
        }
        for n in [0, 1, 2, 10, 1_000_000] {
            assert!(in_unit_range(conversation_depth(Some(n))));
        }
    }
}
