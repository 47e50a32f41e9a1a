//! Lexicon Matcher: stateless keyword/phrase classification.
//!
//! One matcher serves both contradiction detection (sentiment lexicons) and
//! the safety net (crisis / elevated-risk lexicons). Tables are process-wide
//! immutable statics built once at startup, safe to share across sessions
//! without locking.
//!
//! Matching is case-insensitive, punctuation-stripped, and word-boundary
//! aware: text and terms are both tokenized with the same `\w+` pass and a
//! term matches only as a contiguous token run. "cut" therefore never
//! matches inside "recruit", while "kill myself" matches across whitespace
//! and punctuation.

use once_cell::sync::Lazy;
use regex::Regex;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("word regex is valid"));

/// The named lexicons the engine consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lexicon {
    Crisis,
    ElevatedRisk,
    SentimentPositive,
    SentimentNegative,
    IntentVenting,
    IntentCrisis,
    IntentSeekingAdvice,
    IntentSmallTalk,
    TopicPanic,
    TopicSleep,
    TopicOverwhelm,
}

/// One lexicon term: the raw form for reporting plus its normalized tokens.
struct Term {
    raw: &'static str,
    tokens: Vec<String>,
}

struct Table {
    terms: Vec<Term>,
}

impl Table {
    fn build(raw_terms: &[&'static str]) -> Self {
        let mut terms: Vec<Term> = Vec::with_capacity(raw_terms.len());
        for &raw in raw_terms {
            let tokens = tokenize(raw);
            if tokens.is_empty() {
                continue;
            }
            // Normalization can collapse variants ("self-harm" / "self harm").
            if terms.iter().any(|t| t.tokens == tokens) {
                continue;
            }
            terms.push(Term { raw, tokens });
        }
        Table { terms }
    }
}

/// Self-harm / crisis indicators. Reviewed list; any hit activates the
/// crisis protocol.
static CRISIS: Lazy<Table> = Lazy::new(|| {
    Table::build(&[
        "suicide",
        "kill myself",
        "end my life",
        "hurt myself",
        "self harm",
        "self-harm",
        "cut myself",
        "want to die",
        "no reason to live",
    ])
});

/// Secondary risk language: concerning but below the crisis line.
static ELEVATED_RISK: Lazy<Table> = Lazy::new(|| {
    Table::build(&[
        "give up",
        "hopeless",
        "worthless",
        "no point",
        "what's the point",
        "pointless",
        "can't take it",
        "numb",
    ])
});

static SENTIMENT_POSITIVE: Lazy<Table> = Lazy::new(|| {
    Table::build(&[
        "good", "better", "great", "happy", "glad", "calm", "relieved", "grateful", "hopeful",
        "proud", "excited", "peaceful", "love", "enjoyed",
    ])
});

static SENTIMENT_NEGATIVE: Lazy<Table> = Lazy::new(|| {
    Table::build(&[
        "sad",
        "down",
        "tired",
        "anxious",
        "scared",
        "afraid",
        "angry",
        "mad",
        "upset",
        "lonely",
        "awful",
        "terrible",
        "stressed",
        "overwhelmed",
        "worried",
        "hurt",
        "crying",
        "depressed",
        "miserable",
        "exhausted",
    ])
});

static INTENT_VENTING: Lazy<Table> = Lazy::new(|| {
    Table::build(&[
        "vent",
        "venting",
        "rant",
        "just listen",
        "need to talk",
        "get this off my chest",
        "fed up",
        "sick of",
    ])
});

static INTENT_CRISIS: Lazy<Table> = Lazy::new(|| {
    Table::build(&[
        "emergency",
        "help me",
        "can't do this",
        "falling apart",
        "desperate",
        "scared of myself",
    ])
});

static INTENT_SEEKING_ADVICE: Lazy<Table> = Lazy::new(|| {
    Table::build(&[
        "advice",
        "what should i do",
        "how do i",
        "any ideas",
        "suggest",
        "tips",
        "fix",
        "handle",
        "deal with",
    ])
});

static INTENT_SMALL_TALK: Lazy<Table> = Lazy::new(|| {
    Table::build(&[
        "hello",
        "hi",
        "hey",
        "how are you",
        "what's up",
        "good morning",
        "good evening",
        "weather",
        "weekend",
    ])
});

static TOPIC_PANIC: Lazy<Table> = Lazy::new(|| {
    Table::build(&["panic", "panicking", "anxious", "anxiety", "heart racing"])
});

static TOPIC_SLEEP: Lazy<Table> = Lazy::new(|| {
    Table::build(&["sleep", "insomnia", "can't sleep", "awake all night"])
});

static TOPIC_OVERWHELM: Lazy<Table> = Lazy::new(|| {
    Table::build(&["overwhelm", "overwhelmed", "burnout", "burned out", "too much to do"])
});

impl Lexicon {
    fn table(self) -> &'static Table {
        match self {
            Lexicon::Crisis => &CRISIS,
            Lexicon::ElevatedRisk => &ELEVATED_RISK,
            Lexicon::SentimentPositive => &SENTIMENT_POSITIVE,
            Lexicon::SentimentNegative => &SENTIMENT_NEGATIVE,
            Lexicon::IntentVenting => &INTENT_VENTING,
            Lexicon::IntentCrisis => &INTENT_CRISIS,
            Lexicon::IntentSeekingAdvice => &INTENT_SEEKING_ADVICE,
            Lexicon::IntentSmallTalk => &INTENT_SMALL_TALK,
            Lexicon::TopicPanic => &TOPIC_PANIC,
            Lexicon::TopicSleep => &TOPIC_SLEEP,
            Lexicon::TopicOverwhelm => &TOPIC_OVERWHELM,
        }
    }

    /// Match `text` against this lexicon.
    ///
    /// Returns the distinct matched terms plus a normalized score in [0,1]:
    /// distinct matches over the lexicon's total term count. `None` or empty
    /// text yields an empty match with score 0. Pure function.
    pub fn match_text(self, text: Option<&str>) -> LexiconMatch {
        let table = self.table();
        let tokens = match text {
            Some(t) if !t.trim().is_empty() => tokenize(t),
            _ => return LexiconMatch::empty(),
        };

        let mut matched: Vec<&'static str> = Vec::new();
        for term in &table.terms {
            if contains_run(&tokens, &term.tokens) {
                matched.push(term.raw);
            }
        }
        let score = if table.terms.is_empty() {
            0.0
        } else {
            matched.len() as f64 / table.terms.len() as f64
        };
        LexiconMatch { terms: matched, score }
    }
}

/// Result of matching one text against one lexicon.
#[derive(Debug, Clone)]
pub struct LexiconMatch {
    /// Distinct matched terms, in lexicon order.
    pub terms: Vec<&'static str>,
    /// Distinct matches / lexicon size, in [0,1].
    pub score: f64,
}

impl LexiconMatch {
    fn empty() -> Self {
        LexiconMatch { terms: Vec::new(), score: 0.0 }
    }

    pub fn is_hit(&self) -> bool {
        !self.terms.is_empty()
    }
}

/// Lowercased `\w+` tokens of the input.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    WORD_RE
        .find_iter(&text.to_lowercase())
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Whether `needle` occurs as a contiguous run inside `haystack`.
fn contains_run(haystack: &[String], needle: &[String]) -> bool {
    if needle.is_empty() || needle.len() > haystack.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_missing_text_score_zero() {
        assert!(!Lexicon::Crisis.match_text(None).is_hit());
        assert!(!Lexicon::Crisis.match_text(Some("   ")).is_hit());
        assert_eq!(Lexicon::Crisis.match_text(Some("")).score, 0.0);
    }

    #[test]
    fn substring_inside_a_word_does_not_match() {
        // "cut" must not fire inside "recruit" or "cutlery".
        let m = Lexicon::Crisis.match_text(Some("the recruiter called about the job"));
        assert!(!m.is_hit());
    }

    #[test]
    fn phrases_match_across_punctuation_and_case() {
        let m = Lexicon::Crisis.match_text(Some("I want to KILL myself."));
        assert!(m.terms.contains(&"kill myself"));
        assert!(m.score > 0.0 && m.score <= 1.0);
    }

    #[test]
    fn hyphenated_variant_collapses_to_one_term() {
        let a = Lexicon::Crisis.match_text(Some("thoughts of self-harm again"));
        let b = Lexicon::Crisis.match_text(Some("thoughts of self harm again"));
        assert_eq!(a.terms.len(), 1);
        assert_eq!(b.terms.len(), 1);
    }

    #[test]
    fn score_counts_distinct_terms() {
        let m = Lexicon::SentimentNegative.match_text(Some("sad sad sad and so tired"));
        assert_eq!(m.terms.len(), 2); // "sad" once, "tired" once
    }

    #[test]
    fn elevated_risk_is_separate_from_crisis() {
        let m = Lexicon::ElevatedRisk.match_text(Some("honestly it all feels hopeless"));
        assert!(m.is_hit());
        assert!(!Lexicon::Crisis.match_text(Some("honestly it all feels hopeless")).is_hit());
    }
}
