//! Rule-based named-entity recognizer.
//!
//! Works on runs of capitalised words (split at punctuation and sentence
//! ends) and labels each run, in priority order:
//!
//! 1. `ORG`: the run contains a corporate suffix after at least one name
//!    word (`Acme Corp`, `Globex Pvt Ltd`).
//! 2. `GPE`: a gazetteer place occurs in the run (`New Delhi`, `Berlin`).
//! 3. `PERSON`: an honorific followed by names (`Dr. Asha Rao`), or two to
//!    three name-shaped words that are not common or legal vocabulary.
//! 4. `ORG`: any remaining upper-case acronym (`NDA`, `IBM`).
//!
//! Spans never overlap and come out in source order.

use std::collections::HashSet;
use std::sync::LazyLock;

use clausewright_core::{Entity, EntityExtractor, EntityLabel};
use regex::Regex;

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{N}][\p{L}\p{N}&'’\-]*\.?").expect("valid regex"));

const ORG_SUFFIXES: &[&str] = &[
    "Inc", "Incorporated", "Corp", "Corporation", "Ltd", "Limited", "LLC", "LLP", "PLC", "GmbH",
    "AG", "SA", "Pvt", "Co", "Company", "Bros", "Technologies", "Technology", "Labs", "Solutions",
    "Systems", "Software", "Group", "Holdings", "Partners", "Ventures", "Industries", "Enterprises",
    "Bank", "University", "Foundation",
];

/// Suffixes written with a period that does not end the sentence.
const ABBREVIATED_SUFFIXES: &[&str] = &["Inc", "Corp", "Ltd", "Co", "Pvt", "Bros"];

const HONORIFICS: &[&str] = &["Mr", "Mrs", "Ms", "Dr", "Prof", "Shri", "Smt"];

/// Capitalised words that open sentences or requests rather than names.
const STOPWORDS: &[&str] = &[
    "A", "An", "The", "This", "That", "These", "Those", "We", "Our", "Us", "I", "My", "It", "Its",
    "They", "Their", "He", "She", "His", "Her", "You", "Your", "Between", "With", "For", "And",
    "Or", "But", "In", "On", "At", "By", "From", "To", "Of", "As", "If", "When", "Where", "Please",
    "Draft", "Create", "Prepare", "Generate", "Write", "Need", "Make", "Hire", "Hiring", "Dear",
    "Hi", "Hello", "Any", "All", "Each", "Both",
];

/// Vocabulary that never forms part of a person's name.
const COMMON_TERMS: &[&str] = &[
    "Agreement", "Agreements", "Party", "Parties", "Confidential", "Confidentiality",
    "Information", "Employee", "Employer", "Employment", "Schedule", "Clause", "Section",
    "Effective", "Date", "Contract", "Term", "Terms", "Law", "Laws", "Governing", "Purpose",
    "Non-Disclosure", "Disclosure", "Disclosing", "Receiving", "Startup", "Remote", "Intern",
    "Internship", "Services", "Business", "Team", "Office", "Policy", "Project", "Product",
    "Plan", "Option", "Phase", "Part", "Exhibit", "Annex", "Appendix", "Grade", "Class", "Tier",
    "Level", "Version", "Type",
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday", "January",
    "February", "March", "April", "May", "June", "July", "August", "September", "October",
    "November", "December",
];

const DEFAULT_PLACES: &[&str] = &[
    // Countries and regions
    "India", "United States", "United States of America", "USA", "US", "United Kingdom", "UK",
    "England", "Scotland", "Wales", "Ireland", "Germany", "France", "Spain", "Italy",
    "Netherlands", "Switzerland", "Sweden", "Norway", "Denmark", "Finland", "Poland", "Canada",
    "Mexico", "Brazil", "Australia", "New Zealand", "Japan", "China", "Singapore", "Malaysia",
    "Indonesia", "UAE", "United Arab Emirates", "Israel", "South Africa", "Nigeria", "Kenya",
    "Europe", "Asia",
    // Cities
    "Berlin", "Munich", "Frankfurt", "London", "Manchester", "Edinburgh", "Dublin", "Paris",
    "Amsterdam", "Zurich", "Geneva", "Stockholm", "Madrid", "Rome", "Milan", "New York",
    "San Francisco", "Los Angeles", "Seattle", "Boston", "Chicago", "Austin", "Toronto",
    "Vancouver", "Sydney", "Melbourne", "Tokyo", "Beijing", "Shanghai", "Hong Kong", "Dubai",
    "Delhi", "New Delhi", "Mumbai", "Bengaluru", "Bangalore", "Chennai", "Hyderabad", "Pune",
    "Kolkata", "Ahmedabad", "Jaipur", "Noida", "Gurugram", "Gurgaon", "Kochi",
    // States and provinces
    "California", "Delaware", "Texas", "Washington", "Ontario", "Bavaria", "Maharashtra",
    "Karnataka", "Tamil Nadu", "Kerala", "Gujarat", "Telangana", "West Bengal", "Uttar Pradesh",
    "Rajasthan", "Haryana",
];

/// A word of the source text with its byte span.
#[derive(Debug, Clone, Copy)]
struct Word<'t> {
    /// Text without a sentence-final period.
    bare: &'t str,
    start: usize,
    /// End of the span this word contributes; an abbreviation keeps its period.
    end: usize,
    /// End of the matched text, period included.
    raw_end: usize,
    ends_sentence: bool,
}

impl Word<'_> {
    fn capitalised(&self) -> bool {
        self.bare.chars().next().is_some_and(char::is_uppercase)
    }
}

/// Regex and gazetteer recognizer. Deterministic and cheap to share.
#[derive(Debug, Clone)]
pub struct PatternRecognizer {
    places: HashSet<String>,
    max_place_words: usize,
}

impl Default for PatternRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternRecognizer {
    /// A recognizer with the built-in gazetteer.
    pub fn new() -> Self {
        Self {
            places: HashSet::new(),
            max_place_words: 0,
        }
        .with_places(DEFAULT_PLACES.iter().copied())
    }

    /// Add places to the gazetteer. Matching is on the capitalised form.
    pub fn with_places<I, S>(mut self, places: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for place in places {
            let place: String = place.into();
            let words = place.split_whitespace().count();
            if words == 0 {
                continue;
            }
            self.max_place_words = self.max_place_words.max(words);
            self.places.insert(place.split_whitespace().collect::<Vec<_>>().join(" "));
        }
        self
    }

    pub fn place_count(&self) -> usize {
        self.places.len()
    }

    /// Label one capitalised run, walking it left to right.
    ///
    /// Each word is looked at a bounded number of times, so cost is linear in
    /// the run length.
    fn classify(&self, text: &str, run: &[Word<'_>], out: &mut Vec<Entity>) {
        let mut rest = trim_stopwords(run);

        // Organisation names take everything up to their suffix.
        while let Some(suffix) = rest.iter().skip(1).position(|w| is_org_suffix(w.bare)) {
            let mut last = suffix + 1;
            while last + 1 < rest.len() && is_org_suffix(rest[last + 1].bare) {
                last += 1;
            }
            emit(text, &rest[..=last], EntityLabel::Organization, out);
            rest = trim_stopwords(&rest[last + 1..]);
        }

        // No suffix remains past the first word, so only places and names are left.
        while let Some((at, len)) = self.find_place(rest) {
            classify_names(text, &rest[..at], out);
            emit(text, &rest[at..at + len], EntityLabel::GeoPolitical, out);
            rest = &rest[at + len..];
        }
        classify_names(text, rest, out);
    }

    /// Earliest, then longest, gazetteer phrase in `words`.
    fn find_place(&self, words: &[Word<'_>]) -> Option<(usize, usize)> {
        for at in 0..words.len() {
            let longest = self.max_place_words.min(words.len() - at);
            for len in (1..=longest).rev() {
                let phrase = words[at..at + len]
                    .iter()
                    .map(|w| w.bare)
                    .collect::<Vec<_>>()
                    .join(" ");
                if self.places.contains(&phrase) {
                    return Some((at, len));
                }
            }
        }
        None
    }
}

impl EntityExtractor for PatternRecognizer {
    fn extract(&self, text: &str) -> Vec<Entity> {
        let mut entities = Vec::new();
        for run in capitalised_runs(text) {
            self.classify(text, &run, &mut entities);
        }
        entities
    }
}

/// A run with no suffix or place: a person, or else any acronyms.
fn classify_names(text: &str, words: &[Word<'_>], out: &mut Vec<Entity>) {
    let words = trim_stopwords(words);
    if words.is_empty() {
        return;
    }

    if words.len() >= 2 && is_honorific(words[0].bare) {
        emit(text, &words[1..], EntityLabel::Person, out);
        return;
    }

    if (2..=3).contains(&words.len())
        && words.iter().all(|w| is_name_like(w.bare) && !is_common(w.bare))
    {
        emit(text, words, EntityLabel::Person, out);
        return;
    }

    for word in words.iter().filter(|w| is_acronym(w.bare)) {
        emit(text, std::slice::from_ref(word), EntityLabel::Organization, out);
    }
}

fn tokenize(text: &str) -> Vec<Word<'_>> {
    let matches: Vec<_> = WORD_RE.find_iter(text).collect();
    matches
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let matched = m.as_str();
            let keeps_period = |bare: &str| {
                if !is_initial(bare) {
                    return is_abbreviation(bare);
                }
                // `John F. Kennedy` but not `Plan B. Jane Doe signs`.
                let before = i.checked_sub(1).map(|p| bare_word(matches[p].as_str()));
                let next_capitalised = matches
                    .get(i + 1)
                    .is_some_and(|n| n.as_str().chars().next().is_some_and(char::is_uppercase));
                next_capitalised && !before.is_some_and(is_common)
            };
            match matched.strip_suffix('.') {
                Some(bare) if keeps_period(bare) => Word {
                    bare,
                    start: m.start(),
                    end: m.end(),
                    raw_end: m.end(),
                    ends_sentence: false,
                },
                Some(bare) => Word {
                    bare,
                    start: m.start(),
                    end: m.end() - 1,
                    raw_end: m.end(),
                    ends_sentence: true,
                },
                None => Word {
                    bare: matched,
                    start: m.start(),
                    end: m.end(),
                    raw_end: m.end(),
                    ends_sentence: false,
                },
            }
        })
        .collect()
}

/// Maximal runs of capitalised words separated only by spaces or tabs.
fn capitalised_runs(text: &str) -> Vec<Vec<Word<'_>>> {
    let mut runs = Vec::new();
    let mut current: Vec<Word<'_>> = Vec::new();

    for word in tokenize(text) {
        if !word.capitalised() {
            if !current.is_empty() {
                runs.push(std::mem::take(&mut current));
            }
            continue;
        }
        let joins = current.last().is_some_and(|prev| {
            !prev.ends_sentence
                && text[prev.raw_end..word.start]
                    .chars()
                    .all(|c| c == ' ' || c == '\t')
        });
        if !joins && !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
        current.push(word);
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

fn trim_stopwords<'a, 't>(words: &'a [Word<'t>]) -> &'a [Word<'t>] {
    let skip = words
        .iter()
        .take_while(|w| STOPWORDS.contains(&w.bare))
        .count();
    &words[skip..]
}

fn emit(text: &str, words: &[Word<'_>], label: EntityLabel, out: &mut Vec<Entity>) {
    let (Some(first), Some(last)) = (words.first(), words.last()) else {
        return;
    };
    out.push(Entity::new(&text[first.start..last.end], label));
}

fn is_org_suffix(word: &str) -> bool {
    ORG_SUFFIXES.contains(&word)
}

fn is_honorific(word: &str) -> bool {
    HONORIFICS.contains(&word)
}

/// Words whose trailing period is part of the word, not a sentence end.
fn is_abbreviation(word: &str) -> bool {
    is_honorific(word) || ABBREVIATED_SUFFIXES.contains(&word) || word == "St"
}

/// A single capital letter, which may be a name initial.
fn is_initial(word: &str) -> bool {
    let mut chars = word.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_uppercase())
}

fn bare_word(matched: &str) -> &str {
    matched.strip_suffix('.').unwrap_or(matched)
}

fn is_common(word: &str) -> bool {
    STOPWORDS.contains(&word) || COMMON_TERMS.contains(&word)
}

fn is_name_like(word: &str) -> bool {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_uppercase() {
        return false;
    }
    let rest: Vec<char> = chars.collect();
    rest.is_empty()
        || (rest.iter().any(|c| c.is_lowercase())
            && rest
                .iter()
                .all(|&c| c.is_alphabetic() || c == '-' || c == '\'' || c == '’'))
}

fn is_acronym(word: &str) -> bool {
    (2..=6).contains(&word.len()) && word.chars().all(|c| c.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(text: &str) -> Vec<(String, String)> {
        PatternRecognizer::new()
            .extract(text)
            .into_iter()
            .map(|e| (e.text, e.label.as_str().to_string()))
            .collect()
    }

    fn p(text: &str, label: &str) -> (String, String) {
        (text.to_string(), label.to_string())
    }

    #[test]
    fn typical_nda_request() {
        assert_eq!(
            pairs("Draft an NDA between Acme Corp and Jane Doe, governed by the laws of Berlin."),
            [
                p("NDA", "ORG"),
                p("Acme Corp", "ORG"),
                p("Jane Doe", "PERSON"),
                p("Berlin", "GPE"),
            ]
        );
    }

    #[test]
    fn no_entities_in_plain_text() {
        assert!(pairs("We are a startup hiring a remote intern.").is_empty());
        assert!(pairs("").is_empty());
    }

    #[test]
    fn honorific_and_stacked_suffixes() {
        assert_eq!(
            pairs("Mr. John Smith of Globex Pvt Ltd in New Delhi"),
            [
                p("John Smith", "PERSON"),
                p("Globex Pvt Ltd", "ORG"),
                p("New Delhi", "GPE"),
            ]
        );
    }

    #[test]
    fn abbreviated_suffix_keeps_period() {
        assert_eq!(pairs("Signed by Initech Inc. today"), [p("Initech Inc.", "ORG")]);
    }

    #[test]
    fn sentence_end_splits_runs() {
        assert_eq!(
            pairs("The office is in Berlin. Jane Doe leads the team."),
            [p("Berlin", "GPE"), p("Jane Doe", "PERSON")]
        );
    }

    #[test]
    fn comma_splits_runs() {
        assert_eq!(
            pairs("Parties: Jane Doe, Acme Labs"),
            [p("Jane Doe", "PERSON"), p("Acme Labs", "ORG")]
        );
    }

    #[test]
    fn place_inside_org_name_stays_org() {
        assert_eq!(pairs("Acme India Technologies"), [p("Acme India Technologies", "ORG")]);
    }

    #[test]
    fn document_title_is_not_a_person() {
        assert_eq!(
            pairs("Non-Disclosure Agreement for Acme Labs"),
            [p("Acme Labs", "ORG")]
        );
    }

    #[test]
    fn acronym_place_beats_acronym_org() {
        assert_eq!(pairs("Delivery in the USA"), [p("USA", "GPE")]);
    }

    #[test]
    fn leading_request_verb_trimmed() {
        assert_eq!(pairs("Prepare NDA"), [p("NDA", "ORG")]);
    }

    #[test]
    fn custom_places() {
        let recognizer = PatternRecognizer::new().with_places(["Port  Royal", ""]);
        let entities = recognizer.extract("Shipping from Port Royal");
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].text, "Port Royal");
        assert_eq!(entities[0].label, EntityLabel::GeoPolitical);
        assert_eq!(recognizer.place_count(), PatternRecognizer::new().place_count() + 1);
    }

    #[test]
    fn output_in_source_order() {
        let entities = PatternRecognizer::new()
            .extract("Mumbai office. Asha Rao joins Tata Technologies. Jane Doe signs.");
        let starts: Vec<&str> = entities.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(starts, ["Mumbai", "Asha Rao", "Tata Technologies", "Jane Doe"]);
    }

    #[test]
    fn long_run_of_places() {
        let entities = PatternRecognizer::new().extract(&"Berlin ".repeat(100_000));
        assert_eq!(entities.len(), 100_000);
        assert!(entities.iter().all(|e| e.label == EntityLabel::GeoPolitical));
    }

    #[test]
    fn long_run_of_organisations() {
        let entities = PatternRecognizer::new().extract(&"Acme Corp ".repeat(50_000));
        assert_eq!(entities.len(), 50_000);
        assert!(entities.iter().all(|e| e.text == "Acme Corp"));
    }

    #[test]
    fn places_between_names() {
        assert_eq!(
            pairs("Asha Rao Berlin Jane Doe Paris NDA"),
            [
                p("Asha Rao", "PERSON"),
                p("Berlin", "GPE"),
                p("Jane Doe", "PERSON"),
                p("Paris", "GPE"),
                p("NDA", "ORG"),
            ]
        );
    }

    #[test]
    fn letter_after_designator_ends_sentence() {
        assert_eq!(pairs("Plan B. Jane Doe signs"), [p("Jane Doe", "PERSON")]);
        assert_eq!(pairs("See Schedule A. Acme Labs agrees"), [p("Acme Labs", "ORG")]);
    }

    #[test]
    fn middle_initial_kept() {
        assert_eq!(pairs("John F. Kennedy signs"), [p("John F. Kennedy", "PERSON")]);
        assert!(pairs("Grade is B.").is_empty());
    }

    #[test]
    fn name_shape() {
        assert!(is_name_like("Jane"));
        assert!(is_name_like("O'Brien"));
        assert!(is_name_like("J"));
        assert!(!is_name_like("NDA"));
        assert!(!is_name_like("jane"));
        assert!(!is_name_like("R2D2"));
    }
}
