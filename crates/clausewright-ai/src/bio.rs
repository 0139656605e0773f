//! BIO tag decoding for token-classification output.
//!
//! A token-classification model assigns one tag per sub-word token
//! (`B-ORG`, `I-ORG`, `O`, ...). Decoding groups those tokens back into
//! entity spans over the original text.

use clausewright_core::{Entity, EntityLabel};

/// One model token with its predicted tag and source position.
#[derive(Debug, Clone, Copy)]
pub struct TaggedToken<'a> {
    pub tag: &'a str,
    /// Byte offsets into the source text.
    pub start: usize,
    pub end: usize,
    /// Word index from the tokenizer; `None` for special tokens.
    pub word: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prefix {
    Begin,
    Inside,
    Outside,
}

fn split_tag(tag: &str) -> (Prefix, &str) {
    match tag.split_once('-') {
        Some(("B", kind)) => (Prefix::Begin, kind),
        Some(("I", kind)) => (Prefix::Inside, kind),
        _ if tag == "O" || tag.is_empty() => (Prefix::Outside, ""),
        // IO-scheme models emit bare types.
        _ => (Prefix::Inside, tag),
    }
}

struct OpenSpan<'a> {
    kind: &'a str,
    start: usize,
    end: usize,
}

/// Group tagged tokens into entities, in source order.
///
/// Only the first sub-word of each word decides its tag; later sub-words
/// extend whatever span the first one opened. An `I-X` that does not
/// continue an `X` span opens a new one.
pub fn decode(text: &str, tokens: &[TaggedToken<'_>]) -> Vec<Entity> {
    let mut entities = Vec::new();
    let mut open: Option<OpenSpan<'_>> = None;
    let mut prev_word = None;

    for token in tokens {
        let Some(word) = token.word else {
            close(text, open.take(), &mut entities);
            prev_word = None;
            continue;
        };

        if prev_word == Some(word) {
            if let Some(span) = open.as_mut() {
                span.end = token.end;
            }
            continue;
        }
        prev_word = Some(word);

        let (prefix, kind) = split_tag(token.tag);
        match prefix {
            Prefix::Inside if open.as_ref().is_some_and(|span| span.kind == kind) => {
                if let Some(span) = open.as_mut() {
                    span.end = token.end;
                }
            }
            Prefix::Begin | Prefix::Inside => {
                close(text, open.take(), &mut entities);
                open = Some(OpenSpan {
                    kind,
                    start: token.start,
                    end: token.end,
                });
            }
            Prefix::Outside => close(text, open.take(), &mut entities),
        }
    }
    close(text, open, &mut entities);

    entities
}

/// Stitch the tagged tokens of overlapping model windows into one stream.
///
/// Windows come from the tokenizer's overflow with a stride, so the head of
/// each window repeats the tail of the one before. The first window to tag a
/// source position wins. Special tokens are dropped so that a span running
/// across a window edge stays open.
pub fn merge_windows<'a>(
    windows: impl IntoIterator<Item = Vec<TaggedToken<'a>>>,
) -> Vec<TaggedToken<'a>> {
    let mut merged: Vec<TaggedToken<'a>> = Vec::new();
    let mut covered = 0;

    for window in windows {
        for token in window {
            if token.word.is_none() || token.start < covered {
                continue;
            }
            covered = token.end;
            merged.push(token);
        }
    }
    merged
}

fn close(text: &str, span: Option<OpenSpan<'_>>, entities: &mut Vec<Entity>) {
    let Some(span) = span else { return };
    let Some(slice) = text.get(span.start..span.end) else {
        return;
    };
    if slice.trim().is_empty() {
        return;
    }
    entities.push(Entity::new(slice, EntityLabel::from_tag(span.kind)));
}
