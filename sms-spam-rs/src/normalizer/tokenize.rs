//! Whitespace/punctuation segmentation
//!
//! Splits on whitespace runs, then peels leading and trailing punctuation
//! off each chunk one character at a time. The remaining word is split once
//! more at a contraction ("don't" -> "do" "n't") and between a number and
//! its unit ("3pm" -> "3" "pm"). Anything else inside a chunk stays together.

/// Kind of a raw segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Word,
    Punct,
    Space,
}

/// A raw segment of the input, before lemmatization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub kind: SegmentKind,
}

/// Contraction suffixes split off after an apostrophe
const CLITICS: [&str; 6] = ["s", "m", "d", "ll", "re", "ve"];

/// Letter suffixes that stay attached to a number ("2nd", "4th")
const ORDINALS: [&str; 4] = ["st", "nd", "rd", "th"];

/// Punctuation as far as segmentation is concerned
pub fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(
            c,
            '¡' | '¿' | '«' | '»' | '‘' | '’' | '“' | '”' | '…' | '–' | '—' | '·' | '•'
        )
}

/// Segment text into words, punctuation and whitespace
pub fn segment(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        let is_space = c.is_whitespace();
        let end = rest
            .char_indices()
            .find(|&(_, ch)| ch.is_whitespace() != is_space)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let (run, tail) = rest.split_at(end);

        if is_space {
            segments.push(Segment {
                text: run,
                kind: SegmentKind::Space,
            });
        } else {
            split_chunk(run, &mut segments);
        }
        rest = tail;
    }

    segments
}

fn split_chunk<'a>(chunk: &'a str, out: &mut Vec<Segment<'a>>) {
    let start = chunk
        .char_indices()
        .find(|&(_, c)| !is_punctuation(c))
        .map(|(i, _)| i);

    let Some(start) = start else {
        push_punct(chunk, out);
        return;
    };

    // `start` found a non-punctuation char, so one exists for `end` too
    let end = chunk
        .char_indices()
        .rev()
        .find(|&(_, c)| !is_punctuation(c))
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(chunk.len());

    push_punct(&chunk[..start], out);
    split_word(&chunk[start..end], out);
    push_punct(&chunk[end..], out);
}

fn split_word<'a>(word: &'a str, out: &mut Vec<Segment<'a>>) {
    let (head, clitic) = match clitic_start(word) {
        Some(i) => (&word[..i], Some(&word[i..])),
        None => (word, None),
    };

    match unit_start(head) {
        Some(i) => {
            push_word(&head[..i], out);
            push_word(&head[i..], out);
        }
        None => push_word(head, out),
    }
    if let Some(clitic) = clitic {
        push_word(clitic, out);
    }
}

fn push_word<'a>(text: &'a str, out: &mut Vec<Segment<'a>>) {
    out.push(Segment {
        text,
        kind: SegmentKind::Word,
    });
}

fn is_apostrophe(c: char) -> bool {
    matches!(c, '\'' | '’')
}

/// Byte offset of a trailing contraction, if any
fn clitic_start(word: &str) -> Option<usize> {
    for suffix in ["n't", "n’t"] {
        if word.len() > suffix.len() {
            let i = word.len() - suffix.len();
            if word.get(i..).is_some_and(|tail| tail.eq_ignore_ascii_case(suffix)) {
                return Some(i);
            }
        }
    }

    let (i, c) = word.char_indices().rev().find(|&(_, c)| is_apostrophe(c))?;
    let tail = &word[i + c.len_utf8()..];
    (i > 0 && CLITICS.iter().any(|s| tail.eq_ignore_ascii_case(s))).then_some(i)
}

/// Byte offset where the unit starts in "<digits><letters>"
fn unit_start(word: &str) -> Option<usize> {
    let i = word.find(|c: char| !c.is_ascii_digit())?;
    let unit = &word[i..];
    let splits = i > 0
        && unit.chars().all(char::is_alphabetic)
        && !ORDINALS.iter().any(|s| unit.eq_ignore_ascii_case(s));
    splits.then_some(i)
}

fn push_punct<'a>(s: &'a str, out: &mut Vec<Segment<'a>>) {
    for (i, c) in s.char_indices() {
        out.push(Segment {
            text: &s[i..i + c.len_utf8()],
            kind: SegmentKind::Punct,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<(&str, SegmentKind)> {
        segment(input).into_iter().map(|s| (s.text, s.kind)).collect()
    }

    #[test]
    fn test_segment_words_and_punctuation() {
        use SegmentKind::*;
        assert_eq!(
            texts("Free money now!!!"),
            vec![
                ("Free", Word),
                (" ", Space),
                ("money", Word),
                (" ", Space),
                ("now", Word),
                ("!", Punct),
                ("!", Punct),
                ("!", Punct),
            ]
        );
    }

    #[test]
    fn test_segment_splits_contractions_and_units() {
        use SegmentKind::*;
        assert_eq!(
            texts("\"don't\" 3pm"),
            vec![
                ("\"", Punct),
                ("do", Word),
                ("n't", Word),
                ("\"", Punct),
                (" ", Space),
                ("3", Word),
                ("pm", Word),
            ]
        );
        assert_eq!(texts("it’s"), vec![("it", Word), ("’s", Word)]);
        assert_eq!(texts("10AM"), vec![("10", Word), ("AM", Word)]);
        assert_eq!(texts("We'll"), vec![("We", Word), ("'ll", Word)]);
    }

    #[test]
    fn test_segment_keeps_other_inner_characters() {
        use SegmentKind::*;
        assert_eq!(texts("P500"), vec![("P500", Word)]);
        assert_eq!(texts("2nd"), vec![("2nd", Word)]);
        assert_eq!(texts("e-load"), vec![("e-load", Word)]);
        assert_eq!(texts("10:30"), vec![("10:30", Word)]);
        assert_eq!(texts("n't"), vec![("n't", Word)]);
        assert_eq!(texts("rock'n'roll"), vec![("rock'n'roll", Word)]);
    }

    #[test]
    fn test_segment_whitespace_runs() {
        let segs = segment("  a\t\nb ");
        assert_eq!(segs.len(), 5);
        assert_eq!(segs[0].kind, SegmentKind::Space);
        assert_eq!(segs[0].text, "  ");
        assert_eq!(segs[2].text, "\t\n");
    }

    #[test]
    fn test_segment_unicode() {
        use SegmentKind::*;
        assert_eq!(
            texts("¡Salamat po…"),
            vec![("¡", Punct), ("Salamat", Word), (" ", Space), ("po", Word), ("…", Punct)]
        );
    }

    #[test]
    fn test_segment_empty() {
        assert!(segment("").is_empty());
    }
}
