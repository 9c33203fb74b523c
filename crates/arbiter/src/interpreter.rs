//! Turns a mover's free-form reply into a [`Candidate`].
//!
//! The interpreter is pure: it reads the text (and the position, only to
//! settle the `b`-pawn / bishop reading of lower-case tokens) and never
//! decides legality. That is the oracle's job.
//!
//! Resolution order:
//! 1. Move-shaped tokens in an answer region (after `Answer:` / `Move:` /
//!    `Best move:`, or inside `**bold**` or backticks) beat the rest.
//! 2. Among the winning tokens the first one is taken; repeats are fine.
//! 3. Alternatives (`e4 or d4`, `e4/d4`) and several different answers are
//!    reported as ambiguous.
//! 4. With nothing usable, the first near-miss explains why.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use chess_core::{Candidate, CastleSide, PieceKind, Position, coord_to_sq, sq, validate};

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum ParseFailure {
    #[error("no move-shaped token found")]
    NoTokenFound,
    #[error("'{0}' is not a square on the board")]
    MalformedSquare(String),
    #[error("'{0}' is not a piece letter (use K, Q, R, B, N)")]
    UnknownPieceLetter(char),
    #[error("cannot promote to '{0}' (use Q, R, B or N)")]
    InvalidPromotionPiece(char),
    #[error("several different moves offered: {}", .0.join(", "))]
    MultipleAmbiguousTokens(Vec<String>),
}

/// What a reply amounts to once resignations are taken into account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpretation {
    Move(Candidate),
    Resign,
}

const ANSWER_MARKERS: [&str; 3] = ["answer:", "move:", "best move:"];
const RESIGN_PHRASES: [&str; 4] = ["i resign", "resigns", "i concede", "i give up"];

/// Finds the move the text proposes.
pub fn parse(raw: &str, pos: &Position) -> Result<Candidate, ParseFailure> {
    let tokens: Vec<Token> = split_words(&normalize(raw))
        .into_iter()
        .map(|w| Token {
            kind: classify(&w.text, pos),
            text: w.text,
            region: w.region,
        })
        .collect();

    let mut regions: Vec<usize> = tokens.iter().filter_map(|t| t.region).collect();
    regions.sort_unstable();
    regions.dedup();

    let mut offered = Vec::new();
    for id in regions {
        let region: Vec<&Token> = tokens.iter().filter(|t| t.region == Some(id)).collect();
        if let Some(first) = region.iter().position(|t| t.candidate().is_some()) {
            offered.extend(alternatives_of(&region, first));
        }
    }
    if !offered.is_empty() {
        return pick_distinct(&offered);
    }

    let all: Vec<&Token> = tokens.iter().collect();
    if let Some(first) = all.iter().position(|t| t.candidate().is_some()) {
        return pick_distinct(&alternatives_of(&all, first));
    }

    let near_miss = tokens
        .iter()
        .filter(|t| t.region.is_some())
        .chain(tokens.iter())
        .find_map(|t| match &t.kind {
            Kind::NearMiss(failure) => Some(failure.clone()),
            _ => None,
        });
    Err(near_miss.unwrap_or(ParseFailure::NoTokenFound))
}

/// Like [`parse`], but a reply with no usable move that concedes the game
/// is read as a resignation.
pub fn interpret(raw: &str, pos: &Position) -> Result<Interpretation, ParseFailure> {
    match parse(raw, pos) {
        Ok(candidate) => Ok(Interpretation::Move(candidate)),
        Err(_) if is_resignation(raw) => Ok(Interpretation::Resign),
        Err(failure) => Err(failure),
    }
}

pub fn is_resignation(raw: &str) -> bool {
    let lower = raw.to_lowercase();
    RESIGN_PHRASES.iter().any(|p| lower.contains(p))
}

// =============================================================================
// Token selection
// =============================================================================

#[derive(Debug)]
enum Kind {
    Move(Candidate),
    NearMiss(ParseFailure),
    /// `or` / `/` between two moves.
    Alternative,
    Prose,
}

#[derive(Debug)]
struct Token {
    text: String,
    kind: Kind,
    /// Answer region the token sits in, if any.
    region: Option<usize>,
}

impl Token {
    fn candidate(&self) -> Option<Candidate> {
        match self.kind {
            Kind::Move(c) => Some(c),
            _ => None,
        }
    }
}

/// The token at `first` plus every move chained to it by `or` or `/`.
fn alternatives_of<'a>(tokens: &[&'a Token], first: usize) -> Vec<&'a Token> {
    let mut chain = vec![tokens[first]];
    let mut i = first + 1;
    while i + 1 < tokens.len()
        && matches!(tokens[i].kind, Kind::Alternative)
        && tokens[i + 1].candidate().is_some()
    {
        chain.push(tokens[i + 1]);
        i += 2;
    }
    chain
}

fn pick_distinct(tokens: &[&Token]) -> Result<Candidate, ParseFailure> {
    let mut distinct: Vec<(Candidate, &str)> = Vec::new();
    for token in tokens {
        if let Some(c) = token.candidate()
            && !distinct.iter().any(|(seen, _)| *seen == c)
        {
            distinct.push((c, token.text.as_str()));
        }
    }
    match distinct.as_slice() {
        [] => Err(ParseFailure::NoTokenFound),
        [(only, _)] => Ok(*only),
        many => Err(ParseFailure::MultipleAmbiguousTokens(
            many.iter().map(|(_, text)| text.to_string()).collect(),
        )),
    }
}

// =============================================================================
// Text scanning
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
struct Word {
    text: String,
    region: Option<usize>,
}

/// Maps figurines and typographic look-alikes onto plain SAN characters.
fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '♔' | '♚' => out.push('K'),
            '♕' | '♛' => out.push('Q'),
            '♖' | '♜' => out.push('R'),
            '♗' | '♝' => out.push('B'),
            '♘' | '♞' => out.push('N'),
            '♙' | '♟' => {}
            '×' => out.push('x'),
            '…' => out.push_str("..."),
            '–' | '—' | '‑' => out.push('-'),
            _ => out.push(ch),
        }
    }
    out
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '=' | '+' | '#' | '-' | '!' | '?' | '.')
}

/// Splits text into words. Each bold span, code span and answer line is a
/// separate numbered region.
fn split_words(text: &str) -> Vec<Word> {
    let mut words = Vec::new();
    let mut next_region = 0usize;
    let mut bold: Option<usize> = None;
    let mut code: Option<usize> = None;
    let mut answer_pending = false;

    let mut open_region = || {
        next_region += 1;
        Some(next_region)
    };

    for line in text.lines() {
        let lower = line.to_ascii_lowercase();
        let marker_end = ANSWER_MARKERS
            .iter()
            .filter_map(|m| lower.find(m).map(|at| at + m.len()))
            .min();

        let answer_line = answer_pending && !line.trim().is_empty();
        if answer_line {
            answer_pending = false;
        }
        if let Some(end) = marker_end
            && line[end..]
                .trim_matches(|c: char| c == '*' || c.is_whitespace())
                .is_empty()
        {
            answer_pending = true;
        }
        let line_region = if answer_line || marker_end.is_some() {
            open_region()
        } else {
            None
        };

        let mut current = String::new();
        let mut current_region = None;
        let mut chars = line.char_indices().peekable();

        while let Some((at, ch)) = chars.next() {
            let in_answer = answer_line || marker_end.is_some_and(|end| at >= end);
            let region = bold.or(code).or(if in_answer { line_region } else { None });
            let toggles_bold = ch == '*' && chars.peek().is_some_and(|&(_, next)| next == '*');

            if is_word_char(ch) && !toggles_bold {
                if current.is_empty() {
                    current_region = region;
                }
                current.push(ch);
                continue;
            }

            flush(&mut words, &mut current, current_region);
            if toggles_bold {
                chars.next();
                bold = match bold {
                    Some(_) => None,
                    None => open_region(),
                };
            } else if ch == '`' {
                code = match code {
                    Some(_) => None,
                    None => open_region(),
                };
            } else if ch == '/' {
                words.push(Word {
                    text: "/".into(),
                    region,
                });
            }
        }
        flush(&mut words, &mut current, current_region);
    }
    words
}

fn flush(words: &mut Vec<Word>, current: &mut String, region: Option<usize>) {
    if !current.is_empty() {
        words.push(Word {
            text: std::mem::take(current),
            region,
        });
    }
}

// =============================================================================
// Token classification
// =============================================================================

fn classify(word: &str, pos: &Position) -> Kind {
    if word == "/" || word.eq_ignore_ascii_case("or") {
        return Kind::Alternative;
    }

    let core = strip_decorations(word);
    if core.is_empty() {
        return Kind::Prose;
    }

    if let Some(side) = castle_side(core) {
        return Kind::Move(Candidate::Castle { side });
    }

    match coordinate(core) {
        Shape::Move(c) => return Kind::Move(c),
        Shape::Near(f) => return Kind::NearMiss(f),
        Shape::NotMove => {}
    }

    match san(core, pos) {
        Shape::Move(c) => Kind::Move(c),
        Shape::Near(f) => Kind::NearMiss(f),
        Shape::NotMove => Kind::Prose,
    }
}

/// Drops a leading move number (`12.`, `12...`) or a bare black-move
/// ellipsis (`...e5`) and trailing check marks, annotation glyphs and
/// sentence punctuation.
fn strip_decorations(word: &str) -> &str {
    let digits = word.len() - word.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    let mut core = word;
    if digits > 0 && word[digits..].starts_with('.') {
        core = &word[digits..];
    }
    core.trim_start_matches('.')
        .trim_end_matches(['+', '#', '!', '?', '.'])
        .trim_start_matches('-')
}

fn castle_side(word: &str) -> Option<CastleSide> {
    let canon: String = word
        .chars()
        .map(|c| if matches!(c, 'o' | '0') { 'O' } else { c })
        .collect();
    match canon.as_str() {
        "O-O" => Some(CastleSide::Kingside),
        "O-O-O" => Some(CastleSide::Queenside),
        _ => None,
    }
}

enum Shape {
    Move(Candidate),
    Near(ParseFailure),
    NotMove,
}

fn promotion_kind(letter: char) -> Result<PieceKind, ParseFailure> {
    PieceKind::from_san_letter(letter.to_ascii_uppercase())
        .filter(|k| k.is_promotion_target())
        .ok_or(ParseFailure::InvalidPromotionPiece(letter))
}

/// `e2e4`, `e2-e4`, `e7e8q`, `e7e8=Q`.
fn coordinate(word: &str) -> Shape {
    if !word.is_char_boundary(2) || word.len() < 4 {
        return Shape::NotMove;
    }
    let Some(from) = coord_to_sq(&word[..2]) else {
        return Shape::NotMove;
    };
    let rest = word[2..].trim_start_matches(['-', 'x']);
    if !rest.is_char_boundary(2.min(rest.len())) || rest.len() < 2 {
        return Shape::NotMove;
    }
    let Some(to) = coord_to_sq(&rest[..2]) else {
        return Shape::NotMove;
    };

    let tail = rest[2..].trim_start_matches('=');
    let mut letters = tail.chars();
    let promotion = match (letters.next(), letters.next()) {
        (None, _) => None,
        (Some(letter), None) if letter.is_ascii_alphabetic() => match promotion_kind(letter) {
            Ok(kind) => Some(kind),
            Err(failure) => return Shape::Near(failure),
        },
        _ => return Shape::NotMove,
    };

    Shape::Move(Candidate::Coordinate {
        from,
        to,
        promotion,
    })
}

#[derive(Debug)]
struct SanBody {
    from_file: Option<u8>,
    from_rank: Option<u8>,
    capture: bool,
    to: u8,
    promotion: Option<char>,
}

/// Reads `[file][rank][x]square[=promo]` once the piece letter is gone.
fn san_body(body: &str) -> Result<SanBody, Shape> {
    let chars: Vec<char> = body.chars().collect();
    let n = chars.len();

    let (core, promotion) = if n >= 2 && chars[n - 2] == '=' {
        (&chars[..n - 2], Some(chars[n - 1]))
    } else if n >= 3 && chars[n - 1].is_ascii_alphabetic() && chars[n - 2].is_ascii_digit() {
        (&chars[..n - 1], Some(chars[n - 1]))
    } else {
        (&chars[..], None)
    };

    let digits = core.iter().rev().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 || digits == core.len() {
        return Err(Shape::NotMove);
    }
    let file_at = core.len() - digits - 1;
    let file = core[file_at];
    if !file.is_ascii_lowercase() {
        return Err(Shape::NotMove);
    }

    let mut prefix = &core[..file_at];
    let capture = prefix.last() == Some(&'x');
    if capture {
        prefix = &prefix[..prefix.len() - 1];
    }
    let (from_file, from_rank) = match prefix {
        [] => (None, None),
        [f] if ('a'..='h').contains(f) => (Some(*f as u8 - b'a'), None),
        [r] if ('1'..='8').contains(r) => (None, Some(*r as u8 - b'1')),
        [f, r] if ('a'..='h').contains(f) && ('1'..='8').contains(r) => {
            (Some(*f as u8 - b'a'), Some(*r as u8 - b'1'))
        }
        _ => return Err(Shape::NotMove),
    };

    let rank_text: String = core[file_at + 1..].iter().collect();
    let to = match rank_text.parse::<i8>() {
        Ok(rank) if digits == 1 => sq(file as i8 - 'a' as i8, rank - 1),
        _ => None,
    };
    let Some(to) = to else {
        let square: String = core[file_at..].iter().collect();
        return Err(Shape::Near(ParseFailure::MalformedSquare(square)));
    };

    Ok(SanBody {
        from_file,
        from_rank,
        capture,
        to,
        promotion,
    })
}

fn san_candidate(piece: PieceKind, body: &str) -> Shape {
    let body = match san_body(body) {
        Ok(body) => body,
        Err(shape) => return shape,
    };
    let promotion = match body.promotion {
        None => None,
        Some(_) if piece != PieceKind::Pawn => return Shape::NotMove,
        Some(letter) => match promotion_kind(letter) {
            Ok(kind) => Some(kind),
            Err(failure) => return Shape::Near(failure),
        },
    };
    Shape::Move(Candidate::San {
        piece,
        from_file: body.from_file,
        from_rank: body.from_rank,
        to: body.to,
        promotion,
        capture: body.capture,
    })
}

fn san(word: &str, pos: &Position) -> Shape {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return Shape::NotMove;
    };
    let rest = chars.as_str();

    match first {
        'K' | 'Q' | 'R' | 'B' | 'N' | 'P' => {
            let piece = PieceKind::from_san_letter(first).unwrap_or(PieceKind::Pawn);
            san_candidate(piece, rest)
        }
        'b' => bishop_or_b_pawn(word, rest, pos),
        'k' | 'q' | 'r' | 'n' => match san_candidate(
            PieceKind::from_san_letter(first.to_ascii_uppercase()).unwrap_or(PieceKind::Pawn),
            rest,
        ) {
            Shape::NotMove => san_candidate(PieceKind::Pawn, word),
            shape => shape,
        },
        'A'..='Z' if first != 'O' => match san_candidate(PieceKind::Pawn, rest) {
            Shape::Move(_) => Shape::Near(ParseFailure::UnknownPieceLetter(first)),
            _ => Shape::NotMove,
        },
        _ => san_candidate(PieceKind::Pawn, word),
    }
}

/// `bxc6` is a pawn capture in SAN but models often mean the bishop.
/// Keep the pawn reading unless only the bishop reading is playable.
fn bishop_or_b_pawn(word: &str, rest: &str, pos: &Position) -> Shape {
    let pawn = san_candidate(PieceKind::Pawn, word);
    let bishop = san_candidate(PieceKind::Bishop, rest);
    match (pawn, bishop) {
        (Shape::Move(p), Shape::Move(b)) => {
            if validate(pos, &p).is_err() && validate(pos, &b).is_ok() {
                Shape::Move(b)
            } else {
                Shape::Move(p)
            }
        }
        (Shape::Move(p), _) => Shape::Move(p),
        (_, Shape::Move(b)) => Shape::Move(b),
        (pawn, _) => pawn,
    }
}

#[cfg(test)]
#[path = "interpreter_tests.rs"]
mod interpreter_tests;
