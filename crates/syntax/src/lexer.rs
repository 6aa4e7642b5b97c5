//! Go tokenizer on top of logos, with Go's automatic semicolon insertion.
//!
//! Literal validation is shallow: escapes and digit separators are accepted
//! as written and handed to the parser verbatim.

use crate::ast::Span;
use crate::error::{Diag, LexError, LexErrorKind};
use logos::{Lexer as LogosLexer, Logos};
use std::ops::Range;

#[inline(always)]
const fn first_newline_offset(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if matches!(bytes[i], b'\n' | b'\r') {
            return Some(i);
        }
        i += 1;
    }

    None
}

#[inline]
fn lex_block_comment(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    use memchr::memchr;

    let rem = lex.remainder().as_bytes();
    let mut search_start = 0;

    while let Some(star_pos) = memchr(b'*', &rem[search_start..]) {
        let abs_pos = search_start + star_pos;
        if rem.get(abs_pos + 1) == Some(&b'/') {
            lex.bump(abs_pos + 2);
            return Ok(());
        }
        search_start = abs_pos + 1;
    }

    lex.bump(rem.len());
    Err(LexErrorKind::UnterminatedComment)
}

#[repr(u8)]
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t]+")]
#[rustfmt::skip]
enum RawTok {
    #[token("\u{FEFF}")] Bom,

    // Trivia
    #[regex(r"\r\n|\n|\r")] Newline,
    #[regex(r"//[^\n\r]*", allow_greedy = true)] LineComment,
    #[token("/*", lex_block_comment)] BlockComment,

    // Keywords (before Ident)
    #[token("break")] KwBreak,
    #[token("case")] KwCase,
    #[token("chan")] KwChan,
    #[token("const")] KwConst,
    #[token("continue")] KwContinue,
    #[token("default")] KwDefault,
    #[token("defer")] KwDefer,
    #[token("else")] KwElse,
    #[token("fallthrough")] KwFallthrough,
    #[token("for")] KwFor,
    #[token("func")] KwFunc,
    #[token("go")] KwGo,
    #[token("goto")] KwGoto,
    #[token("if")] KwIf,
    #[token("import")] KwImport,
    #[token("interface")] KwInterface,
    #[token("map")] KwMap,
    #[token("package")] KwPackage,
    #[token("range")] KwRange,
    #[token("return")] KwReturn,
    #[token("select")] KwSelect,
    #[token("struct")] KwStruct,
    #[token("switch")] KwSwitch,
    #[token("type")] KwType,
    #[token("var")] KwVar,

    #[regex(r"[_\p{L}][_\p{L}\p{Nd}]*")] Ident,

    // Numbers
    #[regex(r"0[xX][0-9a-fA-F_]+|0[bB][01_]+|0[oO][0-7_]+|[0-9][0-9_]*")]
    Int,
    #[regex(r"[0-9][0-9_]*\.([0-9][0-9_]*)?([eE][+-]?[0-9][0-9_]*)?|\.[0-9][0-9_]*([eE][+-]?[0-9][0-9_]*)?|[0-9][0-9_]*[eE][+-]?[0-9][0-9_]*|0[xX][0-9a-fA-F_]*(\.[0-9a-fA-F_]*)?[pP][+-]?[0-9][0-9_]*")]
    Float,
    #[regex(r"([0-9][0-9_]*|[0-9][0-9_]*\.([0-9][0-9_]*)?([eE][+-]?[0-9][0-9_]*)?|\.[0-9][0-9_]*([eE][+-]?[0-9][0-9_]*)?|[0-9][0-9_]*[eE][+-]?[0-9][0-9_]*)i")]
    Imag,

    // Strings / runes
    #[regex(r"`[^`]*`")] RawString,
    #[regex(r#""([^"\\\n\r]|\\.)*""#)] String,
    #[regex(r"'([^'\\\n\r]|\\.)+'")] Rune,

    // Operators
    #[token("...")] Ellipsis,
    #[token("<<=")] ShlAssign,
    #[token(">>=")] ShrAssign,
    #[token("&^=")] AndNotAssign,
    #[token("+=")] AddAssign,
    #[token("-=")] SubAssign,
    #[token("*=")] MulAssign,
    #[token("/=")] DivAssign,
    #[token("%=")] ModAssign,
    #[token("&=")] AndAssign,
    #[token("|=")] OrAssign,
    #[token("^=")] XorAssign,
    #[token("<<")] Shl,
    #[token(">>")] Shr,
    #[token("&^")] AndNot,
    #[token("&&")] LAnd,
    #[token("||")] LOr,
    #[token("==")] EqEq,
    #[token("!=")] NotEq,
    #[token("<=")] Le,
    #[token(">=")] Ge,
    #[token("++")] Inc,
    #[token("--")] Dec,
    #[token(":=")] Define,
    #[token("<-")] Arrow,
    #[token("=")] Assign,
    #[token("+")] Plus,
    #[token("-")] Minus,
    #[token("*")] Star,
    #[token("/")] Slash,
    #[token("%")] Percent,
    #[token("&")] Amp,
    #[token("|")] Pipe,
    #[token("^")] Caret,
    #[token("!")] Bang,
    #[token("<")] Lt,
    #[token(">")] Gt,

    // Delimiters
    #[token("(")] LParen,
    #[token(")")] RParen,
    #[token("[")] LBrack,
    #[token("]")] RBrack,
    #[token("{")] LBrace,
    #[token("}")] RBrace,
    #[token(",")] Comma,
    #[token(";")] Semi,
    #[token(":")] Colon,
    #[token(".")] Dot,

    // Catch-all (lowest priority)
    #[regex(r".", priority = 0)] Error,
}

impl RawTok {
    /// Tokens after which a newline becomes `;`.
    #[inline(always)]
    const fn can_insert_semicolon(self) -> bool {
        matches!(
            self,
            Self::Ident
                | Self::Int
                | Self::Float
                | Self::Imag
                | Self::Rune
                | Self::String
                | Self::RawString
                | Self::KwBreak
                | Self::KwContinue
                | Self::KwFallthrough
                | Self::KwReturn
                | Self::Inc
                | Self::Dec
                | Self::RParen
                | Self::RBrack
                | Self::RBrace
        )
    }

    #[inline]
    const fn to_token<'src>(self, slice: &'src str) -> Tok<'src> {
        macro_rules! simple_tok {
            ($($raw:ident),* $(,)?) => {
                match self {
                    Self::Ident => Tok::Ident(slice),
                    Self::Int => Tok::IntLit(slice),
                    Self::Float => Tok::FloatLit(slice),
                    Self::Imag => Tok::ImagLit(slice),
                    Self::Rune => Tok::RuneLit(slice),
                    Self::String => Tok::StringLit(slice),
                    Self::RawString => Tok::RawStringLit(slice),
                    $(Self::$raw => Tok::$raw,)*
                    Self::Bom
                    | Self::Newline
                    | Self::LineComment
                    | Self::BlockComment
                    | Self::Error => Tok::Error,
                }
            };
        }

        simple_tok! {
            KwBreak, KwCase, KwChan, KwConst, KwContinue, KwDefault, KwDefer, KwElse,
            KwFallthrough, KwFor, KwFunc, KwGo, KwGoto, KwIf, KwImport, KwInterface,
            KwMap, KwPackage, KwRange, KwReturn, KwSelect, KwStruct, KwSwitch, KwType, KwVar,

            Ellipsis, ShlAssign, ShrAssign, AndNotAssign, AddAssign, SubAssign, MulAssign,
            DivAssign, ModAssign, AndAssign, OrAssign, XorAssign, Shl, Shr, AndNot, LAnd,
            LOr, EqEq, NotEq, Le, Ge, Inc, Dec, Define, Arrow, Assign, Plus, Minus, Star,
            Slash, Percent, Amp, Pipe, Caret, Bang, Lt, Gt,

            LParen, RParen, LBrack, RBrack, LBrace, RBrace, Comma, Semi, Colon, Dot,
        }
    }
}

/// Public token. Literal variants borrow their text from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tok<'input> {
    Ident(&'input str),
    IntLit(&'input str),
    FloatLit(&'input str),
    ImagLit(&'input str),
    RuneLit(&'input str),
    StringLit(&'input str),
    RawStringLit(&'input str),

    // Keywords
    KwBreak,
    KwCase,
    KwChan,
    KwConst,
    KwContinue,
    KwDefault,
    KwDefer,
    KwElse,
    KwFallthrough,
    KwFor,
    KwFunc,
    KwGo,
    KwGoto,
    KwIf,
    KwImport,
    KwInterface,
    KwMap,
    KwPackage,
    KwRange,
    KwReturn,
    KwSelect,
    KwStruct,
    KwSwitch,
    KwType,
    KwVar,

    // Operators / Delimiters
    Ellipsis,
    ShlAssign,
    ShrAssign,
    AndNotAssign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    Shl,
    Shr,
    AndNot,
    LAnd,
    LOr,
    EqEq,
    NotEq,
    Le,
    Ge,
    Inc,
    Dec,
    Define,
    Arrow,
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Bang,
    Lt,
    Gt,
    LParen,
    RParen,
    LBrack,
    RBrack,
    LBrace,
    RBrace,
    Comma,
    Semi,
    Colon,
    Dot,

    Error,
}

impl std::fmt::Display for Tok<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tok::Ident(s)
            | Tok::IntLit(s)
            | Tok::FloatLit(s)
            | Tok::ImagLit(s)
            | Tok::RuneLit(s)
            | Tok::StringLit(s)
            | Tok::RawStringLit(s) => f.write_str(s),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Token stream with semicolons inserted the way the Go scanner does.
pub struct Lexer<'src> {
    logos: LogosLexer<'src, RawTok>,
    pending: Option<(usize, Tok<'src>, usize)>,
    diags: Vec<Diag>,
    last_can_insert_semi: bool,
    src_len: usize,
    eof_done: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(input: &'src str) -> Self {
        Self {
            logos: RawTok::lexer(input),
            pending: None,
            diags: Vec::new(),
            last_can_insert_semi: false,
            src_len: input.len(),
            eof_done: false,
        }
    }

    pub fn take_diags(&mut self) -> Vec<Diag> {
        std::mem::take(&mut self.diags)
    }

    #[inline]
    fn push_lex_diag(&mut self, kind: LexErrorKind, span: Range<usize>) {
        let span = Span::new(span.start, span.end);
        self.diags.push(LexError { kind, span }.diag());
    }

    #[inline]
    fn emit_semi_at(&mut self, pos: usize) {
        self.pending = Some((pos, Tok::Semi, pos));
    }

    /// Newlines and comments. Returns `true` when `raw` was trivia.
    #[inline]
    fn handle_trivia(&mut self, raw: RawTok, span: &Range<usize>, slice: &str) -> bool {
        match raw {
            RawTok::Newline => {
                if self.last_can_insert_semi {
                    self.last_can_insert_semi = false;
                    self.emit_semi_at(span.start);
                }
                true
            }
            RawTok::LineComment => true,
            RawTok::BlockComment => {
                if self.last_can_insert_semi {
                    if let Some(off) = first_newline_offset(slice) {
                        self.last_can_insert_semi = false;
                        self.emit_semi_at(span.start + off);
                    }
                }
                true
            }
            _ => false,
        }
    }

    fn handle_raw_token(&mut self, raw: RawTok) -> Option<(usize, Tok<'src>, usize)> {
        let span = self.logos.span();
        let slice = self.logos.slice();

        if raw == RawTok::Bom && span.start == 0 {
            return None;
        }
        if self.handle_trivia(raw, &span, slice) {
            return None;
        }
        if matches!(raw, RawTok::Error | RawTok::Bom) {
            self.push_lex_diag(LexErrorKind::InvalidToken, span.clone());
            self.last_can_insert_semi = false;
            return Some((span.start, Tok::Error, span.end));
        }

        self.last_can_insert_semi = raw.can_insert_semicolon();
        Some((span.start, raw.to_token(slice), span.end))
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = (usize, Tok<'src>, usize);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(tok) = self.pending.take() {
                return Some(tok);
            }
            if self.eof_done {
                return None;
            }

            match self.logos.next() {
                None => {
                    // Leave the final `;` in `pending` for the next turn.
                    self.eof_done = true;
                    if self.last_can_insert_semi {
                        self.last_can_insert_semi = false;
                        self.emit_semi_at(self.src_len);
                    }
                }
                Some(Err(kind)) => {
                    let span = self.logos.span();
                    self.push_lex_diag(kind, span.clone());
                    self.last_can_insert_semi = false;
                    return Some((span.start, Tok::Error, span.end));
                }
                Some(Ok(raw)) => {
                    if let Some(item) = self.handle_raw_token(raw) {
                        return Some(item);
                    }
                }
            }
        }
    }
}

/// Collects the whole token stream along with lexer diagnostics.
pub fn tokenize(src: &str) -> (Vec<(usize, Tok<'_>, usize)>, Vec<Diag>) {
    let mut lexer = Lexer::new(src);
    let toks: Vec<_> = lexer.by_ref().collect();
    let diags = lexer.take_diags();
    (toks, diags)
}
