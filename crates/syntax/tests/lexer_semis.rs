use gogen_syntax::lexer::{tokenize, Lexer, Tok};
use pretty_assertions::assert_eq;

fn injected_semis(input: &str) -> Vec<usize> {
    Lexer::new(input)
        .filter_map(|(s, t, e)| (matches!(t, Tok::Semi) && s == e).then_some(s))
        .collect()
}

fn tok_name(t: &Tok<'_>) -> String {
    match t {
        Tok::Ident(_) => "IDENT".into(),
        Tok::IntLit(_) => "INT".into(),
        Tok::FloatLit(_) => "FLOAT".into(),
        Tok::ImagLit(_) => "IMAG".into(),
        Tok::RuneLit(_) => "CHAR".into(),
        Tok::StringLit(_) | Tok::RawStringLit(_) => "STRING".into(),
        Tok::Semi => ";".into(),
        Tok::Error => "ERROR".into(),
        other => format!("{other:?}"),
    }
}

fn lex_names(input: &str) -> String {
    Lexer::new(input)
        .map(|(_, t, _)| tok_name(&t))
        .collect::<Vec<_>>()
        .join(" ")
}

#[rustfmt::skip]
const SEMICOLON_TESTS: &[(&str, &str)] = &[
    ("", ""),
    ("\u{FEFF};", ";"),
    ("foo\n", "IDENT ;"),
    ("123\n", "INT ;"),
    ("0x1F\n", "INT ;"),
    ("1.2\n", "FLOAT ;"),
    ("1e9\n", "FLOAT ;"),
    ("2i\n", "IMAG ;"),
    ("'x'\n", "CHAR ;"),
    ("\"x\"\n", "STRING ;"),
    ("`x`\n", "STRING ;"),
    ("+\n", "Plus"),
    ("&^=\n", "AndNotAssign"),
    ("<-\n", "Arrow"),
    ("++\n", "Inc ;"),
    ("--\n", "Dec ;"),
    (")\n", "RParen ;"),
    ("]\n", "RBrack ;"),
    ("}\n", "RBrace ;"),
    ("break\n", "KwBreak ;"),
    ("continue\n", "KwContinue ;"),
    ("fallthrough\n", "KwFallthrough ;"),
    ("return\n", "KwReturn ;"),
    ("range\n", "KwRange"),
    ("foo//comment\n", "IDENT ;"),
    ("foo/*comment*/\n", "IDENT ;"),
    ("foo/*\n*/", "IDENT ;"),
    ("foo    // comment", "IDENT ;"),
    ("package main", "KwPackage IDENT ;"),
    (
        "package main\n\nfunc main() {\n\tif {\n\t\treturn /* */ }\n}\n",
        "KwPackage IDENT ; KwFunc IDENT LParen RParen LBrace KwIf LBrace KwReturn RBrace ; RBrace ;",
    ),
];

#[test]
fn semicolon_table() {
    for (input, want) in SEMICOLON_TESTS {
        assert_eq!(lex_names(input), *want, "input={input:?}");

        // Trailing newlines never change the token stream.
        let mut trimmed = *input;
        while let Some(t) = trimmed.strip_suffix('\n') {
            trimmed = t;
            assert_eq!(lex_names(trimmed), *want, "input={trimmed:?}");
        }
    }
}

#[test]
fn crlf_counts_as_one_newline() {
    assert_eq!(injected_semis("x\r\ny"), vec![1, 4]);
}

#[test]
fn block_comment_with_newline_acts_like_newline() {
    assert_eq!(injected_semis("x/*\n*/y").len(), injected_semis("x\ny").len());
    assert_eq!(injected_semis("if/*\n*/x"), vec![8]);
}

#[test]
fn line_comment_at_eof() {
    let src = "x//c";
    assert_eq!(injected_semis(src), vec![src.len()]);
}

#[test]
fn literal_text_is_borrowed_verbatim() {
    let (toks, diags) = tokenize(r#"x := "a\tb" + 'c'"#);
    assert!(diags.is_empty());
    let lits: Vec<_> = toks
        .iter()
        .filter_map(|(_, t, _)| match t {
            Tok::StringLit(s) | Tok::RuneLit(s) => Some(*s),
            _ => None,
        })
        .collect();
    assert_eq!(lits, [r#""a\tb""#, "'c'"]);
}

#[test]
fn unknown_character_is_reported() {
    let (toks, diags) = tokenize("x @ y");
    assert!(toks.iter().any(|(_, t, _)| *t == Tok::Error));
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].span.start, 2);
}

#[test]
fn unterminated_comment_is_reported() {
    let (_, diags) = tokenize("x /* never closed");
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("unterminated"));
}
