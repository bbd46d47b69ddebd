use ktroasm::grammer::lexer::{Lexer, LineLexer};
use ktroasm::grammer::token::TokenKind;

fn case(code: &str, expects: Vec<TokenKind>) {
    let tokens = LineLexer::new(code, "test.ktro", 0).parse();

    println!(" {code}");
    for token in &tokens {
        print!("\r\x1b[{}C^", token.pos.col + 1);
    }
    println!();
    for (idx, token) in tokens.iter().enumerate() {
        println!("{:>2}: {:?}", idx, token.kind);
    }

    assert_eq!(tokens.len(), expects.len());
    for (idx, expect) in expects.iter().enumerate() {
        assert_eq!(tokens[idx].kind, *expect);
    }
}

#[test]
fn func() {
    use TokenKind::*;
    case(
        "(.func (0 $main) (const.u8 0x10 'A') .end) # entry",
        vec![
            LParen,
            Directive(format!("func")),
            LParen,
            Number(format!("0"), 0),
            Dollar,
            Ident(format!("main")),
            RParen,
            LParen,
            Ident(format!("const")),
            Period,
            Ident(format!("u8")),
            Number(format!("0x10"), 16),
            Char(format!("A")),
            RParen,
            Directive(format!("end")),
            RParen,
            Comment(format!("entry")),
        ],
    );
}

#[test]
fn package_and_data() {
    use TokenKind::*;
    case(
        "(package (.data 1, 2)",
        vec![
            LParen,
            KwPackage,
            LParen,
            Directive(format!("data")),
            Number(format!("1"), 1),
            Comma,
            Number(format!("2"), 2),
            RParen,
        ],
    );
}

#[test]
fn extref_dots_are_not_directives() {
    use TokenKind::*;
    case(
        "<uart.tx> <3.4>",
        vec![
            LAngle,
            Ident(format!("uart")),
            Period,
            Ident(format!("tx")),
            RAngle,
            LAngle,
            Number(format!("3"), 3),
            Period,
            Number(format!("4"), 4),
            RAngle,
        ],
    );
}

#[test]
fn references_and_labels() {
    use TokenKind::*;
    case(
        "jmp =loop @x >y %1: $loop:",
        vec![
            Ident(format!("jmp")),
            Equal,
            Ident(format!("loop")),
            Atmark,
            Ident(format!("x")),
            RAngle,
            Ident(format!("y")),
            Percent,
            Number(format!("1"), 1),
            Colon,
            Dollar,
            Ident(format!("loop")),
            Colon,
        ],
    );
}

#[test]
fn arithmetic() {
    use TokenKind::*;
    case(
        "-(2 + 3) * 4 / 1_000",
        vec![
            Minus,
            LParen,
            Number(format!("2"), 2),
            Plus,
            Number(format!("3"), 3),
            RParen,
            Star,
            Number(format!("4"), 4),
            Slash,
            Number(format!("1_000"), 1000),
        ],
    );
}

#[test]
fn strings_have_no_escapes() {
    use TokenKind::*;
    case(
        r#""a\n b" ''"#,
        vec![Text(format!("a\\n b")), Char(format!(""))],
    );
}

#[test]
fn malformed_input_becomes_error_tokens() {
    use TokenKind::*;
    case("?", vec![Error(format!("?"))]);
    case("'ab'", vec![Error(format!("'ab'"))]);
    case("0xZZ", vec![Error(format!("0xZZ"))]);
    case("\"open", vec![Error(format!("\"open"))]);
    case("99999999999999999999", vec![Error(format!("99999999999999999999"))]);
}

#[test]
fn positions_span_lines() {
    let tokens = Lexer::new("test.ktro", "(package\n  (.byte 1))").parse();
    let byte = &tokens[3];
    assert_eq!(byte.kind, TokenKind::Directive(format!("byte")));
    assert_eq!(byte.pos.file, "test.ktro");
    assert_eq!(byte.pos.line, 1);
    assert_eq!(byte.pos.col, 3);
}
