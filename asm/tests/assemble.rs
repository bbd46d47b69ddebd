use ktroasm::grammer::ast::Loc;
use ktroasm::grammer::lexer::Lexer;
use ktroasm::grammer::parsercore::Parser;
use ktroasm::msg::Msg;
use ktroasm::{Assembly, Error, Processor};

const HEADER: [i64; 3] = [0x70, 0x6b, 0x67];
const BINARY: [i64; 5] = [0xfa, 0xfa, 0x00, 0x01, 0xa2];

fn run(code: &str) -> Result<Assembly, Error> {
    ktroasm::assemble("test.ktro", code, false)
}

fn process(code: &str) -> Processor {
    let tokens = Lexer::new("test.ktro", code).parse();
    let module = Parser::new(tokens).parse().unwrap();
    let mut processor = Processor::new();
    processor.module(&module).unwrap();
    processor
}

/// Items after the header and the binary marker
fn body(code: &str) -> Vec<i64> {
    let assembly = run(code).unwrap();
    let items = assembly.package.items();
    assert_eq!(&items[..3], &HEADER);
    assert_eq!(&items[3..8], &BINARY);
    items[8..].to_vec()
}

/// Value bound by `.byte <expr> $x`
fn value(expr: &str) -> Result<i64, Error> {
    let assembly = run(&format!("(package ((.byte {} $x)))", expr))?;
    Ok(assembly.labels.get_val("x").unwrap())
}

// ----------------------------------------------------------------------------
// Constant expressions
// ----------------------------------------------------------------------------

#[test]
fn hex_and_decimal_agree() {
    assert_eq!(value("0x10").unwrap(), value("16").unwrap());
    assert_eq!(value("0xff").unwrap(), 255);
    assert_eq!(value("0X1_0").unwrap(), 16);
}

#[test]
fn precedence() {
    assert_eq!(value("2 + 3 * 4").unwrap(), 14);
    assert_eq!(value("(2 + 3) * 4").unwrap(), 20);
    assert_eq!(value("10 - 4 - 3").unwrap(), 3);
}

#[test]
fn unary() {
    assert_eq!(value("- - 5").unwrap(), 5);
    assert_eq!(value("-5 + 3").unwrap(), -2);
    assert_eq!(value("+7").unwrap(), 7);
}

#[test]
fn division_truncates() {
    assert_eq!(value("7 / 2").unwrap(), 3);
    assert_eq!(value("-7 / 2").unwrap(), -3);
    assert!(matches!(value("1 / 0"), Err(Error::DivisionByZero)));
    assert!(matches!(
        value("0x7fffffffffffffff * 2"),
        Err(Error::ArithmeticOverflow)
    ));
}

#[test]
fn chars() {
    assert_eq!(value("'A'").unwrap(), 65);
    assert_eq!(value("'a' - 'A'").unwrap(), 32);
    assert!(matches!(value("''"), Err(Error::EmptyCharLiteral)));
    assert!(matches!(value("'ab'"), Err(Error::UnexpectedToken(_))));
}

#[test]
fn sigils_are_equivalent() {
    let code = "(package ((.byte 9 $n) (.byte =n $a) (.byte @n $b) (.byte >n $c)))";
    let labels = run(code).unwrap().labels;
    for name in ["a", "b", "c"] {
        assert_eq!(labels.get_val(name), Some(9));
    }
}

// ----------------------------------------------------------------------------
// Labels
// ----------------------------------------------------------------------------

#[test]
fn forward_reference_fails() {
    let err = run("(package ((.func (0) (jmp =done $done: .end))))").unwrap_err();
    assert!(matches!(err, Error::UndefinedLabel(name, _) if name == "done"));
}

#[test]
fn backward_reference_succeeds() {
    let items = body("(package ((.func (0) ($done: jmp =done .end))))");
    assert_eq!(items, vec![0x06, 0xfa, 0, 0x07, 0xfa, 0, 0x5b, 0, 0x5c]);
}

#[test]
fn jump_labels_count_up() {
    let assembly = run("(package ((.func (0) ($a: $b: $c: .end))))").unwrap();
    assert_eq!(assembly.labels.get_val("a"), Some(0));
    assert_eq!(assembly.labels.get_val("b"), Some(1));
    assert_eq!(assembly.labels.get_val("c"), Some(2));
}

#[test]
fn anon_label_is_inline() {
    let items = body("(package ((.byte 5 $five) (.func (0) (%=five + 1: .end))))");
    assert_eq!(items, vec![0x06, 0xfa, 0, 0x07, 0xfa, 6, 0x5c]);
}

#[test]
fn extern_binds_positionally() {
    let assembly = run("(package ((.extern (100 $a) (200 $b))))").unwrap();
    assert_eq!(assembly.labels.get_val("a"), Some(100));
    assert_eq!(assembly.labels.get_val("b"), Some(200));
    assert_eq!(assembly.package.items().len(), 8);
}

#[test]
fn function_label_is_its_id() {
    let assembly = run("(package ((.func (3 $putc) (.end))))").unwrap();
    assert_eq!(assembly.labels.get_val("putc"), Some(3));
}

#[test]
fn redefinition_overrides_with_warning() {
    let assembly = run("(package ((.byte 1 $x) (.byte 2 $x)))").unwrap();
    assert_eq!(assembly.labels.get_val("x"), Some(2));
    assert!(assembly
        .msgs
        .iter()
        .any(|msg| matches!(msg, Msg::Warn(text) if text.contains("`x`"))));
    assert!(!assembly.msgs.iter().any(Msg::is_error));
}

#[test]
fn strict_mode_rejects_redefinition() {
    let code = "(package ((.byte 1 $x) (.byte 2 $x)))";
    let err = ktroasm::assemble("test.ktro", code, true).unwrap_err();
    assert!(matches!(err, Error::RedefinedLabel(name) if name == "x"));
    assert!(ktroasm::assemble("test.ktro", "(package ((.byte 1 $x)))", true).is_ok());
}

// ----------------------------------------------------------------------------
// Data section
// ----------------------------------------------------------------------------

#[test]
fn data_block() {
    let items = body("(package (.data 1 0x20))");
    assert_eq!(items, vec![0xfa, 0xfa, 1, 0x03, 1, 0x03, 0x20]);
}

#[test]
fn asciz_layout() {
    let processor = process(r#"(package ((.asciz ("AB") $s)))"#);
    assert_eq!(processor.data(), &[0x19, 3, 65, 66, 0]);
    assert_eq!(processor.heap_offset(), 3);
    assert_eq!(processor.labels().get_val("s"), Some(0));
    // Nothing reaches the main stream until the entry function
    assert_eq!(processor.main().len(), 8);
}

#[test]
fn asciz_mixes_text_and_values() {
    let processor = process(r#"(package ((.asciz ("A" 0x0a) $s)))"#);
    assert_eq!(processor.data(), &[0x19, 3, 65, 10, 0]);
}

#[test]
fn offset_reserves_heap() {
    let processor = process(r#"(package ((.offset 4 $buf) (.asciz ("A") $s)))"#);
    assert_eq!(processor.labels().get_val("buf"), Some(0));
    assert_eq!(processor.labels().get_val("s"), Some(4));
    assert_eq!(processor.heap_offset(), 6);
    assert_eq!(processor.data(), &[0xbb, 4, 0x19, 2, 65, 0]);
}

#[test]
fn zero_offset_reserves_nothing() {
    let processor = process("(package ((.offset 0 $a) (.offset 2 $b)))");
    assert_eq!(processor.labels().get_val("a"), Some(0));
    assert_eq!(processor.labels().get_val("b"), Some(0));
    assert_eq!(processor.heap_offset(), 2);
}

#[test]
fn negative_offset_is_rejected() {
    let err = run(r#"(package ((.offset 8 $a) (.offset -6 $b) (.asciz ("X") $c)))"#).unwrap_err();
    assert!(matches!(err, Error::NegativeOffset(-6)));
}

#[test]
fn heap_overflow_is_an_error() {
    let err = run("(package ((.offset 0x7fffffffffffffff) (.offset 1)))").unwrap_err();
    assert!(matches!(err, Error::ArithmeticOverflow));
    let err = run(r#"(package ((.offset 0x7fffffffffffffff) (.asciz ("A"))))"#).unwrap_err();
    assert!(matches!(err, Error::ArithmeticOverflow));
}

#[test]
fn byte_emits_nothing() {
    let processor = process("(package ((.byte 42 $answer)))");
    assert_eq!(processor.labels().get_val("answer"), Some(42));
    assert_eq!(processor.main().len(), 8);
    assert!(processor.data().is_empty());
}

#[test]
fn entry_function_splices_data() {
    let code = r#"
(package (.data 7)
  ((.asciz ("AB") $s)
   (.func (1 $helper) (ret .end))
   (.func (0 $main) (ld.u8 @s .end))))
"#;
    let items = body(code);
    let expected = vec![
        // data block
        0xfa, 0xfa, 1, 0x03, 7,
        // helper: no splice
        0x06, 0xfa, 1, 0x5c, 0x5c,
        // main
        0x06, 0xfa, 0,
        0x19, 3, 65, 66, 0,
        0x1a, 8, 0,
        0x5c,
    ];
    assert_eq!(items, expected);
}

// ----------------------------------------------------------------------------
// Instructions
// ----------------------------------------------------------------------------

#[test]
fn typeless_operands_are_raw() {
    let items = body("(package ((.func (0) (const 1 2 add .end))))");
    assert_eq!(items, vec![0x06, 0xfa, 0, 0x10, 1, 2, 0x11, 0x5c]);
}

#[test]
fn width_packing() {
    let items = body("(package ((.func (0) (const.u16 0x1234 const.u32 0x01020304 .end))))");
    assert_eq!(
        items,
        vec![
            0x06, 0xfa, 0, //
            0x10, 16, 0x12, 0x34, //
            0x10, 32, 0x01, 0x02, 0x03, 0x04, //
            0x5c,
        ]
    );
}

#[test]
fn signed_sizes_set_flag() {
    let items = body("(package ((.func (0) (const.i8 -1 const.i16 -2 .end))))");
    assert_eq!(
        items,
        vec![
            0x06, 0xfa, 0, //
            0x8a, 0x10, 8, 0xff, //
            0x8a, 0x10, 16, 0xff, 0xfe, //
            0x5c,
        ]
    );
}

#[test]
fn size_first_order() {
    let a = body("(package ((.func (0) (const.u16 1 .end))))");
    let b = body("(package ((.func (0) (u16.const 1 .end))))");
    assert_eq!(a, b);
}

#[test]
fn extref_emits_head_first() {
    let items = body("(package ((.extern 5 $io) (.func (0) (call <io.2> const.u16 <3.0x0102> .end))))");
    assert_eq!(
        items,
        vec![0x06, 0xfa, 0, 0x4c, 5, 2, 0x10, 16, 3, 0x01, 0x02, 0x5c]
    );
}

#[test]
fn invalid_width() {
    let err = run("(package ((.func (0) (add.ret 1 .end))))").unwrap_err();
    assert!(matches!(err, Error::InvalidEncodingWidth(size) if size == "ret"));
}

#[test]
fn unknown_size() {
    let err = run("(package ((.func (0) (add.u64 1 .end))))").unwrap_err();
    assert!(matches!(err, Error::UnknownOpcode(size, _) if size == "u64"));
}

#[test]
fn unknown_opcode() {
    let err = run("(package ((.func (0) (frob 1 .end))))").unwrap_err();
    assert!(matches!(err, Error::UnknownOpcode(op, _) if op == "frob"));
}

#[test]
fn undefined_label_is_located() {
    let err = run("(package\n  ((.func (0)\n    (jmp =nowhere .end))))").unwrap_err();
    assert!(matches!(&err, Error::UndefinedLabel(name, _) if name == "nowhere"));
    assert_eq!(err.loc(), Some(Loc { line: 2, col: 10 }));

    let err = run("(package ((.func (0)\n  (call <io.1> .end))))").unwrap_err();
    assert!(matches!(&err, Error::UndefinedLabel(name, _) if name == "io"));
    assert_eq!(err.loc(), Some(Loc { line: 1, col: 9 }));
}

#[test]
fn unknown_opcode_is_located() {
    let err = run("(package ((.func (0)\n  (frob 1 .end))))").unwrap_err();
    assert_eq!(err.loc(), Some(Loc { line: 1, col: 3 }));

    let err = run("(package ((.func (0)\n  (ret add.u64 1 .end))))").unwrap_err();
    assert!(matches!(&err, Error::UnknownOpcode(size, _) if size == "u64"));
    assert_eq!(err.loc(), Some(Loc { line: 1, col: 7 }));
}

// ----------------------------------------------------------------------------
// Output
// ----------------------------------------------------------------------------

#[test]
fn empty_package() {
    let assembly = run("(package)").unwrap();
    assert_eq!(
        assembly.package.to_bytes().unwrap(),
        vec![0x70, 0x6b, 0x67, 0xfa, 0xfa, 0x00, 0x01, 0xa2]
    );
}

#[test]
fn out_of_range_is_caught_at_packaging() {
    let assembly = run("(package ((.func (0) (const 300 .end))))").unwrap();
    let err = assembly.package.to_bytes().unwrap_err();
    assert!(matches!(err, Error::SerializationRange(12, 300)));
}

#[test]
fn idempotent() {
    let code = r#"
(package (.data 1 2)
  ((.extern 0x20 $io)
   (.asciz ("hello") $msg)
   (.func (0 $main)
     ($loop: ld.u8 @msg sto.u8 <io.0> jmp =loop .end))))
"#;
    let first = run(code).unwrap();
    let second = run(code).unwrap();
    assert_eq!(first.package, second.package);
    assert_eq!(first.labels, second.labels);
    assert_eq!(
        first.package.to_bytes().unwrap(),
        second.package.to_bytes().unwrap()
    );
}
