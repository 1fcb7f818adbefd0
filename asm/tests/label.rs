use sm213asm::{assemble, token::Pos, Error, Lexer, Output};

fn run(code: &str) -> Result<Output, Error> {
    let tokens = Lexer::new(code).parse()?;
    assemble(&tokens)
}

fn image(code: &str) -> Vec<u8> {
    run(code).unwrap().image
}

macro_rules! case {
    ($name:ident, $code:expr, $expect:expr) => {
        #[test]
        fn $name() {
            assert_eq!(image($code), $expect);
        }
    };
}

// ---- Absolute ----
case!(
    jump_forward,
    "j foo\nfoo: halt",
    vec![0xB0, 0x00, 0x00, 0x00, 0x00, 0x06, 0xF0, 0x00]
);
case!(
    jump_backward,
    "foo: halt\nj foo",
    vec![0xF0, 0x00, 0xB0, 0x00, 0x00, 0x00, 0x00, 0x00]
);
case!(
    load_label,
    "ld $x, r1\nx: .long 7",
    vec![0x01, 0x00, 0x00, 0x00, 0x00, 0x06, 0x00, 0x00, 0x00, 0x07]
);
case!(long_self, "x: .long x", vec![0x00, 0x00, 0x00, 0x00]);
case!(
    long_label_after_pos,
    ".pos 0x4\ny: .long y",
    vec![0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x04]
);
case!(
    label_on_own_line,
    "start:\n\n  halt\nj start",
    vec![0xF0, 0x00, 0xB0, 0x00, 0x00, 0x00, 0x00, 0x00]
);

// ---- PC-relative ----
case!(branch_to_next, "br t\nt: halt", vec![0x80, 0x00, 0xF0, 0x00]);
case!(branch_to_self_minus_two, "t: halt\nbr t", vec![0xF0, 0x00, 0x80, 0x02]);
case!(beq_label, "beq r1, t\nt: nop", vec![0x91, 0x00, 0xFF, 0x00]);
case!(bgt_label, "t: nop\nbgt r3, t", vec![0xFF, 0x00, 0xA3, 0x02]);

#[test]
fn forward_and_backward_agree() {
    let out = image("ld $x, r0\n.pos 0x20\nx: halt\nld $x, r1");
    assert_eq!(&out[2..6], &[0x00, 0x00, 0x00, 0x20]);
    assert_eq!(&out[0x24..0x28], &[0x00, 0x00, 0x00, 0x20]);
}

#[test]
fn relative_boundary() {
    // br at 0x100 patches 0x101; displacement is (0x101 + 1 - target) / 2
    let out = image(".pos 4\nt: halt\n.pos 0x100\nbr t");
    assert_eq!(out[0x101], 0x7F);
    let out = image(".pos 0x100\nbr t\n.pos 0x202\nt: halt");
    assert_eq!(out[0x101], 0x80);

    let err = run(".pos 2\nt: halt\n.pos 0x100\nbr t").unwrap_err();
    assert!(matches!(err, Error::DisplacementOutOfRange(..)), "{}", err);
    assert_eq!(
        err.to_string(),
        "4:4: use of label `t` may not be more than 0x80 from its binding, currently 0x100"
    );
    let err = run(".pos 0x100\nbr t\n.pos 0x204\nt: halt").unwrap_err();
    assert!(matches!(err, Error::DisplacementOutOfRange(..)), "{}", err);
}

#[test]
fn relative_odd_distance() {
    let err = run(".pos 3\nt: halt\n.pos 0x10\nbr t").unwrap_err();
    assert!(matches!(err, Error::MisalignedRelative(..)), "{}", err);
}

// ---- Errors ----

#[test]
fn duplicate_label() {
    let err = run("a: halt\na: nop").unwrap_err();
    assert!(matches!(err, Error::DuplicateLabel(pos, _, prev)
        if pos == Pos::new(2, 1) && prev == Pos::new(1, 1)));

    // Same address still counts.
    let err = run("a:\na: halt").unwrap_err();
    assert!(matches!(err, Error::DuplicateLabel(..)));
}

#[test]
fn unbound_label_reported_at_use() {
    let err = run("halt\n\nj nowhere\nhalt").unwrap_err();
    assert!(matches!(err, Error::UnboundLabel(pos, ref name)
        if pos == Pos::new(3, 3) && name == "nowhere"));
}

#[test]
fn bindings_in_source_order() {
    let out = run("b: halt\na: nop\nc:").unwrap();
    let names: Vec<_> = out.labels.iter().map(|(name, (addr, _))| (name.as_str(), *addr)).collect();
    assert_eq!(names, vec![("b", 0), ("a", 2), ("c", 4)]);
}
